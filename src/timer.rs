use std::time::{Duration, Instant};

/// Counts fixed-length intervals of wall-clock time.
///
/// Ticks are measured from the previous tick rather than from the previous
/// call, so the tick rate doesn't drift with how often it is polled.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    interval: Duration,
    last_tick: Instant,
}

impl Timer {
    /// `interval` must not be zero.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_tick: now,
        }
    }

    /// How many whole intervals have elapsed between the last tick and `now`.
    pub fn ticks(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.last_tick);
        let ticks = (elapsed.as_nanos() / self.interval.as_nanos()).min(u128::from(u32::MAX)) as u32;
        self.last_tick += self.interval * ticks;
        ticks
    }
}
