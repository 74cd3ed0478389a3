use std::time::Duration;

use crate::constants::{CLOCK_SPEED, MAX_REWIND_DEPTH, TIMER_SPEED};
use crate::error::ConfigError;

/// # Quirks
/// Behaviours that differ between the original COSMAC VIP interpreter and
/// later ones. Some ROMs only run correctly with one or the other.
///
/// Both default to the modern behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    /// `8xy6`/`8xyE` shift Vy and store the result in Vx, rather than shifting Vx in place.
    pub shift_uses_vy: bool,
    /// `Fx55`/`Fx65` leave I pointing one past the last register transferred.
    pub memory_increments_index: bool,
}

/// # Config
/// How the host wants the interpreter to run.
///
/// - `clock_frequency` instructions per second; its inverse is reported by `Chip8::tick_interval`
/// - `timer_frequency` delay/sound timer decrements per second, independent of the clock
/// - `rewind_depth` how many previous states are kept for `Chip8::rewind` (0 disables it)
/// - `seed` fixes the random number generator used by `Cxkk`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub clock_frequency: f64,
    pub timer_frequency: f64,
    pub rewind_depth: usize,
    pub seed: Option<u64>,
    pub quirks: Quirks,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            clock_frequency: CLOCK_SPEED,
            timer_frequency: TIMER_SPEED,
            rewind_depth: 0,
            seed: None,
            quirks: Quirks::default(),
        }
    }
}

impl Config {
    pub fn with_clock_frequency(self, clock_frequency: f64) -> Self {
        Config {
            clock_frequency,
            ..self
        }
    }

    pub fn with_timer_frequency(self, timer_frequency: f64) -> Self {
        Config {
            timer_frequency,
            ..self
        }
    }

    pub fn with_rewind_depth(self, rewind_depth: usize) -> Self {
        Config {
            rewind_depth,
            ..self
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Config {
            seed: Some(seed),
            ..self
        }
    }

    pub fn with_quirks(self, quirks: Quirks) -> Self {
        Config { quirks, ..self }
    }

    /// Checks that both frequencies describe a usable period and that the rewind ring is bounded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.clock_period()?;
        self.timer_period()?;
        if self.rewind_depth > MAX_REWIND_DEPTH {
            return Err(ConfigError::InvalidRewindDepth(self.rewind_depth));
        }
        Ok(())
    }

    /// Time between two instructions.
    pub fn clock_period(&self) -> Result<Duration, ConfigError> {
        period(self.clock_frequency).ok_or(ConfigError::InvalidClockFrequency(self.clock_frequency))
    }

    /// Time between two timer decrements.
    pub fn timer_period(&self) -> Result<Duration, ConfigError> {
        period(self.timer_frequency).ok_or(ConfigError::InvalidTimerFrequency(self.timer_frequency))
    }
}

/// The inverse of `frequency`, if it is a positive finite number whose period fits a `Duration`
/// and is not rounded down to nothing.
fn period(frequency: f64) -> Option<Duration> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(frequency.recip())
        .ok()
        .filter(|period| !period.is_zero())
}
