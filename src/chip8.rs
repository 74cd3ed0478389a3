use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{debug, error, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{Config, Quirks};
use crate::constants::{MAX_ROM_SIZE, PROGRAM_START};
use crate::display::FrameBuffer;
use crate::error::{ConfigError, Error, LoadError};
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::operations::{execute, Environment};
use crate::state::State;
use crate::timer::Timer;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding
///  - the keypad as it was on the previous step, to spot new key presses
///  - a wall-clock timer driving the delay and sound timers
///
/// Supplies interfaces for:
/// - loading roms
/// - stepping the CPU one instruction at a time with the current keypad
/// - rewinding the CPU
/// - inspecting its state and frame buffer
///
/// The host is responsible for calling `step` once every `tick_interval`.
pub struct Chip8 {
    state: State,
    previous_states: VecDeque<State>,
    rewind_depth: usize,
    previous_keys: Keypad,
    clock_period: Duration,
    timer: Timer,
    rng: StdRng,
    quirks: Quirks,
}

impl Chip8 {
    /// A machine running at `clock_frequency` instructions per second with everything else default.
    pub fn new(clock_frequency: f64) -> Result<Self, ConfigError> {
        Self::with_config(Config::default().with_clock_frequency(clock_frequency))
    }

    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let clock_period = config.clock_period()?;
        let timer_period = config.timer_period()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Chip8 {
            state: State::new(),
            previous_states: VecDeque::with_capacity(config.rewind_depth),
            rewind_depth: config.rewind_depth,
            previous_keys: Keypad::new(),
            clock_period,
            timer: Timer::new(timer_period, Instant::now()),
            rng,
            quirks: config.quirks,
        })
    }

    /// Copies a rom into memory at 0x200.
    ///
    /// Fails without touching memory if it doesn't fit.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(LoadError::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        self.state.memory.write_block(PROGRAM_START, rom);
        debug!("loaded {} byte rom at {:#05X}", rom.len(), PROGRAM_START);
        Ok(())
    }

    /// Advances the CPU by a single cycle, then the timers by however many ticks are due.
    ///
    /// Returns the FrameBuffer if the display should be redrawn.
    pub fn step<K: Into<Keypad>>(&mut self, keys: K) -> Result<Option<FrameBuffer>, Error> {
        self.step_at(keys, Instant::now())
    }

    /// `step`, with the current time supplied by the caller.
    pub fn step_at<K: Into<Keypad>>(
        &mut self,
        keys: K,
        now: Instant,
    ) -> Result<Option<FrameBuffer>, Error> {
        let keys = keys.into();
        let frame = self.advance_cpu(&keys)?;
        self.previous_keys = keys;
        self.advance_timers(now);
        Ok(frame)
    }

    /// Whether the sound timer is running.
    pub fn buzzer_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// How long the host should wait between calls to `step`.
    pub fn tick_interval(&self) -> Duration {
        self.clock_period
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// The current contents of the display, whether or not it changed recently.
    pub fn frame(&self) -> &FrameBuffer {
        self.state.display.frame_buffer()
    }

    pub fn is_awaiting_key(&self) -> bool {
        self.state.awaiting_key.is_some()
    }

    /// Restores the state from before the most recent step, if one was kept.
    ///
    /// Steps spent waiting on `Fx0A` without a key press are not kept, so a
    /// rewind past a wait lands on the instruction before it.
    pub fn rewind(&mut self) -> bool {
        match self.previous_states.pop_front() {
            Some(state) => {
                self.state = state;
                debug!("rewound to pc {:#05X}", self.state.pc);
                true
            }
            None => false,
        }
    }

    /// Executes one instruction, or checks for the key press an `Fx0A` is waiting on.
    ///
    /// On error the state is left as it was before the instruction was fetched.
    fn advance_cpu(&mut self, keys: &Keypad) -> Result<Option<FrameBuffer>, Error> {
        if let Some(register) = self.state.awaiting_key {
            if let Some(key) = keys.newly_pressed(&self.previous_keys) {
                self.save_state();
                self.state.set_register(register, key);
                self.state.awaiting_key = None;
                debug!("key {:X} pressed into V{:X}", key, register);
            }
            return Ok(None);
        }

        let address = self.state.pc;
        let op = Opcode(self.state.memory.read16(address));
        let instruction = match Instruction::decode(op) {
            Some(instruction) => instruction,
            None => {
                let err = Error::UnknownOpcode {
                    opcode: op.0,
                    address,
                };
                error!("{}", err);
                return Err(err);
            }
        };
        trace!(
            "{:03X}  {}  {}  v{:02X?} i{:03X}",
            address,
            op,
            instruction,
            self.state.v,
            self.state.i
        );

        let before = self.state;
        self.state.fetch();
        let mut env = Environment {
            keys,
            rng: &mut self.rng,
            quirks: self.quirks,
        };
        if let Err(err) = execute(instruction, &mut self.state, &mut env) {
            error!("{}", err);
            self.state = before;
            return Err(err);
        }
        self.remember(before);

        if instruction.touches_display() {
            Ok(Some(*self.state.display.frame_buffer()))
        } else {
            Ok(None)
        }
    }

    /// Decrements both timers once per elapsed timer interval.
    fn advance_timers(&mut self, now: Instant) {
        let ticks = self.timer.ticks(now);
        if ticks > 0 {
            self.state.tick_timers(ticks);
        }
    }

    fn save_state(&mut self) {
        let state = self.state;
        self.remember(state);
    }

    /// Puts `state` in previous_states
    /// - if there are already `rewind_depth` saved then the oldest is dropped
    fn remember(&mut self, state: State) {
        if self.rewind_depth == 0 {
            return;
        }
        if self.previous_states.len() == self.rewind_depth {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(state);
    }
}
