//! A CHIP-8 interpreter core.
//!
//! The host owns the run loop: it calls [`Chip8::step`] once every
//! [`Chip8::tick_interval`] with the current keypad, redraws whenever a
//! [`FrameBuffer`] comes back, and beeps while [`Chip8::buzzer_active`].

pub use chip8::Chip8;
pub use config::{Config, Quirks};
pub use constants::CLOCK_SPEED;
pub use display::{Display, FrameBuffer};
pub use error::{ConfigError, Error, LoadError};
pub use instruction::Instruction;
pub use keypad::Keypad;
pub use memory::Memory;
pub use opcode::Opcode;
pub use state::State;

mod chip8;
mod config;
pub mod constants;
mod display;
mod error;
mod instruction;
mod keypad;
mod memory;
mod opcode;
mod operations;
pub mod state;
mod timer;
