use thiserror::Error;

/// Faults that stop execution.
///
/// The machine is left as it was before the faulting instruction was fetched,
/// so stepping again reports the same fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown opcode {opcode:#06X} at {address:#05X}")]
    UnknownOpcode { opcode: u16, address: u16 },

    #[error("call stack overflow at {address:#05X}")]
    StackOverflow { address: u16 },

    #[error("return with empty call stack at {address:#05X}")]
    StackUnderflow { address: u16 },
}

/// A ROM image that could not be placed in memory. Memory is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },
}

/// Host configuration rejected before any machine state is created.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("clock frequency must be a positive number of hertz, got {0}")]
    InvalidClockFrequency(f64),

    #[error("timer frequency must be a positive number of hertz, got {0}")]
    InvalidTimerFrequency(f64),

    #[error("rewind depth must be at most {max}, got {0}", max = crate::constants::MAX_REWIND_DEPTH)]
    InvalidRewindDepth(usize),
}
