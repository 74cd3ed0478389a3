use crate::constants::{ADDRESS_MASK, FLAG_REGISTER, PROGRAM_START, REGISTER_COUNT, STACK_DEPTH};
use crate::display::Display;
use crate::memory::Memory;

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow/collision flag
/// - (i) a 12-bit memory address register
///
/// Counter
/// - (pc) a 12-bit program counter, always advanced 2 bytes at a time
///
/// Stack
/// - 16 return addresses; (sp) counts how many are in use
///
/// Timers
/// - 2 8-bit timers (delay & sound) counting down towards 0
///
/// ## Memory
/// - 4096 bytes of addressable memory with the font preloaded
/// - a 64x32 display
///
/// ## Input
/// - `awaiting_key` holds the register waiting for the next key press, if any
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: usize,
    pub stack: [u16; STACK_DEPTH],
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub memory: Memory,
    pub display: Display,
    pub awaiting_key: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0; STACK_DEPTH],
            delay_timer: 0,
            sound_timer: 0,
            memory: Memory::new(),
            display: Display::new(),
            awaiting_key: None,
        }
    }

    pub fn register(&self, x: u8) -> u8 {
        self.v[(x & 0xF) as usize]
    }

    pub fn set_register(&mut self, x: u8, value: u8) {
        self.v[(x & 0xF) as usize] = value;
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.v[FLAG_REGISTER] = flag as u8;
    }

    pub fn set_index(&mut self, addr: u16) {
        self.i = addr & ADDRESS_MASK;
    }

    pub fn jump(&mut self, addr: u16) {
        self.pc = addr & ADDRESS_MASK;
    }

    /// Moves the pc past one instruction.
    pub fn skip(&mut self) {
        self.jump(self.pc.wrapping_add(2));
    }

    /// if cond then pc += 2
    pub fn skip_if(&mut self, cond: bool) {
        if cond {
            self.skip();
        }
    }

    /// Reads the opcode at the pc and moves the pc past it.
    pub fn fetch(&mut self) -> u16 {
        let op = self.memory.read16(self.pc);
        self.skip();
        op
    }

    /// The active call stack, oldest return address first.
    pub fn call_stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }

    /// Counts both timers down by `ticks`, stopping at 0.
    pub fn tick_timers(&mut self, ticks: u32) {
        let ticks = ticks.min(u32::from(u8::MAX)) as u8;
        self.delay_timer = self.delay_timer.saturating_sub(ticks);
        self.sound_timer = self.sound_timer.saturating_sub(ticks);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
