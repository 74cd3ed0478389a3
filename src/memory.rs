use crate::constants::{ADDRESS_MASK, FONT_START, MEMORY_SIZE, SPRITE_SHEET};

/// # Memory
/// 4096 bytes of flat addressable memory.
///
/// ```text
/// 0x000 - 0x04F  unused
/// 0x050 - 0x09F  font sprite sheet
/// 0x0A0 - 0x1FF  unused
/// 0x200 - 0xFFF  program
/// ```
///
/// Every address is masked to 12 bits, so accesses past the end wrap around to
/// the start instead of faulting.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Zeroed memory with the font sprite sheet in place.
    pub fn new() -> Self {
        let mut memory = Memory {
            bytes: [0; MEMORY_SIZE],
        };
        memory.write_block(FONT_START, &SPRITE_SHEET);
        memory
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[(addr & ADDRESS_MASK) as usize]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[(addr & ADDRESS_MASK) as usize] = value;
    }

    /// Combines two subsequent bytes, most significant first.
    pub fn read16(&self, addr: u16) -> u16 {
        u16::from(self.read(addr)) << 8 | u16::from(self.read(addr.wrapping_add(1)))
    }

    /// Copies `data` byte by byte starting at `addr`, wrapping at the end of memory.
    pub fn write_block(&mut self, addr: u16, data: &[u8]) {
        let mut addr = addr & ADDRESS_MASK;
        for &byte in data {
            self.write(addr, byte);
            addr = (addr + 1) & ADDRESS_MASK;
        }
    }

    /// The whole address space.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.bytes.iter().filter(|&&b| b != 0).count();
        f.debug_struct("Memory")
            .field("size", &MEMORY_SIZE)
            .field("non_zero_bytes", &used)
            .finish()
    }
}
