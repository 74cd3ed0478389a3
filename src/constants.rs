/// Addressable memory in bytes; every address is masked to 12 bits.
pub const MEMORY_SIZE: usize = 0x1000;
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// ROMs are loaded here and execution begins here.
pub const PROGRAM_START: u16 = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Where the font glyphs live; each glyph is `FONT_GLYPH_SIZE` bytes tall.
pub const FONT_START: u16 = 0x050;
pub const FONT_GLYPH_SIZE: u16 = 5;

pub const REGISTER_COUNT: usize = 16;
pub const FLAG_REGISTER: usize = 0xF;
pub const STACK_DEPTH: usize = 16;
/// Most previous states `Chip8::rewind` may keep; each one is a full copy of memory.
pub const MAX_REWIND_DEPTH: usize = 4096;
pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Instructions executed per second unless the host asks for something else.
pub const CLOCK_SPEED: f64 = 500.0;

/// Delay/sound timer decrements per second.
pub const TIMER_SPEED: f64 = 60.0;

/// # Sprite sheet
/// Hexadecimal digits 0..F, 4 pixels wide and 5 rows tall.
/// Only the high nibble of each row is drawn.
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
