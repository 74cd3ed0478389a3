use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// The FrameBuffer is indexed as [y][x]; `true` is a lit pixel.
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// # Display
/// The Chip-8 display is a 64x32 grid of black/white pixels.
///
/// It is only ever changed by clearing it or by XOR-ing sprites onto it.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Display {
    frame_buffer: FrameBuffer,
}

impl Display {
    pub fn new() -> Self {
        Display {
            frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.frame_buffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    /// XORs an 8-pixel-wide sprite onto the display with its top left corner at `(x, y)`.
    ///
    /// The origin wraps around the screen, but the sprite itself is clipped:
    /// rows past the bottom edge and columns past the right edge are dropped.
    ///
    /// Returns whether any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let x = x as usize % DISPLAY_WIDTH;
        let y = y as usize % DISPLAY_HEIGHT;
        let mut collision = false;

        for (row, byte) in sprite.iter().enumerate() {
            let py = y + row;
            if py >= DISPLAY_HEIGHT {
                break;
            }
            for bit in 0..8 {
                let px = x + bit;
                if px >= DISPLAY_WIDTH {
                    break;
                }
                if (byte >> (7 - bit)) & 1 == 1 {
                    let pixel = &mut self.frame_buffer[py][px];
                    collision |= *pixel;
                    *pixel = !*pixel;
                }
            }
        }

        collision
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.frame_buffer[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH]
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    pub fn lit_pixels(&self) -> usize {
        self.frame_buffer
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&pixel| pixel)
            .count()
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders lit pixels as `#` and dark pixels as `.`, one line per row.
impl std::fmt::Debug for Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.frame_buffer.iter() {
            let line: String = row.iter().map(|&p| if p { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_sprite_at_offset() {
        let mut display = Display::new();
        // the 0 glyph
        let collision = display.draw_sprite(1, 1, &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert!(!collision);
        let mut expected = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        expected[1][1..5].copy_from_slice(&[true, true, true, true]);
        expected[2][1..5].copy_from_slice(&[true, false, false, true]);
        expected[3][1..5].copy_from_slice(&[true, false, false, true]);
        expected[4][1..5].copy_from_slice(&[true, false, false, true]);
        expected[5][1..5].copy_from_slice(&[true, true, true, true]);
        assert_eq!(display.frame_buffer(), &expected);
    }

    #[test]
    fn test_xors_onto_existing_pixels() {
        let mut display = Display::new();
        display.frame_buffer[0][0..4].copy_from_slice(&[false, true, false, true]);
        let collision = display.draw_sprite(0, 0, &[0b1100_0000]);
        assert_eq!(display.frame_buffer[0][0..4], [true, false, false, true]);
        assert!(collision);
    }

    #[test]
    fn test_clips_at_right_edge() {
        let mut display = Display::new();
        display.draw_sprite(60, 0, &[0xFF]);
        assert_eq!(display.frame_buffer[0][60..64], [true; 4]);
        assert_eq!(display.frame_buffer[0][0..4], [false; 4]);
        assert_eq!(display.frame_buffer[1][0..4], [false; 4]);
        assert_eq!(display.lit_pixels(), 4);
    }

    #[test]
    fn test_clips_at_bottom_edge() {
        let mut display = Display::new();
        display.draw_sprite(0, 30, &[0x80, 0x80, 0x80, 0x80]);
        assert!(display.pixel(0, 30));
        assert!(display.pixel(0, 31));
        assert_eq!(display.lit_pixels(), 2);
    }

    #[test]
    fn test_origin_wraps() {
        let mut display = Display::new();
        display.draw_sprite(64 + 3, 32 + 2, &[0x80]);
        assert!(display.pixel(3, 2));
        assert_eq!(display.lit_pixels(), 1);
    }

    #[test]
    fn test_drawing_twice_erases_and_collides() {
        let mut display = Display::new();
        assert!(!display.draw_sprite(10, 10, &[0xAA, 0x55]));
        assert!(display.draw_sprite(10, 10, &[0xAA, 0x55]));
        assert_eq!(display.lit_pixels(), 0);
    }

    #[test]
    fn test_clear() {
        let mut display = Display::new();
        display.draw_sprite(0, 0, &[0xFF; 15]);
        display.clear();
        assert_eq!(display.lit_pixels(), 0);
    }
}
