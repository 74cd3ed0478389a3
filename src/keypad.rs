use crate::constants::KEY_COUNT;

/// # Keypad
/// A snapshot of the hexadecimal keypad supplied by the host on every step.
///
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
///
/// Keys are addressed by their hex value; only the low nibble is considered.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    pressed: [bool; KEY_COUNT],
}

impl Keypad {
    /// No keys pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// A keypad with exactly the given keys held down.
    pub fn with_pressed(keys: &[u8]) -> Self {
        let mut keypad = Keypad::new();
        for &key in keys {
            keypad.pressed[(key & 0xF) as usize] = true;
        }
        keypad
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.pressed[(key & 0xF) as usize]
    }

    /// The lowest key that is down now but was up in `previous`.
    pub fn newly_pressed(&self, previous: &Keypad) -> Option<u8> {
        (0..KEY_COUNT as u8).find(|&key| self.is_pressed(key) && !previous.is_pressed(key))
    }
}

impl From<[bool; KEY_COUNT]> for Keypad {
    fn from(pressed: [bool; KEY_COUNT]) -> Self {
        Keypad { pressed }
    }
}
