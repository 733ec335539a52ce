use crate::error::{Bounds, Error, Result};

pub const KEY_COUNT: usize = 16;

/// Pressed state of the hex keypad, replaced wholesale by the host before
/// each cycle.
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    pub fn is_pressed(&self, key: u8) -> Result<bool> {
        self.keys
            .get(key as usize)
            .copied()
            .ok_or(Error::OutOfBounds(Bounds::Key(key)))
    }

    /// Mark a key as handled so the same press is not seen twice.
    pub fn consume(&mut self, key: u8) -> Result<()> {
        let slot = self
            .keys
            .get_mut(key as usize)
            .ok_or(Error::OutOfBounds(Bounds::Key(key)))?;
        *slot = false;
        Ok(())
    }

    /// Lowest-numbered key currently down.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|k| k as u8)
    }
}
