use tracing::debug;

use crate::error::{Bounds, Error, Result};

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; GLYPH_SIZE * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const FONT_START: TypeAddr = 0x050;
pub const PROGRAM_START: TypeAddr = 0x200;
/// Largest program image that fits between `PROGRAM_START` and the end of memory.
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const GLYPH_SIZE: usize = 5;

const DEFAULT_FONT: FontBytes = [
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

/// Flat 4K address space.
///
/// 000 -> 04F is empty by convention, the font lives at 050 -> 09F and
/// programs are loaded from 200. Every access is bounds checked and reports
/// `Bounds::Memory` instead of panicking.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let start = FONT_START as usize;
        bytes[start..start + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
        Self { bytes }
    }

    pub fn get(&self, addr: usize) -> Result<u8> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(Error::OutOfBounds(Bounds::Memory(addr)))
    }

    pub fn set(&mut self, addr: usize, val: u8) -> Result<()> {
        let slot = self
            .bytes
            .get_mut(addr)
            .ok_or(Error::OutOfBounds(Bounds::Memory(addr)))?;
        *slot = val;
        Ok(())
    }

    /// `len` bytes starting at `start`.
    pub fn slice(&self, start: usize, len: usize) -> Result<&[u8]> {
        let end = checked_end(start, len)?;
        Ok(&self.bytes[start..end])
    }

    pub fn slice_mut(&mut self, start: usize, len: usize) -> Result<&mut [u8]> {
        let end = checked_end(start, len)?;
        Ok(&mut self.bytes[start..end])
    }

    /// Instructions are two bytes, big-endian.
    pub fn instruction_at(&self, addr: TypeAddr) -> Result<u16> {
        let addr = addr as usize;
        let (l, r) = (self.get(addr)?, self.get(addr + 1)?);
        Ok(((l as u16) << 8) | r as u16)
    }

    // loads program instructions starting at address 0x200
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > MAX_PROGRAM_SIZE {
            return Err(Error::LoadTooLarge {
                size: bytes.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        let start_index = PROGRAM_START as usize;
        self.bytes[start_index..start_index + bytes.len()].copy_from_slice(bytes);
        debug!(len = bytes.len(), "loaded program image");
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

fn checked_end(start: usize, len: usize) -> Result<usize> {
    match start.checked_add(len) {
        Some(end) if end <= MEMORY_SIZE => Ok(end),
        // report the first address that falls outside
        _ => Err(Error::OutOfBounds(Bounds::Memory(start.max(MEMORY_SIZE)))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_is_written_at_init() {
        let mem = Memory::new();
        assert_eq!(mem.slice(FONT_START as usize, 5).unwrap(), &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(mem.get(0x09F).unwrap(), 0x80);
        assert_eq!(mem.get(0x0A0).unwrap(), 0x00);
        assert_eq!(mem.get(0x04F).unwrap(), 0x00);
    }

    #[test]
    fn reads_instructions_big_endian() {
        let mut mem = Memory::new();
        mem.load_rom(&[0xAA, 0xBB]).unwrap();
        assert_eq!(mem.instruction_at(PROGRAM_START).unwrap(), 0xAABB);
    }

    #[test]
    fn instruction_fetch_at_last_byte_is_out_of_bounds() {
        let mem = Memory::new();
        assert_eq!(
            mem.instruction_at(0xFFF),
            Err(Error::OutOfBounds(Bounds::Memory(0x1000)))
        );
        assert!(mem.instruction_at(0xFFE).is_ok());
    }

    #[test]
    fn rejects_programs_past_end_of_memory() {
        let mut mem = Memory::new();
        assert!(mem.load_rom(&[0xFF; MAX_PROGRAM_SIZE]).is_ok());
        assert_eq!(mem.get(MEMORY_SIZE - 1).unwrap(), 0xFF);
        assert_eq!(
            mem.load_rom(&[0; MAX_PROGRAM_SIZE + 1]),
            Err(Error::LoadTooLarge {
                size: MAX_PROGRAM_SIZE + 1,
                max: MAX_PROGRAM_SIZE
            })
        );
    }

    #[test]
    fn slices_are_bounds_checked() {
        let mut mem = Memory::new();
        assert!(mem.slice(0xFFD, 3).is_ok());
        assert_eq!(
            mem.slice(0xFFE, 3),
            Err(Error::OutOfBounds(Bounds::Memory(MEMORY_SIZE)))
        );
        assert_eq!(
            mem.set(0x1000, 1),
            Err(Error::OutOfBounds(Bounds::Memory(0x1000)))
        );
        assert!(mem.slice_mut(0x1001, 0).is_err());
    }
}
