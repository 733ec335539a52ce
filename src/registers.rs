use std::fmt;

use crate::memory::{TypeAddr, PROGRAM_START};

/// Index of one of the sixteen general purpose registers, V0 to VF.
///
/// Built from a 4-bit instruction field, so it is always in range and the
/// register file can be indexed without further checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register(u8);

impl Register {
    pub const V0: Register = Register(0x0);
    /// Carry, borrow and collision flag.
    pub const VF: Register = Register(0xF);

    /// Keeps the low nibble only.
    pub fn from_nibble(n: u8) -> Self {
        Register(n & 0xF)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Every register from V0 up to and including `self`.
    pub fn through(self) -> impl Iterator<Item = Register> {
        (0..=self.0).map(Register)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registers {
    registers: [u8; 16],
}

impl Registers {
    pub fn new() -> Self {
        Self { registers: [0; 16] }
    }

    pub fn set_register(&mut self, reg: Register, value: u8) {
        self.registers[reg.index()] = value;
    }

    pub fn add_to_register(&mut self, reg: Register, value: u8) {
        let total = self.get(reg).wrapping_add(value);
        self.set_register(reg, total);
    }

    pub fn get(&self, reg: Register) -> u8 {
        self.registers[reg.index()]
    }

    pub fn set_flag(&mut self, on: bool) {
        self.set_register(Register::VF, on as u8);
    }

    pub fn as_array(&self) -> &[u8; 16] {
        &self.registers
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    /// Move past the current instruction.
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    /// Move past the current instruction and the one after it.
    pub fn skip(&mut self) {
        self.0 = self.0.wrapping_add(4);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

impl Default for ProgramCounter {
    fn default() -> Self {
        Self(PROGRAM_START)
    }
}

/// No upper bound is enforced here; memory access through it is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    pub fn add(&mut self, offset: u8) {
        self.0 = self.0.wrapping_add(offset as u16);
    }
}
