use crate::error::{Error, Result};
use crate::memory::TypeAddr;
use crate::registers::Register;

/// A fetched 16-bit word and the fields an instruction can draw from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction {
    code: u16,
}

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction { code }
    }

    // n is starting digit, m is length
    pub fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        // 0110 1100 1111 0001
        // -------------------
        // 1111 1111 1111 1111
        //      1111 1111 1111
        //           1111 1111
        //                1111
        //
        // 4 - (m) - (n - 1), n = 2
        let shift_places = (4 - m - (n - 1)) * 4;
        let mask = (1u32 << (m * 4)) - 1;
        (self.code >> shift_places) & mask as u16
    }

    pub fn family(&self) -> u8 {
        self.nth_m_digits(1, 1) as u8
    }

    pub fn x(&self) -> Register {
        Register::from_nibble(self.nth_m_digits(2, 1) as u8)
    }

    pub fn y(&self) -> Register {
        Register::from_nibble(self.nth_m_digits(3, 1) as u8)
    }

    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }

    pub fn nn(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }

    pub fn nnn(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // 00E0
    // turn all pixels to 0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    // set PC to address NNN, "jump" to memory location
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XNN
    SkipEqualConstant(Register, u8),
    // 4XNN
    SkipNotEqualConstant(Register, u8),
    // 5XY0
    SkipEqualRegister(Register, Register),
    // 9XY0
    SkipNotEqualRegister(Register, Register),

    // 6XNN
    SetRegister(Register, u8),
    // 7XNN
    // add value NN to VX, no carry
    AddToRegister(Register, u8),

    // 8XY0
    CopyRegister(Register, Register),
    // 8XY1
    Or(Register, Register),
    // 8XY2
    And(Register, Register),
    // 8XY3
    XOr(Register, Register),
    // 8XY4
    Add(Register, Register),
    // 8XY5
    SubtractForward(Register, Register),
    // 8XY6
    RightShift(Register, Register),
    // 8XY7
    SubtractBackward(Register, Register),
    // 8XYE
    LeftShift(Register, Register),

    // ANNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXNN
    Random(Register, u8),
    // DXYN
    // draw an N pixel tall sprite starting at I at (VX, VY),
    // VF set to 1 if any pixel was switched off
    Display(Register, Register, u8),

    // EX9E
    SkipIfPressed(Register),
    // EXA1
    SkipIfNotPressed(Register),

    // FX07
    CopyDelayToRegister(Register),
    // FX0A
    GetKey(Register),
    // FX15
    CopyRegisterToDelay(Register),
    // FX18
    CopyRegisterToSound(Register),
    // FX1E
    AddToIndex(Register),
    // FX29
    PointChar(Register),
    // FX33
    ToDecimal(Register),
    // FX55
    StoreRegisterToMemory(Register),
    // FX65
    LoadRegisterFromMemory(Register),
}

impl Instruction {
    /// Decode a fetched word. Words outside the instruction set are an
    /// `UnknownOpcode` error.
    pub fn decode(ins: u16) -> Result<Self> {
        let raw = RawInstruction::new(ins);
        let (x, y) = (raw.x(), raw.y());

        let decoded = match raw.family() {
            0x0 => match ins {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::PopSubroutine,
                _ => return Err(Error::UnknownOpcode(ins)),
            },
            0x1 => Self::Jump(raw.nnn()),
            0x2 => Self::PushSubroutine(raw.nnn()),
            0x3 => Self::SkipEqualConstant(x, raw.nn()),
            0x4 => Self::SkipNotEqualConstant(x, raw.nn()),
            0x5 if raw.n() == 0 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, raw.nn()),
            0x7 => Self::AddToRegister(x, raw.nn()),
            0x8 => match raw.n() {
                0x0 => Self::CopyRegister(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::XOr(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::SubtractForward(x, y),
                0x6 => Self::RightShift(x, y),
                0x7 => Self::SubtractBackward(x, y),
                0xE => Self::LeftShift(x, y),
                _ => return Err(Error::UnknownOpcode(ins)),
            },
            0x9 if raw.n() == 0 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(raw.nnn()),
            0xB => Self::JumpWithOffset(raw.nnn()),
            0xC => Self::Random(x, raw.nn()),
            0xD => Self::Display(x, y, raw.n()),
            0xE => match raw.nn() {
                0x9E => Self::SkipIfPressed(x),
                0xA1 => Self::SkipIfNotPressed(x),
                _ => return Err(Error::UnknownOpcode(ins)),
            },
            0xF => match raw.nn() {
                0x07 => Self::CopyDelayToRegister(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::CopyRegisterToDelay(x),
                0x18 => Self::CopyRegisterToSound(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::PointChar(x),
                0x33 => Self::ToDecimal(x),
                0x55 => Self::StoreRegisterToMemory(x),
                0x65 => Self::LoadRegisterFromMemory(x),
                _ => return Err(Error::UnknownOpcode(ins)),
            },
            _ => return Err(Error::UnknownOpcode(ins)),
        };
        Ok(decoded)
    }
}
