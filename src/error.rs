/// What an out-of-range access was reaching for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Bounds {
    #[error("memory address {0:#05x}")]
    Memory(usize),

    #[error("call stack overflow")]
    StackOverflow,

    #[error("return with empty call stack")]
    StackUnderflow,

    #[error("key index {0:#04x}")]
    Key(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Out of bounds: {0}")]
    OutOfBounds(Bounds),

    #[error("Unknown opcode {0:#06x}")]
    UnknownOpcode(u16),

    #[error("Program image is {size} bytes, at most {max} bytes fit")]
    LoadTooLarge { size: usize, max: usize },
}

impl From<Bounds> for Error {
    fn from(bounds: Bounds) -> Self {
        Self::OutOfBounds(bounds)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
