use crate::error::{Bounds, Error, Result};
use crate::memory::TypeAddr;

pub const STACK_DEPTH: usize = 16;

/// Return addresses for subroutine calls, sixteen deep.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    addresses: [TypeAddr; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<()> {
        let slot = self
            .addresses
            .get_mut(self.sp)
            .ok_or(Error::OutOfBounds(Bounds::StackOverflow))?;
        *slot = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<TypeAddr> {
        if self.sp == 0 {
            return Err(Error::OutOfBounds(Bounds::StackUnderflow));
        }
        self.sp -= 1;
        Ok(self.addresses[self.sp])
    }

    /// Current stack pointer, 0 when empty and 16 when full.
    pub fn depth(&self) -> usize {
        self.sp
    }
}
