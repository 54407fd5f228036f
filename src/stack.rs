//! The subroutine return stack.

pub const STACK_DEPTH: usize = 16;

#[derive(Debug, PartialEq, Eq)]
pub enum StackError {
    Overflow,
    Underflow,
}

/// Return addresses pushed by `2NNN` and popped by `00EE`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStack {
    slots: [u16; STACK_DEPTH],
    sp: usize,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a stack from raw parts. Returns `None` if `sp` is deeper
    /// than [`STACK_DEPTH`].
    pub fn from_parts(slots: [u16; STACK_DEPTH], sp: usize) -> Option<Self> {
        (sp <= STACK_DEPTH).then_some(Self { slots, sp })
    }

    pub fn slots(&self) -> &[u16; STACK_DEPTH] {
        &self.slots
    }

    /// The number of return addresses currently held.
    pub fn depth(&self) -> usize {
        self.sp
    }

    /// Push a return address. On overflow the address still replaces the top
    /// slot so the matching return lands somewhere sensible, and
    /// [`StackError::Overflow`] is reported.
    pub fn push(&mut self, address: u16) -> Result<(), StackError> {
        if self.sp == STACK_DEPTH {
            self.slots[STACK_DEPTH - 1] = address;
            return Err(StackError::Overflow);
        }
        self.slots[self.sp] = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, StackError> {
        if self.sp == 0 {
            return Err(StackError::Underflow);
        }
        self.sp -= 1;
        Ok(self.slots[self.sp])
    }
}
