use smallvec::SmallVec;
use td_core::Value;

use crate::RuntimeError;

/// Bounded operand stack. Task programs rarely nest deeper than a few operands.
pub(crate) struct Stack {
    items: SmallVec<[Value; 8]>,
    limit: usize,
}

impl Stack {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            items: SmallVec::new(),
            limit,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub(crate) fn push(&mut self, v: Value, ip: usize) -> Result<(), RuntimeError> {
        if self.items.len() >= self.limit {
            return Err(RuntimeError::StackOverflow {
                ip,
                limit: self.limit,
            });
        }
        self.items.push(v);
        Ok(())
    }

    #[inline]
    pub(crate) fn pop(&mut self, ip: usize) -> Result<Value, RuntimeError> {
        self.items.pop().ok_or(RuntimeError::StackUnderflow { ip })
    }

    /// Pops right then left.
    #[inline]
    pub(crate) fn pop2(&mut self, ip: usize) -> Result<(Value, Value), RuntimeError> {
        let b = self.pop(ip)?;
        let a = self.pop(ip)?;
        Ok((a, b))
    }
}
