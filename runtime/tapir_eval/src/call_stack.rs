//! Call nesting tracking.
//!
//! Every user-function call and every re-entry from a native callable
//! pushes a frame; the depth check is part of `push()`.

use tapir_value::{recursion_limit_exceeded, ErrorValue};

/// Why a frame was pushed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// A user-defined function body.
    Function,
    /// A native callable invoking a callable value through the fast path.
    Callback,
    /// A native callable evaluating a block.
    Block,
}

/// Live call stack of one interpreter.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<FrameKind>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `max_depth` is `None` for unlimited.
    pub fn new(max_depth: Option<usize>) -> Self {
        CallStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, checking the depth limit. The frame is not pushed on
    /// overflow.
    pub fn push(&mut self, kind: FrameKind) -> Result<(), ErrorValue> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                tracing::warn!(
                    max,
                    ?kind,
                    remaining_stack = ?tapir_stack::remaining_stack(),
                    "call depth limit reached"
                );
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(kind);
        Ok(())
    }

    /// Pop the most recent frame.
    pub fn pop(&mut self) {
        debug_assert!(!self.frames.is_empty(), "CallStack::pop() on empty stack");
        self.frames.pop();
    }

    /// Current call depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Innermost frame, if any.
    pub fn top(&self) -> Option<FrameKind> {
        self.frames.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapir_value::ErrorKind;

    #[test]
    fn test_push_pop_depth() {
        let mut stack = CallStack::new(Some(2));
        assert_eq!(stack.push(FrameKind::Function), Ok(()));
        assert_eq!(stack.push(FrameKind::Block), Ok(()));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top(), Some(FrameKind::Block));
        let err = stack.push(FrameKind::Callback);
        assert_eq!(err.map_err(|e| e.kind()), Err(ErrorKind::Recursion));
        assert_eq!(stack.depth(), 2);
        stack.pop();
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_unlimited() {
        let mut stack = CallStack::new(None);
        for _ in 0..50_000 {
            assert!(stack.push(FrameKind::Function).is_ok());
        }
        assert_eq!(stack.depth(), 50_000);
    }
}
