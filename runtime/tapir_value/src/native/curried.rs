//! Partial applications.

use std::fmt;

use smallvec::SmallVec;

use crate::{FunctionValue, Heap, NativeOp, Value, MAX_ARITY};

/// What a partial application will eventually call.
#[derive(Clone, Debug)]
pub enum Callee {
    Native(NativeOp),
    Function(Heap<FunctionValue>),
}

impl PartialEq for Callee {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callee::Native(a), Callee::Native(b)) => a == b,
            (Callee::Function(a), Callee::Function(b)) => Heap::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Callee {
    pub fn arity(&self) -> usize {
        match self {
            Callee::Native(op) => op.arity(),
            Callee::Function(func) => func.arity(),
        }
    }

    pub fn is_pure(&self) -> bool {
        match self {
            Callee::Native(op) => op.is_pure(),
            Callee::Function(func) => func.is_pure(),
        }
    }

    /// The callee as a plain value.
    pub fn to_value(&self) -> Value {
        match self {
            Callee::Native(op) => Value::Native(op.clone()),
            Callee::Function(func) => Value::Function(func.clone()),
        }
    }
}

/// A callable that was referenced with fewer arguments than it needs.
///
/// Holds the arguments supplied so far, in left-to-right order. Calling it
/// with the remaining arguments invokes the callee with all of them.
#[derive(Clone)]
pub struct CurriedCaller {
    callee: Callee,
    args: SmallVec<[Value; MAX_ARITY]>,
}

impl CurriedCaller {
    /// Capture `args` for `callee`; extra arguments beyond its arity are
    /// dropped.
    pub fn new(callee: Callee, args: impl IntoIterator<Item = Value>) -> Self {
        let arity = callee.arity();
        CurriedCaller {
            args: args.into_iter().take(arity).collect(),
            callee,
        }
    }

    pub fn callee(&self) -> &Callee {
        &self.callee
    }

    /// Arguments supplied so far.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Number of arguments still required.
    pub fn remaining(&self) -> usize {
        self.callee.arity().saturating_sub(self.args.len())
    }

    /// A new partial application with `more` appended.
    #[must_use]
    pub fn with_args(&self, more: impl IntoIterator<Item = Value>) -> Self {
        CurriedCaller::new(
            self.callee.clone(),
            self.args.iter().cloned().chain(more),
        )
    }
}

impl fmt::Debug for CurriedCaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurriedCaller")
            .field("callee", &self.callee)
            .field("args", &self.args)
            .field("remaining", &self.remaining())
            .finish()
    }
}
