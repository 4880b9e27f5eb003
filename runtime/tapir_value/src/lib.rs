//! Value model for the Tapir runtime.
//!
//! Everything the evaluator touches lives here: the closed [`Value`] union,
//! the shared [`Series`] cells that hold both code and data, per-evaluation
//! [`Cursor`]s, the [`Context`] environment chain, native-operation
//! descriptors and the [`Executor`] trait through which native callables
//! reach back into the interpreter.
//!
//! The evaluator itself is in `tapir_eval`; integration modules only need
//! this crate to define and register native operations.

mod context;
mod errors;
mod executor;
mod flags;
mod native;
mod series;
mod value;

pub use context::{Context, Origin};
pub use errors::{
    already_bound, error_object_encountered, expression_guard, missing_left_value, missing_value,
    path_not_context, recursion_limit_exceeded, unresolved_reference, BindError, ErrorKind,
    ErrorValue, EvalError, RegistrationError,
};
pub use executor::Executor;
pub use flags::ControlFlags;
pub use native::{
    fill_args, Args, Callee, CurriedCaller, FunctionValue, NativeEntry, NativeFn, NativeHandle,
    NativeOp, MAX_ARITY,
};
pub use series::{Cursor, Series};
pub use value::{Block, BlockMode, Heap, KindNames, UriValue, Value, ValueDisplay};

// Re-export the symbol layer for convenience
pub use tapir_ir::{SharedSymbols, StringLookup, Symbol, SymbolTable};
