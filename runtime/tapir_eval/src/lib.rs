//! Tapir Eval - tape-walking evaluator for the Tapir runtime.
//!
//! Code is data: a program is a [`Block`] whose cells are walked left to
//! right by an [`Interpreter`]. Each top-level expression is one concrete
//! value followed by any number of operator or pipe references that thread
//! the value so far through further calls.
//!
//! # Architecture
//!
//! - [`Interpreter`]: one execution state (cursor, context, result, flags)
//! - [`InterpreterBuilder`]: context, cache and depth configuration
//! - [`EvalConfig`]: the inline-cache policy and the call depth limit
//! - [`CallStack`]: nesting of function calls and native re-entries
//!
//! # Re-exports
//!
//! The value model and symbol layer are re-exported from `tapir_value` so
//! hosts can depend on this crate alone.

mod call_stack;
mod config;
mod interpreter;

use std::sync::Once;

pub use call_stack::{CallStack, FrameKind};
pub use config::{CacheMode, EvalConfig, DEFAULT_MAX_DEPTH};
pub use interpreter::{Interpreter, InterpreterBuilder};

// Re-export the value model for convenience
pub use tapir_value::{
    fill_args, Args, Block, BlockMode, Callee, Context, ControlFlags, Cursor, CurriedCaller,
    ErrorKind, ErrorValue, EvalError, Executor, FunctionValue, KindNames, NativeEntry, NativeFn,
    NativeHandle, NativeOp, Origin, RegistrationError, Series, SharedSymbols, StringLookup, Symbol,
    SymbolTable, Value, MAX_ARITY,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=tapir_eval=debug` or `RUST_LOG=tapir_eval=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
