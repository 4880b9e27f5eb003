//! The seam between native callables and the interpreter.

use tapir_ir::{Symbol, SymbolTable};

use crate::{Args, Block, Context, ControlFlags, ErrorKind, ErrorValue, Value};

/// What a native callable can do with the execution state.
///
/// Implemented by the interpreter. Object safe: natives receive
/// `&mut dyn Executor`.
///
/// Every re-entry method saves the caller's tape position and context and
/// restores them before returning, so re-entries nest strictly.
pub trait Executor {
    /// The symbol table shared by this runtime.
    fn symbols(&self) -> &SymbolTable;

    /// Current control flags.
    fn flags(&self) -> ControlFlags;

    /// Mutable access to the control flags.
    fn flags_mut(&mut self) -> &mut ControlFlags;

    /// The context code is currently evaluated in.
    fn context(&self) -> &Context;

    /// Kind symbol of `value`, as used by receiver-qualified dispatch.
    fn kind_of(&self, value: &Value) -> Symbol;

    /// Invoke a callable value with arguments already in hand.
    ///
    /// Bypasses tape-based argument gathering and currying. Non-callable
    /// values are returned as they are.
    fn call_value(&mut self, callee: &Value, args: Args) -> Value;

    /// Evaluate a block in the current context according to its mode.
    fn eval_block(&mut self, block: &Block) -> Value;

    /// Run `block` as code in `ctx`, typically a fresh child holding ad hoc
    /// bindings.
    fn eval_block_in(&mut self, block: &Block, ctx: Context) -> Value;

    /// Run `block` as code with `inject` as its initial result, so the block
    /// may start with an operator or pipe reference.
    fn eval_block_inj(&mut self, block: &Block, inject: Value) -> Value;

    /// Report a recoverable failure: sets `failure` and returns the error
    /// value for the caller to use as its result.
    fn fail(&mut self, kind: ErrorKind, message: &str) -> Value {
        self.flags_mut().insert(ControlFlags::FAILURE);
        Value::error(ErrorValue::new(kind, message))
    }

    /// Raise a hard error: sets `error` and returns the error value.
    fn raise(&mut self, error: ErrorValue) -> Value {
        self.flags_mut().insert(ControlFlags::ERROR);
        Value::error(error)
    }

    /// Request an early unwind out of the enclosing function with `value`.
    fn request_return(&mut self, value: Value) -> Value {
        self.flags_mut().insert(ControlFlags::RETURN);
        value
    }
}
