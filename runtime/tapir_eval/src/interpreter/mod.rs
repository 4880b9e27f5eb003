//! The execution state and its evaluation loop.
//!
//! # Architecture
//!
//! One [`Interpreter`] is one execution state: the current tape cursor, the
//! current context, the last result and the four control flags. The work is
//! split by concern:
//!
//! - `dispatch` - pops one cell and evaluates it by kind; infix threading of
//!   operator and pipe references. The only code that advances the cursor
//!   on its own.
//! - `resolve` - reference resolution through the context chain, the inline
//!   cache, receiver-qualified fallback, set/mod/get/generic/path references.
//! - `invoke` - argument gathering, currying, native and function calls, and
//!   the fast path for arguments already in hand.
//! - `block` - data/collect/exec block evaluation and the re-entry points
//!   used by native callables.
//!
//! # Re-entry discipline
//!
//! Anything that evaluates a different series swaps in a fresh [`Cursor`]
//! and restores the caller's afterwards; anything that evaluates in a
//! different context does the same with the context. Swaps nest strictly,
//! so a native callable can re-enter the interpreter at any depth.
//!
//! # Threads
//!
//! An interpreter is not shared. A thread that needs to run user code builds
//! its own interpreter over the same [`SharedSymbols`] and (read-mostly)
//! [`Context`]; blocks can be evaluated by several interpreters at once
//! because each walk has its own cursor.

mod block;
mod builder;
mod dispatch;
mod invoke;
mod resolve;

pub use builder::InterpreterBuilder;

use tapir_value::{
    Args, Block, Context, ControlFlags, Cursor, ErrorKind, ErrorValue, EvalError, Executor,
    KindNames, SharedSymbols, Symbol, SymbolTable, Value,
};

use crate::call_stack::{CallStack, FrameKind};
use crate::config::EvalConfig;

/// A tape-walking execution state.
pub struct Interpreter {
    symbols: SharedSymbols,
    kinds: KindNames,
    cursor: Cursor,
    ctx: Context,
    result: Value,
    flags: ControlFlags,
    config: EvalConfig,
    call_stack: CallStack,
    /// Nesting of evaluations whose bindings vary from call to call. The
    /// inline cache stays off while this is non-zero.
    uncached: u32,
}

impl Interpreter {
    /// Interpreter with a fresh root context and the default configuration.
    pub fn new(symbols: SharedSymbols) -> Self {
        InterpreterBuilder::new(symbols).build()
    }

    pub fn builder(symbols: SharedSymbols) -> InterpreterBuilder {
        InterpreterBuilder::new(symbols)
    }

    pub fn symbols(&self) -> &SharedSymbols {
        &self.symbols
    }

    pub fn kinds(&self) -> &KindNames {
        &self.kinds
    }

    pub fn config(&self) -> EvalConfig {
        self.config
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Replace the current context, returning the previous one.
    pub fn set_context(&mut self, ctx: Context) -> Context {
        std::mem::replace(&mut self.ctx, ctx)
    }

    pub fn flags(&self) -> ControlFlags {
        self.flags
    }

    pub fn flags_mut(&mut self) -> &mut ControlFlags {
        &mut self.flags
    }

    /// Clear all four flags.
    pub fn clear_flags(&mut self) {
        self.flags = ControlFlags::empty();
    }

    /// The last computed result.
    pub fn result(&self) -> &Value {
        &self.result
    }

    /// Current call depth.
    pub fn depth(&self) -> usize {
        self.call_stack.depth()
    }

    /// Intern a name in the shared table.
    pub fn intern(&self, name: &str) -> Symbol {
        self.symbols.intern(name)
    }

    /// Bind `name` in the current context, replacing any local binding.
    pub fn define(&self, name: &str, value: Value) {
        self.ctx.modify(self.symbols.intern(name), value);
    }

    /// Evaluate `block` as code in the current context.
    ///
    /// Returns the last result; flags stay set for the caller to inspect.
    pub fn eval(&mut self, block: &Block) -> Value {
        let saved = std::mem::replace(&mut self.cursor, block.cursor());
        self.run_series(None);
        self.cursor = saved;
        self.result.clone()
    }

    /// Evaluate what is left of the interpreter's own tape (see
    /// [`InterpreterBuilder::tape`]).
    pub fn resume(&mut self) -> Value {
        self.run_series(None);
        self.result.clone()
    }

    /// Evaluate the next top-level expression of the interpreter's own tape.
    ///
    /// Returns `None` once the tape is exhausted.
    pub fn step(&mut self) -> Option<Value> {
        if !self.skip_guards() {
            return None;
        }
        self.flags.remove(ControlFlags::FAILURE);
        self.eval_expression(false);
        Some(self.result.clone())
    }

    /// Host entry point.
    ///
    /// Clears stale flags, evaluates `block` as code and turns an unhandled
    /// `error` into `Err`. A failure in the last statement is returned as
    /// `Ok` of its error value, with the flag still observable.
    pub fn run(&mut self, block: &Block) -> Result<Value, EvalError> {
        self.clear_flags();
        let value = self.eval(block);
        if !self.flags.contains(ControlFlags::ERROR) {
            self.flags.remove(ControlFlags::RETURN);
            return Ok(value);
        }
        Err(match value.as_error() {
            Some(e) => EvalError::from(e),
            None => EvalError {
                kind: ErrorKind::Custom,
                message: value.display(&*self.symbols).to_string(),
                status: None,
            },
        })
    }

    /// Store `value` as the result unless `skip` is set.
    #[inline]
    pub(crate) fn set_result(&mut self, value: Value) {
        if !self.flags.contains(ControlFlags::SKIP) {
            self.result = value;
        }
    }

    /// Set `error` and store `error` as the result.
    pub(crate) fn raise_error(&mut self, error: ErrorValue) {
        self.flags.insert(ControlFlags::ERROR);
        self.result = Value::error(error);
    }

    /// Run `f` inside a new call frame. On overflow `f` is not run and a
    /// recursion error is raised instead.
    pub(crate) fn with_frame(&mut self, kind: FrameKind, f: impl FnOnce(&mut Self)) {
        if let Err(e) = self.call_stack.push(kind) {
            self.raise_error(e);
            return;
        }
        tapir_stack::ensure_sufficient_stack(|| f(self));
        self.call_stack.pop();
    }

    /// Evaluate with `cursor` and `ctx` swapped in, restoring both after.
    pub(crate) fn with_tape_and_context(
        &mut self,
        cursor: Cursor,
        ctx: Context,
        f: impl FnOnce(&mut Self),
    ) {
        let saved_cursor = std::mem::replace(&mut self.cursor, cursor);
        let saved_ctx = std::mem::replace(&mut self.ctx, ctx);
        f(self);
        self.ctx = saved_ctx;
        self.cursor = saved_cursor;
    }

    /// Run `f` with the inline cache disabled.
    pub(crate) fn without_rewrite(&mut self, f: impl FnOnce(&mut Self)) {
        self.uncached += 1;
        f(self);
        self.uncached -= 1;
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("pos", &self.cursor.pos())
            .field("flags", &self.flags)
            .field("depth", &self.call_stack.depth())
            .field("config", &self.config)
            .field("uncached", &self.uncached)
            .finish_non_exhaustive()
    }
}

impl Executor for Interpreter {
    fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    fn flags(&self) -> ControlFlags {
        self.flags
    }

    fn flags_mut(&mut self) -> &mut ControlFlags {
        &mut self.flags
    }

    fn context(&self) -> &Context {
        &self.ctx
    }

    fn kind_of(&self, value: &Value) -> Symbol {
        self.kinds.of(value)
    }

    fn call_value(&mut self, callee: &Value, args: Args) -> Value {
        self.fast_call(callee, args)
    }

    fn eval_block(&mut self, block: &Block) -> Value {
        self.reenter_block(block)
    }

    fn eval_block_in(&mut self, block: &Block, ctx: Context) -> Value {
        self.reenter_block_in(block, ctx)
    }

    fn eval_block_inj(&mut self, block: &Block, inject: Value) -> Value {
        self.reenter_block_inj(block, inject)
    }
}
