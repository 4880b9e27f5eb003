//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use tapir_value::{Block, Context, ControlFlags, Cursor, KindNames, SharedSymbols, Value};

use super::Interpreter;
use crate::call_stack::CallStack;
use crate::config::{CacheMode, EvalConfig};

/// Builder for creating Interpreter instances.
///
/// Only the symbol table is required. Without an explicit context the
/// interpreter starts in a fresh root context.
pub struct InterpreterBuilder {
    symbols: SharedSymbols,
    ctx: Option<Context>,
    config: EvalConfig,
    tape: Option<Block>,
}

impl InterpreterBuilder {
    pub fn new(symbols: SharedSymbols) -> Self {
        Self {
            symbols,
            ctx: None,
            config: EvalConfig::default(),
            tape: None,
        }
    }

    /// Evaluate in `ctx` (typically a context shared with other
    /// interpreters, or a child of one).
    #[must_use]
    pub fn context(mut self, ctx: Context) -> Self {
        self.ctx = Some(ctx);
        self
    }

    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn cache(mut self, cache: CacheMode) -> Self {
        self.config.cache = cache;
        self
    }

    /// Maximum call nesting; `None` for unlimited.
    #[must_use]
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Initial tape, consumed by [`Interpreter::resume`].
    #[must_use]
    pub fn tape(mut self, block: Block) -> Self {
        self.tape = Some(block);
        self
    }

    pub fn build(self) -> Interpreter {
        Interpreter {
            kinds: KindNames::new(&self.symbols),
            symbols: self.symbols,
            cursor: self.tape.map_or_else(Cursor::empty, |b| b.cursor()),
            ctx: self.ctx.unwrap_or_else(Context::root),
            result: Value::Void,
            flags: ControlFlags::empty(),
            call_stack: CallStack::new(self.config.max_depth),
            config: self.config,
            uncached: 0,
        }
    }
}
