//! User-defined functions.

use tapir_ir::Symbol;

use crate::{Block, BlockMode, Context, Heap};

/// A function built from a parameter list and a body block.
///
/// When called, a fresh child of the captured context (or of the caller's
/// context, if none was captured) binds the parameters and the body runs as
/// an exec block with the first argument as its initial result.
#[derive(Clone, Debug)]
pub struct FunctionValue {
    params: Heap<[Symbol]>,
    body: Block,
    ctx: Option<Context>,
    pure: bool,
}

impl FunctionValue {
    pub fn new(params: &[Symbol], body: Block) -> Self {
        FunctionValue {
            params: Heap::slice(params),
            body: body.with_mode(BlockMode::Exec),
            ctx: None,
            pure: false,
        }
    }

    /// Close over `ctx`.
    #[must_use]
    pub fn with_context(mut self, ctx: Context) -> Self {
        self.ctx = Some(ctx);
        self
    }

    #[must_use]
    pub fn pure(mut self) -> Self {
        self.pure = true;
        self
    }

    pub fn params(&self) -> &[Symbol] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn body(&self) -> &Block {
        &self.body
    }

    pub fn context(&self) -> Option<&Context> {
        self.ctx.as_ref()
    }

    pub fn is_pure(&self) -> bool {
        self.pure
    }
}
