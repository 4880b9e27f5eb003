//! Block evaluation.
//!
//! Data blocks return themselves, collect blocks build a new block from one
//! result per top-level expression, exec blocks run their cells as
//! statements and keep the last result. The native-facing re-entry points
//! live here too: each pushes a call frame, swaps in the block's own cursor
//! and restores the caller's tape and context on the way out.

use tapir_value::{Block, BlockMode, Context, ControlFlags, Value};

use super::Interpreter;
use crate::call_stack::FrameKind;

impl Interpreter {
    /// Evaluate a block value met on the tape.
    pub(crate) fn eval_block_value(&mut self, block: Block) {
        match block.mode() {
            BlockMode::Data => self.set_result(Value::Block(block)),
            BlockMode::Collect => self.eval_collect(&block),
            BlockMode::Exec => {
                let saved = std::mem::replace(&mut self.cursor, block.cursor());
                self.run_series(None);
                self.cursor = saved;
            }
        }
    }

    /// Evaluate each top-level expression of `block` once, collecting the
    /// results in order into a new data block.
    fn eval_collect(&mut self, block: &Block) {
        let saved = std::mem::replace(&mut self.cursor, block.cursor());
        let mut out = Vec::with_capacity(block.len());
        while self.skip_guards() {
            self.flags.remove(ControlFlags::FAILURE);
            self.eval_expression(false);
            if self.flags.halts() {
                self.cursor = saved;
                return;
            }
            out.push(self.result.clone());
        }
        self.cursor = saved;
        self.set_result(Value::data_block(out));
    }

    /// Run the current cursor to the end as statements.
    ///
    /// With `inject`, the first statement starts from that value, so the
    /// series may open with an operator or pipe reference. Stops as soon as
    /// `error` or `return` is set. `failure` only outlives the statement
    /// that set it when that statement is the last one.
    pub(crate) fn run_series(&mut self, inject: Option<Value>) {
        self.flags.remove(ControlFlags::FAILURE);
        match inject {
            Some(value) => {
                self.result = value;
                self.eval_infix(false);
            }
            None => self.result = Value::Void,
        }
        while !self.flags.halts() && self.skip_guards() {
            self.flags.remove(ControlFlags::FAILURE);
            self.eval_expression(false);
        }
    }

    /// Consume expression guards between statements. Returns `false` at the
    /// end of the tape.
    pub(crate) fn skip_guards(&mut self) -> bool {
        while let Some(Value::Comma) = self.cursor.peek() {
            self.cursor.pop();
        }
        !self.cursor.at_end()
    }

    pub(crate) fn reenter_block(&mut self, block: &Block) -> Value {
        self.flags.remove(ControlFlags::FAILURE);
        let block = block.clone();
        self.with_frame(FrameKind::Block, |this| this.eval_block_value(block));
        self.result.clone()
    }

    /// The context comes from the native and may differ on every call, so
    /// nothing resolved under it is cached.
    pub(crate) fn reenter_block_in(&mut self, block: &Block, ctx: Context) -> Value {
        self.with_frame(FrameKind::Block, |this| {
            this.with_tape_and_context(block.cursor(), ctx, |this| {
                this.without_rewrite(|this| this.run_series(None));
            });
        });
        self.result.clone()
    }

    pub(crate) fn reenter_block_inj(&mut self, block: &Block, inject: Value) -> Value {
        let ctx = self.ctx.clone();
        self.with_frame(FrameKind::Block, |this| {
            this.with_tape_and_context(block.cursor(), ctx, |this| this.run_series(Some(inject)));
        });
        self.result.clone()
    }
}
