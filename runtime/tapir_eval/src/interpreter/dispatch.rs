//! Expression dispatch.
//!
//! `eval_concrete` pops exactly one cell and evaluates it by kind.
//! `eval_expression` adds infix threading: after the concrete value, every
//! operator reference (and, unless limited, every pipe reference) that
//! follows takes the value so far as its first argument.
//!
//! Limited expressions are what native arguments and set references use:
//! `add 1 2 |print` gathers `2` as the second argument and leaves `|print`
//! to thread the result of `add`.

use tapir_value::{
    error_object_encountered, expression_guard, missing_left_value, missing_value, Callee,
    ControlFlags, Value,
};

use super::invoke::ArgBuf;
use super::Interpreter;

/// How a reference receives the value to its left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Threading {
    /// Plain prefix call; arguments are limited expressions.
    Prefix,
    /// Operator reference; left value first, remaining arguments concrete.
    Op,
    /// Pipe reference; left value first, remaining arguments limited.
    Pipe,
}

impl Interpreter {
    /// Evaluate one expression including its infix tail.
    pub(crate) fn eval_expression(&mut self, limited: bool) {
        tapir_stack::ensure_sufficient_stack(|| {
            self.eval_concrete();
            self.eval_infix(limited);
        });
    }

    /// Apply operator and pipe references following the current result.
    pub(crate) fn eval_infix(&mut self, limited: bool) {
        loop {
            if self.flags.halts() {
                return;
            }
            let (sym, threading) = match self.cursor.peek() {
                Some(Value::OpWord(sym)) => (sym, Threading::Op),
                Some(Value::PipeWord(sym)) if !limited => (sym, Threading::Pipe),
                _ => return,
            };
            self.cursor.pop();
            let left = std::mem::take(&mut self.result);
            self.eval_word(sym, Some(left), threading);
        }
    }

    /// Pop one cell and evaluate it.
    pub(crate) fn eval_concrete(&mut self) {
        let Some(value) = self.cursor.pop() else {
            self.raise_error(missing_value());
            return;
        };
        match value {
            Value::Integer(_)
            | Value::Decimal(_)
            | Value::Boolean(_)
            | Value::Str(_)
            | Value::Void
            | Value::Uri(_)
            | Value::Email(_)
            | Value::Handle(_)
            | Value::Context(_) => self.set_result(value),
            Value::Block(block) => {
                if !self.flags.contains(ControlFlags::SKIP) {
                    self.eval_block_value(block);
                }
            }
            Value::Word(sym) => self.eval_word(sym, None, Threading::Prefix),
            Value::GenWord(sym) => self.eval_genword(sym),
            Value::Path(segments) => self.eval_path(&segments),
            Value::SetWord(sym) => self.eval_setword(sym),
            Value::ModWord(sym) => self.eval_modword(sym),
            Value::GetWord(sym) => self.eval_getword(sym),
            Value::TagWord(sym) => self.set_result(Value::Word(sym)),
            Value::OpWord(sym) | Value::PipeWord(sym) => {
                let name = self.symbols.lookup(sym);
                self.raise_error(missing_left_value(name));
            }
            // Callables land here after the inline cache rewrote their cell
            Value::Native(op) => {
                self.call_callee(Callee::Native(op), ArgBuf::new(), None, Threading::Prefix);
            }
            Value::Function(func) => {
                self.call_callee(Callee::Function(func), ArgBuf::new(), None, Threading::Prefix);
            }
            Value::Curried(curried) => self.call_curried(&curried, None, Threading::Prefix),
            Value::Comma => self.raise_error(expression_guard()),
            Value::Error(e) => self.raise_error(error_object_encountered(&e)),
        }
    }
}
