//! Reference resolution.
//!
//! A plain reference is looked up through the context chain. If that fails,
//! the reference is retried as a receiver-qualified method
//! `<kind>//<name>`, with the receiver being the value to its left or, for a
//! prefix reference, the next expression on the tape. The lookahead only
//! happens when some `<kind>//<name>` binding name was ever interned.
//!
//! # Inline cache
//!
//! When a prefix reference resolves to a native or function bound in the
//! current context or its immediate parent, and that context is not a
//! per-call frame, the reference's tape cell is overwritten with the
//! resolved callable. Later visits dispatch the callable directly. The
//! rewrite assumes the binding does not change between visits, so it is
//! off inside contexts handed in by a native and inside bodies of
//! functions without a captured context (their parent is the caller).
//! With [`CacheMode::NoRewrite`] every visit walks the chain instead.

use tapir_value::{
    already_bound, path_not_context, unresolved_reference, Callee, ControlFlags, Origin, Symbol,
    Value,
};

use super::dispatch::Threading;
use super::invoke::ArgBuf;
use super::Interpreter;
use crate::config::CacheMode;

impl Interpreter {
    /// Resolve and evaluate a reference, threading `left` if present.
    pub(crate) fn eval_word(&mut self, sym: Symbol, left: Option<Value>, threading: Threading) {
        // Cell of a prefix reference: it was the last one popped
        let cell = self.cursor.pos().checked_sub(1);
        match self.ctx.resolve(sym) {
            Some((value, origin)) => {
                if let (Threading::Prefix, Some(cell)) = (threading, cell) {
                    self.maybe_rewrite(cell, &value, origin);
                }
                self.eval_object(value, left, threading);
            }
            None => self.eval_unbound_word(sym, left, threading),
        }
    }

    fn maybe_rewrite(&self, cell: usize, value: &Value, origin: Origin) {
        if self.config.cache != CacheMode::Rewrite
            || self.uncached > 0
            || !matches!(value, Value::Native(_) | Value::Function(_))
        {
            return;
        }
        let holder = match origin {
            Origin::Local => Some(&self.ctx),
            Origin::Parent => self.ctx.parent(),
            Origin::Ancestor(_) => None,
        };
        if holder.is_some_and(|ctx| !ctx.is_frame()) && self.cursor.series().put(cell, value.clone())
        {
            tracing::debug!(cell, ?origin, "inline cache rewrote reference");
        }
    }

    /// Evaluate a resolved value: callables are invoked, anything else is
    /// the result.
    pub(crate) fn eval_object(&mut self, value: Value, left: Option<Value>, threading: Threading) {
        match value {
            Value::Native(op) => {
                self.call_callee(Callee::Native(op), ArgBuf::new(), left, threading);
            }
            Value::Function(func) => {
                self.call_callee(Callee::Function(func), ArgBuf::new(), left, threading);
            }
            Value::Curried(curried) => self.call_curried(&curried, left, threading),
            other => self.set_result(other),
        }
    }

    /// Receiver-qualified fallback for a reference with no binding.
    fn eval_unbound_word(&mut self, sym: Symbol, left: Option<Value>, threading: Threading) {
        let after_word = self.cursor.pos();
        let receiver = match left {
            Some(left) => Some(left),
            // Look ahead only for names some kind declares as a method
            None if self.symbols.has_method(sym)
                && !matches!(self.cursor.peek(), None | Some(Value::Comma)) =>
            {
                self.eval_concrete();
                if self.flags.halts() {
                    return;
                }
                Some(std::mem::take(&mut self.result))
            }
            None => None,
        };

        if let Some(receiver) = receiver {
            let kind = self.kinds.of(&receiver);
            let qualified = self.symbols.qualify(kind, sym);
            if let Some(method) = self.ctx.lookup(qualified) {
                tracing::trace!(
                    method = self.symbols.lookup(qualified),
                    "receiver-qualified dispatch"
                );
                self.eval_object(method, Some(receiver), threading);
                return;
            }
        }

        self.cursor.set_pos(after_word);
        let name = self.symbols.lookup(sym);
        self.raise_error(unresolved_reference(name));
    }

    /// Generic reference: dispatch only on the kind of the next value.
    pub(crate) fn eval_genword(&mut self, sym: Symbol) {
        self.eval_concrete();
        if self.flags.halts() {
            return;
        }
        let receiver = std::mem::take(&mut self.result);
        let kind = self.kinds.of(&receiver);
        let qualified = self.symbols.qualify(kind, sym);
        match self.ctx.lookup(qualified) {
            Some(method) => self.eval_object(method, Some(receiver), Threading::Prefix),
            None => {
                let name = self.symbols.lookup(qualified);
                self.raise_error(unresolved_reference(name));
            }
        }
    }

    /// Path reference: every segment but the last must name a context.
    pub(crate) fn eval_path(&mut self, segments: &[Symbol]) {
        let mut found = None;
        for (i, &segment) in segments.iter().enumerate() {
            let scope = match (i, &found) {
                (0, _) => self.ctx.clone(),
                (_, Some(Value::Context(ctx))) => ctx.clone(),
                (_, _) => {
                    let name = self.symbols.lookup(segments[i - 1]);
                    self.raise_error(path_not_context(name));
                    return;
                }
            };
            found = scope.lookup(segment);
            if found.is_none() {
                break;
            }
        }
        match found {
            Some(value) => self.eval_object(value, None, Threading::Prefix),
            None => {
                let path = segments
                    .iter()
                    .map(|&s| self.symbols.lookup(s))
                    .collect::<Vec<_>>()
                    .join("/");
                self.raise_error(unresolved_reference(&path));
            }
        }
    }

    /// Get reference: the bound value, never invoked.
    pub(crate) fn eval_getword(&mut self, sym: Symbol) {
        match self.ctx.lookup(sym) {
            Some(value) => self.set_result(value),
            None => {
                let name = self.symbols.lookup(sym);
                self.raise_error(unresolved_reference(name));
            }
        }
    }

    /// Set reference: define `sym` in the current context.
    pub(crate) fn eval_setword(&mut self, sym: Symbol) {
        self.eval_expression(true);
        if self.flags.halts() {
            return;
        }
        if self.ctx.set_new(sym, self.result.clone()).is_err() {
            self.flags.insert(ControlFlags::ERROR | ControlFlags::FAILURE);
            self.result = Value::error(already_bound(self.symbols.lookup(sym)));
        }
    }

    /// Mod reference: bind `sym` in the current context unconditionally.
    pub(crate) fn eval_modword(&mut self, sym: Symbol) {
        self.eval_expression(true);
        if self.flags.halts() {
            return;
        }
        self.ctx.modify(sym, self.result.clone());
    }
}
