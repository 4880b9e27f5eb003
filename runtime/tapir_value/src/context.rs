//! Environments: symbol bindings with an optional parent.
//!
//! Contexts are reference counted. A child holds its parent alive, and a
//! function value holds the context it closed over, so a scope lives as long
//! as any frame or closure still refers to it. Parent chains are built only
//! by [`Context::child`], which makes them acyclic and finite.
//!
//! Bindings sit behind a `RwLock` so a context can be read from several
//! threads. Serialising concurrent *mutation* of a shared context is the
//! caller's job: each operation here is atomic on its own, sequences of them
//! are not.

// Arc is the implementation - all usage goes through the newtype
#![expect(
    clippy::disallowed_types,
    reason = "Arc is the implementation of Context"
)]

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tapir_ir::{split_qualified, Symbol, SymbolTable};

use crate::{BindError, NativeEntry, NativeOp, RegistrationError, Value};

/// Where in the chain a resolution found its binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// The context the lookup started in.
    Local,
    /// Its immediate parent.
    Parent,
    /// A further ancestor, `n` parents up (`n >= 2`).
    Ancestor(usize),
}

struct ContextInner {
    bindings: RwLock<FxHashMap<Symbol, Value>>,
    parent: Option<Context>,
    kind: Option<Symbol>,
    /// Created for a single call; its bindings differ from call to call.
    frame: bool,
}

/// A lexical environment.
#[derive(Clone)]
pub struct Context(Arc<ContextInner>);

impl Context {
    fn build(parent: Option<Context>, kind: Option<Symbol>, frame: bool) -> Self {
        Context(Arc::new(ContextInner {
            bindings: RwLock::new(FxHashMap::default()),
            parent,
            kind,
            frame,
        }))
    }

    /// A context with no parent.
    pub fn root() -> Self {
        Context::build(None, None, false)
    }

    /// A fresh child scope of `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Context::build(Some(self.clone()), None, false)
    }

    /// A fresh child scope that reports `kind` for receiver-qualified
    /// dispatch.
    #[must_use]
    pub fn child_with_kind(&self, kind: Symbol) -> Self {
        Context::build(Some(self.clone()), Some(kind), false)
    }

    /// A fresh child scope for one call (function parameters, injected
    /// bindings). Resolutions into a frame are never cached on the tape.
    #[must_use]
    pub fn frame(&self) -> Self {
        Context::build(Some(self.clone()), None, true)
    }

    /// Whether this context was created by [`Context::frame`].
    pub fn is_frame(&self) -> bool {
        self.0.frame
    }

    pub fn parent(&self) -> Option<&Context> {
        self.0.parent.as_ref()
    }

    pub fn kind(&self) -> Option<Symbol> {
        self.0.kind
    }

    /// Whether both handles are the same environment.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Binding in this context only.
    pub fn get_local(&self, sym: Symbol) -> Option<Value> {
        self.0.bindings.read().get(&sym).cloned()
    }

    pub fn contains_local(&self, sym: Symbol) -> bool {
        self.0.bindings.read().contains_key(&sym)
    }

    /// Resolve `sym` through the chain, reporting where it was found.
    ///
    /// Checks this context, then the immediate parent, then walks the
    /// remaining ancestors. A binding closer to `self` always shadows one
    /// further up.
    pub fn resolve(&self, sym: Symbol) -> Option<(Value, Origin)> {
        if let Some(v) = self.get_local(sym) {
            return Some((v, Origin::Local));
        }
        let parent = self.parent()?;
        if let Some(v) = parent.get_local(sym) {
            return Some((v, Origin::Parent));
        }
        let mut depth = 2;
        let mut current = parent.parent();
        while let Some(ctx) = current {
            if let Some(v) = ctx.get_local(sym) {
                return Some((v, Origin::Ancestor(depth)));
            }
            depth += 1;
            current = ctx.parent();
        }
        None
    }

    /// Resolve `sym` through the chain.
    pub fn lookup(&self, sym: Symbol) -> Option<Value> {
        self.resolve(sym).map(|(v, _)| v)
    }

    /// Define `sym` in this context.
    ///
    /// Refuses to overwrite an existing local binding; shadowing a parent's
    /// binding is fine.
    pub fn set_new(&self, sym: Symbol, value: Value) -> Result<(), BindError> {
        let mut bindings = self.0.bindings.write();
        if bindings.contains_key(&sym) {
            return Err(BindError::AlreadyBound);
        }
        bindings.insert(sym, value);
        Ok(())
    }

    /// Bind `sym` in this context whether or not it is already bound.
    /// Returns the previous local value.
    pub fn modify(&self, sym: Symbol, value: Value) -> Option<Value> {
        self.0.bindings.write().insert(sym, value)
    }

    /// Remove the local binding of `sym`.
    pub fn unset(&self, sym: Symbol) -> Option<Value> {
        self.0.bindings.write().remove(&sym)
    }

    /// Number of local bindings.
    pub fn len(&self) -> usize {
        self.0.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.bindings.read().is_empty()
    }

    /// Locally bound symbols, in no particular order.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.0.bindings.read().keys().copied().collect()
    }

    /// Install a table of native operations into this context.
    ///
    /// Names of the form `<kind>//<method>` become receiver-qualified
    /// methods; everything else is a plain binding. Re-registering a name
    /// replaces the previous entry. Nothing is installed if any entry is
    /// invalid.
    pub fn register(
        &self,
        symbols: &SymbolTable,
        table: &[NativeEntry],
    ) -> Result<usize, RegistrationError> {
        let ops = table
            .iter()
            .map(|entry| NativeOp::new(*entry).map(|op| (entry.name, op)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut methods = 0usize;
        let mut bindings = self.0.bindings.write();
        for (name, op) in ops {
            if split_qualified(name).is_some() {
                methods += 1;
            }
            bindings.insert(symbols.intern(name), Value::Native(op));
        }
        tracing::debug!(
            natives = table.len(),
            methods,
            "registered native table"
        );
        Ok(table.len())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("bindings", &self.len())
            .field("kind", &self.0.kind)
            .field("has_parent", &self.0.parent.is_some())
            .field("frame", &self.0.frame)
            .finish()
    }
}
