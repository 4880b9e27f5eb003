//! Native operations and the values that wrap them.
//!
//! The contract with integration modules is small: a module builds a table
//! of [`NativeEntry`] records, registers it into a context with
//! [`Context::register`](crate::Context::register), and receives calls as
//! `fn(&mut dyn Executor, Args) -> Value`. Unused trailing argument slots
//! hold [`Value::Void`].

mod curried;
mod function;

use std::any::Any;
use std::fmt;

use tapir_ir::Symbol;

use crate::{Executor, Heap, RegistrationError, Value};

pub use curried::{Callee, CurriedCaller};
pub use function::FunctionValue;

/// Maximum declared arity of a native operation.
pub const MAX_ARITY: usize = 5;

/// Positional argument slots passed to every native callable.
pub type Args = [Value; MAX_ARITY];

/// Signature of a native callable.
///
/// The callable may set `error`, `failure` or `return` on the executor; the
/// invoker propagates them without interpreting them.
pub type NativeFn = fn(&mut dyn Executor, Args) -> Value;

/// Pad `values` to five slots with void. Values beyond the fifth are dropped.
pub fn fill_args(values: impl IntoIterator<Item = Value>) -> Args {
    let mut values = values.into_iter();
    std::array::from_fn(|_| values.next().unwrap_or_default())
}

/// A registration record, usually part of a `const` table.
///
/// ```text
/// pub const WIDGET: &[NativeEntry] = &[
///     NativeEntry::new("widget//size?", 1, widget_size).pure(),
///     NativeEntry::new("widget//close", 1, widget_close).doc("Closes the widget."),
/// ];
/// ```
#[derive(Clone, Copy)]
pub struct NativeEntry {
    pub name: &'static str,
    pub arity: usize,
    pub pure: bool,
    pub func: NativeFn,
    pub doc: &'static str,
}

impl NativeEntry {
    pub const fn new(name: &'static str, arity: usize, func: NativeFn) -> Self {
        NativeEntry {
            name,
            arity,
            pure: false,
            func,
            doc: "",
        }
    }

    /// Mark the operation free of observable side effects.
    #[must_use]
    pub const fn pure(mut self) -> Self {
        self.pure = true;
        self
    }

    #[must_use]
    pub const fn doc(mut self, doc: &'static str) -> Self {
        self.doc = doc;
        self
    }
}

impl fmt::Debug for NativeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeEntry")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("pure", &self.pure)
            .finish_non_exhaustive()
    }
}

/// A native-operation descriptor.
///
/// Created once at registration and immutable afterwards; clones share the
/// descriptor, and equality is identity.
#[derive(Clone)]
pub struct NativeOp(Heap<NativeEntry>);

impl NativeOp {
    /// Validate a registration record.
    pub fn new(entry: NativeEntry) -> Result<Self, RegistrationError> {
        if entry.name.is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        if entry.arity > MAX_ARITY {
            return Err(RegistrationError::Arity {
                name: entry.name,
                arity: entry.arity,
            });
        }
        Ok(NativeOp(Heap::new(entry)))
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.0.name
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.0.arity
    }

    #[inline]
    pub fn is_pure(&self) -> bool {
        self.0.pure
    }

    pub fn doc(&self) -> &'static str {
        self.0.doc
    }

    /// Call the underlying function directly.
    #[inline]
    pub fn invoke(&self, exec: &mut dyn Executor, args: Args) -> Value {
        (self.0.func)(exec, args)
    }
}

impl PartialEq for NativeOp {
    fn eq(&self, other: &Self) -> bool {
        Heap::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NativeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeOp({}/{})", self.name(), self.arity())
    }
}

/// An opaque foreign resource tagged with a kind.
///
/// The kind drives receiver-qualified dispatch: a handle of kind `widget`
/// answers `.size?` through a binding named `widget//size?`. The payload is
/// shared between clones; resources that need mutation put their own lock
/// inside it.
#[derive(Clone)]
pub struct NativeHandle {
    kind: Symbol,
    payload: Heap<dyn Any + Send + Sync>,
}

impl NativeHandle {
    pub fn new<T: Any + Send + Sync>(kind: Symbol, payload: T) -> Self {
        NativeHandle {
            kind,
            payload: Heap::erase(payload),
        }
    }

    #[inline]
    pub fn kind(&self) -> Symbol {
        self.kind
    }

    /// Borrow the payload as `T`, if that is what it holds.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl PartialEq for NativeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && Heap::ptr_eq(&self.payload, &other.payload)
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHandle")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
