//! Runtime values.
//!
//! # Allocation
//!
//! Shared payloads go through [`Heap<T>`], whose constructors are private to
//! this crate. Outside code builds values with the factory methods on
//! [`Value`]:
//!
//! ```text
//! let s = Value::string("hello");                  // OK
//! let b = Value::exec_block(vec![Value::int(1)]);  // OK
//! let s = Value::Str(Heap::text("hello"));         // ERROR: Heap::text is pub(crate)
//! ```
//!
//! # Thread Safety
//!
//! Every payload is `Send + Sync`; series and contexts guard their interior
//! with `parking_lot::RwLock`, so values may be handed to other threads that
//! re-enter the runtime with their own interpreter.

mod block;
mod display;
mod heap;
mod kind;

use std::any::Any;

use tapir_ir::{Symbol, SymbolTable};

use crate::{Context, CurriedCaller, ErrorKind, ErrorValue, FunctionValue, NativeHandle, NativeOp};

pub use block::{Block, BlockMode};
pub use display::ValueDisplay;
pub use heap::Heap;
pub use kind::KindNames;

/// A URI-like scalar (`file://data.txt`, `https://example.org`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UriValue {
    scheme: Symbol,
    path: String,
    kind: Symbol,
}

impl UriValue {
    /// The scheme, e.g. `file`.
    pub fn scheme(&self) -> Symbol {
        self.scheme
    }

    /// Everything after `://`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Dispatch kind, `<scheme>-schema`.
    pub fn kind(&self) -> Symbol {
        self.kind
    }
}

/// Runtime value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    // Scalars (self-evaluating)
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Decimal(f64),
    /// Boolean value.
    Boolean(bool),
    /// String value.
    Str(Heap<str>),
    /// The void sentinel; also fills unused native argument slots.
    #[default]
    Void,
    /// URI-like value.
    Uri(Heap<UriValue>),
    /// E-mail address.
    Email(Heap<str>),

    // Containers
    /// Tape-backed block.
    Block(Block),

    // References
    /// Plain reference: `x`.
    Word(Symbol),
    /// Set reference: `x:`.
    SetWord(Symbol),
    /// Mod reference: `::x`.
    ModWord(Symbol),
    /// Get reference: `?x`.
    GetWord(Symbol),
    /// Operator reference: `.x`.
    OpWord(Symbol),
    /// Pipe reference: `|x`.
    PipeWord(Symbol),
    /// Generic reference, dispatched only on the kind of its first argument.
    GenWord(Symbol),
    /// Tag reference: `'x`, yields the plain reference.
    TagWord(Symbol),
    /// Path reference: `a/b/c`.
    Path(Heap<[Symbol]>),
    /// Expression guard `,`.
    Comma,

    // Callables
    /// Native operation descriptor.
    Native(NativeOp),
    /// User-defined function.
    Function(Heap<FunctionValue>),
    /// Partial application.
    Curried(Heap<CurriedCaller>),

    // Opaque
    /// Foreign-resource handle tagged with a kind.
    Handle(NativeHandle),
    /// First-class environment.
    Context(Context),
    /// Error object.
    Error(Heap<ErrorValue>),
}

// Factory methods
impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Integer(n)
    }

    #[inline]
    pub fn decimal(d: f64) -> Self {
        Value::Decimal(d)
    }

    #[inline]
    pub fn boolean(b: bool) -> Self {
        Value::Boolean(b)
    }

    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Heap::text(s.as_ref()))
    }

    pub fn email(s: impl AsRef<str>) -> Self {
        Value::Email(Heap::text(s.as_ref()))
    }

    /// Build a URI; its dispatch kind is `<scheme>-schema`.
    pub fn uri(symbols: &SymbolTable, scheme: &str, path: impl Into<String>) -> Self {
        Value::Uri(Heap::new(UriValue {
            scheme: symbols.intern(scheme),
            path: path.into(),
            kind: symbols.intern_owned(format!("{scheme}-schema")),
        }))
    }

    pub fn block(mode: BlockMode, cells: Vec<Value>) -> Self {
        Value::Block(Block::new(mode, cells))
    }

    pub fn data_block(cells: Vec<Value>) -> Self {
        Value::block(BlockMode::Data, cells)
    }

    pub fn collect_block(cells: Vec<Value>) -> Self {
        Value::block(BlockMode::Collect, cells)
    }

    pub fn exec_block(cells: Vec<Value>) -> Self {
        Value::block(BlockMode::Exec, cells)
    }

    pub fn path(segments: &[Symbol]) -> Self {
        Value::Path(Heap::slice(segments))
    }

    pub fn function(function: FunctionValue) -> Self {
        Value::Function(Heap::new(function))
    }

    pub fn curried(caller: CurriedCaller) -> Self {
        Value::Curried(Heap::new(caller))
    }

    /// Wrap a foreign resource; the runtime never inspects `payload`.
    pub fn handle<T: Any + Send + Sync>(kind: Symbol, payload: T) -> Self {
        Value::Handle(NativeHandle::new(kind, payload))
    }

    pub fn error(error: ErrorValue) -> Self {
        Value::Error(Heap::new(error))
    }

    /// Shorthand for an error value of the given kind.
    pub fn error_msg(kind: ErrorKind, message: impl Into<String>) -> Self {
        Value::error(ErrorValue::new(kind, message))
    }
}

// Inspection
impl Value {
    /// Built-in kind name of this value.
    ///
    /// Handles and kinded contexts carry their own kind symbol; use
    /// [`KindNames::of`] for dispatch.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::Boolean(_) => "boolean",
            Value::Str(_) => "string",
            Value::Void => "void",
            Value::Uri(_) => "uri",
            Value::Email(_) => "email",
            Value::Block(_) => "block",
            Value::Word(_) => "word",
            Value::SetWord(_) => "setword",
            Value::ModWord(_) => "modword",
            Value::GetWord(_) => "getword",
            Value::OpWord(_) => "opword",
            Value::PipeWord(_) => "pipeword",
            Value::GenWord(_) => "genword",
            Value::TagWord(_) => "tagword",
            Value::Path(_) => "path",
            Value::Comma => "comma",
            Value::Native(_) => "native",
            Value::Function(_) => "function",
            Value::Curried(_) => "curried",
            Value::Handle(_) => "native-handle",
            Value::Context(_) => "context",
            Value::Error(_) => "error",
        }
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Whether the value can be invoked with arguments.
    #[inline]
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Native(_) | Value::Function(_) | Value::Curried(_)
        )
    }

    /// Whether the value evaluates to itself.
    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Value::Integer(_)
                | Value::Decimal(_)
                | Value::Boolean(_)
                | Value::Str(_)
                | Value::Void
                | Value::Uri(_)
                | Value::Email(_)
                | Value::Handle(_)
                | Value::Context(_)
        )
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Email(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Value::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<&NativeHandle> {
        match self {
            Value::Handle(h) => Some(h),
            _ => None,
        }
    }

    /// Symbol of a reference value of any flavour.
    pub fn reference_symbol(&self) -> Option<Symbol> {
        match self {
            Value::Word(s)
            | Value::SetWord(s)
            | Value::ModWord(s)
            | Value::GetWord(s)
            | Value::OpWord(s)
            | Value::PipeWord(s)
            | Value::GenWord(s)
            | Value::TagWord(s) => Some(*s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            // Bitwise, so a block holding NaN still equals itself.
            (Value::Decimal(a), Value::Decimal(b)) => a.to_bits() == b.to_bits(),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Str(a), Value::Str(b)) | (Value::Email(a), Value::Email(b)) => a == b,
            (Value::Void, Value::Void) | (Value::Comma, Value::Comma) => true,
            (Value::Uri(a), Value::Uri(b)) => a == b,
            (Value::Block(a), Value::Block(b)) => a == b,
            (Value::Word(a), Value::Word(b))
            | (Value::SetWord(a), Value::SetWord(b))
            | (Value::ModWord(a), Value::ModWord(b))
            | (Value::GetWord(a), Value::GetWord(b))
            | (Value::OpWord(a), Value::OpWord(b))
            | (Value::PipeWord(a), Value::PipeWord(b))
            | (Value::GenWord(a), Value::GenWord(b))
            | (Value::TagWord(a), Value::TagWord(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::Native(a), Value::Native(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Heap::ptr_eq(a, b),
            (Value::Curried(a), Value::Curried(b)) => Heap::ptr_eq(a, b),
            (Value::Handle(a), Value::Handle(b)) => a == b,
            (Value::Context(a), Value::Context(b)) => Context::ptr_eq(a, b),
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<ErrorValue> for Value {
    fn from(e: ErrorValue) -> Self {
        Value::error(e)
    }
}

impl From<Context> for Value {
    fn from(ctx: Context) -> Self {
        Value::Context(ctx)
    }
}

impl From<NativeOp> for Value {
    fn from(op: NativeOp) -> Self {
        Value::Native(op)
    }
}

#[cfg(test)]
mod tests;
