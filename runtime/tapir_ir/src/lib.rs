//! Symbols for the Tapir runtime.
//!
//! Every reference name that appears on a tape (`print`, `x`, `widget//size?`)
//! is interned once into a [`SymbolTable`] and carried around as a 32-bit
//! [`Symbol`]. Environments, method keys and reference values all key on
//! symbols, never on strings.

mod method_key;
mod symbol;
mod symbols;

pub use method_key::{split_qualified, MethodKey, QUALIFIER};
pub use symbol::Symbol;
pub use symbols::{InternError, SharedSymbols, StringLookup, SymbolTable, KIND_NAMES};
