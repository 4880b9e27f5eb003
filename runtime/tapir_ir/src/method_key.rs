//! Receiver-qualified method names.
//!
//! A "method" in Tapir is an ordinary binding whose name is qualified by the
//! kind of the value it expects as first argument: `widget//size?` is the
//! `size?` method of values of kind `widget`. [`MethodKey`] is the interned
//! (kind, method) pair; [`SymbolTable::qualify`](crate::SymbolTable::qualify)
//! turns it into the symbol of the qualified binding.

use crate::{Symbol, SymbolTable};

/// Separator between kind and method in a qualified name.
pub const QUALIFIER: &str = "//";

/// Key for receiver-qualified lookups.
///
/// Combines a kind name and a method name into a single hashable key.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct MethodKey {
    /// The receiver kind (e.g. `widget`, `block`, `integer`).
    pub kind: Symbol,
    /// The plain method name (e.g. `size?`).
    pub method: Symbol,
}

impl MethodKey {
    /// Create a new method key from interned names.
    #[inline]
    pub const fn new(kind: Symbol, method: Symbol) -> Self {
        Self { kind, method }
    }

    /// Format the method key for display (requires the symbol table).
    #[inline]
    pub fn display<'a>(&self, symbols: &'a SymbolTable) -> MethodKeyDisplay<'a> {
        MethodKeyDisplay {
            kind: symbols.lookup(self.kind),
            method: symbols.lookup(self.method),
        }
    }
}

/// Helper for displaying a `MethodKey` with resolved names.
pub struct MethodKeyDisplay<'a> {
    kind: &'a str,
    method: &'a str,
}

impl std::fmt::Display for MethodKeyDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{QUALIFIER}{}", self.kind, self.method)
    }
}

/// Split a registration name of the form `<kind>//<method>`.
///
/// Returns `None` for plain names. Both halves must be non-empty.
pub fn split_qualified(name: &str) -> Option<(&str, &str)> {
    let (kind, method) = name.split_once(QUALIFIER)?;
    if kind.is_empty() || method.is_empty() {
        return None;
    }
    Some((kind, method))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_method_key_equality() {
        let symbols = SymbolTable::new();
        let widget = symbols.intern("widget");
        let size = symbols.intern("size?");
        let close = symbols.intern("close");

        assert_eq!(MethodKey::new(widget, size), MethodKey::new(widget, size));
        assert_ne!(MethodKey::new(widget, size), MethodKey::new(widget, close));
    }

    #[test]
    fn test_method_key_as_hashmap_key() {
        let symbols = SymbolTable::new();
        let widget = symbols.intern("widget");
        let size = symbols.intern("size?");

        let mut map = HashMap::new();
        map.insert(MethodKey::new(widget, size), 1);
        assert_eq!(map.get(&MethodKey::new(widget, size)), Some(&1));
    }

    #[test]
    fn test_method_key_display() {
        let symbols = SymbolTable::new();
        let key = MethodKey::new(symbols.intern("file-info"), symbols.intern("size?"));
        assert_eq!(key.display(&symbols).to_string(), "file-info//size?");
    }

    #[test]
    fn test_split_qualified() {
        assert_eq!(split_qualified("widget//size?"), Some(("widget", "size?")));
        assert_eq!(split_qualified("data-file//close"), Some(("data-file", "close")));
        assert_eq!(split_qualified("print"), None);
        assert_eq!(split_qualified("//size?"), None);
        assert_eq!(split_qualified("widget//"), None);
    }
}
