//! Sharded symbol table.
//!
//! Provides O(1) interning and lookup with thread-safe concurrent access
//! via per-shard locking. Interned strings are leaked, so a `Symbol` stays
//! valid (and keeps naming the same string) for the life of the process.

// Arc is needed here for SharedSymbols - one table is shared by every
// interpreter and every thread re-entering the runtime.
#![expect(
    clippy::disallowed_types,
    reason = "Arc required for SharedSymbols thread-safety"
)]

use crate::{split_qualified, MethodKey, Symbol, QUALIFIER};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Names of the built-in value kinds.
///
/// Pre-interned at construction so kind-directed dispatch never allocates.
pub const KIND_NAMES: &[&str] = &[
    "integer", "decimal", "boolean", "string", "void", "uri", "email", "block", "word",
    "setword", "modword", "getword", "opword", "pipeword", "genword", "tagword", "path", "comma",
    "native", "function", "curried", "context", "error",
];

/// Per-shard storage for interned strings.
struct SymbolShard {
    /// Map from string content to local index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents.
    strings: Vec<&'static str>,
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Shard exceeded capacity (over 268 million strings).
    ShardOverflow { shard_idx: usize, count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::ShardOverflow { shard_idx, count } => write!(
                f,
                "symbol shard {shard_idx} exceeded capacity: {count} strings, max is {}",
                Symbol::MAX_LOCAL
            ),
        }
    }
}

impl std::error::Error for InternError {}

impl SymbolShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        // Pre-intern empty string at index 0
        let empty: &'static str = "";
        shard.map.insert(empty, 0);
        shard.strings.push(empty);
        shard
    }
}

/// Sharded symbol table for concurrent access.
///
/// Besides the name <-> id bijection it memoises receiver-qualified names,
/// so `qualify(kind, method)` costs one hash lookup after the first call.
///
/// # Thread Safety
/// Uses `RwLock` per shard for concurrent read/write access.
/// Wrap in [`SharedSymbols`] for sharing across threads.
pub struct SymbolTable {
    shards: [RwLock<SymbolShard>; Symbol::NUM_SHARDS],
    /// Total count of interned strings across all shards (O(1) `len()`).
    total_count: AtomicUsize,
    /// Memoised `<kind>//<method>` symbols.
    qualified: RwLock<FxHashMap<MethodKey, Symbol>>,
    /// Method halves of qualified names interned from outside `qualify`.
    methods: RwLock<FxHashSet<&'static str>>,
}

impl SymbolTable {
    /// Create a new table with the built-in kind names pre-interned.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(SymbolShard::with_empty())
            } else {
                RwLock::new(SymbolShard::new())
            }
        });

        // Start with 1 for the empty string pre-interned in shard 0
        let table = Self {
            shards,
            total_count: AtomicUsize::new(1),
            qualified: RwLock::new(FxHashMap::default()),
            methods: RwLock::new(FxHashSet::default()),
        };
        for kind in KIND_NAMES {
            table.intern(kind);
        }
        table
    }

    /// Compute shard for a string based on its hash.
    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hash = 0u32;
        for byte in s.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Symbol::NUM_SHARDS
    }

    #[inline]
    fn shard_idx_u32(shard_idx: usize) -> u32 {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (16)"
        )]
        let idx = shard_idx as u32;
        idx
    }

    /// Return the symbol for `s` without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        let shard_idx = Self::shard_for(s);
        let guard = self.shards[shard_idx].read();
        guard
            .map
            .get(s)
            .map(|&local| Symbol::new(Self::shard_idx_u32(shard_idx), local))
    }

    /// Try to intern a string, returning its Symbol or an error on overflow.
    #[inline]
    pub fn try_intern(&self, s: &str) -> Result<Symbol, InternError> {
        let sym = match self.get(s) {
            Some(sym) => sym,
            None => self.insert_slow(Self::shard_for(s), || s.to_owned())?,
        };
        if s.contains(QUALIFIER) {
            self.note_method(sym);
        }
        Ok(sym)
    }

    /// Try to intern an owned String, avoiding a second allocation.
    pub fn try_intern_owned(&self, s: String) -> Result<Symbol, InternError> {
        let qualified = s.contains(QUALIFIER);
        let sym = self.intern_unnoted(s)?;
        if qualified {
            self.note_method(sym);
        }
        Ok(sym)
    }

    fn intern_unnoted(&self, s: String) -> Result<Symbol, InternError> {
        if let Some(sym) = self.get(&s) {
            return Ok(sym);
        }
        let shard_idx = Self::shard_for(&s);
        self.insert_slow(shard_idx, move || s)
    }

    /// Record the method half of a qualified name.
    fn note_method(&self, sym: Symbol) {
        let Some((_, method)) = split_qualified(self.lookup(sym)) else {
            return;
        };
        if !self.methods.read().contains(method) {
            self.methods.write().insert(method);
        }
    }

    fn insert_slow(
        &self,
        shard_idx: usize,
        owned: impl FnOnce() -> String,
    ) -> Result<Symbol, InternError> {
        let shard_idx_u32 = Self::shard_idx_u32(shard_idx);
        let mut guard = self.shards[shard_idx].write();
        let owned = owned();

        // Double-check after acquiring write lock
        if let Some(&local) = guard.map.get(owned.as_str()) {
            return Ok(Symbol::new(shard_idx_u32, local));
        }

        let count = guard.strings.len();
        let local = u32::try_from(count)
            .ok()
            .filter(|&local| local <= Symbol::MAX_LOCAL)
            .ok_or(InternError::ShardOverflow { shard_idx, count })?;

        // Leak the string to get 'static lifetime
        let leaked: &'static str = Box::leak(owned.into_boxed_str());
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);

        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Symbol::new(shard_idx_u32, local))
    }

    /// Intern a string, returning its Symbol.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity. Use `try_intern` for fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Symbol {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Intern an owned String.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity. Use `try_intern_owned` for fallible interning.
    pub fn intern_owned(&self, s: String) -> Symbol {
        self.try_intern_owned(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the string for a Symbol.
    pub fn lookup(&self, sym: Symbol) -> &'static str {
        let guard = self.shards[sym.shard()].read();
        guard.strings.get(sym.local()).copied().unwrap_or("")
    }

    /// Symbol of the receiver-qualified name `<kind>//<method>`.
    ///
    /// The composed name is interned on first use and memoised per
    /// [`MethodKey`], so repeated dispatch on the same pair is a single
    /// hash lookup.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity.
    pub fn qualify(&self, kind: Symbol, method: Symbol) -> Symbol {
        let key = MethodKey::new(kind, method);
        if let Some(&sym) = self.qualified.read().get(&key) {
            return sym;
        }
        let name = format!("{}{QUALIFIER}{}", self.lookup(kind), self.lookup(method));
        // Composed names are not declarations, so they are not noted
        let sym = self.intern_unnoted(name).unwrap_or_else(|e| panic!("{e}"));
        self.qualified.write().insert(key, sym);
        sym
    }

    /// Whether some `<kind>//<method>` name has been interned for `method`.
    ///
    /// Names composed by [`qualify`](Self::qualify) do not count, so a
    /// failed dispatch never makes a method appear to exist.
    pub fn has_method(&self, method: Symbol) -> bool {
        let name = self.lookup(method);
        self.methods.read().contains(name)
    }

    /// Get the number of interned strings (O(1)).
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Check if the table is empty (only has the empty string).
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolTable")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Trait for looking up interned names.
///
/// Lets value rendering accept any table-like type without depending on
/// [`SymbolTable`] directly.
pub trait StringLookup {
    /// Look up the string for an interned symbol.
    fn lookup(&self, sym: Symbol) -> &str;
}

impl StringLookup for SymbolTable {
    fn lookup(&self, sym: Symbol) -> &str {
        SymbolTable::lookup(self, sym)
    }
}

impl StringLookup for SharedSymbols {
    fn lookup(&self, sym: Symbol) -> &str {
        SymbolTable::lookup(self, sym)
    }
}

/// Shared symbol table.
///
/// All thread-safe sharing of the table goes through this newtype. The
/// loader, every interpreter and every integration module hold a clone.
#[derive(Clone, Debug)]
pub struct SharedSymbols(Arc<SymbolTable>);

impl SharedSymbols {
    /// Create a new shared symbol table.
    pub fn new() -> Self {
        SharedSymbols(Arc::new(SymbolTable::new()))
    }
}

impl Default for SharedSymbols {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedSymbols {
    type Target = SymbolTable;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
