//! Tapes: shared cells plus per-evaluation cursors.
//!
//! A [`Series`] is the storage of a block: a vector of values behind an
//! `RwLock`, shared by every clone of the block. It has no read position of
//! its own. Each evaluation walks a series through its own [`Cursor`], so the
//! same block can be evaluated re-entrantly, or from several threads, without
//! the walks interfering.
//!
//! Cells are mutable only through [`Series::put`], which is how the inline
//! cache replaces a resolved reference with its value.

// Arc is the implementation - all usage goes through the newtype
#![expect(
    clippy::disallowed_types,
    reason = "Arc is the implementation of Series"
)]

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::Value;

/// Shared, indexable cells.
#[derive(Clone)]
pub struct Series(Arc<RwLock<Vec<Value>>>);

impl Series {
    pub fn new(cells: Vec<Value>) -> Self {
        Series(Arc::new(RwLock::new(cells)))
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Clone of the cell at `index`.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Overwrite the cell at `index`. Returns `false` when out of range.
    pub fn put(&self, index: usize, value: Value) -> bool {
        match self.0.write().get_mut(index) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Append a cell.
    pub fn push(&self, value: Value) {
        self.0.write().push(value);
    }

    /// Copy of all cells.
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    /// Whether both handles share the same cells.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.read().iter()).finish()
    }
}

/// A read position over a series, owned by one evaluation.
#[derive(Clone, Debug)]
pub struct Cursor {
    series: Series,
    pos: usize,
}

impl Cursor {
    pub fn new(series: Series) -> Self {
        Cursor { series, pos: 0 }
    }

    /// An empty cursor, used as the initial tape of a fresh interpreter.
    pub fn empty() -> Self {
        Cursor::new(Series::new(Vec::new()))
    }

    /// Take the value under the cursor and advance.
    pub fn pop(&mut self) -> Option<Value> {
        let value = self.series.get(self.pos)?;
        self.pos += 1;
        Some(value)
    }

    /// The value under the cursor, without advancing.
    pub fn peek(&self) -> Option<Value> {
        self.series.get(self.pos)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.series.len()
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[inline]
    pub fn series(&self) -> &Series {
        &self.series
    }
}
