//! Blocks: a series plus an evaluation mode.

use crate::{Cursor, Series, Value};

/// How a block behaves when the dispatcher meets it.
///
/// Fixed when the block is built; evaluation never changes it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlockMode {
    /// Self-evaluates: the block is returned unchanged.
    #[default]
    Data,
    /// Every top-level expression is evaluated once and the results are
    /// assembled into a new data block.
    Collect,
    /// Runs as a sequence of statements; only the last result survives.
    Exec,
}

/// A block value.
///
/// Cloning a block aliases its series: two clones evaluated at the same time
/// each get their own [`Cursor`] over the same cells.
#[derive(Clone, Debug)]
pub struct Block {
    series: Series,
    mode: BlockMode,
}

impl Block {
    pub fn new(mode: BlockMode, cells: Vec<Value>) -> Self {
        Block {
            series: Series::new(cells),
            mode,
        }
    }

    pub fn from_series(series: Series, mode: BlockMode) -> Self {
        Block { series, mode }
    }

    #[inline]
    pub fn mode(&self) -> BlockMode {
        self.mode
    }

    #[inline]
    pub fn series(&self) -> &Series {
        &self.series
    }

    /// The same cells viewed under a different mode.
    #[must_use]
    pub fn with_mode(&self, mode: BlockMode) -> Self {
        Block {
            series: self.series.clone(),
            mode,
        }
    }

    /// A fresh read cursor positioned at the first cell.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.series.clone())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Copy of the current cells.
    pub fn snapshot(&self) -> Vec<Value> {
        self.series.snapshot()
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        if self.mode != other.mode {
            return false;
        }
        if Series::ptr_eq(&self.series, &other.series) {
            return true;
        }
        self.snapshot() == other.snapshot()
    }
}
