//! P/G signal reachability
//!
//! Walks the matrix level by level and records, for every column, which bit
//! indices have structurally propagated into the column's final group signal.
//! A functioning adder reaches `{0, 1, ..., i}` in column `i`.

use crate::matrix::Cell;
use std::collections::BTreeSet;

/// Reached bit indices per column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reachability {
    columns: Vec<BTreeSet<usize>>,
}

impl Reachability {
    pub(crate) fn compute(cells: &[Vec<Cell>]) -> Self {
        let mut columns = vec![BTreeSet::new(); cells.len()];

        // Sets start empty, so a first-level node reaches only its own operand
        for row in cells {
            // Highest column first, so `v - 1` still holds the previous level
            for (col, cell) in row.iter().enumerate().rev() {
                let Some(v) = *cell else {
                    continue;
                };
                debug_assert!(v <= col, "column {col} references bit {v}");
                if v > 0 {
                    let (lower, upper) = columns.split_at_mut(col);
                    upper[0].extend(lower[v - 1].iter().copied());
                }
                columns[col].insert(v);
            }
        }

        Self { columns }
    }

    /// Reached indices of column `col`
    pub fn column(&self, col: usize) -> &BTreeSet<usize> {
        &self.columns[col]
    }

    /// All columns, lowest first
    pub fn columns(&self) -> &[BTreeSet<usize>] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether every column `i` reaches exactly `{0..=i}`
    pub fn is_complete(&self) -> bool {
        self.columns
            .iter()
            .enumerate()
            .all(|(i, reached)| reached.len() == i + 1)
    }
}
