//! The prefix matrix data structure

use crate::error::{PrefixError, Result};
use crate::reach::Reachability;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One matrix cell: `Some(v)` combines with the group signal held by bit `v`,
/// `None` means no node at this position.
pub type Cell = Option<usize>;

/// Square `(n-1) x (n-1)` matrix of P/G combinations for an `n`-bit adder.
///
/// Row `r` is logic level `r`. Column `c` is output bit `c + 1`. A matrix is
/// filled once by a generator and read-only afterwards; every mutator drops
/// the cached reachability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MatrixRepr", into = "MatrixRepr")]
pub struct PrefixMatrix {
    bit_width: usize,
    cells: Vec<Vec<Cell>>,
    reach: OnceLock<Reachability>,
}

/// Serialized form; deserialization goes through [`PrefixMatrix::from_rows`]
#[derive(Serialize, Deserialize)]
struct MatrixRepr {
    bit_width: usize,
    rows: Vec<Vec<Cell>>,
}

impl TryFrom<MatrixRepr> for PrefixMatrix {
    type Error = PrefixError;

    fn try_from(repr: MatrixRepr) -> Result<Self> {
        PrefixMatrix::from_rows(repr.bit_width, repr.rows)
    }
}

impl From<PrefixMatrix> for MatrixRepr {
    fn from(matrix: PrefixMatrix) -> Self {
        MatrixRepr {
            bit_width: matrix.bit_width,
            rows: matrix.cells,
        }
    }
}

impl PartialEq for PrefixMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.bit_width == other.bit_width && self.cells == other.cells
    }
}

impl Eq for PrefixMatrix {}

impl PrefixMatrix {
    /// Create an empty matrix for an adder of `bit_width` bits
    pub fn new(bit_width: usize) -> Result<Self> {
        if bit_width == 0 {
            return Err(PrefixError::Configuration(
                "bit width must be a positive integer, got 0".to_string(),
            ));
        }
        let size = bit_width - 1;
        Ok(Self {
            bit_width,
            cells: vec![vec![None; size]; size],
            reach: OnceLock::new(),
        })
    }

    /// Build a matrix directly from its rows.
    ///
    /// Rejects grids that are not `(n-1) x (n-1)` and references to bits
    /// above the column's own predecessor (`v > col`).
    pub fn from_rows(bit_width: usize, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut matrix = Self::new(bit_width)?;
        let size = matrix.size();
        if rows.len() != size {
            return Err(PrefixError::Configuration(format!(
                "a {}-bit matrix needs {} rows, got {}",
                bit_width,
                size,
                rows.len()
            )));
        }
        for (r, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(PrefixError::Configuration(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    size
                )));
            }
            for (c, cell) in row.iter().enumerate() {
                if let Some(v) = *cell {
                    if v > c {
                        return Err(PrefixError::Configuration(format!(
                            "cell ({}, {}) references bit {} which is not below bit {}",
                            r,
                            c,
                            v,
                            c + 1
                        )));
                    }
                }
            }
        }
        matrix.cells = rows;
        Ok(matrix)
    }

    /// Bit width `n` of the adder
    pub fn bit_width(&self) -> usize {
        self.bit_width
    }

    /// Number of rows (and columns): `n - 1`
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Cell at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// One row of the matrix
    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row]
    }

    /// Iterate over the rows, top (first logic level) to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Whether `row` has no node at all
    pub fn is_row_empty(&self, row: usize) -> bool {
        self.cells[row].iter().all(Option::is_none)
    }

    /// Set one cell.
    ///
    /// The caller guarantees `value <= col` when present.
    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        debug_assert!(
            value.map_or(true, |v| v <= col),
            "cell ({row}, {col}) cannot reference bit {value:?}"
        );
        self.cells[row][col] = value;
        self.reach.take();
    }

    /// Remove every node of `row`
    pub fn clear_row(&mut self, row: usize) {
        self.cells[row].iter_mut().for_each(|cell| *cell = None);
        self.reach.take();
    }

    /// Cached reachability; computed on first access after the last write
    pub fn reachability(&self) -> &Reachability {
        self.reach.get_or_init(|| self.compute_reachability())
    }

    /// Compute reachability from scratch, bypassing the cache
    pub fn compute_reachability(&self) -> Reachability {
        Reachability::compute(&self.cells)
    }
}
