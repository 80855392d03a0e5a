//! Error and cost metrics over a prefix matrix
//!
//! # Error metrics
//!
//! - **Hamming distance**: total number of P/G signals missing from their
//!   column's reachable set. Zero iff the adder works.
//! - **Weighted Hamming distance**: like the above, but a gap costs more the
//!   more significant the missing bit is, and every signal still present
//!   beyond a gap is charged for the broken contiguity.
//!
//! # Cost metrics
//!
//! | Metric | Meaning |
//! |--------|---------|
//! | nodes | P/G combination nodes |
//! | delay | logic levels holding at least one node |
//! | fanout | largest number of nodes one level drives from a single signal |
//! | wiring | distinct wiring tracks crossing a column, plus one |
//! | crossings | diagonal/vertical wire crossing counts |

use crate::error::{PrefixError, Result};
use crate::matrix::{Cell, PrefixMatrix};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Wire crossing counts of a laid-out prefix graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crossings {
    /// Longest backward jump of a single diagonal wire (relative wire length)
    pub diagonal_over_vertical: usize,
    /// Diagonal wires crossing one vertical line, plus one
    pub vertical_over_diagonal: usize,
    /// Diagonal wires crossed by another diagonal wire
    pub diagonal_over_diagonal: usize,
}

/// Snapshot of every metric of a matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub bit_width: usize,
    pub nodes: usize,
    pub delay: usize,
    pub max_fanout: usize,
    pub wiring: usize,
    pub crossings: Crossings,
    pub error: usize,
    pub weighted_error: usize,
}

impl PrefixMatrix {
    /// Sum over columns of the number of unreachable P/G signals
    pub fn error_hamming_distance(&self) -> usize {
        self.reachability()
            .columns()
            .iter()
            .enumerate()
            .map(|(i, reached)| (i + 1).saturating_sub(reached.len()))
            .sum()
    }

    /// Weighted variant of [`Self::error_hamming_distance`]
    pub fn error_weighted_hamming_distance(&self) -> usize {
        let bit_width = self.bit_width();
        self.reachability()
            .columns()
            .iter()
            .enumerate()
            .map(|(max_value, reached)| {
                let mut error = 0;
                for value in (0..=max_value).rev() {
                    if !reached.contains(&value) {
                        error += value + 1;
                    } else if error > 0 {
                        error += bit_width - value;
                    }
                }
                error
            })
            .sum()
    }

    /// Number of P/G nodes
    pub fn node_count(&self) -> usize {
        self.rows()
            .map(|row| row.iter().filter(|cell| cell.is_some()).count())
            .sum()
    }

    /// Number of levels holding at least one node (the adder's delay)
    pub fn active_level_count(&self) -> usize {
        (0..self.size()).filter(|&r| !self.is_row_empty(r)).count()
    }

    /// Largest number of same-level nodes fed by one signal
    pub fn max_fanout(&self) -> usize {
        let mut counts = vec![0usize; self.size()];
        let mut max_fanout = 0;
        for row in self.rows() {
            counts.iter_mut().for_each(|count| *count = 0);
            for v in row.iter().flatten() {
                counts[*v] += 1;
                max_fanout = max_fanout.max(counts[*v]);
            }
        }
        max_fanout
    }

    /// Distinct wiring tracks crossing any vertical line, plus one
    pub fn wiring(&self) -> usize {
        let mut max_tracks = 0;
        for row in self.rows() {
            for col in 0..row.len() {
                let tracks: BTreeSet<usize> = later_values(row, col)
                    .filter(|&v| v <= col)
                    .collect();
                max_tracks = max_tracks.max(tracks.len());
            }
        }
        max_tracks + 1
    }

    /// All three wire crossing counts
    pub fn wiring_metrics(&self) -> Crossings {
        let mut crossings = Crossings::default();
        let mut vertical = 0;

        for row in self.rows() {
            for (col, cell) in row.iter().enumerate() {
                vertical = vertical.max(later_values(row, col).filter(|&v| v <= col).count());

                let Some(value) = *cell else {
                    continue;
                };
                crossings.diagonal_over_vertical =
                    crossings.diagonal_over_vertical.max(col.saturating_sub(value));
                crossings.diagonal_over_diagonal = crossings
                    .diagonal_over_diagonal
                    .max(later_values(row, col).filter(|&v| v < value).count());
            }
        }

        crossings.vertical_over_diagonal = vertical + 1;
        crossings
    }

    /// Collect every metric into one record
    pub fn metrics(&self) -> Metrics {
        Metrics {
            bit_width: self.bit_width(),
            nodes: self.node_count(),
            delay: self.active_level_count(),
            max_fanout: self.max_fanout(),
            wiring: self.wiring(),
            crossings: self.wiring_metrics(),
            error: self.error_hamming_distance(),
            weighted_error: self.error_weighted_hamming_distance(),
        }
    }

    /// Check that the matrix describes a functioning adder
    pub fn verify(&self) -> Result<()> {
        match self.error_hamming_distance() {
            0 => Ok(()),
            error => {
                log::debug!(
                    "{}-bit prefix matrix failed verification with error {}",
                    self.bit_width(),
                    error
                );
                Err(PrefixError::AdderInvalid { error })
            }
        }
    }
}

/// Values of the cells right of `col` in the same row
fn later_values(row: &[Cell], col: usize) -> impl Iterator<Item = usize> + '_ {
    row[col + 1..].iter().flatten().copied()
}
