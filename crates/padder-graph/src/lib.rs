//! padder graph - prefix matrix model
//!
//! A parallel prefix adder is described here as a square matrix of P/G
//! combinations. Rows are logic levels, columns are the output bits `1..n-1`
//! (bit 0 never needs a combination). A cell `Some(v)` at `(row, col)` means:
//!
//! ```text
//! G[col+1] = G[col+1] OR (P[col+1] AND G[v])
//! P[col+1] = P[col+1] AND P[v]
//! ```
//!
//! i.e. the signal of bit `col+1` absorbs the group signal currently held by
//! bit `v`, which summarizes some range ending at bit `v`.
//!
//! This crate handles:
//! - The matrix itself and its checked construction
//! - Reachability of P/G signals (the correctness criterion)
//! - Error metrics for broken adders
//! - Cost metrics: nodes, delay, fanout and wire crossings
//! - The fixed-width textual rendering

pub mod error;
pub mod matrix;
pub mod metrics;
pub mod reach;

mod render;

pub use error::{PrefixError, Result};
pub use matrix::{Cell, PrefixMatrix};
pub use metrics::{Crossings, Metrics};
pub use reach::Reachability;

/// Number of binary digits needed to write `x` (`0` for `0`).
///
/// For `x = n - 1` this is the natural depth of a Kogge-Stone adder of
/// width `n`, and the "log2" every generator in the workspace is built on.
pub fn bit_length(x: usize) -> usize {
    (usize::BITS - x.leading_zeros()) as usize
}

/// `2^k`, saturating at `usize::MAX` instead of overflowing.
pub fn pow2(k: usize) -> usize {
    u32::try_from(k)
        .ok()
        .and_then(|k| 1usize.checked_shl(k))
        .unwrap_or(usize::MAX)
}
