//! Single-phase topologies: Ripple-Carry, Kogge-Stone and Sklansky
//!
//! ```text
//! Ripple-Carry (4)   Kogge-Stone (8)        Sklansky (8)
//! 1 2 3              1 2 3 4 5 6 7          1 2 3 4 5 6 7
//! -----              --------------         --------------
//! 0                  0 1 2 3 4 5 6          0   2   4   6
//!   1                  0 1 2 3 4 5            1 1     5 5
//!     2                    0 1 2 3                3 3 3 3
//! ```

use padder_graph::{pow2, PrefixMatrix, Result};

/// Ripple-Carry: one node per level on the diagonal.
///
/// Fewest nodes and fanout 1, at the cost of `n - 1` levels of delay.
pub fn ripple_carry(bit_width: usize) -> Result<PrefixMatrix> {
    let mut matrix = PrefixMatrix::new(bit_width)?;
    for r in 0..matrix.size() {
        matrix.set(r, r, Some(r));
    }
    Ok(matrix)
}

/// Kogge-Stone: every column combines at distance `2^r` on level `r`.
///
/// Minimal depth, fanout 1, but the most nodes and the longest wires.
///
/// Reference: P. Kogge and H. Stone, "A Parallel Algorithm for the Efficient
/// Solution of a General Class of Recurrence Equations", IEEE Trans.
/// Computers, C-22, 1973.
pub fn kogge_stone(bit_width: usize) -> Result<PrefixMatrix> {
    let mut matrix = PrefixMatrix::new(bit_width)?;
    let size = matrix.size();
    for r in 0..size {
        let start = pow2(r) - 1;
        if start >= size {
            break;
        }
        for (col, value) in (start..size).zip(0..) {
            matrix.set(r, col, Some(value));
        }
    }
    Ok(matrix)
}

/// Sklansky: recursive halving, every column of the upper half of a
/// `2^(r+1)` block takes the block's midpoint on level `r`.
///
/// Same depth as Kogge-Stone with fewer nodes; fanout doubles per level.
///
/// Reference: J. Sklansky, "Conditional sum addition logic", IRE Trans.
/// Electronic Computers, EC-9, 1960.
pub fn sklansky(bit_width: usize) -> Result<PrefixMatrix> {
    let mut matrix = PrefixMatrix::new(bit_width)?;
    let size = matrix.size();
    for r in 0..size {
        let repeats = pow2(r);
        let start = repeats - 1;
        if start >= size {
            break;
        }
        for block in (start..size).step_by(pow2(r + 1)) {
            for col in block..block.saturating_add(repeats).min(size) {
                matrix.set(r, col, Some(block));
            }
        }
    }
    Ok(matrix)
}
