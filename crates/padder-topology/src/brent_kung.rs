//! Brent-Kung and the hybrids built on its skeleton
//!
//! Brent-Kung is a two-phase parallel scan: an up-sweep that builds group
//! signals for aligned power-of-two blocks, and a down-sweep that fans them
//! back into the remaining columns.
//!
//! ```text
//! Brent-Kung (8)
//! 1 2 3 4 5 6 7
//! --------------
//! 0   2   4   6      up-sweep
//!     1       5
//!             3
//!         3          down-sweep
//!   1   3   5
//! ```
//!
//! The hybrids keep the first and last `levels` rows of the skeleton and
//! replace the middle with a different scan (see [`Hybrid`]).
//!
//! Reference: R. Brent and H. Kung, "A Regular Layout for Parallel Adders",
//! IEEE Trans. Computers, C-31, 1982.

use padder_graph::{bit_length, pow2, PrefixError, PrefixMatrix, Result};

/// Middle section used by a Brent-Kung hybrid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hybrid {
    /// Sklansky-style fan-out (Ladner-Fischer)
    LadnerFischer,
    /// Kogge-Stone-style fan-out at stride `2^levels` (Han-Carlson)
    HanCarlson,
    /// One node per level, rippling across the block carries
    RippleCarry,
}

impl Hybrid {
    pub fn name(self) -> &'static str {
        match self {
            Hybrid::LadnerFischer => "ladner_fischer",
            Hybrid::HanCarlson => "han_carlson",
            Hybrid::RippleCarry => "ripple_carry_brent_kung",
        }
    }

    fn refill(self, matrix: &mut PrefixMatrix, levels: usize, depth: usize) {
        match self {
            Hybrid::LadnerFischer => refill_sklansky(matrix, levels, depth),
            Hybrid::HanCarlson => refill_kogge_stone(matrix, levels),
            Hybrid::RippleCarry => refill_ripple(matrix, levels),
        }
    }
}

/// Plain Brent-Kung adder
pub fn brent_kung(bit_width: usize) -> Result<PrefixMatrix> {
    let mut matrix = PrefixMatrix::new(bit_width)?;
    brent_kung_skeleton(&mut matrix);
    Ok(matrix)
}

/// Fill an empty matrix with the up-sweep and down-sweep
pub fn brent_kung_skeleton(matrix: &mut PrefixMatrix) {
    let size = matrix.size();
    let depth = bit_length(size);

    for r in 0..depth {
        let stride = pow2(r + 1);
        let cols = (stride - 2..size).step_by(stride);
        let values = (pow2(r) - 1..size).step_by(stride);
        for (col, value) in cols.zip(values) {
            matrix.set(r, col, Some(value));
        }
    }

    // Down-sweep, filled from the last row upwards
    for k in 1..=depth {
        let stride = pow2(k);
        let cols = (pow2(k - 1).saturating_mul(3) - 2..size).step_by(stride);
        let values = (stride - 1..size).step_by(stride);
        for (col, value) in cols.zip(values) {
            matrix.set(size - k, col, Some(value));
        }
    }
}

/// Brent-Kung with `levels` outer rows kept and the middle replaced by `hybrid`.
///
/// `levels == 0` is rejected. Levels too large to leave room for a refill
/// collapse to plain Brent-Kung.
pub fn hybrid(bit_width: usize, levels: usize, hybrid: Hybrid) -> Result<PrefixMatrix> {
    if levels == 0 {
        return Err(PrefixError::Configuration(format!(
            "{} needs at least one level, got 0",
            hybrid.name()
        )));
    }

    let mut matrix = brent_kung(bit_width)?;
    let size = matrix.size();
    let depth = bit_length(size);
    let levels = if levels + 2 > depth { depth } else { levels };

    for r in levels..size.saturating_sub(levels) {
        matrix.clear_row(r);
    }
    log::trace!(
        "{} refill of {}-bit skeleton from level {}",
        hybrid.name(),
        bit_width,
        levels
    );
    hybrid.refill(&mut matrix, levels, depth);
    Ok(matrix)
}

/// Ladner-Fischer: Brent-Kung outer levels around a Sklansky core
///
/// Reference: R. Ladner and M. Fischer, "Parallel Prefix Computation",
/// J. ACM 27(4), 1980.
pub fn ladner_fischer(bit_width: usize, levels: usize) -> Result<PrefixMatrix> {
    hybrid(bit_width, levels, Hybrid::LadnerFischer)
}

/// Han-Carlson: Brent-Kung outer levels around a sparse Kogge-Stone core
///
/// Reference: T. Han and D. Carlson, "Fast area-efficient VLSI adders",
/// IEEE Symposium on Computer Arithmetic, 1987.
pub fn han_carlson(bit_width: usize, levels: usize) -> Result<PrefixMatrix> {
    hybrid(bit_width, levels, Hybrid::HanCarlson)
}

/// Brent-Kung outer levels with the block carries rippled one level each
pub fn ripple_carry_brent_kung(bit_width: usize, levels: usize) -> Result<PrefixMatrix> {
    hybrid(bit_width, levels, Hybrid::RippleCarry)
}

fn refill_sklansky(matrix: &mut PrefixMatrix, levels: usize, depth: usize) {
    let size = matrix.size();
    let bit_width = matrix.bit_width();
    let offset = pow2(levels);

    for r in levels..size {
        if r > levels + depth {
            break;
        }
        let repeats = pow2(r - levels);
        for value in (pow2(r) - 1..bit_width).step_by(pow2(r + 1)) {
            for j in 0..repeats {
                let col = value.saturating_add(offset.saturating_mul(j + 1)) - 1;
                if col >= size {
                    break;
                }
                matrix.set(r, col, Some(value));
            }
        }
    }
}

fn refill_kogge_stone(matrix: &mut PrefixMatrix, levels: usize) {
    let size = matrix.size();
    let bit_width = matrix.bit_width();
    let stride = pow2(levels);

    for r in levels..size {
        let first = (stride - 1).saturating_add(pow2(r) - 1);
        if first >= size {
            break;
        }
        let cols = (first..size).step_by(stride);
        let values = (stride - 1..bit_width).step_by(stride);
        for (col, value) in cols.zip(values) {
            matrix.set(r, col, Some(value));
        }
    }
}

fn refill_ripple(matrix: &mut PrefixMatrix, levels: usize) {
    let size = matrix.size();
    let block = pow2(levels);

    for (step, r) in (levels..size).enumerate() {
        let col = (pow2(levels + 1) - 2).saturating_add(block.saturating_mul(step));
        if col >= size {
            break;
        }
        let value = block - 1 + block * step;
        matrix.set(r, col, Some(value));
    }
}
