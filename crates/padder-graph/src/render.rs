//! Fixed-width textual rendering
//!
//! ```text
//! 1 2 3 4 5 6 7
//! --------------
//! 0   2   4   6
//!   1 1     5 5
//!       3 3 3 3
//! --------------
//! 1 2 3 4 5 6 7
//! ```
//!
//! Every column is as wide as its 1-based index and followed by one space.
//! Levels without any node are skipped.

use crate::matrix::PrefixMatrix;
use std::fmt;

impl fmt::Display for PrefixMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: String = (1..=self.size()).map(|i| format!("{} ", i)).collect();
        let separator = "-".repeat(header.len());

        writeln!(f, "{}", header)?;
        writeln!(f, "{}", separator)?;
        for (r, row) in self.rows().enumerate() {
            if self.is_row_empty(r) {
                continue;
            }
            for (col, cell) in row.iter().enumerate() {
                let width = digits(col + 1);
                match cell {
                    Some(v) => write!(f, "{:>width$} ", v, width = width)?,
                    None => write!(f, "{:>width$} ", "", width = width)?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "{}", separator)?;
        write!(f, "{}", header)
    }
}

fn digits(x: usize) -> usize {
    x.to_string().len()
}
