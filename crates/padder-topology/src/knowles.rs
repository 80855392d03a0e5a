//! Knowles adders
//!
//! The Knowles family sits between Kogge-Stone (fanout 1 on every level)
//! and Sklansky (fanout `2^r` on level `r`). A fanout schedule gives, for
//! every level, how many consecutive columns share one driving signal.
//!
//! ```text
//! Knowles (16, max_wiring = 4), schedule [1, 1, 1, 8]
//! 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
//! ------------------------------------
//! 0 1 2 3 4 5 6 7 8  9 10 11 12 13 14
//!   0 1 2 3 4 5 6 7  8  9 10 11 12 13
//!       0 1 2 3            8  9 10 11
//!               7 7  7  7  7  7  7  7
//! ```
//!
//! Reference: S. Knowles, "A Family of Adders", Proc. 14th IEEE Symposium on
//! Computer Arithmetic, 2001.

use crate::basic::kogge_stone;
use padder_graph::{bit_length, pow2, PrefixError, PrefixMatrix, Result};
use serde::{Deserialize, Serialize};

/// Shape of a Knowles adder. At most one field may be set; with none set
/// the wiring limit defaults to `2^(L-2)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KnowlesParams {
    /// Largest fanout allowed on any level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fanout: Option<usize>,
    /// Wiring budget, traded against fanout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wiring: Option<usize>,
    /// Explicit fanout per level, one entry per level of Kogge-Stone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fanout_schedule: Option<Vec<usize>>,
}

impl KnowlesParams {
    pub fn with_max_fanout(max_fanout: usize) -> Self {
        Self {
            max_fanout: Some(max_fanout),
            ..Self::default()
        }
    }

    pub fn with_max_wiring(max_wiring: usize) -> Self {
        Self {
            max_wiring: Some(max_wiring),
            ..Self::default()
        }
    }

    pub fn with_schedule(schedule: Vec<usize>) -> Self {
        Self {
            fanout_schedule: Some(schedule),
            ..Self::default()
        }
    }

    /// Resolve the fanout schedule for an adder of `bit_width` bits
    pub fn schedule(&self, bit_width: usize) -> Result<Vec<usize>> {
        let depth = bit_length(bit_width.saturating_sub(1));
        let schedule = match (self.max_fanout, self.max_wiring, &self.fanout_schedule) {
            (Some(_), Some(_), _) => {
                return Err(PrefixError::UnsupportedConfiguration(
                    "max_fanout and max_wiring cannot be combined".to_string(),
                ))
            }
            (Some(_), None, Some(_)) | (None, Some(_), Some(_)) => {
                return Err(PrefixError::UnsupportedConfiguration(
                    "an explicit fanout schedule cannot be combined with max_fanout or max_wiring"
                        .to_string(),
                ))
            }
            (None, None, Some(schedule)) => schedule.clone(),
            (Some(max_fanout), None, None) => fanout_limited(max_fanout, depth)?,
            (None, max_wiring, None) => {
                let max_wiring = max_wiring.unwrap_or_else(|| pow2(depth.saturating_sub(2)));
                wiring_limited(max_wiring, depth)?
            }
        };
        validate_schedule(&schedule, depth)?;
        Ok(schedule)
    }
}

/// Every level at full fanout until the largest power of two not above the limit
fn fanout_limited(max_fanout: usize, depth: usize) -> Result<Vec<usize>> {
    if max_fanout == 0 {
        return Err(PrefixError::Configuration(
            "max_fanout must be a positive integer, got 0".to_string(),
        ));
    }
    let cap = bit_length(max_fanout) - 1;
    Ok((0..depth).map(|k| pow2(k.min(cap))).collect())
}

// Kogge-Stone levels up to the budget, then a single Sklansky-like level.
// Not optimal, but it keeps the track count near the budget.
fn wiring_limited(max_wiring: usize, depth: usize) -> Result<Vec<usize>> {
    if max_wiring == 0 {
        return Err(PrefixError::Configuration(
            "max_wiring must be a positive integer, got 0".to_string(),
        ));
    }
    let threshold = bit_length(max_wiring - 1);
    Ok((0..depth)
        .map(|k| if k > threshold { pow2(k) } else { 1 })
        .collect())
}

fn validate_schedule(schedule: &[usize], depth: usize) -> Result<()> {
    if schedule.len() != depth {
        return Err(PrefixError::Configuration(format!(
            "fanout schedule needs {} entries, got {:?}",
            depth, schedule
        )));
    }
    if let Some(bad) = schedule.iter().find(|f| !f.is_power_of_two()) {
        return Err(PrefixError::Configuration(format!(
            "fanout {} in {:?} is not a power of two",
            bad, schedule
        )));
    }
    if let Some((level, fanout)) = schedule
        .iter()
        .enumerate()
        .find(|&(level, &fanout)| fanout > pow2(level))
    {
        return Err(PrefixError::Configuration(format!(
            "fanout {} on level {} exceeds {} in {:?}",
            fanout,
            level,
            pow2(level),
            schedule
        )));
    }
    Ok(())
}

/// Knowles adder with the given shape
///
/// A schedule that passes validation is always honored, even when the
/// resulting matrix is not a working adder.
pub fn knowles(bit_width: usize, params: &KnowlesParams) -> Result<PrefixMatrix> {
    let mut matrix = kogge_stone(bit_width)?;
    let schedule = params.schedule(bit_width)?;
    log::trace!("knowles {}-bit fanout schedule {:?}", bit_width, schedule);

    let size = matrix.size();
    for (r, &fanout) in schedule.iter().enumerate().skip(1) {
        let mut previous = None;
        for col in 0..size {
            let Some(value) = matrix.get(r, col) else {
                continue;
            };
            if previous == Some(value) {
                continue;
            }
            let merged = value + fanout - 1;
            previous = Some(merged);
            for c in col..(col + fanout).min(size) {
                matrix.set(r, c, Some(merged));
            }
        }

        // Full Sklansky fanout makes every other group of the level above dead
        if fanout == pow2(r) {
            prune(&mut matrix, r - 1, fanout);
        }
    }
    Ok(matrix)
}

/// Keep the first `fanout / 2` of every `fanout` nodes of `row`
fn prune(matrix: &mut PrefixMatrix, row: usize, fanout: usize) {
    let keep = fanout / 2;
    let mut counter = 0;
    for col in 0..matrix.size() {
        if matrix.get(row, col).is_none() {
            continue;
        }
        if counter >= keep {
            matrix.set(row, col, None);
        }
        counter = (counter + 1) % fanout;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        assert_eq!(KnowlesParams::default().schedule(8).unwrap(), vec![1, 1, 4]);
        assert_eq!(
            KnowlesParams::default().schedule(16).unwrap(),
            vec![1, 1, 1, 8]
        );
        assert_eq!(KnowlesParams::default().schedule(2).unwrap(), vec![1]);
        assert!(KnowlesParams::default().schedule(1).unwrap().is_empty());
    }

    #[test]
    fn test_derived_schedules() {
        assert_eq!(
            KnowlesParams::with_max_wiring(4).schedule(16).unwrap(),
            vec![1, 1, 1, 8]
        );
        assert_eq!(
            KnowlesParams::with_max_fanout(4).schedule(16).unwrap(),
            vec![1, 2, 4, 4]
        );
        // Rounded down to a power of two
        assert_eq!(
            KnowlesParams::with_max_fanout(7).schedule(32).unwrap(),
            vec![1, 2, 4, 4, 4]
        );
        assert_eq!(
            KnowlesParams::with_max_fanout(1).schedule(16).unwrap(),
            vec![1, 1, 1, 1]
        );
    }

    #[test]
    fn test_exclusive_params() {
        let both = KnowlesParams {
            max_fanout: Some(4),
            max_wiring: Some(4),
            fanout_schedule: None,
        };
        assert!(matches!(
            knowles(16, &both),
            Err(PrefixError::UnsupportedConfiguration(_))
        ));

        let with_schedule = KnowlesParams {
            max_wiring: Some(4),
            ..KnowlesParams::with_schedule(vec![1, 1, 1, 2])
        };
        assert!(matches!(
            knowles(16, &with_schedule),
            Err(PrefixError::UnsupportedConfiguration(_))
        ));
    }

    #[test]
    fn test_invalid_schedules() {
        for schedule in [
            vec![1, 1, 1],
            vec![1, 1, 1, 1, 1],
            vec![1, 1, 3, 1],
            vec![1, 0, 1, 1],
            vec![2, 1, 1, 1],
            vec![1, 1, 8, 1],
        ] {
            assert!(
                matches!(
                    KnowlesParams::with_schedule(schedule.clone()).schedule(16),
                    Err(PrefixError::Configuration(_))
                ),
                "{:?}",
                schedule
            );
        }
        assert!(matches!(
            knowles(16, &KnowlesParams::with_max_fanout(0)),
            Err(PrefixError::Configuration(_))
        ));
        assert!(matches!(
            knowles(16, &KnowlesParams::with_max_wiring(0)),
            Err(PrefixError::Configuration(_))
        ));
    }

    #[test]
    fn test_knowles_8_default() {
        let matrix = knowles(8, &KnowlesParams::default()).unwrap();
        assert_eq!(
            matrix.row(1),
            &[None, Some(0), Some(1), None, None, Some(4), Some(5)]
        );
        assert_eq!(
            matrix.row(2),
            &[None, None, None, Some(3), Some(3), Some(3), Some(3)]
        );
        assert_eq!(matrix.node_count(), 15);
        assert!(matrix.verify().is_ok());
    }

    #[test]
    fn test_all_ones_is_kogge_stone() {
        let matrix = knowles(16, &KnowlesParams::with_schedule(vec![1, 1, 1, 1])).unwrap();
        assert_eq!(matrix, kogge_stone(16).unwrap());
    }

    #[test]
    fn test_params_serde() {
        let params: KnowlesParams = toml::from_str("max_fanout = 4").unwrap();
        assert_eq!(params, KnowlesParams::with_max_fanout(4));
        let params: KnowlesParams = toml::from_str("fanout_schedule = [1, 1, 1, 2]").unwrap();
        assert_eq!(params, KnowlesParams::with_schedule(vec![1, 1, 1, 2]));
        assert!(toml::from_str::<KnowlesParams>("max_fanuot = 4").is_err());
    }
}
