//! padder topology - prefix adder generators
//!
//! Every generator takes a bit width (plus shape parameters for the hybrid
//! and Knowles families) and returns a filled [`PrefixMatrix`]. With valid
//! parameters the result always passes [`PrefixMatrix::verify`].
//!
//! | Topology | Delay | Fanout |
//! |----------|-------|--------|
//! | Ripple-Carry | n-1 | 1 |
//! | Kogge-Stone | L | 1 |
//! | Sklansky | L | up to 2^(L-1) |
//! | Brent-Kung | up to 2L-1 | 1 |
//! | Ladner-Fischer, Han-Carlson, Ripple-Carry/Brent-Kung | between | per `levels` |
//! | Knowles | L | per fanout schedule |
//!
//! where `L = bit_length(n - 1)`.

pub mod basic;
pub mod brent_kung;
pub mod config;
pub mod knowles;
pub mod registry;

pub use basic::{kogge_stone, ripple_carry, sklansky};
pub use brent_kung::{
    brent_kung, brent_kung_skeleton, han_carlson, hybrid, ladner_fischer,
    ripple_carry_brent_kung, Hybrid,
};
pub use config::{BatchConfig, ConfigError};
pub use knowles::{knowles, KnowlesParams};
pub use registry::TopologyKind;

use padder_graph::{PrefixError, PrefixMatrix, Result};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// A topology together with its shape parameters.
///
/// Serialized as a table tagged by `kind`. Deserialization resolves `kind`
/// through the [`registry`] and rejects parameters the kind does not take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Topology {
    RippleCarry,
    KoggeStone,
    Sklansky,
    BrentKung,
    LadnerFischer { levels: usize },
    HanCarlson { levels: usize },
    Knowles(KnowlesParams),
    RippleCarryBrentKung { levels: usize },
}

/// Deserialized form; every shape parameter of every kind, all optional
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TopologyRepr {
    kind: String,
    levels: Option<usize>,
    max_fanout: Option<usize>,
    max_wiring: Option<usize>,
    fanout_schedule: Option<Vec<usize>>,
}

impl TryFrom<TopologyRepr> for Topology {
    type Error = PrefixError;

    fn try_from(repr: TopologyRepr) -> Result<Self> {
        let knowles = KnowlesParams {
            max_fanout: repr.max_fanout,
            max_wiring: repr.max_wiring,
            fanout_schedule: repr.fanout_schedule,
        };
        registry::resolve(&repr.kind)?.with_shape(repr.levels, knowles)
    }
}

impl<'de> Deserialize<'de> for Topology {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = TopologyRepr::deserialize(deserializer)?;
        Topology::try_from(repr).map_err(de::Error::custom)
    }
}

impl Topology {
    /// Generate the prefix matrix of an adder of `bit_width` bits
    pub fn generate(&self, bit_width: usize) -> Result<PrefixMatrix> {
        let matrix = match self {
            Topology::RippleCarry => ripple_carry(bit_width),
            Topology::KoggeStone => kogge_stone(bit_width),
            Topology::Sklansky => sklansky(bit_width),
            Topology::BrentKung => brent_kung(bit_width),
            Topology::LadnerFischer { levels } => ladner_fischer(bit_width, *levels),
            Topology::HanCarlson { levels } => han_carlson(bit_width, *levels),
            Topology::Knowles(params) => knowles(bit_width, params),
            Topology::RippleCarryBrentKung { levels } => {
                ripple_carry_brent_kung(bit_width, *levels)
            }
        }?;
        log::debug!(
            "generated {}-bit {}: {} nodes on {} levels",
            bit_width,
            self,
            matrix.node_count(),
            matrix.active_level_count()
        );
        Ok(matrix)
    }

    pub fn kind(&self) -> TopologyKind {
        match self {
            Topology::RippleCarry => TopologyKind::RippleCarry,
            Topology::KoggeStone => TopologyKind::KoggeStone,
            Topology::Sklansky => TopologyKind::Sklansky,
            Topology::BrentKung => TopologyKind::BrentKung,
            Topology::LadnerFischer { .. } => TopologyKind::LadnerFischer,
            Topology::HanCarlson { .. } => TopologyKind::HanCarlson,
            Topology::Knowles(_) => TopologyKind::Knowles,
            Topology::RippleCarryBrentKung { .. } => TopologyKind::RippleCarryBrentKung,
        }
    }

    /// Canonical name of the family
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::LadnerFischer { levels }
            | Topology::HanCarlson { levels }
            | Topology::RippleCarryBrentKung { levels } => {
                write!(f, "{}(levels={})", self.name(), levels)
            }
            Topology::Knowles(params) => {
                write!(f, "{}", self.name())?;
                if let Some(max_fanout) = params.max_fanout {
                    write!(f, "(max_fanout={})", max_fanout)?;
                }
                if let Some(max_wiring) = params.max_wiring {
                    write!(f, "(max_wiring={})", max_wiring)?;
                }
                if let Some(schedule) = &params.fanout_schedule {
                    write!(f, "(schedule={:?})", schedule)?;
                }
                Ok(())
            }
            _ => f.write_str(self.name()),
        }
    }
}
