//! Topology name registry
//!
//! Maps the names accepted on the command line and in batch files to
//! topology kinds. Lookup ignores case and treats `-` like `_`.

use crate::{KnowlesParams, Topology};
use indexmap::IndexMap;
use padder_graph::{PrefixError, Result};
use std::sync::OnceLock;

/// Topology family without its shape parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopologyKind {
    RippleCarry,
    KoggeStone,
    Sklansky,
    BrentKung,
    LadnerFischer,
    HanCarlson,
    Knowles,
    RippleCarryBrentKung,
}

fn registry() -> &'static IndexMap<&'static str, TopologyKind> {
    static REGISTRY: OnceLock<IndexMap<&'static str, TopologyKind>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        use TopologyKind::*;
        IndexMap::from([
            ("ripple_carry", RippleCarry),
            ("kogge_stone", KoggeStone),
            ("sklansky", Sklansky),
            ("brent_kung", BrentKung),
            ("ladner_fischer", LadnerFischer),
            ("han_carlson", HanCarlson),
            ("knowles", Knowles),
            ("ripple_carry_brent_kung", RippleCarryBrentKung),
            ("rca", RippleCarry),
            ("ks", KoggeStone),
            ("sk", Sklansky),
            ("bk", BrentKung),
            ("lf", LadnerFischer),
            ("hc", HanCarlson),
            ("kn", Knowles),
            ("rcbk", RippleCarryBrentKung),
        ])
    })
}

impl TopologyKind {
    /// Canonical snake_case name
    pub fn name(self) -> &'static str {
        match self {
            TopologyKind::RippleCarry => "ripple_carry",
            TopologyKind::KoggeStone => "kogge_stone",
            TopologyKind::Sklansky => "sklansky",
            TopologyKind::BrentKung => "brent_kung",
            TopologyKind::LadnerFischer => "ladner_fischer",
            TopologyKind::HanCarlson => "han_carlson",
            TopologyKind::Knowles => "knowles",
            TopologyKind::RippleCarryBrentKung => "ripple_carry_brent_kung",
        }
    }

    /// Whether the kind takes a `levels` parameter
    pub fn is_hybrid(self) -> bool {
        matches!(
            self,
            TopologyKind::LadnerFischer
                | TopologyKind::HanCarlson
                | TopologyKind::RippleCarryBrentKung
        )
    }

    /// Attach shape parameters.
    ///
    /// `levels` defaults to 1 for the Brent-Kung hybrids. Parameters the
    /// kind does not take are rejected.
    pub fn with_shape(self, levels: Option<usize>, knowles: KnowlesParams) -> Result<Topology> {
        if levels.is_some() && !self.is_hybrid() {
            return Err(PrefixError::UnsupportedConfiguration(format!(
                "{} does not take a levels parameter",
                self.name()
            )));
        }
        if knowles != KnowlesParams::default() && self != TopologyKind::Knowles {
            return Err(PrefixError::UnsupportedConfiguration(format!(
                "fanout and wiring limits only apply to knowles, not {}",
                self.name()
            )));
        }

        let levels = levels.unwrap_or(1);
        Ok(match self {
            TopologyKind::RippleCarry => Topology::RippleCarry,
            TopologyKind::KoggeStone => Topology::KoggeStone,
            TopologyKind::Sklansky => Topology::Sklansky,
            TopologyKind::BrentKung => Topology::BrentKung,
            TopologyKind::LadnerFischer => Topology::LadnerFischer { levels },
            TopologyKind::HanCarlson => Topology::HanCarlson { levels },
            TopologyKind::Knowles => Topology::Knowles(knowles),
            TopologyKind::RippleCarryBrentKung => Topology::RippleCarryBrentKung { levels },
        })
    }

    /// The kind with default shape parameters
    pub fn default_topology(self) -> Topology {
        match self {
            TopologyKind::RippleCarry => Topology::RippleCarry,
            TopologyKind::KoggeStone => Topology::KoggeStone,
            TopologyKind::Sklansky => Topology::Sklansky,
            TopologyKind::BrentKung => Topology::BrentKung,
            TopologyKind::LadnerFischer => Topology::LadnerFischer { levels: 1 },
            TopologyKind::HanCarlson => Topology::HanCarlson { levels: 1 },
            TopologyKind::Knowles => Topology::Knowles(KnowlesParams::default()),
            TopologyKind::RippleCarryBrentKung => Topology::RippleCarryBrentKung { levels: 1 },
        }
    }
}

/// Resolve a canonical name or alias
pub fn lookup(name: &str) -> Option<TopologyKind> {
    let key = name.trim().to_ascii_lowercase().replace('-', "_");
    registry().get(key.as_str()).copied()
}

/// Like [`lookup`], but unknown names are a configuration error
pub fn resolve(name: &str) -> Result<TopologyKind> {
    lookup(name).ok_or_else(|| {
        PrefixError::Configuration(format!(
            "unknown topology '{}', expected one of: {}",
            name,
            registry().keys().copied().collect::<Vec<_>>().join(", ")
        ))
    })
}

/// Every kind once, in registration order
pub fn kinds() -> impl Iterator<Item = TopologyKind> {
    registry()
        .iter()
        .filter(|(name, kind)| kind.name() == **name)
        .map(|(_, kind)| *kind)
}

/// Aliases registered for `kind`, canonical name excluded
pub fn aliases(kind: TopologyKind) -> impl Iterator<Item = &'static str> {
    registry()
        .iter()
        .filter(move |(name, k)| **k == kind && **name != kind.name())
        .map(|(name, _)| *name)
}
