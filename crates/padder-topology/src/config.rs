//! Batch configuration files
//!
//! A batch file lists bit widths and topologies; every topology is generated
//! at every width:
//!
//! ```toml
//! bit_widths = [8, 16, 32]
//! big_endian = false
//!
//! [[topology]]
//! kind = "ladner_fischer"
//! levels = 2
//!
//! [[topology]]
//! kind = "knowles"
//! max_fanout = 4
//! ```

use crate::Topology;
use padder_graph::PrefixError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a batch file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading the file
    #[error("I/O error: {0}")]
    Io(String),

    /// TOML parsing error
    #[error("Failed to parse batch config: {0}")]
    Parse(String),

    /// Parsed, but describes nothing that can be generated
    #[error(transparent)]
    Invalid(#[from] PrefixError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    pub bit_widths: Vec<usize>,

    /// Lower with big-endian primary inputs and outputs
    #[serde(default)]
    pub big_endian: bool,

    #[serde(rename = "topology")]
    pub topologies: Vec<Topology>,
}

impl BatchConfig {
    /// Read and validate a batch file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a batch description
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: BatchConfig =
            toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        log::debug!(
            "batch config: {} widths x {} topologies",
            config.bit_widths.len(),
            config.topologies.len()
        );
        Ok(config)
    }

    pub fn validate(&self) -> padder_graph::Result<()> {
        if self.bit_widths.is_empty() {
            return Err(PrefixError::Configuration(
                "batch config lists no bit widths".to_string(),
            ));
        }
        if self.topologies.is_empty() {
            return Err(PrefixError::Configuration(
                "batch config lists no topologies".to_string(),
            ));
        }
        if self.bit_widths.contains(&0) {
            return Err(PrefixError::Configuration(
                "bit width must be a positive integer, got 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Every (bit width, topology) pair, widths outermost
    pub fn jobs(&self) -> impl Iterator<Item = (usize, &Topology)> + '_ {
        self.bit_widths
            .iter()
            .flat_map(move |&width| self.topologies.iter().map(move |t| (width, t)))
    }
}
