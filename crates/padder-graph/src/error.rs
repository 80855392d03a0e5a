//! Error types shared by the padder crates

use thiserror::Error;

/// Result type for prefix graph operations
pub type Result<T> = std::result::Result<T, PrefixError>;

/// Errors that can occur while building or checking a prefix graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefixError {
    /// Invalid bit width, level count, fanout schedule or matrix shape
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Mutually exclusive shaping parameters supplied together
    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// The matrix does not describe a functioning adder
    #[error("Adder is not functional: {error} P/G signals are unreachable")]
    AdderInvalid { error: usize },
}
