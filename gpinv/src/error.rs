//! Error types for likelihood evaluation.

use thiserror::Error;

/// Errors raised while configuring or evaluating a likelihood.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LikelihoodError {
    /// A likelihood was asked for a capability it does not provide.
    #[error("{likelihood} likelihood does not implement `{capability}`")]
    UnimplementedCapability {
        likelihood: &'static str,
        capability: &'static str,
    },

    /// `Fmu`, `L` and `Y` are mutually inconsistent.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A variance-like parameter is not positive, or too few samples.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for likelihood evaluation.
pub type Result<T> = std::result::Result<T, LikelihoodError>;

impl LikelihoodError {
    pub(crate) fn unimplemented(likelihood: &'static str, capability: &'static str) -> Self {
        Self::UnimplementedCapability {
            likelihood,
            capability,
        }
    }
}
