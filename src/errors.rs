// * Crate-level error surface. Layer-specific failures convert upward via
// * #[from] so callers handle a single enum.

use thiserror::Error;

use crate::bayesian::SamplingError;
use crate::data::DatasetError;

/// Result type alias for fingerprint generation.
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors surfaced by the generation pipeline. Every variant is returned
/// synchronously from the call that triggered it; nothing is retried.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// An embedded dataset failed to parse or is structurally broken.
    /// Fatal: no generator can be constructed without the networks.
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// A network draw failed (malformed CPT or empty distribution).
    #[error("sampling error: {0}")]
    Sampling(#[from] SamplingError),

    /// A sampled payload could not be decoded into its typed field.
    #[error("failed to decode {field}: {reason}")]
    Decode { field: &'static str, reason: String },

    /// A variable the pipeline depends on is absent from a sample.
    #[error("generated sample is missing {0}")]
    IncompleteSample(&'static str),

    /// Rejected configuration value.
    #[error("invalid option: {0}")]
    InvalidOption(String),
}

impl GeneratorError {
    pub(crate) fn decode(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Decode {
            field,
            reason: reason.into(),
        }
    }
}
