//! Error types for the simulation crate.

/// Errors that can occur while generating or running a simulation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SimError {
    /// An error propagated from the trust graph.
    #[error("trust graph error: {0}")]
    Trust(#[from] trustweb_core::TrustError),

    /// A configuration value was missing, malformed or inconsistent.
    #[error("invalid configuration {var}: {reason}")]
    InvalidConfig { var: &'static str, reason: String },

    /// A propagation worker task panicked or was cancelled.
    #[error("propagation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The report could not be encoded.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
