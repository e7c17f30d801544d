//! Error types for the gather-core crate.
//!
//! A full bag or a target that changed since the scan are ordinary
//! [`TransactionOutcome`](gather_types::TransactionOutcome)s, not errors.
//! [`GatherError`] is reserved for failures that mean an invariant broke.

use crate::config::ConfigError;

/// Errors raised by the scan engine.
#[derive(Debug, thiserror::Error)]
pub enum GatherError {
    /// An avatar operation failed after its plan was accepted.
    #[error("avatar state error: {source}")]
    Agent {
        /// The underlying avatar error.
        #[from]
        source: gather_agents::AgentError,
    },

    /// A reloaded configuration was rejected.
    #[error("config reload rejected: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },
}
