//! Error types for the harness binary.
//!
//! [`EngineError`] wraps every failure mode during startup and the tick
//! loop so `main` can propagate with `?`.

/// Top-level error for the harness binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: gather_core::ConfigError,
    },

    /// Static data loading failed.
    #[error("static data error: {source}")]
    Data {
        /// The underlying data error.
        #[from]
        source: gather_data::DataError,
    },

    /// A scan pass hit a broken invariant.
    #[error("scan error: {source}")]
    Gather {
        /// The underlying engine error.
        #[from]
        source: gather_core::GatherError,
    },

    /// The scripted scenario references something that does not exist.
    #[error("scenario error: {message}")]
    Scenario {
        /// Description of the problem.
        message: String,
    },
}
