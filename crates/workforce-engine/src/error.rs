//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and the simulation run.

use workforce_types::{ErrorCode, StructuredError, ToStructured};

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: workforce_core::ConfigError,
    },

    /// The analytical store could not be opened or written.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: workforce_db::DbError,
    },

    /// The pipeline failed or was cancelled.
    #[error("pipeline error: {source}")]
    Pipeline {
        /// The underlying pipeline error.
        #[from]
        source: workforce_core::PipelineError,
    },

    /// Synthetic census generation failed.
    #[error("census error: {message}")]
    Census {
        /// Description of the census failure.
        message: String,
    },
}

impl ToStructured for EngineError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Config { source } => source.error_code(),
            Self::Store { source } => source.error_code(),
            Self::Pipeline { source } => source.error_code(),
            Self::Census { .. } => ErrorCode::ConfigurationInvalid,
        }
    }

    fn to_structured(&self) -> StructuredError {
        match self {
            Self::Config { source } => source.to_structured(),
            Self::Store { source } => source.to_structured(),
            Self::Pipeline { source } => source.to_structured(),
            Self::Census { .. } => StructuredError::new(
                self.error_code(),
                self.to_string(),
                "Check the census and compensation sections of workforce-config.yaml.",
            ),
        }
    }
}
