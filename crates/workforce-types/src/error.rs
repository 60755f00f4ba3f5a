//! Structured error surface exposed to the orchestration/API layer.
//!
//! Every crate keeps its own `thiserror` enum for control flow. At the
//! boundary those errors are rendered into a [`StructuredError`], which
//! carries a stable [`ErrorCode`], a message, a hint on how to resolve the
//! problem, and machine-readable context (year, table, expected vs. actual
//! counts).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum ErrorCode {
    /// Prior-year accumulated state is missing.
    YearDependencyViolation,
    /// An accumulator contract is malformed, duplicated or breached.
    ContractValidationFailed,
    /// An event payload does not match its declared type or schema.
    EventSchemaViolation,
    /// A contribution exceeded its statutory limit.
    LimitBreach,
    /// The analytical store failed or stayed locked past the retry budget.
    StoreUnavailable,
    /// The run configuration or parameter tables are inconsistent.
    ConfigurationInvalid,
    /// Stored data no longer matches the checkpoint being resumed.
    CheckpointMismatch,
    /// A year failed its post-accumulation data-quality checks.
    DataQualityFailure,
    /// The run was cancelled by an operator.
    RunCancelled,
}

impl ErrorCode {
    /// The code as it appears on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::YearDependencyViolation => "YEAR_DEPENDENCY_VIOLATION",
            Self::ContractValidationFailed => "CONTRACT_VALIDATION_FAILED",
            Self::EventSchemaViolation => "EVENT_SCHEMA_VIOLATION",
            Self::LimitBreach => "LIMIT_BREACH",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::ConfigurationInvalid => "CONFIGURATION_INVALID",
            Self::CheckpointMismatch => "CHECKPOINT_MISMATCH",
            Self::DataQualityFailure => "DATA_QUALITY_FAILURE",
            Self::RunCancelled => "RUN_CANCELLED",
        }
    }
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error rendered for consumers outside the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, thiserror::Error)]
#[error("[{error_code}] {message}")]
#[ts(export, export_to = "bindings/")]
pub struct StructuredError {
    /// Stable error code.
    pub error_code: ErrorCode,
    /// What went wrong.
    pub message: String,
    /// What to do about it.
    pub resolution_hint: String,
    /// Machine-readable details.
    pub context: serde_json::Value,
}

impl StructuredError {
    /// Build a structured error with empty context.
    pub fn new(
        error_code: ErrorCode,
        message: impl Into<String>,
        resolution_hint: impl Into<String>,
    ) -> Self {
        Self {
            error_code,
            message: message.into(),
            resolution_hint: resolution_hint.into(),
            context: serde_json::Value::Null,
        }
    }

    /// Attach machine-readable context.
    #[must_use]
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }
}

/// Implemented by every error type that crosses the core boundary.
pub trait ToStructured {
    /// The stable code for this error.
    fn error_code(&self) -> ErrorCode;

    /// Render the error for consumers outside the core.
    fn to_structured(&self) -> StructuredError;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::YearDependencyViolation).ok();
        assert_eq!(json.as_deref(), Some("\"YEAR_DEPENDENCY_VIOLATION\""));
        assert_eq!(ErrorCode::LimitBreach.as_str(), "LIMIT_BREACH");
    }

    #[test]
    fn display_includes_code() {
        let err = StructuredError::new(ErrorCode::EventSchemaViolation, "bad payload", "fix it");
        assert_eq!(err.to_string(), "[EVENT_SCHEMA_VIOLATION] bad payload");
    }
}
