//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`sqlx`] and [`serde_json`] errors with additional context about which
//! table or operation failed. Lock contention is the only transient class;
//! [`RetryingStore`](crate::retry::RetryingStore) retries it and everything
//! else surfaces immediately.

use workforce_types::{ErrorCode, StructuredError, ToStructured};

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The table is locked by another writer.
    #[error("lock contention on table {table}: {detail}")]
    LockContention {
        /// Table the statement targeted.
        table: String,
        /// Backend-specific description.
        detail: String,
    },

    /// A transient error persisted past the retry budget.
    #[error("store still unavailable after {attempts} attempts on table {table}: {last_error}")]
    RetriesExhausted {
        /// Attempts made, including the first.
        attempts: u32,
        /// Table the statement targeted.
        table: String,
        /// The last transient error observed.
        last_error: String,
    },

    /// A row handed to a year-scoped write belongs to a different year.
    #[error("row for year {found:?} written to {table} under year {expected}")]
    RowYearMismatch {
        /// Table being written.
        table: String,
        /// Year the statement is scoped to.
        expected: i32,
        /// Year carried by the offending row.
        found: Option<i64>,
    },

    /// A value that must be a JSON object was not.
    #[error("expected a JSON object row for table {table}")]
    NotARow {
        /// Table being written.
        table: String,
    },

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Whether the error is worth retrying.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::LockContention { .. })
    }
}

impl ToStructured for DbError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Config(_) => ErrorCode::ConfigurationInvalid,
            Self::RowYearMismatch { .. } | Self::NotARow { .. } => {
                ErrorCode::ContractValidationFailed
            }
            Self::Postgres(_)
            | Self::Migration(_)
            | Self::Serialization(_)
            | Self::LockContention { .. }
            | Self::RetriesExhausted { .. } => ErrorCode::StoreUnavailable,
        }
    }

    fn to_structured(&self) -> StructuredError {
        let hint = match self {
            Self::RetriesExhausted { .. } | Self::LockContention { .. } => {
                "Another process holds a lock on the analytical store; wait for it to finish and resume the run from its last checkpoint."
            }
            Self::RowYearMismatch { .. } | Self::NotARow { .. } => {
                "A writer produced rows outside its declared year; this is a bug in the producing stage."
            }
            Self::Config(_) => "Check the infrastructure section of the configuration file.",
            Self::Postgres(_) | Self::Migration(_) | Self::Serialization(_) => {
                "Check store connectivity and schema, then resume the run from its last checkpoint."
            }
        };
        StructuredError::new(self.error_code(), self.to_string(), hint)
    }
}
