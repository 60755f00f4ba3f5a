//! Error types for the event store.

use serde_json::json;
use workforce_db::DbError;
use workforce_types::{ErrorCode, EventId, StructuredError, ToStructured};

use crate::schema::SchemaViolation;

/// Errors that can occur when appending or reading events.
#[derive(Debug, thiserror::Error)]
pub enum EventStoreError {
    /// An event belongs to a different year than the one being appended.
    #[error("event for employee {employee_id} declares year {found} while appending year {expected}")]
    YearMismatch {
        /// Year being appended.
        expected: i32,
        /// Year declared by the event.
        found: i32,
        /// Employee the event belongs to.
        employee_id: String,
    },

    /// An event failed its schema rules.
    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    /// Two events of one batch share an id.
    #[error("duplicate event id {event_id} in batch")]
    DuplicateEventId {
        /// The repeated id.
        event_id: EventId,
    },

    /// The underlying store failed.
    #[error("event store: {0}")]
    Store(#[from] DbError),
}

impl ToStructured for EventStoreError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::YearMismatch { .. } | Self::Schema(_) | Self::DuplicateEventId { .. } => {
                ErrorCode::EventSchemaViolation
            }
            Self::Store(e) => e.error_code(),
        }
    }

    fn to_structured(&self) -> StructuredError {
        let hint = "The generator that produced this event is faulty; the year was not written.";
        match self {
            Self::YearMismatch {
                expected,
                found,
                employee_id,
            } => StructuredError::new(self.error_code(), self.to_string(), hint).with_context(
                json!({
                    "employee_id": employee_id,
                    "expected_year": expected,
                    "simulation_year": found,
                }),
            ),
            Self::Schema(v) => StructuredError::new(self.error_code(), self.to_string(), hint)
                .with_context(json!({
                    "employee_id": v.employee_id,
                    "simulation_year": v.simulation_year,
                    "event_type": v.event_type.as_str(),
                    "reason": v.reason,
                })),
            Self::DuplicateEventId { event_id } => {
                StructuredError::new(self.error_code(), self.to_string(), hint)
                    .with_context(json!({ "event_id": event_id.to_string() }))
            }
            Self::Store(e) => e.to_structured(),
        }
    }
}
