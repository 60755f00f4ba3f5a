//! Error types for event generation and the numeric policies.
//!
//! All operations that can fail return typed errors rather than panicking.
//! Money arithmetic is checked; an overflow surfaces as
//! [`GeneratorError::ArithmeticOverflow`] with a description of what was
//! being computed.

use serde_json::json;
use workforce_types::{CalendarError, ErrorCode, EventType, StructuredError, ToStructured};

/// Errors that can occur while generating events or applying policies.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Checked arithmetic overflowed.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// Calendar arithmetic left the supported range.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// A generator produced an event outside its declared variant set.
    #[error("generator {generator} emitted undeclared event type {event_type}")]
    UndeclaredEventType {
        /// Generator name.
        generator: &'static str,
        /// The offending type.
        event_type: EventType,
    },

    /// A parameter table or policy value is unusable.
    #[error("invalid parameters: {reason}")]
    InvalidParameters {
        /// What is wrong.
        reason: String,
    },

    /// No statutory limit table covers the year.
    #[error("no statutory limit table applies to year {simulation_year}")]
    MissingLimitTable {
        /// Year being computed.
        simulation_year: i32,
    },
}

impl GeneratorError {
    /// Shorthand for an overflow in the named computation.
    pub fn overflow(context: impl Into<String>) -> Self {
        Self::ArithmeticOverflow {
            context: context.into(),
        }
    }
}

impl ToStructured for GeneratorError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UndeclaredEventType { .. } => ErrorCode::EventSchemaViolation,
            Self::ArithmeticOverflow { .. }
            | Self::Calendar(_)
            | Self::InvalidParameters { .. }
            | Self::MissingLimitTable { .. } => ErrorCode::ConfigurationInvalid,
        }
    }

    fn to_structured(&self) -> StructuredError {
        match self {
            Self::UndeclaredEventType {
                generator,
                event_type,
            } => StructuredError::new(
                self.error_code(),
                self.to_string(),
                "Fix the generator so it only emits the event types it declares.",
            )
            .with_context(json!({
                "generator": generator,
                "event_type": event_type.as_str(),
            })),
            Self::MissingLimitTable { simulation_year } => StructuredError::new(
                self.error_code(),
                self.to_string(),
                "Add a statutory limit table for this year or an earlier one.",
            )
            .with_context(json!({ "simulation_year": simulation_year })),
            Self::ArithmeticOverflow { .. }
            | Self::Calendar(_)
            | Self::InvalidParameters { .. } => {
                StructuredError::new(
                    self.error_code(),
                    self.to_string(),
                    "Check the parameter tables and policy values in the configuration file.",
                )
            }
        }
    }
}
