//! The pipeline error type.
//!
//! Every failure a run can end with, wrapping the error types of the
//! lower crates. [`PipelineError::to_structured`] is what a run's status
//! reports.

use serde_json::{Map, Value, json};
use workforce_accumulators::{AccumulatorError, RegistryError, YearDependencyError};
use workforce_db::DbError;
use workforce_events::EventStoreError;
use workforce_generators::GeneratorError;
use workforce_types::{ErrorCode, PipelineStage, StructuredError, ToStructured};

use crate::config::ConfigError;
use crate::plan::PlanError;

/// Errors that end a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An accumulator contract or lookup failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The execution plan is invalid.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Year N-1 state is missing.
    #[error(transparent)]
    Dependency(#[from] YearDependencyError),

    /// A generator failed.
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// Events were rejected or could not be stored.
    #[error(transparent)]
    Events(#[from] EventStoreError),

    /// An accumulator fold failed.
    #[error(transparent)]
    Accumulator(#[from] AccumulatorError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] DbError),

    /// A worker or pipeline task panicked or was aborted.
    #[error("task {task} did not complete: {detail}")]
    Worker {
        /// Generator name, or `pipeline` for a whole run.
        task: &'static str,
        /// Join error description.
        detail: String,
    },

    /// A data-quality check failed after accumulation.
    #[error("data quality check {check} failed for {simulation_year}: {detail}")]
    DataQuality {
        /// Year checked.
        simulation_year: i32,
        /// Name of the failed check.
        check: &'static str,
        /// What was found.
        detail: String,
    },

    /// Stored state no longer matches the checkpoint it is resumed from.
    #[error("checkpoint for {simulation_year} {stage} does not match: {reason}")]
    CheckpointMismatch {
        /// Checkpoint year.
        simulation_year: i32,
        /// Checkpoint stage.
        stage: PipelineStage,
        /// What differs.
        reason: String,
    },

    /// A stage failed. Wraps the cause with the year and stage it hit.
    #[error("{stage} of {simulation_year} failed: {source}")]
    StageFailed {
        /// Year that was running.
        simulation_year: i32,
        /// Stage that was running.
        stage: PipelineStage,
        /// What went wrong.
        source: Box<Self>,
    },

    /// The run was cancelled between stages.
    #[error("run cancelled before {stage} of {simulation_year}")]
    Cancelled {
        /// Year that was about to run.
        simulation_year: i32,
        /// Stage that was about to run.
        stage: PipelineStage,
    },
}

impl PipelineError {
    /// Whether the run ended by cancellation rather than failure.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Record that this error ended `stage` of `simulation_year`.
    ///
    /// Errors that already carry a position are returned unchanged.
    #[must_use]
    pub fn at_stage(self, simulation_year: i32, stage: PipelineStage) -> Self {
        match self {
            Self::StageFailed { .. } | Self::Cancelled { .. } => self,
            other => Self::StageFailed {
                simulation_year,
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Year and stage the run failed in, when the failure happened inside
    /// a stage.
    pub const fn failed_at(&self) -> Option<(i32, PipelineStage)> {
        match self {
            Self::StageFailed {
                simulation_year,
                stage,
                ..
            } => Some((*simulation_year, *stage)),
            _ => None,
        }
    }

    /// The underlying failure, without its stage position.
    pub fn root(&self) -> &Self {
        match self {
            Self::StageFailed { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(source: serde_json::Error) -> Self {
        Self::Store(DbError::Serialization(source))
    }
}

impl ToStructured for PipelineError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Registry(e) => e.error_code(),
            Self::Plan(e) => e.error_code(),
            Self::Dependency(e) => e.error_code(),
            Self::Generator(e) => e.error_code(),
            Self::Events(e) => e.error_code(),
            Self::Accumulator(e) => e.error_code(),
            Self::Store(e) => e.error_code(),
            Self::Worker { .. } | Self::DataQuality { .. } => ErrorCode::DataQualityFailure,
            Self::CheckpointMismatch { .. } => ErrorCode::CheckpointMismatch,
            Self::Cancelled { .. } => ErrorCode::RunCancelled,
            Self::StageFailed { source, .. } => source.error_code(),
        }
    }

    fn to_structured(&self) -> StructuredError {
        match self {
            Self::Config(e) => e.to_structured(),
            Self::Registry(e) => e.to_structured(),
            Self::Plan(e) => e.to_structured(),
            Self::Dependency(e) => e.to_structured(),
            Self::Generator(e) => e.to_structured(),
            Self::Events(e) => e.to_structured(),
            Self::Accumulator(e) => e.to_structured(),
            Self::Store(e) => e.to_structured(),
            Self::Worker { task, detail } => StructuredError::new(
                self.error_code(),
                self.to_string(),
                "A task failed; resume from the last checkpoint once the cause is fixed.",
            )
            .with_context(json!({ "task": task, "detail": detail })),
            Self::DataQuality {
                simulation_year,
                check,
                detail,
            } => StructuredError::new(
                self.error_code(),
                self.to_string(),
                "Inspect the year's accumulator tables; the year is not reported until the check passes.",
            )
            .with_context(json!({
                "simulation_year": simulation_year,
                "check": check,
                "detail": detail,
            })),
            Self::CheckpointMismatch {
                simulation_year,
                stage,
                reason,
            } => StructuredError::new(
                self.error_code(),
                self.to_string(),
                "Start the run without resuming, or restore the tables the checkpoint was taken against.",
            )
            .with_context(json!({
                "simulation_year": simulation_year,
                "stage": stage.as_str(),
                "reason": reason,
            })),
            Self::StageFailed {
                simulation_year,
                stage,
                source,
            } => {
                let mut structured = source.to_structured();
                let mut context = match core::mem::take(&mut structured.context) {
                    Value::Object(map) => map,
                    Value::Null => Map::new(),
                    other => [("detail".to_owned(), other)].into_iter().collect(),
                };
                context.insert("simulation_year".to_owned(), json!(simulation_year));
                context.insert("stage".to_owned(), json!(stage.as_str()));
                structured.message = self.to_string();
                structured.with_context(Value::Object(context))
            }
            Self::Cancelled {
                simulation_year,
                stage,
            } => StructuredError::new(
                self.error_code(),
                self.to_string(),
                "Resume from the last checkpoint to continue.",
            )
            .with_context(json!({
                "simulation_year": simulation_year,
                "stage": stage.as_str(),
            })),
        }
    }
}
