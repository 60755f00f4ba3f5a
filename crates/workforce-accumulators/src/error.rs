//! Error types for accumulators, the registry and the year dependency
//! validator.

use std::collections::BTreeMap;

use serde_json::json;
use workforce_db::DbError;
use workforce_generators::GeneratorError;
use workforce_types::{ErrorCode, StructuredError, ToStructured};

/// Errors raised while folding a year into accumulated state.
#[derive(Debug, thiserror::Error)]
pub enum AccumulatorError {
    /// An accumulator was handed data outside its contract: another year's
    /// events, or prior rows that are not year N-1.
    #[error("accumulator {model} contract violation: {reason}")]
    ContractViolation {
        /// Model name of the accumulator.
        model: String,
        /// What was wrong with the input.
        reason: String,
    },

    /// Events arrived for an employee with no opening state and no hire.
    #[error("accumulator {model}: events for unknown employee {employee_id} in {simulation_year}")]
    OrphanEvents {
        /// Model name of the accumulator.
        model: String,
        /// Employee the events belong to.
        employee_id: String,
        /// Year being folded.
        simulation_year: i32,
    },

    /// A policy computation failed (e.g. prorated compensation overflow).
    #[error(transparent)]
    Policy(#[from] GeneratorError),

    /// The store failed.
    #[error("accumulator store: {0}")]
    Store(#[from] DbError),
}

impl ToStructured for AccumulatorError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::ContractViolation { .. } | Self::OrphanEvents { .. } => {
                ErrorCode::ContractValidationFailed
            }
            Self::Policy(e) => e.error_code(),
            Self::Store(e) => e.error_code(),
        }
    }

    fn to_structured(&self) -> StructuredError {
        match self {
            Self::ContractViolation { model, reason } => StructuredError::new(
                self.error_code(),
                self.to_string(),
                "Accumulators may read only their own year N-1 output and year N events.",
            )
            .with_context(json!({ "model_name": model, "reason": reason })),
            Self::OrphanEvents {
                model,
                employee_id,
                simulation_year,
            } => StructuredError::new(
                self.error_code(),
                self.to_string(),
                "Re-run the year's event generation; an employee's first event must be a hire.",
            )
            .with_context(json!({
                "model_name": model,
                "employee_id": employee_id,
                "simulation_year": simulation_year,
            })),
            Self::Policy(e) => e.to_structured(),
            Self::Store(e) => e.to_structured(),
        }
    }
}

/// Errors raised by the accumulator registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A model name was registered twice.
    #[error("accumulator {model_name} is already registered")]
    DuplicateName {
        /// The repeated name.
        model_name: String,
    },

    /// Two accumulators claim the same target table.
    #[error("table {table} is already owned by accumulator {owner}")]
    DuplicateTable {
        /// The contested table.
        table: String,
        /// Accumulator that registered it first.
        owner: String,
    },

    /// A contract failed validation.
    #[error("invalid contract for {model_name}: {reason}")]
    InvalidContract {
        /// Model name of the contract (may be empty).
        model_name: String,
        /// The rule that failed.
        reason: String,
    },

    /// Lookup of an unregistered name.
    #[error("no accumulator named {model_name}; registered: {}", registered.join(", "))]
    NotFound {
        /// Name looked up.
        model_name: String,
        /// Every registered name, in registration order.
        registered: Vec<String>,
    },
}

impl ToStructured for RegistryError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::ContractValidationFailed
    }

    fn to_structured(&self) -> StructuredError {
        let (hint, context) = match self {
            Self::DuplicateName { model_name } => (
                "Each accumulator type registers exactly once.",
                json!({ "model_name": model_name }),
            ),
            Self::DuplicateTable { table, owner } => (
                "Each accumulator must own a distinct target table.",
                json!({ "table": table, "owner": owner }),
            ),
            Self::InvalidContract { model_name, reason } => (
                "Fill every contract field; prior_year_source must equal target_table.",
                json!({ "model_name": model_name, "reason": reason }),
            ),
            Self::NotFound {
                model_name,
                registered,
            } => (
                "Use one of the registered accumulator names.",
                json!({ "model_name": model_name, "registered": registered }),
            ),
        };
        StructuredError::new(self.error_code(), self.to_string(), hint).with_context(context)
    }
}

/// One year whose accumulator tables are (partly) empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGap {
    /// The year with missing state.
    pub simulation_year: i32,
    /// Tables with no rows for that year.
    pub missing_tables: Vec<String>,
    /// Rows found per registered table for that year.
    pub row_counts: BTreeMap<String, u64>,
}

/// Errors raised by the year dependency validator.
#[derive(Debug, thiserror::Error)]
pub enum YearDependencyError {
    /// The year precedes the configured start year.
    #[error("year {simulation_year} precedes the start year {start_year}")]
    BeforeStartYear {
        /// Year requested.
        simulation_year: i32,
        /// Configured start year.
        start_year: i32,
    },

    /// Year N-1 state is missing for one or more accumulators.
    #[error(
        "cannot accumulate {simulation_year}: {missing_year} state missing in {}",
        missing_tables.join(", ")
    )]
    MissingPriorYear {
        /// Year that was about to be accumulated.
        simulation_year: i32,
        /// The year whose state is missing (always `simulation_year - 1`).
        missing_year: i32,
        /// Tables with no rows for `missing_year`.
        missing_tables: Vec<String>,
        /// Rows found per registered table for `missing_year`; every table
        /// needs at least one.
        row_counts: BTreeMap<String, u64>,
        /// Years in the order they must run, start year first.
        execution_order: Vec<i32>,
    },

    /// A checkpoint's dependency chain has holes.
    #[error("checkpoint at {checkpoint_year} has {} incomplete prior year(s)", gaps.len())]
    BrokenChain {
        /// Year of the checkpoint being resumed.
        checkpoint_year: i32,
        /// Every incomplete year, ascending.
        gaps: Vec<DependencyGap>,
    },

    /// The store failed while counting rows.
    #[error("dependency check: {0}")]
    Store(#[from] DbError),
}

impl ToStructured for YearDependencyError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::BeforeStartYear { .. } => ErrorCode::ConfigurationInvalid,
            Self::MissingPriorYear { .. } | Self::BrokenChain { .. } => {
                ErrorCode::YearDependencyViolation
            }
            Self::Store(e) => e.error_code(),
        }
    }

    fn to_structured(&self) -> StructuredError {
        match self {
            Self::BeforeStartYear {
                simulation_year,
                start_year,
            } => StructuredError::new(
                self.error_code(),
                self.to_string(),
                "Simulate years from the configured start year onward.",
            )
            .with_context(json!({
                "simulation_year": simulation_year,
                "start_year": start_year,
            })),
            Self::MissingPriorYear {
                simulation_year,
                missing_year,
                missing_tables,
                row_counts,
                execution_order,
            } => StructuredError::new(
                self.error_code(),
                self.to_string(),
                format!(
                    "Run year {missing_year} to completion, then resume from the checkpoint before \
                     running {simulation_year}."
                ),
            )
            .with_context(json!({
                "simulation_year": simulation_year,
                "missing_year": missing_year,
                "missing_tables": missing_tables,
                "expected_min_rows": 1,
                "row_counts": row_counts,
                "execution_order": execution_order,
            })),
            Self::BrokenChain {
                checkpoint_year,
                gaps,
            } => {
                let first = gaps.first().map(|g| g.simulation_year);
                StructuredError::new(
                    self.error_code(),
                    self.to_string(),
                    "Re-run from the first incomplete year instead of resuming.",
                )
                .with_context(json!({
                    "checkpoint_year": checkpoint_year,
                    "first_missing_year": first,
                    "gaps": gaps
                        .iter()
                        .map(|g| json!({
                            "simulation_year": g.simulation_year,
                            "missing_tables": g.missing_tables,
                            "row_counts": g.row_counts,
                        }))
                        .collect::<Vec<_>>(),
                }))
            }
            Self::Store(e) => e.to_structured(),
        }
    }
}
