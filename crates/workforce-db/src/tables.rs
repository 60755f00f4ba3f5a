//! Names of the logical tables shared across crates.
//!
//! Accumulator tables are declared by their own contracts in
//! `workforce-accumulators`; only tables with a single fixed owner live here.

/// Immutable simulation events (owned by the event store).
pub const SIMULATION_EVENTS: &str = "fct_simulation_events";

/// Baseline census, read at the start year only.
pub const BASELINE_WORKFORCE: &str = "baseline_workforce";

/// Year-end workforce snapshot.
pub const WORKFORCE_SNAPSHOT: &str = "fct_workforce_snapshot";

/// Per-employee contribution records.
pub const EMPLOYEE_CONTRIBUTIONS: &str = "int_employee_contributions";

/// Pipeline checkpoints (owned by the orchestrator).
pub const RUN_CHECKPOINTS: &str = "run_checkpoints";
