//! Core entity structs: census rows, accumulated state, contribution
//! records, year-end snapshots and pipeline checkpoints.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    DetailedStatus, EmploymentStatus, EnrollmentMethod, EnrollmentStatus, PipelineStage,
    Provenance,
};
use crate::ids::{EmployeeId, PlanDesignId, RunId, ScenarioId};

// ---------------------------------------------------------------------------
// Baseline census
// ---------------------------------------------------------------------------

/// One employee of the baseline census.
///
/// Read only when the simulated year is the configured start year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BaselineEmployee {
    /// Census identifier.
    pub employee_id: EmployeeId,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Original hire date.
    pub hire_date: NaiveDate,
    /// Current job level.
    pub level: u8,
    /// Current annual salary.
    #[ts(as = "String")]
    pub annual_compensation: Decimal,
    /// Whether the employee has already met plan eligibility.
    pub is_eligible: bool,
    /// Date eligibility was met, when known.
    pub eligibility_date: Option<NaiveDate>,
    /// Whether the employee is currently deferring.
    pub is_enrolled: bool,
    /// Date of enrollment, when known.
    pub enrollment_date: Option<NaiveDate>,
    /// Current deferral rate (zero when not enrolled).
    #[ts(as = "String")]
    pub deferral_rate: Decimal,
}

// ---------------------------------------------------------------------------
// Accumulated state
// ---------------------------------------------------------------------------

/// One accumulator's point-in-time state for one employee in one year.
///
/// Exactly one row exists per `(employee_id, simulation_year)` in each
/// accumulator table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeYearState<A> {
    /// Employee the row describes.
    pub employee_id: EmployeeId,
    /// Year the row describes.
    pub simulation_year: i32,
    /// False once a termination has been folded into the row.
    pub is_active: bool,
    /// Where the attribute values came from.
    pub provenance: Provenance,
    /// Accumulator-specific attributes.
    #[serde(flatten)]
    pub attributes: A,
}

/// Declaration of a state accumulator: what it writes and what it reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StateAccumulatorContract {
    /// Unique model name (registry key).
    pub model_name: String,
    /// Table the accumulator owns and writes.
    pub target_table: String,
    /// Table read for year N-1. Must equal `target_table`.
    pub prior_year_source: String,
    /// Table read at the start year instead of prior-year state.
    pub start_year_source: String,
    /// Human-readable purpose.
    pub description: String,
}

// ---------------------------------------------------------------------------
// Contributions
// ---------------------------------------------------------------------------

/// Employee and employer contributions for one employee in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ContributionRecord {
    /// Employee the record describes.
    pub employee_id: EmployeeId,
    /// Year the record describes.
    pub simulation_year: i32,
    /// Age at year end (drives the limit threshold).
    pub age: u32,
    /// Time-weighted compensation for the year.
    #[ts(as = "String")]
    pub prorated_compensation: Decimal,
    /// Year-end deferral rate.
    #[ts(as = "String")]
    pub deferral_rate: Decimal,
    /// Deferral before applying the statutory limit.
    #[ts(as = "String")]
    pub requested_deferral: Decimal,
    /// Deferral after applying the statutory limit.
    #[ts(as = "String")]
    pub employee_deferral: Decimal,
    /// Statutory deferral limit that applied.
    #[ts(as = "String")]
    pub statutory_limit: Decimal,
    /// Set when `requested_deferral` exceeded the limit and was clamped.
    pub limit_applied: bool,
    /// Employer matching contribution.
    #[ts(as = "String")]
    pub employer_match: Decimal,
    /// Employer non-elective (core) contribution.
    #[ts(as = "String")]
    pub employer_core: Decimal,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Year-end workforce fact: one row per employee per year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorkforceSnapshotRow {
    /// Employee the row describes.
    pub employee_id: EmployeeId,
    /// Year the row describes.
    pub simulation_year: i32,
    /// Scenario the row belongs to.
    pub scenario_id: ScenarioId,
    /// Plan design the scenario runs against.
    pub plan_design_id: PlanDesignId,
    /// Age at year end.
    pub age: u32,
    /// Whole years of service at year end.
    pub tenure_years: u32,
    /// Job level at year end.
    pub level: u8,
    /// Active or terminated.
    pub employment_status: EmploymentStatus,
    /// Status refined by hire cohort.
    pub detailed_status: DetailedStatus,
    /// Original hire date.
    pub hire_date: NaiveDate,
    /// Termination date, when terminated this year.
    pub termination_date: Option<NaiveDate>,
    /// Annualized salary at year end (or at termination).
    #[ts(as = "String")]
    pub full_year_compensation: Decimal,
    /// Salary actually earned during the year.
    #[ts(as = "String")]
    pub prorated_compensation: Decimal,
    /// Whether plan eligibility has been met.
    pub is_eligible: bool,
    /// Plan participation status.
    pub enrollment_status: EnrollmentStatus,
    /// How the employee enrolled, if enrolled at any point.
    pub enrollment_method: Option<EnrollmentMethod>,
    /// Year-end deferral rate.
    #[ts(as = "String")]
    pub deferral_rate: Decimal,
    /// Employee deferral after limits.
    #[ts(as = "String")]
    pub employee_deferral: Decimal,
    /// Employer match.
    #[ts(as = "String")]
    pub employer_match: Decimal,
    /// Employer core contribution.
    #[ts(as = "String")]
    pub employer_core: Decimal,
    /// Whether the statutory limit clamped the deferral.
    pub limit_applied: bool,
}

/// Aggregate figures for one materialized year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorkforceSummary {
    /// Year summarized.
    pub simulation_year: i32,
    /// Active headcount at year end.
    pub active_headcount: u64,
    /// Hires during the year.
    pub hires: u64,
    /// Experienced terminations during the year.
    pub experienced_terminations: u64,
    /// New-hire terminations during the year.
    pub new_hire_terminations: u64,
    /// Active employees who are enrolled.
    pub participants: u64,
    /// Participants over active headcount, four decimal places.
    #[ts(as = "String")]
    pub participation_rate: Decimal,
    /// Total prorated compensation.
    #[ts(as = "String")]
    pub total_compensation: Decimal,
    /// Total employee deferrals.
    #[ts(as = "String")]
    pub total_employee_deferrals: Decimal,
    /// Total employer match plus core.
    #[ts(as = "String")]
    pub total_employer_contributions: Decimal,
    /// Records clamped by the statutory limit.
    pub limit_breaches: u64,
}

// ---------------------------------------------------------------------------
// Checkpoint
// ---------------------------------------------------------------------------

/// Persisted marker of a completed pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Checkpoint {
    /// Run that wrote the checkpoint.
    pub run_id: RunId,
    /// Scenario the run belongs to.
    pub scenario_id: ScenarioId,
    /// Year of the completed stage.
    pub simulation_year: i32,
    /// The completed stage.
    pub stage: PipelineStage,
    /// Wall-clock time the stage completed.
    pub timestamp: DateTime<Utc>,
    /// SHA-256 of the rows the stage produced.
    pub state_fingerprint: String,
    /// SHA-256 of the run configuration.
    pub config_fingerprint: String,
}
