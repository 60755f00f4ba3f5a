//! Enumeration types for the workforce simulation.
//!
//! Every enum here is a closed set: the event store, the accumulators and the
//! orchestrator match on them exhaustively.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// The closed set of business event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EventType {
    /// An employee joins the workforce.
    Hire,
    /// An employee leaves the workforce.
    Termination,
    /// An employee moves up one or more job levels.
    Promotion,
    /// A merit and/or cost-of-living pay increase.
    Raise,
    /// An employee becomes eligible for the retirement plan.
    Eligibility,
    /// An employee starts deferring into the plan.
    Enrollment,
    /// An auto-enrolled employee opts back out.
    EnrollmentOptOut,
    /// Automatic increase of the deferral rate.
    DeferralEscalation,
}

impl EventType {
    /// All event types in canonical order.
    pub const ALL: [Self; 8] = [
        Self::Hire,
        Self::Termination,
        Self::Promotion,
        Self::Raise,
        Self::Eligibility,
        Self::Enrollment,
        Self::EnrollmentOptOut,
        Self::DeferralEscalation,
    ];

    /// Stable storage name of the event type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hire => "hire",
            Self::Termination => "termination",
            Self::Promotion => "promotion",
            Self::Raise => "raise",
            Self::Eligibility => "eligibility",
            Self::Enrollment => "enrollment",
            Self::EnrollmentOptOut => "enrollment_opt_out",
            Self::DeferralEscalation => "deferral_escalation",
        }
    }

    /// Order in which same-day events are folded for one employee.
    ///
    /// A hire always comes first and a termination always comes last, so a
    /// same-day raise is applied to an employee that exists and is active.
    pub const fn fold_order(self) -> u8 {
        match self {
            Self::Hire => 0,
            Self::Promotion => 1,
            Self::Raise => 2,
            Self::Eligibility => 3,
            Self::Enrollment => 4,
            Self::EnrollmentOptOut => 5,
            Self::DeferralEscalation => 6,
            Self::Termination => 7,
        }
    }
}

impl core::fmt::Display for EventType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an employee left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TerminationKind {
    /// Employee who was on payroll at the start of the year.
    Experienced,
    /// Employee hired and terminated within the same year.
    NewHire,
}

/// How an employee came to be enrolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EnrollmentMethod {
    /// Enrolled in the census before the simulation started.
    Baseline,
    /// Enrolled by the plan's automatic-enrollment feature.
    Auto,
    /// Elected to enroll.
    Voluntary,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Plan participation status at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EnrollmentStatus {
    /// Has not met the eligibility requirements.
    NotEligible,
    /// Eligible but never enrolled.
    EligibleNotEnrolled,
    /// Actively deferring.
    Enrolled,
    /// Was auto-enrolled and opted out.
    OptedOut,
}

/// Where an accumulated state row got its values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Provenance {
    /// Seeded from baseline census attributes (start year only).
    Baseline,
    /// Carried unchanged from the accumulator's own prior-year row.
    PriorYearAccumulator,
    /// Changed by at least one current-year event.
    CurrentYearEvent,
}

/// Employment status at year end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EmploymentStatus {
    /// On payroll at year end.
    Active,
    /// Left during the year.
    Terminated,
}

/// Employment status refined by hire cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DetailedStatus {
    /// Active all year, hired in an earlier year.
    ContinuousActive,
    /// Hired this year and still active.
    NewHireActive,
    /// Hired in an earlier year and terminated this year.
    ExperiencedTermination,
    /// Hired and terminated this year.
    NewHireTermination,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The per-year pipeline stages, in strict execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PipelineStage {
    /// Pre-flight checks (dependency chain, execution plan).
    Initialization,
    /// Prior workforce and hiring plan.
    Foundation,
    /// Event generators run and append to the event store.
    EventGeneration,
    /// Registered accumulators fold the year's events.
    StateAccumulation,
    /// Data-quality checks on the accumulated year.
    Validation,
    /// Year-end snapshot materialization.
    Reporting,
}

impl PipelineStage {
    /// All stages in execution order.
    pub const ALL: [Self; 6] = [
        Self::Initialization,
        Self::Foundation,
        Self::EventGeneration,
        Self::StateAccumulation,
        Self::Validation,
        Self::Reporting,
    ];

    /// Zero-based position of the stage within a year.
    pub const fn index(self) -> usize {
        match self {
            Self::Initialization => 0,
            Self::Foundation => 1,
            Self::EventGeneration => 2,
            Self::StateAccumulation => 3,
            Self::Validation => 4,
            Self::Reporting => 5,
        }
    }

    /// The stage that follows this one within the same year, if any.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Initialization => Some(Self::Foundation),
            Self::Foundation => Some(Self::EventGeneration),
            Self::EventGeneration => Some(Self::StateAccumulation),
            Self::StateAccumulation => Some(Self::Validation),
            Self::Validation => Some(Self::Reporting),
            Self::Reporting => None,
        }
    }

    /// Stable storage name of the stage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initialization => "initialization",
            Self::Foundation => "foundation",
            Self::EventGeneration => "event_generation",
            Self::StateAccumulation => "state_accumulation",
            Self::Validation => "validation",
            Self::Reporting => "reporting",
        }
    }
}

impl core::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Hazard bands
// ---------------------------------------------------------------------------

/// Age band used to look up hazard rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AgeBand {
    /// Younger than 25.
    Under25,
    /// 25 through 34.
    From25To34,
    /// 35 through 44.
    From35To44,
    /// 45 through 54.
    From45To54,
    /// 55 through 64.
    From55To64,
    /// 65 and older.
    Over65,
}

impl AgeBand {
    /// Band containing the given age in whole years.
    pub const fn from_age(age: u32) -> Self {
        match age {
            0..25 => Self::Under25,
            25..35 => Self::From25To34,
            35..45 => Self::From35To44,
            45..55 => Self::From45To54,
            55..65 => Self::From55To64,
            _ => Self::Over65,
        }
    }
}

/// Tenure band used to look up hazard rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TenureBand {
    /// Less than two full years of service.
    Under2,
    /// Two through four years.
    From2To4,
    /// Five through nine years.
    From5To9,
    /// Ten through nineteen years.
    From10To19,
    /// Twenty years or more.
    Over20,
}

impl TenureBand {
    /// Band containing the given tenure in whole years.
    pub const fn from_tenure(years: u32) -> Self {
        match years {
            0..2 => Self::Under2,
            2..5 => Self::From2To4,
            5..10 => Self::From5To9,
            10..20 => Self::From10To19,
            _ => Self::Over20,
        }
    }
}
