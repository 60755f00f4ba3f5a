//! The immutable business event and its type-specific payloads.
//!
//! Events are the source of truth for the simulation's history. They are
//! created once by a generator during the Event Generation stage of their
//! year and are never mutated afterwards; re-running a year replaces the
//! whole year.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{EnrollmentMethod, EventType, TerminationKind};
use crate::ids::{EmployeeId, EventId, PlanDesignId, ScenarioId};

/// A single immutable per-employee-per-year business event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SimulationEvent {
    /// Globally unique, deterministically derived identifier.
    pub event_id: EventId,
    /// Employee the event applies to.
    pub employee_id: EmployeeId,
    /// Year the event belongs to.
    pub simulation_year: i32,
    /// Date the event takes effect (always inside `simulation_year`).
    pub effective_date: NaiveDate,
    /// Scenario that produced the event.
    pub scenario_id: ScenarioId,
    /// Plan design the scenario runs against.
    pub plan_design_id: PlanDesignId,
    /// Declared type. Must match the payload variant.
    pub event_type: EventType,
    /// Type-specific payload.
    pub payload: EventPayload,
    /// 1-based position among this employee's events in the year.
    pub sequence_in_year: u32,
}

impl SimulationEvent {
    /// Stable key the event id is derived from.
    pub fn stable_key(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}:{}",
            self.scenario_id,
            self.plan_design_id,
            self.employee_id,
            self.simulation_year,
            self.event_type,
            self.sequence_in_year
        )
    }

    /// Whether the declared type agrees with the payload variant.
    pub fn type_matches_payload(&self) -> bool {
        self.event_type == self.payload.event_type()
    }
}

/// Type-specific event payload, one variant per [`EventType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EventPayload {
    /// See [`HireDetails`].
    Hire(HireDetails),
    /// See [`TerminationDetails`].
    Termination(TerminationDetails),
    /// See [`PromotionDetails`].
    Promotion(PromotionDetails),
    /// See [`RaiseDetails`].
    Raise(RaiseDetails),
    /// See [`EligibilityDetails`].
    Eligibility(EligibilityDetails),
    /// See [`EnrollmentDetails`].
    Enrollment(EnrollmentDetails),
    /// See [`OptOutDetails`].
    EnrollmentOptOut(OptOutDetails),
    /// See [`DeferralEscalationDetails`].
    DeferralEscalation(DeferralEscalationDetails),
}

impl EventPayload {
    /// The event type this payload variant belongs to.
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::Hire(_) => EventType::Hire,
            Self::Termination(_) => EventType::Termination,
            Self::Promotion(_) => EventType::Promotion,
            Self::Raise(_) => EventType::Raise,
            Self::Eligibility(_) => EventType::Eligibility,
            Self::Enrollment(_) => EventType::Enrollment,
            Self::EnrollmentOptOut(_) => EventType::EnrollmentOptOut,
            Self::DeferralEscalation(_) => EventType::DeferralEscalation,
        }
    }
}

/// A new employee joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HireDetails {
    /// Starting job level.
    pub level: u8,
    /// Starting annual salary.
    #[ts(as = "String")]
    pub annual_compensation: Decimal,
    /// Date of birth, used for age bands and limit thresholds.
    pub birth_date: NaiveDate,
}

/// An employee leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TerminationDetails {
    /// Experienced or new-hire termination.
    pub kind: TerminationKind,
    /// Annual salary at the time of leaving.
    #[ts(as = "String")]
    pub final_compensation: Decimal,
}

/// An employee is promoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PromotionDetails {
    /// Level before the promotion.
    pub from_level: u8,
    /// Level after the promotion.
    pub to_level: u8,
    /// Annual salary before the promotion.
    #[ts(as = "String")]
    pub previous_compensation: Decimal,
    /// Annual salary after the promotion.
    #[ts(as = "String")]
    pub new_compensation: Decimal,
}

/// A merit and cost-of-living pay increase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RaiseDetails {
    /// Annual salary before the raise.
    #[ts(as = "String")]
    pub previous_compensation: Decimal,
    /// Annual salary after the raise.
    #[ts(as = "String")]
    pub new_compensation: Decimal,
    /// Merit component of the increase.
    #[ts(as = "String")]
    pub merit_rate: Decimal,
    /// Cost-of-living component of the increase.
    #[ts(as = "String")]
    pub cola_rate: Decimal,
}

/// An employee becomes plan-eligible on the event's effective date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EligibilityDetails {
    /// Waiting period that applied, in days of service.
    pub waiting_period_days: u32,
}

/// An employee starts deferring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EnrollmentDetails {
    /// Automatic or voluntary enrollment.
    pub method: EnrollmentMethod,
    /// Elected deferral rate (fraction of pay).
    #[ts(as = "String")]
    pub deferral_rate: Decimal,
}

/// An auto-enrolled employee opts out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OptOutDetails {
    /// Deferral rate in effect before opting out.
    #[ts(as = "String")]
    pub previous_deferral_rate: Decimal,
}

/// The plan automatically raises an employee's deferral rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DeferralEscalationDetails {
    /// Rate before the escalation.
    #[ts(as = "String")]
    pub previous_rate: Decimal,
    /// Rate after the escalation.
    #[ts(as = "String")]
    pub new_rate: Decimal,
    /// How many escalations this employee has now received.
    pub escalation_number: u32,
}
