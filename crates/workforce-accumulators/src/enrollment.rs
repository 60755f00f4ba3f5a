//! Plan participation state: eligibility, enrollment and opt-out.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use workforce_types::{
    BaselineEmployee, EnrollmentMethod, EnrollmentStatus, EventPayload, SimulationEvent,
    StateAccumulatorContract,
};

use crate::accumulator::Accumulator;
use crate::error::AccumulatorError;
use crate::registry::contract;

/// Table owned by [`EnrollmentAccumulator`].
pub const TABLE: &str = "int_enrollment_state_accumulator";

/// Participation attributes of one employee at year end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentAttributes {
    /// Whether plan eligibility has been met.
    pub is_eligible: bool,
    /// Date eligibility was met.
    pub eligibility_date: Option<NaiveDate>,
    /// Participation status.
    pub enrollment_status: EnrollmentStatus,
    /// How the employee enrolled, if ever.
    pub enrollment_method: Option<EnrollmentMethod>,
    /// Date of the most recent enrollment.
    pub enrollment_date: Option<NaiveDate>,
    /// Date of opt-out, if opted out.
    pub opt_out_date: Option<NaiveDate>,
}

impl EnrollmentAttributes {
    const fn not_eligible() -> Self {
        Self {
            is_eligible: false,
            eligibility_date: None,
            enrollment_status: EnrollmentStatus::NotEligible,
            enrollment_method: None,
            enrollment_date: None,
            opt_out_date: None,
        }
    }
}

/// Folds eligibility, enrollment and opt-out events.
#[derive(Debug, Clone)]
pub struct EnrollmentAccumulator {
    contract: StateAccumulatorContract,
}

impl EnrollmentAccumulator {
    /// Registered model name.
    pub const MODEL_NAME: &'static str = "enrollment_state";

    /// Accumulator writing [`TABLE`].
    pub fn new() -> Self {
        Self {
            contract: contract(
                Self::MODEL_NAME,
                TABLE,
                "Eligibility, enrollment status and method per employee and year",
            ),
        }
    }
}

impl Default for EnrollmentAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulator for EnrollmentAccumulator {
    type Attributes = EnrollmentAttributes;

    fn contract(&self) -> &StateAccumulatorContract {
        &self.contract
    }

    fn seed(&self, employee: &BaselineEmployee) -> EnrollmentAttributes {
        let enrollment_status = if employee.is_enrolled {
            EnrollmentStatus::Enrolled
        } else if employee.is_eligible {
            EnrollmentStatus::EligibleNotEnrolled
        } else {
            EnrollmentStatus::NotEligible
        };
        EnrollmentAttributes {
            is_eligible: employee.is_eligible || employee.is_enrolled,
            eligibility_date: employee.eligibility_date,
            enrollment_status,
            enrollment_method: employee.is_enrolled.then_some(EnrollmentMethod::Baseline),
            enrollment_date: employee.enrollment_date,
            opt_out_date: None,
        }
    }

    fn open(&self, hire: &SimulationEvent) -> Option<EnrollmentAttributes> {
        matches!(hire.payload, EventPayload::Hire(_)).then(EnrollmentAttributes::not_eligible)
    }

    fn apply(
        &self,
        attributes: &mut EnrollmentAttributes,
        event: &SimulationEvent,
    ) -> Result<bool, AccumulatorError> {
        match &event.payload {
            EventPayload::Eligibility(_) => {
                attributes.is_eligible = true;
                attributes.eligibility_date = Some(event.effective_date);
                if attributes.enrollment_status == EnrollmentStatus::NotEligible {
                    attributes.enrollment_status = EnrollmentStatus::EligibleNotEnrolled;
                }
                Ok(true)
            }
            EventPayload::Enrollment(e) => {
                attributes.enrollment_status = EnrollmentStatus::Enrolled;
                attributes.enrollment_method = Some(e.method);
                attributes.enrollment_date = Some(event.effective_date);
                Ok(true)
            }
            EventPayload::EnrollmentOptOut(_) => {
                attributes.enrollment_status = EnrollmentStatus::OptedOut;
                attributes.opt_out_date = Some(event.effective_date);
                Ok(true)
            }
            EventPayload::Hire(_)
            | EventPayload::Termination(_)
            | EventPayload::Promotion(_)
            | EventPayload::Raise(_)
            | EventPayload::DeferralEscalation(_) => Ok(false),
        }
    }
}
