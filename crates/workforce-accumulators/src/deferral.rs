//! Deferral-rate state: current rate and escalation history.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use workforce_types::{BaselineEmployee, EventPayload, SimulationEvent, StateAccumulatorContract};

use crate::accumulator::Accumulator;
use crate::error::AccumulatorError;
use crate::registry::contract;

/// Table owned by [`DeferralRateAccumulator`].
pub const TABLE: &str = "int_deferral_rate_state_accumulator";

/// Deferral attributes of one employee at year end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferralAttributes {
    /// Deferral rate at year end; zero when not deferring.
    pub deferral_rate: Decimal,
    /// Escalations received so far.
    pub escalation_count: u32,
    /// Date of the most recent escalation.
    pub last_escalation_date: Option<NaiveDate>,
}

/// Folds enrollment, opt-out and escalation events into the deferral rate.
#[derive(Debug, Clone)]
pub struct DeferralRateAccumulator {
    contract: StateAccumulatorContract,
}

impl DeferralRateAccumulator {
    /// Registered model name.
    pub const MODEL_NAME: &'static str = "deferral_rate_state";

    /// Accumulator writing [`TABLE`].
    pub fn new() -> Self {
        Self {
            contract: contract(
                Self::MODEL_NAME,
                TABLE,
                "Current deferral rate and escalation count per employee and year",
            ),
        }
    }
}

impl Default for DeferralRateAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulator for DeferralRateAccumulator {
    type Attributes = DeferralAttributes;

    fn contract(&self) -> &StateAccumulatorContract {
        &self.contract
    }

    fn seed(&self, employee: &BaselineEmployee) -> DeferralAttributes {
        DeferralAttributes {
            deferral_rate: if employee.is_enrolled {
                employee.deferral_rate
            } else {
                Decimal::ZERO
            },
            escalation_count: 0,
            last_escalation_date: None,
        }
    }

    fn open(&self, hire: &SimulationEvent) -> Option<DeferralAttributes> {
        matches!(hire.payload, EventPayload::Hire(_)).then_some(DeferralAttributes {
            deferral_rate: Decimal::ZERO,
            escalation_count: 0,
            last_escalation_date: None,
        })
    }

    fn apply(
        &self,
        attributes: &mut DeferralAttributes,
        event: &SimulationEvent,
    ) -> Result<bool, AccumulatorError> {
        match &event.payload {
            EventPayload::Enrollment(e) => {
                attributes.deferral_rate = e.deferral_rate;
                Ok(true)
            }
            EventPayload::EnrollmentOptOut(_) => {
                attributes.deferral_rate = Decimal::ZERO;
                Ok(true)
            }
            EventPayload::DeferralEscalation(e) => {
                attributes.deferral_rate = e.new_rate;
                attributes.escalation_count = e.escalation_number;
                attributes.last_escalation_date = Some(event.effective_date);
                Ok(true)
            }
            EventPayload::Hire(_)
            | EventPayload::Termination(_)
            | EventPayload::Promotion(_)
            | EventPayload::Raise(_)
            | EventPayload::Eligibility(_) => Ok(false),
        }
    }
}
