//! Employment state: level, pay, hire and termination.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use workforce_generators::{GeneratorError, SalaryChange, time_weighted_compensation};
use workforce_types::calendar::year_end;
use workforce_types::{
    BaselineEmployee, EventPayload, SimulationEvent, StateAccumulatorContract, TerminationKind,
};

use crate::accumulator::Accumulator;
use crate::error::AccumulatorError;
use crate::registry::contract;

/// Table owned by [`EmploymentAccumulator`].
pub const TABLE: &str = "int_employment_state_accumulator";

/// Employment attributes of one employee at year end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentAttributes {
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Original hire date.
    pub hire_date: NaiveDate,
    /// Job level at year end (or at termination).
    pub level: u8,
    /// Annual salary at year end (or at termination). Opens each year at
    /// the prior year's `prorated_compensation`.
    pub full_year_compensation: Decimal,
    /// Salary earned during the year.
    pub prorated_compensation: Decimal,
    /// Termination date, when terminated this year.
    pub termination_date: Option<NaiveDate>,
    /// Kind of termination, when terminated this year.
    pub termination_kind: Option<TerminationKind>,
    /// Hired during this year.
    pub is_new_hire: bool,
}

/// Folds hires, promotions, raises and terminations.
#[derive(Debug, Clone)]
pub struct EmploymentAccumulator {
    contract: StateAccumulatorContract,
}

impl EmploymentAccumulator {
    /// Registered model name.
    pub const MODEL_NAME: &'static str = "employment_state";

    /// Accumulator writing [`TABLE`].
    pub fn new() -> Self {
        Self {
            contract: contract(
                Self::MODEL_NAME,
                TABLE,
                "Level, pay, hire and termination per employee and year",
            ),
        }
    }
}

impl Default for EmploymentAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulator for EmploymentAccumulator {
    type Attributes = EmploymentAttributes;

    fn contract(&self) -> &StateAccumulatorContract {
        &self.contract
    }

    fn seed(&self, employee: &BaselineEmployee) -> EmploymentAttributes {
        EmploymentAttributes {
            birth_date: employee.birth_date,
            hire_date: employee.hire_date,
            level: employee.level,
            full_year_compensation: employee.annual_compensation,
            prorated_compensation: Decimal::ZERO,
            termination_date: None,
            termination_kind: None,
            is_new_hire: false,
        }
    }

    /// The new year opens on the salary earned last year.
    fn carry(&self, prior: &EmploymentAttributes) -> EmploymentAttributes {
        EmploymentAttributes {
            full_year_compensation: prior.prorated_compensation,
            prorated_compensation: Decimal::ZERO,
            termination_date: None,
            termination_kind: None,
            is_new_hire: false,
            ..prior.clone()
        }
    }

    fn open(&self, hire: &SimulationEvent) -> Option<EmploymentAttributes> {
        let EventPayload::Hire(details) = &hire.payload else {
            return None;
        };
        Some(EmploymentAttributes {
            birth_date: details.birth_date,
            hire_date: hire.effective_date,
            level: details.level,
            full_year_compensation: details.annual_compensation,
            prorated_compensation: Decimal::ZERO,
            termination_date: None,
            termination_kind: None,
            is_new_hire: true,
        })
    }

    fn apply(
        &self,
        attributes: &mut EmploymentAttributes,
        event: &SimulationEvent,
    ) -> Result<bool, AccumulatorError> {
        match &event.payload {
            EventPayload::Hire(_) => Ok(true),
            EventPayload::Promotion(p) => {
                attributes.level = p.to_level;
                attributes.full_year_compensation = p.new_compensation;
                Ok(true)
            }
            EventPayload::Raise(r) => {
                attributes.full_year_compensation = r.new_compensation;
                Ok(true)
            }
            EventPayload::Termination(t) => {
                attributes.termination_date = Some(event.effective_date);
                attributes.termination_kind = Some(t.kind);
                Ok(true)
            }
            EventPayload::Eligibility(_)
            | EventPayload::Enrollment(_)
            | EventPayload::EnrollmentOptOut(_)
            | EventPayload::DeferralEscalation(_) => Ok(false),
        }
    }

    fn finish(
        &self,
        attributes: &mut EmploymentAttributes,
        simulation_year: i32,
        events: &[&SimulationEvent],
    ) -> Result<(), AccumulatorError> {
        let mut initial = None;
        let mut changes = Vec::new();
        for event in events {
            let (previous, change) = match &event.payload {
                EventPayload::Promotion(p) => (p.previous_compensation, p.new_compensation),
                EventPayload::Raise(r) => (r.previous_compensation, r.new_compensation),
                _ => continue,
            };
            initial.get_or_insert(previous);
            changes.push(SalaryChange {
                effective_date: event.effective_date,
                annual_compensation: change,
            });
        }
        let initial = initial.unwrap_or(attributes.full_year_compensation);
        let employed_to = match attributes.termination_date {
            Some(date) => date,
            None => year_end(simulation_year).map_err(GeneratorError::from)?,
        };
        attributes.prorated_compensation = time_weighted_compensation(
            simulation_year,
            initial,
            attributes.hire_date,
            employed_to,
            &changes,
        )?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use workforce_types::{
        EmployeeId, EventId, EventType, HireDetails, PlanDesignId, RaiseDetails, ScenarioId,
        TerminationDetails,
    };

    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn event(id: &str, date: NaiveDate, sequence: u32, payload: EventPayload) -> SimulationEvent {
        SimulationEvent {
            event_id: EventId::derive(&format!("{id}:{sequence}")),
            employee_id: EmployeeId::new(id),
            simulation_year: 2025,
            effective_date: date,
            scenario_id: ScenarioId::new("s"),
            plan_design_id: PlanDesignId::new("p"),
            event_type: payload.event_type(),
            payload,
            sequence_in_year: sequence,
        }
    }

    #[test]
    fn raise_then_termination_prorates_and_closes() {
        let acc = EmploymentAccumulator::new();
        let mut attrs = EmploymentAttributes {
            birth_date: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
            hire_date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            level: 2,
            full_year_compensation: dec!(50000),
            prorated_compensation: Decimal::ZERO,
            termination_date: None,
            termination_kind: None,
            is_new_hire: false,
        };
        let raise = event(
            "E1",
            d(7, 1),
            1,
            EventPayload::Raise(RaiseDetails {
                previous_compensation: dec!(50000),
                new_compensation: dec!(60000),
                merit_rate: dec!(0.18),
                cola_rate: dec!(0.02),
            }),
        );
        let term = event(
            "E1",
            d(12, 31),
            2,
            EventPayload::Termination(TerminationDetails {
                kind: TerminationKind::Experienced,
                final_compensation: dec!(50000),
            }),
        );
        for e in [&raise, &term] {
            assert!(acc.apply(&mut attrs, e).unwrap());
        }
        acc.finish(&mut attrs, 2025, &[&raise, &term]).unwrap();
        assert_eq!(attrs.full_year_compensation, dec!(60000));
        assert_eq!(attrs.prorated_compensation, dec!(55041.10));
        assert_eq!(attrs.termination_kind, Some(TerminationKind::Experienced));
    }

    #[test]
    fn hire_opens_a_new_hire_row() {
        let acc = EmploymentAccumulator::new();
        let hire = event(
            "NH_2025_000001",
            d(10, 1),
            1,
            EventPayload::Hire(HireDetails {
                level: 1,
                annual_compensation: dec!(73000),
                birth_date: NaiveDate::from_ymd_opt(1995, 5, 5).unwrap(),
            }),
        );
        let mut attrs = acc.open(&hire).unwrap();
        acc.finish(&mut attrs, 2025, &[&hire]).unwrap();
        assert!(attrs.is_new_hire);
        assert_eq!(attrs.prorated_compensation, dec!(18400.00));
        assert_eq!(hire.event_type, EventType::Hire);
    }

    #[test]
    fn carry_opens_the_year_on_earned_pay() {
        let acc = EmploymentAccumulator::new();
        let prior = EmploymentAttributes {
            birth_date: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
            hire_date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            level: 2,
            full_year_compensation: dec!(60000),
            prorated_compensation: dec!(55041.10),
            termination_date: None,
            termination_kind: None,
            is_new_hire: true,
        };
        let carried = acc.carry(&prior);
        assert_eq!(carried.full_year_compensation, dec!(55041.10));
        assert_eq!(carried.prorated_compensation, Decimal::ZERO);
        assert!(!carried.is_new_hire);
        assert_eq!(carried.level, 2);
    }
}
