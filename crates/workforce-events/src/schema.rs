//! Per-event schema rules.
//!
//! Checked for every event before anything is written. A violation names
//! the employee, year and event type together with the rule that failed.

use chrono::Datelike;
use rust_decimal::Decimal;
use workforce_types::{EventPayload, EventType, SimulationEvent};

/// A single event that failed its schema rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {event_type} event for employee {employee_id} in {simulation_year}: {reason}")]
pub struct SchemaViolation {
    /// Employee the event belongs to.
    pub employee_id: String,
    /// Year the event declares.
    pub simulation_year: i32,
    /// Declared event type.
    pub event_type: EventType,
    /// The rule that failed.
    pub reason: String,
}

impl SchemaViolation {
    fn of(event: &SimulationEvent, reason: impl Into<String>) -> Self {
        Self {
            employee_id: event.employee_id.to_string(),
            simulation_year: event.simulation_year,
            event_type: event.event_type,
            reason: reason.into(),
        }
    }
}

/// Check one event against the rules for its type.
pub fn validate_event(event: &SimulationEvent) -> Result<(), SchemaViolation> {
    if event.employee_id.as_str().trim().is_empty() {
        return Err(SchemaViolation::of(event, "employee id is empty"));
    }
    if !event.type_matches_payload() {
        return Err(SchemaViolation::of(
            event,
            format!("payload variant is {}", event.payload.event_type()),
        ));
    }
    if event.effective_date.year() != event.simulation_year {
        return Err(SchemaViolation::of(
            event,
            format!("effective date {} is outside the year", event.effective_date),
        ));
    }
    if event.sequence_in_year == 0 {
        return Err(SchemaViolation::of(event, "sequence_in_year starts at 1"));
    }
    validate_payload(&event.payload).map_err(|reason| SchemaViolation::of(event, reason))
}

fn validate_payload(payload: &EventPayload) -> Result<(), String> {
    match payload {
        EventPayload::Hire(d) => positive("annual_compensation", d.annual_compensation),
        EventPayload::Termination(d) => positive("final_compensation", d.final_compensation),
        EventPayload::Promotion(d) => {
            positive("previous_compensation", d.previous_compensation)?;
            positive("new_compensation", d.new_compensation)?;
            if d.to_level <= d.from_level {
                return Err(format!(
                    "promotion must raise the level (from {} to {})",
                    d.from_level, d.to_level
                ));
            }
            Ok(())
        }
        EventPayload::Raise(d) => {
            positive("previous_compensation", d.previous_compensation)?;
            positive("new_compensation", d.new_compensation)?;
            unit_rate("merit_rate", d.merit_rate)?;
            unit_rate("cola_rate", d.cola_rate)
        }
        EventPayload::Eligibility(_) => Ok(()),
        EventPayload::Enrollment(d) => unit_rate("deferral_rate", d.deferral_rate),
        EventPayload::EnrollmentOptOut(d) => {
            unit_rate("previous_deferral_rate", d.previous_deferral_rate)
        }
        EventPayload::DeferralEscalation(d) => {
            unit_rate("previous_rate", d.previous_rate)?;
            unit_rate("new_rate", d.new_rate)?;
            if d.new_rate <= d.previous_rate {
                return Err(format!(
                    "escalation must increase the rate ({} -> {})",
                    d.previous_rate, d.new_rate
                ));
            }
            if d.escalation_number == 0 {
                return Err("escalation_number starts at 1".to_owned());
            }
            Ok(())
        }
    }
}

fn positive(field: &str, value: Decimal) -> Result<(), String> {
    if value > Decimal::ZERO {
        Ok(())
    } else {
        Err(format!("{field} must be positive, got {value}"))
    }
}

fn unit_rate(field: &str, value: Decimal) -> Result<(), String> {
    if (Decimal::ZERO..=Decimal::ONE).contains(&value) {
        Ok(())
    } else {
        Err(format!("{field} must be within [0, 1], got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use workforce_types::{
        DeferralEscalationDetails, EventId, HireDetails, PlanDesignId, PromotionDetails,
        ScenarioId,
    };

    use super::*;

    fn event(payload: EventPayload, date: NaiveDate) -> SimulationEvent {
        SimulationEvent {
            event_id: EventId::derive("k"),
            employee_id: "EMP_1".into(),
            simulation_year: 2025,
            effective_date: date,
            scenario_id: ScenarioId::new("base"),
            plan_design_id: PlanDesignId::new("default"),
            event_type: payload.event_type(),
            payload,
            sequence_in_year: 1,
        }
    }

    fn mid_year() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default()
    }

    fn hire(comp: Decimal) -> EventPayload {
        EventPayload::Hire(HireDetails {
            level: 1,
            annual_compensation: comp,
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default(),
        })
    }

    #[test]
    fn valid_hire_passes() {
        assert_eq!(validate_event(&event(hire(dec!(55000)), mid_year())), Ok(()));
    }

    #[test]
    fn non_positive_compensation_is_rejected() {
        let err = validate_event(&event(hire(dec!(0)), mid_year()));
        assert!(err.is_err_and(|e| e.reason.contains("annual_compensation")));
    }

    #[test]
    fn mismatched_type_is_rejected() {
        let mut e = event(hire(dec!(55000)), mid_year());
        e.event_type = EventType::Raise;
        let err = validate_event(&e);
        assert!(err.is_err_and(|v| v.event_type == EventType::Raise && v.employee_id == "EMP_1"));
    }

    #[test]
    fn date_outside_year_is_rejected() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default();
        assert!(validate_event(&event(hire(dec!(55000)), date)).is_err());
    }

    #[test]
    fn demotions_are_rejected() {
        let payload = EventPayload::Promotion(PromotionDetails {
            from_level: 3,
            to_level: 2,
            previous_compensation: dec!(90000),
            new_compensation: dec!(95000),
        });
        assert!(validate_event(&event(payload, mid_year())).is_err());
    }

    #[test]
    fn escalation_must_increase_within_unit_range() {
        let flat = EventPayload::DeferralEscalation(DeferralEscalationDetails {
            previous_rate: dec!(0.06),
            new_rate: dec!(0.06),
            escalation_number: 1,
        });
        assert!(validate_event(&event(flat, mid_year())).is_err());

        let over = EventPayload::DeferralEscalation(DeferralEscalationDetails {
            previous_rate: dec!(0.99),
            new_rate: dec!(1.01),
            escalation_number: 1,
        });
        assert!(validate_event(&event(over, mid_year())).is_err());
    }
}
