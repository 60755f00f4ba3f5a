//! Plan eligibility after the waiting period and minimum age.

use chrono::{Days, Months, NaiveDate};
use workforce_types::calendar::{year_end, year_start};
use workforce_types::{EligibilityDetails, EventPayload, EventType};

use crate::error::GeneratorError;
use crate::generator::{EventDraft, EventGenerator, ExecutionMode, GenerationContext, Upstream};
use crate::params::PlanDesign;

/// Date an employee meets both the service and the age requirement.
pub fn eligibility_date(
    plan: &PlanDesign,
    birth_date: NaiveDate,
    hire_date: NaiveDate,
) -> Result<NaiveDate, GeneratorError> {
    let served = hire_date
        .checked_add_days(Days::new(u64::from(plan.eligibility_waiting_days)))
        .ok_or_else(|| GeneratorError::overflow("eligibility waiting period"))?;
    let aged = plan
        .minimum_age
        .checked_mul(12)
        .and_then(|months| birth_date.checked_add_months(Months::new(months)))
        .ok_or_else(|| GeneratorError::overflow("eligibility minimum age"))?;
    Ok(served.max(aged))
}

/// Emits an eligibility event for every not-yet-eligible employee who
/// qualifies during the year and is still employed on that date.
///
/// Prior employees whose qualifying date has already passed become eligible
/// on the first day of the year.
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityGenerator;

impl EventGenerator for EligibilityGenerator {
    fn name(&self) -> &'static str {
        "eligibility"
    }

    fn event_types(&self) -> &'static [EventType] {
        &[EventType::Eligibility]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["hire", "experienced_termination", "new_hire_termination"]
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Conditional
    }

    fn generate(
        &self,
        ctx: &GenerationContext,
        upstream: &Upstream,
    ) -> Result<Vec<EventDraft>, GeneratorError> {
        let plan = &ctx.params.plan_design;
        let start = year_start(ctx.simulation_year)?;
        let end = year_end(ctx.simulation_year)?;
        let terminated = upstream.termination_dates();

        let prior = ctx
            .workforce
            .iter()
            .filter(|m| !m.is_eligible)
            .map(|m| (&m.employee_id, m.birth_date, m.hire_date));
        let hired = upstream
            .hires()
            .into_iter()
            .map(|(id, hired_on, h)| (id, h.birth_date, hired_on));

        let mut drafts = Vec::new();
        for (employee_id, birth_date, hire_date) in prior.chain(hired) {
            let on = eligibility_date(plan, birth_date, hire_date)?.max(start);
            if on > end || terminated.get(employee_id).is_some_and(|d| *d < on) {
                continue;
            }
            drafts.push(EventDraft {
                employee_id: employee_id.clone(),
                effective_date: on,
                payload: EventPayload::Eligibility(EligibilityDetails {
                    waiting_period_days: plan.eligibility_waiting_days,
                }),
            });
        }
        Ok(drafts)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn later_of_service_and_age_wins() {
        let plan = PlanDesign::default();
        // 90 days after 2025-01-01.
        assert_eq!(
            eligibility_date(&plan, d(1990, 5, 5), d(2025, 1, 1)).unwrap(),
            d(2025, 4, 1)
        );
        // Turns 21 after the waiting period ends.
        assert_eq!(
            eligibility_date(&plan, d(2004, 8, 20), d(2025, 1, 1)).unwrap(),
            d(2025, 8, 20)
        );
    }
}
