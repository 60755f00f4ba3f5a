//! New hires: enough to replace the year's experienced terminations, meet
//! the growth target and cover expected new-hire attrition.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;
use workforce_types::calendar::{days_in_year, year_end, year_start};
use workforce_types::{EmployeeId, EventPayload, EventType, HireDetails, TerminationKind};

use super::date_between;
use crate::error::GeneratorError;
use crate::generator::{EventDraft, EventGenerator, ExecutionMode, GenerationContext, Upstream};
use crate::numeric::{add, mul, round_money, scale_draw, sub};
use crate::params::CompensationPolicy;

/// Creates `NH_{year}_{index:06}` employees with drawn level, pay, age and
/// hire date.
#[derive(Debug, Clone, Copy, Default)]
pub struct HireGenerator;

/// Deterministic id of the `index`-th hire (1-based) of a year.
pub fn new_hire_id(simulation_year: i32, index: u64) -> EmployeeId {
    EmployeeId::new(format!("NH_{simulation_year}_{index:06}"))
}

impl EventGenerator for HireGenerator {
    fn name(&self) -> &'static str {
        "hire"
    }

    fn event_types(&self) -> &'static [EventType] {
        &[EventType::Hire]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["experienced_termination"]
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Conditional
    }

    fn generate(
        &self,
        ctx: &GenerationContext,
        upstream: &Upstream,
    ) -> Result<Vec<EventDraft>, GeneratorError> {
        let year = ctx.simulation_year;
        let terminations = upstream.termination_count(TerminationKind::Experienced);
        let total = ctx.hiring.hires_for(terminations)?;
        let start = year_start(year)?;
        let end = year_end(year)?;
        let policy = &ctx.params.compensation;
        let workforce = &ctx.params.workforce;

        let mut drafts = Vec::new();
        for index in 1..=total {
            let employee_id = new_hire_id(year, index);
            let level =
                draw_level(policy, workforce.max_level, ctx.draw(&employee_id, "hire_level"));
            let Some(range) = policy.level(level) else {
                return Err(GeneratorError::InvalidParameters {
                    reason: format!("no compensation policy for level {level}"),
                });
            };
            let spread = sub(range.max_compensation, range.min_compensation, "pay range")?;
            let offset = mul(spread, ctx.draw(&employee_id, "hire_compensation"), "starting pay")?;
            let annual_compensation =
                round_money(add(range.min_compensation, offset, "starting pay")?);

            let age_span = workforce
                .new_hire_max_age
                .saturating_sub(workforce.new_hire_min_age)
                .saturating_add(1);
            let age = workforce
                .new_hire_min_age
                .saturating_add(scale_draw(ctx.draw(&employee_id, "hire_age"), age_span));
            let birth_year = i32::try_from(age)
                .ok()
                .and_then(|a| year.checked_sub(a))
                .ok_or_else(|| GeneratorError::overflow("birth year"))?;
            let birth_date = birth_date_in(birth_year, ctx.draw(&employee_id, "hire_birthday"))?;

            drafts.push(EventDraft {
                effective_date: date_between(ctx.draw(&employee_id, "hire_date"), start, end)?,
                employee_id,
                payload: EventPayload::Hire(HireDetails {
                    level,
                    annual_compensation,
                    birth_date,
                }),
            });
        }
        debug!(
            simulation_year = year,
            experienced_terminations = terminations,
            hires = total,
            "Hires generated"
        );
        Ok(drafts)
    }
}

/// Level chosen by cumulative `new_hire_weight`, never above `max_level`.
fn draw_level(policy: &CompensationPolicy, max_level: u8, draw: Decimal) -> u8 {
    let levels: Vec<_> = policy
        .levels
        .iter()
        .filter(|l| l.level >= 1 && l.level <= max_level && l.new_hire_weight > 0)
        .collect();
    let total: u32 = levels.iter().map(|l| l.new_hire_weight).sum();
    let mut pick = scale_draw(draw, total);
    for level in &levels {
        if pick < level.new_hire_weight {
            return level.level;
        }
        pick = pick.saturating_sub(level.new_hire_weight);
    }
    levels.last().map_or(1, |l| l.level)
}

fn birth_date_in(birth_year: i32, draw: Decimal) -> Result<NaiveDate, GeneratorError> {
    let ordinal = scale_draw(draw, days_in_year(birth_year)?).saturating_add(1);
    NaiveDate::from_yo_opt(birth_year, ordinal)
        .filter(|d| d.year() == birth_year)
        .ok_or_else(|| GeneratorError::overflow("birth date"))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn ids_are_zero_padded() {
        assert_eq!(new_hire_id(2026, 4).as_str(), "NH_2026_000004");
    }

    #[test]
    fn level_follows_cumulative_weights() {
        let policy = CompensationPolicy::default();
        // Weights 50/30/15/4/1 out of 100.
        assert_eq!(draw_level(&policy, 5, dec!(0.00)), 1);
        assert_eq!(draw_level(&policy, 5, dec!(0.49)), 1);
        assert_eq!(draw_level(&policy, 5, dec!(0.50)), 2);
        assert_eq!(draw_level(&policy, 5, dec!(0.95)), 4);
        assert_eq!(draw_level(&policy, 5, dec!(0.999)), 5);
        assert_eq!(draw_level(&policy, 3, dec!(0.999)), 3);
    }
}
