//! Promotions on the configured promotion date.

use rust_decimal::Decimal;
use workforce_types::{EventPayload, EventType, PromotionDetails};

use crate::error::GeneratorError;
use crate::generator::{EventDraft, EventGenerator, ExecutionMode, GenerationContext, Upstream};
use crate::numeric::{add, mul, round_money};

/// Moves employees up one level when a stable draw falls under the
/// promotion hazard for their age, tenure and level.
///
/// Employees at the top level, and those terminated on or before the
/// promotion date, are not considered.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromotionGenerator;

impl EventGenerator for PromotionGenerator {
    fn name(&self) -> &'static str {
        "promotion"
    }

    fn event_types(&self) -> &'static [EventType] {
        &[EventType::Promotion]
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
        let params = &ctx.params;
        let on = params.compensation.promotion_date(ctx.simulation_year)?;
        let terminated = upstream.termination_dates();
        let multiplier = add(Decimal::ONE, params.compensation.promotion_increase, "promotion")?;

        let mut drafts = Vec::new();
        for member in ctx.workforce.iter() {
            if member.level >= params.workforce.max_level
                || terminated.get(&member.employee_id).is_some_and(|d| *d <= on)
            {
                continue;
            }
            let rate = params.promotion_hazards.rate_for(
                ctx.simulation_year,
                member.age_at(on),
                member.tenure_at(on),
                member.level,
            );
            if ctx.draw(&member.employee_id, "promotion") >= rate {
                continue;
            }
            drafts.push(EventDraft {
                employee_id: member.employee_id.clone(),
                effective_date: on,
                payload: EventPayload::Promotion(PromotionDetails {
                    from_level: member.level,
                    to_level: member.level.saturating_add(1),
                    previous_compensation: member.annual_compensation,
                    new_compensation: round_money(mul(
                        member.annual_compensation,
                        multiplier,
                        "promoted pay",
                    )?),
                }),
            });
        }
        Ok(drafts)
    }
}
