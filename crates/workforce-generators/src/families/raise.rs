//! Annual merit and cost-of-living raises.

use rust_decimal::Decimal;
use workforce_types::{EventPayload, EventType, RaiseDetails};

use crate::error::GeneratorError;
use crate::generator::{EventDraft, EventGenerator, ExecutionMode, GenerationContext, Upstream};
use crate::numeric::{add, mul, round_money};

/// Gives every experienced employee still on payroll on the raise date the
/// merit rate of their level plus COLA.
///
/// The raise compounds on a promotion earlier in the year: the base is the
/// promoted salary and the merit rate is the new level's.
#[derive(Debug, Clone, Copy, Default)]
pub struct RaiseGenerator;

impl EventGenerator for RaiseGenerator {
    fn name(&self) -> &'static str {
        "raise"
    }

    fn event_types(&self) -> &'static [EventType] {
        &[EventType::Raise]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["experienced_termination", "promotion"]
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Conditional
    }

    fn generate(
        &self,
        ctx: &GenerationContext,
        upstream: &Upstream,
    ) -> Result<Vec<EventDraft>, GeneratorError> {
        let policy = &ctx.params.compensation;
        let on = policy.raise_date(ctx.simulation_year)?;
        let terminated = upstream.termination_dates();
        let promotions = upstream.promotions();

        let mut drafts = Vec::new();
        for member in ctx.workforce.iter() {
            if terminated.get(&member.employee_id).is_some_and(|d| *d <= on) {
                continue;
            }
            let (level, base) = match promotions.get(&member.employee_id) {
                Some((date, p)) if *date <= on => (p.to_level, p.new_compensation),
                _ => (member.level, member.annual_compensation),
            };
            let merit_rate = policy.level(level).map_or(Decimal::ZERO, |l| l.merit_rate);
            let rate = add(merit_rate, policy.cola_rate, "raise rate")?;
            let new_compensation =
                round_money(mul(base, add(Decimal::ONE, rate, "raise")?, "raised pay")?);
            if new_compensation <= base {
                continue;
            }
            drafts.push(EventDraft {
                employee_id: member.employee_id.clone(),
                effective_date: on,
                payload: EventPayload::Raise(RaiseDetails {
                    previous_compensation: base,
                    new_compensation,
                    merit_rate,
                    cola_rate: policy.cola_rate,
                }),
            });
        }
        Ok(drafts)
    }
}
