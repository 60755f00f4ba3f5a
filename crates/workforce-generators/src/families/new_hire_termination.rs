//! Same-year attrition among the year's hires.

use tracing::debug;
use workforce_types::calendar::year_end;
use workforce_types::{EventPayload, EventType, TerminationDetails, TerminationKind};

use super::date_between;
use crate::error::GeneratorError;
use crate::generator::{EventDraft, EventGenerator, ExecutionMode, GenerationContext, Upstream};
use crate::hiring::new_hire_terminations;

/// Terminates exactly `round(hires × new_hire_termination_rate)` of the
/// year's hires: those with the lowest stable draw, ties broken by id.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewHireTerminationGenerator;

impl EventGenerator for NewHireTerminationGenerator {
    fn name(&self) -> &'static str {
        "new_hire_termination"
    }

    fn event_types(&self) -> &'static [EventType] {
        &[EventType::Termination]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["hire"]
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Conditional
    }

    fn generate(
        &self,
        ctx: &GenerationContext,
        upstream: &Upstream,
    ) -> Result<Vec<EventDraft>, GeneratorError> {
        let hires = upstream.hires();
        let hired = u64::try_from(hires.len()).unwrap_or(u64::MAX);
        let count = new_hire_terminations(hired, ctx.params.workforce.new_hire_termination_rate)?;
        let count = usize::try_from(count).unwrap_or(usize::MAX);
        let end = year_end(ctx.simulation_year)?;

        let mut ranked: Vec<_> = hires
            .into_iter()
            .map(|hire| (ctx.draw(hire.0, "new_hire_termination"), hire))
            .collect();
        ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.0.cmp(b.1.0)));

        let mut drafts = Vec::with_capacity(count);
        for (_, (employee_id, hired_on, details)) in ranked.into_iter().take(count) {
            drafts.push(EventDraft {
                employee_id: employee_id.clone(),
                effective_date: date_between(
                    ctx.draw(employee_id, "new_hire_termination_date"),
                    hired_on,
                    end,
                )?,
                payload: EventPayload::Termination(TerminationDetails {
                    kind: TerminationKind::NewHire,
                    final_compensation: details.annual_compensation,
                }),
            });
        }
        debug!(
            simulation_year = ctx.simulation_year,
            hires = hired,
            new_hire_terminations = drafts.len(),
            "New-hire terminations selected"
        );
        Ok(drafts)
    }
}
