//! Experienced terminations: employees on payroll at the start of the year
//! who leave during it.

use tracing::debug;
use workforce_types::calendar::{year_end, year_start};
use workforce_types::{EventPayload, EventType, TerminationDetails, TerminationKind};

use super::date_between;
use crate::error::GeneratorError;
use crate::generator::{EventDraft, EventGenerator, ExecutionMode, GenerationContext, Upstream};

/// Salt of the leave/stay decision.
pub const DECISION_SALT: &str = "experienced_termination";
const DATE_SALT: &str = "experienced_termination_date";

/// Selects leavers by comparing a stable draw against the hazard rate for
/// the employee's age, tenure and level at the start of the year.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExperiencedTerminationGenerator;

impl EventGenerator for ExperiencedTerminationGenerator {
    fn name(&self) -> &'static str {
        "experienced_termination"
    }

    fn event_types(&self) -> &'static [EventType] {
        &[EventType::Termination]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::ParallelSafe
    }

    fn generate(
        &self,
        ctx: &GenerationContext,
        _upstream: &Upstream,
    ) -> Result<Vec<EventDraft>, GeneratorError> {
        let start = year_start(ctx.simulation_year)?;
        let end = year_end(ctx.simulation_year)?;
        let hazards = &ctx.params.termination_hazards;

        let mut drafts = Vec::new();
        for member in ctx.workforce.iter() {
            let rate = hazards.rate_for(
                ctx.simulation_year,
                member.age_at(start),
                member.tenure_at(start),
                member.level,
            );
            if ctx.draw(&member.employee_id, DECISION_SALT) >= rate {
                continue;
            }
            drafts.push(EventDraft {
                employee_id: member.employee_id.clone(),
                effective_date: date_between(ctx.draw(&member.employee_id, DATE_SALT), start, end)?,
                payload: EventPayload::Termination(TerminationDetails {
                    kind: TerminationKind::Experienced,
                    final_compensation: member.annual_compensation,
                }),
            });
        }
        debug!(
            simulation_year = ctx.simulation_year,
            workforce = ctx.workforce.len(),
            terminations = drafts.len(),
            "Experienced terminations selected"
        );
        Ok(drafts)
    }
}
