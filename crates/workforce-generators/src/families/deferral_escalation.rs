//! Automatic deferral escalation on the hire anniversary.
//!
//! Deterministic: no draws. An employee enrolled before their anniversary
//! and still on payroll on it has their rate raised by the configured
//! increment, never past the cap.

use chrono::Datelike;
use workforce_types::calendar::anniversary_in_year;
use workforce_types::{DeferralEscalationDetails, EventPayload, EventType};

use crate::error::GeneratorError;
use crate::generator::{EventDraft, EventGenerator, ExecutionMode, GenerationContext, Upstream};
use crate::numeric::add;

/// Escalates enrolled employees' deferral rates.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferralEscalationGenerator;

impl EventGenerator for DeferralEscalationGenerator {
    fn name(&self) -> &'static str {
        "deferral_escalation"
    }

    fn event_types(&self) -> &'static [EventType] {
        &[EventType::DeferralEscalation]
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
        let policy = &ctx.params.plan_design.escalation;
        if !policy.enabled {
            return Ok(Vec::new());
        }
        let terminated = upstream.termination_dates();

        let mut drafts = Vec::new();
        for member in ctx.workforce.iter() {
            if !member.is_enrolled()
                || member.hire_date.year() >= ctx.simulation_year
                || member.deferral_rate >= policy.cap
            {
                continue;
            }
            let anniversary = anniversary_in_year(member.hire_date, ctx.simulation_year)?;
            if member.enrollment_date.is_some_and(|d| d >= anniversary)
                || terminated.get(&member.employee_id).is_some_and(|d| *d <= anniversary)
            {
                continue;
            }
            let new_rate =
                add(member.deferral_rate, policy.increment, "escalated rate")?.min(policy.cap);
            if new_rate <= member.deferral_rate {
                continue;
            }
            drafts.push(EventDraft {
                employee_id: member.employee_id.clone(),
                effective_date: anniversary,
                payload: EventPayload::DeferralEscalation(DeferralEscalationDetails {
                    previous_rate: member.deferral_rate,
                    new_rate,
                    escalation_number: member.escalation_count.saturating_add(1),
                }),
            });
        }
        Ok(drafts)
    }
}
