//! Plan enrollment and auto-enrollment opt-outs.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use workforce_types::calendar::{year_end, year_start};
use workforce_types::{
    EmployeeId, EnrollmentDetails, EnrollmentMethod, EnrollmentStatus, EventPayload, EventType,
    OptOutDetails,
};

use super::date_between;
use crate::error::GeneratorError;
use crate::generator::{EventDraft, EventGenerator, ExecutionMode, GenerationContext, Upstream};

/// Enrolls employees who become eligible this year, and lets eligible
/// non-participants enroll voluntarily.
///
/// With auto-enrollment on, the newly eligible are enrolled at the default
/// rate on their eligibility date and a stable draw decides whether they
/// opt out within the window. Without it, a draw decides whether they
/// enroll voluntarily. Prior employees who are eligible but not enrolled
/// may enroll voluntarily on a drawn date. Employees who opted out never
/// re-enroll.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrollmentGenerator;

impl EventGenerator for EnrollmentGenerator {
    fn name(&self) -> &'static str {
        "enrollment"
    }

    fn event_types(&self) -> &'static [EventType] {
        &[EventType::Enrollment, EventType::EnrollmentOptOut]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["eligibility", "experienced_termination", "new_hire_termination"]
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
        let left_before =
            |id: &EmployeeId, date: NaiveDate| terminated.get(id).is_some_and(|t| *t < date);

        let mut drafts = Vec::new();
        for (employee_id, eligible_on) in upstream.eligibility_dates() {
            if plan.auto_enrollment {
                drafts.push(enroll(
                    &employee_id,
                    eligible_on,
                    EnrollmentMethod::Auto,
                    plan.default_deferral_rate,
                ));
                if ctx.draw(&employee_id, "opt_out") >= plan.opt_out_rate {
                    continue;
                }
                let window_end = eligible_on
                    .checked_add_days(Days::new(u64::from(plan.opt_out_window_days)))
                    .map_or(end, |d| d.min(end));
                let opt_out_on =
                    date_between(ctx.draw(&employee_id, "opt_out_date"), eligible_on, window_end)?;
                if left_before(&employee_id, opt_out_on) {
                    continue;
                }
                drafts.push(EventDraft {
                    employee_id,
                    effective_date: opt_out_on,
                    payload: EventPayload::EnrollmentOptOut(OptOutDetails {
                        previous_deferral_rate: plan.default_deferral_rate,
                    }),
                });
            } else if ctx.draw(&employee_id, "voluntary_enrollment")
                < plan.voluntary_enrollment_rate
            {
                drafts.push(enroll(
                    &employee_id,
                    eligible_on,
                    EnrollmentMethod::Voluntary,
                    plan.voluntary_deferral_rate,
                ));
            }
        }

        for member in ctx.workforce.iter() {
            if member.enrollment_status != EnrollmentStatus::EligibleNotEnrolled
                || ctx.draw(&member.employee_id, "voluntary_enrollment")
                    >= plan.voluntary_enrollment_rate
            {
                continue;
            }
            let draw = ctx.draw(&member.employee_id, "voluntary_enrollment_date");
            let on = date_between(draw, start, end)?;
            if left_before(&member.employee_id, on) {
                continue;
            }
            drafts.push(enroll(
                &member.employee_id,
                on,
                EnrollmentMethod::Voluntary,
                plan.voluntary_deferral_rate,
            ));
        }
        Ok(drafts)
    }
}

fn enroll(
    employee_id: &EmployeeId,
    on: NaiveDate,
    method: EnrollmentMethod,
    deferral_rate: Decimal,
) -> EventDraft {
    EventDraft {
        employee_id: employee_id.clone(),
        effective_date: on,
        payload: EventPayload::Enrollment(EnrollmentDetails {
            method,
            deferral_rate,
        }),
    }
}
