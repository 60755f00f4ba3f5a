//! Post-accumulation data-quality checks.
//!
//! A year is not reported until every check passes.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;
use workforce_accumulators::EmploymentAttributes;
use workforce_db::Row;
use workforce_types::{ContributionRecord, EmployeeYearState, EventType, SimulationEvent};

use crate::error::PipelineError;

/// Figures a validated year reconciles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearReport {
    /// Year validated.
    pub simulation_year: i32,
    /// Employees carried into the year.
    pub starting_headcount: u64,
    /// Hires during the year.
    pub hires: u64,
    /// Terminations during the year, both kinds.
    pub terminations: u64,
    /// Active employees at year end.
    pub ending_headcount: u64,
    /// Contribution records clamped by the statutory limit.
    pub limit_breaches: u64,
}

fn failed(simulation_year: i32, check: &'static str, detail: String) -> PipelineError {
    PipelineError::DataQuality {
        simulation_year,
        check,
        detail,
    }
}

fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// One row per employee in `table` for the year.
pub fn check_single_state(
    simulation_year: i32,
    table: &str,
    rows: &[Row],
) -> Result<(), PipelineError> {
    let mut seen = BTreeSet::new();
    for row in rows {
        let Some(employee_id) = row.get("employee_id").and_then(Value::as_str) else {
            return Err(failed(
                simulation_year,
                "single_state",
                format!("{table} has a row without an employee_id"),
            ));
        };
        if !seen.insert(employee_id) {
            return Err(failed(
                simulation_year,
                "single_state",
                format!("{table} holds more than one row for {employee_id}"),
            ));
        }
    }
    Ok(())
}

/// Start minus terminations plus hires must equal the year-end headcount.
///
/// `opening` is the size of the workforce Foundation built for the year.
pub fn reconcile_headcount(
    simulation_year: i32,
    opening: usize,
    employment: &[EmployeeYearState<EmploymentAttributes>],
    events: &[SimulationEvent],
) -> Result<YearReport, PipelineError> {
    let of_type = |t: EventType| count(events.iter().filter(|e| e.event_type == t).count());
    let carried = count(employment.iter().filter(|s| !s.attributes.is_new_hire).count());
    let hires = count(employment.iter().filter(|s| s.attributes.is_new_hire).count());
    let terminations = count(employment.iter().filter(|s| !s.is_active).count());
    let ending_headcount = count(employment.iter().filter(|s| s.is_active).count());
    let starting_headcount = count(opening);

    if carried != starting_headcount {
        return Err(failed(
            simulation_year,
            "headcount_reconciliation",
            format!(
                "{starting_headcount} employees entered the year but {carried} carried rows exist"
            ),
        ));
    }
    if hires != of_type(EventType::Hire) {
        return Err(failed(
            simulation_year,
            "headcount_reconciliation",
            format!("{} hire events but {hires} new-hire rows", of_type(EventType::Hire)),
        ));
    }
    if terminations != of_type(EventType::Termination) {
        return Err(failed(
            simulation_year,
            "headcount_reconciliation",
            format!(
                "{} termination events but {terminations} closed rows",
                of_type(EventType::Termination)
            ),
        ));
    }
    if starting_headcount.checked_add(hires) != ending_headcount.checked_add(terminations) {
        return Err(failed(
            simulation_year,
            "headcount_reconciliation",
            format!(
                "{starting_headcount} - {terminations} + {hires} does not equal {ending_headcount}"
            ),
        ));
    }
    Ok(YearReport {
        simulation_year,
        starting_headcount,
        hires,
        terminations,
        ending_headcount,
        limit_breaches: 0,
    })
}

/// Every deferral equals the lesser of request and limit, flagged when
/// clamped. Returns the number of clamped records.
pub fn check_clamps(
    simulation_year: i32,
    records: &[ContributionRecord],
) -> Result<u64, PipelineError> {
    for record in records {
        let expected = record.requested_deferral.min(record.statutory_limit);
        let clamped = record.requested_deferral > record.statutory_limit;
        if record.employee_deferral != expected || record.limit_applied != clamped {
            return Err(failed(
                simulation_year,
                "contribution_clamp",
                format!(
                    "{} deferral {} with request {} and limit {} (flagged {})",
                    record.employee_id,
                    record.employee_deferral,
                    record.requested_deferral,
                    record.statutory_limit,
                    record.limit_applied
                ),
            ));
        }
    }
    Ok(count(records.iter().filter(|r| r.limit_applied).count()))
}
