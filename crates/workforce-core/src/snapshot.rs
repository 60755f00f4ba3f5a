//! Year-end workforce snapshot.
//!
//! Joins the year's employment, enrollment and deferral state with the
//! contribution records into one [`WorkforceSnapshotRow`] per employee,
//! replaces the year's partition of `fct_workforce_snapshot` and returns the
//! year's [`WorkforceSummary`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::info;
use workforce_accumulators::{DeferralAttributes, EmploymentAttributes, EnrollmentAttributes};
use workforce_accumulators::{deferral, employment, enrollment};
use workforce_db::store::{replace_year, select};
use workforce_db::tables::{EMPLOYEE_CONTRIBUTIONS, WORKFORCE_SNAPSHOT};
use workforce_db::{AnalyticalStore, Filter};
use workforce_generators::GeneratorError;
use workforce_generators::numeric::add;
use workforce_types::calendar::{whole_years_between, year_end};
use workforce_types::{
    ContributionRecord, DetailedStatus, EmployeeId, EmployeeYearState, EmploymentStatus,
    EnrollmentStatus, PlanDesignId, ScenarioId, TerminationKind, WorkforceSnapshotRow,
    WorkforceSummary,
};

use crate::error::PipelineError;

/// Builds and writes the year-end snapshot.
pub struct SnapshotMaterializer<'a> {
    store: &'a dyn AnalyticalStore,
    scenario_id: &'a ScenarioId,
    plan_design_id: &'a PlanDesignId,
}

impl<'a> SnapshotMaterializer<'a> {
    /// Materializer for one scenario and plan design.
    pub const fn new(
        store: &'a dyn AnalyticalStore,
        scenario_id: &'a ScenarioId,
        plan_design_id: &'a PlanDesignId,
    ) -> Self {
        Self {
            store,
            scenario_id,
            plan_design_id,
        }
    }

    /// Join the year's state, replace its snapshot partition and summarize.
    pub async fn materialize(
        &self,
        simulation_year: i32,
    ) -> Result<WorkforceSummary, PipelineError> {
        let rows = self.build(simulation_year).await?;
        replace_year(self.store, WORKFORCE_SNAPSHOT, simulation_year, &rows).await?;
        let summary = summarize(simulation_year, &rows)?;
        info!(
            simulation_year,
            active_headcount = summary.active_headcount,
            hires = summary.hires,
            experienced_terminations = summary.experienced_terminations,
            new_hire_terminations = summary.new_hire_terminations,
            participation_rate = %summary.participation_rate,
            limit_breaches = summary.limit_breaches,
            "Workforce snapshot materialized"
        );
        Ok(summary)
    }

    /// Snapshot rows of a year, ordered by employee id, without writing.
    pub async fn build(
        &self,
        simulation_year: i32,
    ) -> Result<Vec<WorkforceSnapshotRow>, PipelineError> {
        let filter = || Filter::year(simulation_year);
        let employment: Vec<EmployeeYearState<EmploymentAttributes>> =
            select(self.store, employment::TABLE, filter()).await?;
        let mut enrollment: BTreeMap<EmployeeId, EnrollmentAttributes> = keyed(
            select::<EmployeeYearState<EnrollmentAttributes>>(
                self.store,
                enrollment::TABLE,
                filter(),
            )
            .await?,
        );
        let mut deferral: BTreeMap<EmployeeId, DeferralAttributes> = keyed(
            select::<EmployeeYearState<DeferralAttributes>>(self.store, deferral::TABLE, filter())
                .await?,
        );
        let mut contributions: BTreeMap<EmployeeId, ContributionRecord> =
            select::<ContributionRecord>(self.store, EMPLOYEE_CONTRIBUTIONS, filter())
                .await?
                .into_iter()
                .map(|c| (c.employee_id.clone(), c))
                .collect();

        let at = year_end(simulation_year).map_err(GeneratorError::from)?;
        let missing = |table: &str, employee_id: &EmployeeId| PipelineError::DataQuality {
            simulation_year,
            check: "snapshot_join",
            detail: format!("{employee_id} has employment state but no {table} row"),
        };

        let mut rows = Vec::with_capacity(employment.len());
        for state in employment {
            let id = state.employee_id;
            let plan = enrollment
                .remove(&id)
                .ok_or_else(|| missing(enrollment::TABLE, &id))?;
            let rate = deferral.remove(&id).ok_or_else(|| missing(deferral::TABLE, &id))?;
            let paid = contributions
                .remove(&id)
                .ok_or_else(|| missing(EMPLOYEE_CONTRIBUTIONS, &id))?;
            let job = state.attributes;

            rows.push(WorkforceSnapshotRow {
                simulation_year,
                scenario_id: self.scenario_id.clone(),
                plan_design_id: self.plan_design_id.clone(),
                age: whole_years_between(job.birth_date, at),
                tenure_years: whole_years_between(job.hire_date, at),
                level: job.level,
                employment_status: if state.is_active {
                    EmploymentStatus::Active
                } else {
                    EmploymentStatus::Terminated
                },
                detailed_status: detailed_status(state.is_active, &job),
                hire_date: job.hire_date,
                termination_date: job.termination_date,
                full_year_compensation: job.full_year_compensation,
                prorated_compensation: job.prorated_compensation,
                is_eligible: plan.is_eligible,
                enrollment_status: plan.enrollment_status,
                enrollment_method: plan.enrollment_method,
                deferral_rate: rate.deferral_rate,
                employee_deferral: paid.employee_deferral,
                employer_match: paid.employer_match,
                employer_core: paid.employer_core,
                limit_applied: paid.limit_applied,
                employee_id: id,
            });
        }
        Ok(rows)
    }
}

pub(crate) fn keyed<A>(rows: Vec<EmployeeYearState<A>>) -> BTreeMap<EmployeeId, A> {
    rows.into_iter()
        .map(|row| (row.employee_id, row.attributes))
        .collect()
}

const fn detailed_status(is_active: bool, job: &EmploymentAttributes) -> DetailedStatus {
    match (is_active, job.is_new_hire, job.termination_kind) {
        (true, true, _) => DetailedStatus::NewHireActive,
        (true, false, _) => DetailedStatus::ContinuousActive,
        (false, _, Some(TerminationKind::NewHire)) | (false, true, None) => {
            DetailedStatus::NewHireTermination
        }
        (false, _, _) => DetailedStatus::ExperiencedTermination,
    }
}

/// Aggregate a year's snapshot rows.
pub fn summarize(
    simulation_year: i32,
    rows: &[WorkforceSnapshotRow],
) -> Result<WorkforceSummary, PipelineError> {
    let count = |status: DetailedStatus| {
        u64::try_from(rows.iter().filter(|r| r.detailed_status == status).count())
            .unwrap_or(u64::MAX)
    };
    let active = rows
        .iter()
        .filter(|r| r.employment_status == EmploymentStatus::Active);
    let active_headcount = u64::try_from(active.clone().count()).unwrap_or(u64::MAX);
    let participants = u64::try_from(
        active
            .filter(|r| r.enrollment_status == EnrollmentStatus::Enrolled)
            .count(),
    )
    .unwrap_or(u64::MAX);
    let participation_rate = Decimal::from(participants)
        .checked_div(Decimal::from(active_headcount))
        .map_or(Decimal::ZERO, |r| r.round_dp(4));

    let mut total_compensation = Decimal::ZERO;
    let mut total_employee_deferrals = Decimal::ZERO;
    let mut total_employer_contributions = Decimal::ZERO;
    for row in rows {
        total_compensation =
            add(total_compensation, row.prorated_compensation, "total compensation")?;
        total_employee_deferrals =
            add(total_employee_deferrals, row.employee_deferral, "total deferrals")?;
        total_employer_contributions = add(
            total_employer_contributions,
            add(row.employer_match, row.employer_core, "employer contributions")?,
            "employer contributions",
        )?;
    }

    Ok(WorkforceSummary {
        simulation_year,
        active_headcount,
        hires: count(DetailedStatus::NewHireActive)
            .saturating_add(count(DetailedStatus::NewHireTermination)),
        experienced_terminations: count(DetailedStatus::ExperiencedTermination),
        new_hire_terminations: count(DetailedStatus::NewHireTermination),
        participants,
        participation_rate,
        total_compensation,
        total_employee_deferrals,
        total_employer_contributions,
        limit_breaches: u64::try_from(rows.iter().filter(|r| r.limit_applied).count())
            .unwrap_or(u64::MAX),
    })
}
