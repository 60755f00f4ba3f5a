//! Employee deferrals and employer contributions.
//!
//! Runs after the accumulators, on each employee's year-end deferral rate
//! and time-weighted compensation. The employee deferral is clamped to the
//! statutory limit for the employee's age at year end; a clamp sets
//! `limit_applied` and writes a `LIMIT_BREACH` audit entry.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;
use workforce_types::calendar::{whole_years_between, year_end};
use workforce_types::{ContributionRecord, EmployeeId, ErrorCode};

use crate::error::GeneratorError;
use crate::numeric::{add, div, mul, round_money, sub};
use crate::params::{PlanDesign, StatutoryLimits};

/// One employee's year-end inputs to the calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionInput {
    /// Employee identifier.
    pub employee_id: EmployeeId,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Salary earned during the year.
    pub prorated_compensation: Decimal,
    /// Deferral rate at year end (zero when not enrolled).
    pub deferral_rate: Decimal,
    /// Whether plan eligibility was met by year end.
    pub is_eligible: bool,
}

/// Computes [`ContributionRecord`]s under a plan design and limit tables.
#[derive(Debug, Clone, Copy)]
pub struct ContributionCalculator<'a> {
    plan: &'a PlanDesign,
    limits: &'a StatutoryLimits,
}

impl<'a> ContributionCalculator<'a> {
    /// Calculator for one plan design.
    pub const fn new(plan: &'a PlanDesign, limits: &'a StatutoryLimits) -> Self {
        Self { plan, limits }
    }

    /// Contributions for one employee in one year.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::MissingLimitTable`] when no limit table
    /// applies to the year, or an overflow error.
    pub fn calculate(
        &self,
        simulation_year: i32,
        input: &ContributionInput,
    ) -> Result<ContributionRecord, GeneratorError> {
        let age = whole_years_between(input.birth_date, year_end(simulation_year)?);
        let statutory_limit = self.limits.limit_for(simulation_year, age)?;
        let pay = input.prorated_compensation;

        let requested_deferral = round_money(mul(pay, input.deferral_rate, "requested deferral")?);
        let limit_applied = requested_deferral > statutory_limit;
        let employee_deferral = if limit_applied {
            warn!(
                error_code = ErrorCode::LimitBreach.as_str(),
                employee_id = %input.employee_id,
                simulation_year,
                age,
                requested = %requested_deferral,
                limit = %statutory_limit,
                "Employee deferral clamped to statutory limit"
            );
            statutory_limit
        } else {
            requested_deferral
        };

        let effective_rate = if pay > Decimal::ZERO {
            div(employee_deferral, pay, "effective deferral rate")?
        } else {
            Decimal::ZERO
        };
        let employer_match = round_money(mul(pay, self.match_rate(effective_rate)?, "match")?);
        let employer_core = if input.is_eligible {
            round_money(mul(pay, self.plan.core_contribution_rate, "core contribution")?)
        } else {
            Decimal::ZERO
        };

        Ok(ContributionRecord {
            employee_id: input.employee_id.clone(),
            simulation_year,
            age,
            prorated_compensation: pay,
            deferral_rate: input.deferral_rate,
            requested_deferral,
            employee_deferral,
            statutory_limit,
            limit_applied,
            employer_match,
            employer_core,
        })
    }

    /// Match as a fraction of pay for a given deferral fraction of pay.
    fn match_rate(&self, deferral_rate: Decimal) -> Result<Decimal, GeneratorError> {
        let mut matched = Decimal::ZERO;
        let mut floor = Decimal::ZERO;
        for tier in &self.plan.match_tiers {
            let band = sub(deferral_rate.min(tier.up_to), floor, "match tier")?.max(Decimal::ZERO);
            matched = add(matched, mul(band, tier.match_rate, "match tier")?, "match")?;
            floor = tier.up_to;
        }
        Ok(matched)
    }
}
