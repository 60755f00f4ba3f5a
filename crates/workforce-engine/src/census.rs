//! Synthetic baseline census.
//!
//! When the store holds no baseline workforce, the engine seeds one from
//! the configuration: `census.size` employees drawn from a `StdRng` seeded
//! with `census.seed`, so the same configuration always produces the same
//! census. Levels, pay bands and eligibility rules come from the same
//! policies the generators use.

use chrono::{Datelike, Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::info;
use workforce_core::SimulationConfig;
use workforce_generators::LevelPolicy;
use workforce_types::calendar::{whole_years_between, year_start};
use workforce_types::{BaselineEmployee, EmployeeId};

use crate::error::EngineError;

/// Youngest age at hire.
const MIN_HIRE_AGE: i32 = 20;

/// Oldest age on the census date.
const MAX_AGE: i32 = 64;

/// Longest tenure on the census date, in years.
const MAX_TENURE: i32 = 30;

/// Share of eligible employees already participating.
const PARTICIPATION_RATE: f64 = 0.65;

fn census_error(message: impl Into<String>) -> EngineError {
    EngineError::Census {
        message: message.into(),
    }
}

fn random_date(
    rng: &mut impl Rng,
    from_year: i32,
    to_year: i32,
) -> Result<NaiveDate, EngineError> {
    let year = rng.random_range(from_year..=to_year);
    let month = rng.random_range(1..=12);
    let day = rng.random_range(1..=28);
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| census_error(format!("invalid date {year}-{month}-{day}")))
}

fn whole_dollars(value: Decimal) -> Result<i64, EngineError> {
    value
        .trunc()
        .to_i64()
        .ok_or_else(|| census_error(format!("compensation {value} out of range")))
}

fn pick_level<'a>(
    rng: &mut impl Rng,
    levels: &'a [LevelPolicy],
) -> Result<&'a LevelPolicy, EngineError> {
    if levels.is_empty() {
        return Err(census_error("compensation.levels is empty"));
    }
    let idx = rng.random_range(0..levels.len());
    levels
        .get(idx)
        .ok_or_else(|| census_error("failed to select a level"))
}

/// Generate the baseline census for the configured start year.
///
/// Everyone is hired before January 1 of the start year. Eligibility
/// follows the plan's waiting period and minimum age as of that date.
pub fn generate(config: &SimulationConfig) -> Result<Vec<BaselineEmployee>, EngineError> {
    let start_year = config.simulation.start_year;
    let census_date = year_start(start_year).map_err(|e| census_error(e.to_string()))?;
    let last_year = start_year.saturating_sub(1);
    let plan = &config.plan_design;
    let mut rng = StdRng::seed_from_u64(config.census.seed);

    let mut employees = Vec::new();
    for i in 0..config.census.size {
        let birth_date = random_date(
            &mut rng,
            start_year.saturating_sub(MAX_AGE),
            last_year.saturating_sub(MIN_HIRE_AGE),
        )?;
        let earliest_hire = birth_date
            .year()
            .saturating_add(MIN_HIRE_AGE)
            .max(start_year.saturating_sub(MAX_TENURE));
        let hire_date = random_date(&mut rng, earliest_hire.min(last_year), last_year)?;

        let policy = pick_level(&mut rng, &config.compensation.levels)?;
        let low = whole_dollars(policy.min_compensation)?;
        let high = whole_dollars(policy.max_compensation)?.max(low);
        let annual_compensation = Decimal::from(rng.random_range(low..=high));

        let eligibility_date = hire_date
            .checked_add_days(Days::new(u64::from(plan.eligibility_waiting_days)))
            .ok_or_else(|| census_error(format!("eligibility date overflows for {hire_date}")))?;
        let is_eligible = eligibility_date < census_date
            && whole_years_between(birth_date, census_date) >= plan.minimum_age;
        let is_enrolled = is_eligible && rng.random_bool(PARTICIPATION_RATE);
        let deferral_rate = if is_enrolled {
            Decimal::new(rng.random_range(1..=10), 2)
        } else {
            Decimal::ZERO
        };

        employees.push(BaselineEmployee {
            employee_id: EmployeeId::new(format!("EMP_{i:06}")),
            birth_date,
            hire_date,
            level: policy.level,
            annual_compensation,
            is_eligible,
            eligibility_date: is_eligible.then_some(eligibility_date),
            is_enrolled,
            enrollment_date: is_enrolled.then_some(eligibility_date),
            deferral_rate,
        });
    }

    info!(
        employees = employees.len(),
        eligible = employees.iter().filter(|e| e.is_eligible).count(),
        enrolled = employees.iter().filter(|e| e.is_enrolled).count(),
        seed = config.census.seed,
        "Synthetic census generated"
    );
    Ok(employees)
}
