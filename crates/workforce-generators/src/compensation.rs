//! Time-weighted (prorated) compensation.
//!
//! Salary earned in a year is the sum over the sub-periods between
//! successive pay changes of `salary * days_in_period / 365`, counting only
//! days the employee was on payroll. Both period ends are inclusive, so a
//! full common year at a constant salary earns exactly that salary. A leap
//! year has one extra paid day.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use workforce_types::calendar::{year_end, year_start};

use crate::error::GeneratorError;
use crate::numeric::{add, div, mul, round_money};

/// Divisor of every period weight, leap years included.
const DAYS_PER_YEAR: i64 = 365;

/// A new annual salary taking effect on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryChange {
    /// First day the new salary is paid.
    pub effective_date: NaiveDate,
    /// New annual salary.
    pub annual_compensation: Decimal,
}

/// Salary actually earned during `simulation_year`.
///
/// `initial` is the annual salary in force on `employed_from`. Changes
/// dated outside the employment window are ignored, except that a change
/// on or before `employed_from` replaces `initial`. Returns zero when the
/// window does not intersect the year.
pub fn time_weighted_compensation(
    simulation_year: i32,
    initial: Decimal,
    employed_from: NaiveDate,
    employed_to: NaiveDate,
    changes: &[SalaryChange],
) -> Result<Decimal, GeneratorError> {
    let from = employed_from.max(year_start(simulation_year)?);
    let to = employed_to.min(year_end(simulation_year)?);
    if to < from {
        return Ok(Decimal::ZERO);
    }

    let mut ordered: Vec<SalaryChange> = changes.to_vec();
    ordered.sort_by_key(|c| c.effective_date);

    let mut earned = Decimal::ZERO;
    let mut salary = initial;
    let mut cursor = from;
    for change in ordered {
        if change.effective_date <= cursor {
            salary = change.annual_compensation;
            continue;
        }
        if change.effective_date > to {
            break;
        }
        let days = Decimal::from(change.effective_date.signed_duration_since(cursor).num_days());
        earned = add(earned, mul(salary, days, "salary period")?, "earned salary")?;
        cursor = change.effective_date;
        salary = change.annual_compensation;
    }
    let tail_days = to
        .signed_duration_since(cursor)
        .num_days()
        .checked_add(1)
        .ok_or_else(|| GeneratorError::overflow("final salary period"))?;
    earned = add(
        earned,
        mul(salary, Decimal::from(tail_days), "final salary period")?,
        "earned salary",
    )?;

    Ok(round_money(div(
        earned,
        Decimal::from(DAYS_PER_YEAR),
        "prorated compensation",
    )?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn full_year_at_constant_salary() {
        let earned =
            time_weighted_compensation(2025, dec!(50000), d(2020, 1, 1), d(2030, 1, 1), &[])
                .unwrap();
        assert_eq!(earned, dec!(50000.00));
    }

    #[test]
    fn mid_year_raise_splits_the_year() {
        let raise = SalaryChange {
            effective_date: d(2025, 7, 1),
            annual_compensation: dec!(60000),
        };
        let earned =
            time_weighted_compensation(2025, dec!(50000), d(2020, 1, 1), d(2025, 12, 31), &[raise])
                .unwrap();
        // (50000 * 181 + 60000 * 184) / 365
        assert_eq!(earned, dec!(55041.10));
    }

    #[test]
    fn new_hire_earns_from_hire_date() {
        let earned =
            time_weighted_compensation(2025, dec!(73000), d(2025, 10, 1), d(2025, 12, 31), &[])
                .unwrap();
        assert_eq!(earned, dec!(18400.00));
    }

    #[test]
    fn termination_stops_earnings_and_later_changes_are_ignored() {
        let late_raise = SalaryChange {
            effective_date: d(2025, 7, 1),
            annual_compensation: dec!(99999),
        };
        let earned = time_weighted_compensation(
            2025,
            dec!(36500),
            d(2010, 1, 1),
            d(2025, 1, 10),
            &[late_raise],
        )
        .unwrap();
        assert_eq!(earned, dec!(1000.00));
    }

    #[test]
    fn leap_years_still_weight_by_365() {
        let last_day =
            time_weighted_compensation(2028, dec!(36500), d(2028, 12, 31), d(2028, 12, 31), &[])
                .unwrap();
        assert_eq!(last_day, dec!(100.00));

        let whole_year =
            time_weighted_compensation(2028, dec!(36500), d(2020, 1, 1), d(2030, 1, 1), &[])
                .unwrap();
        assert_eq!(whole_year, dec!(36600.00));
    }

    #[test]
    fn window_outside_year_earns_nothing() {
        let earned =
            time_weighted_compensation(2025, dec!(50000), d(2026, 1, 1), d(2026, 5, 1), &[])
                .unwrap();
        assert_eq!(earned, Decimal::ZERO);
    }
}
