//! The prior workforce as generators see it.
//!
//! Foundation builds one [`WorkforceMember`] per employee active at the start
//! of the year: from the baseline census at the start year, otherwise from
//! the joined year-(N-1) accumulator rows.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use workforce_types::calendar::whole_years_between;
use workforce_types::{BaselineEmployee, EmployeeId, EnrollmentMethod, EnrollmentStatus};

/// An employee on payroll entering the simulated year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkforceMember {
    /// Employee identifier.
    pub employee_id: EmployeeId,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Original hire date.
    pub hire_date: NaiveDate,
    /// Job level entering the year.
    pub level: u8,
    /// Annual salary entering the year.
    pub annual_compensation: Decimal,
    /// Whether plan eligibility has been met.
    pub is_eligible: bool,
    /// Date eligibility was met.
    pub eligibility_date: Option<NaiveDate>,
    /// Plan participation status.
    pub enrollment_status: EnrollmentStatus,
    /// How the employee enrolled, if ever.
    pub enrollment_method: Option<EnrollmentMethod>,
    /// Date of enrollment.
    pub enrollment_date: Option<NaiveDate>,
    /// Deferral rate entering the year.
    pub deferral_rate: Decimal,
    /// Escalations received so far.
    pub escalation_count: u32,
}

impl WorkforceMember {
    /// Member seeded from a census row.
    pub fn from_baseline(employee: &BaselineEmployee) -> Self {
        let enrollment_status = if employee.is_enrolled {
            EnrollmentStatus::Enrolled
        } else if employee.is_eligible {
            EnrollmentStatus::EligibleNotEnrolled
        } else {
            EnrollmentStatus::NotEligible
        };
        Self {
            employee_id: employee.employee_id.clone(),
            birth_date: employee.birth_date,
            hire_date: employee.hire_date,
            level: employee.level,
            annual_compensation: employee.annual_compensation,
            is_eligible: employee.is_eligible || employee.is_enrolled,
            eligibility_date: employee.eligibility_date,
            enrollment_status,
            enrollment_method: employee.is_enrolled.then_some(EnrollmentMethod::Baseline),
            enrollment_date: employee.enrollment_date,
            deferral_rate: if employee.is_enrolled {
                employee.deferral_rate
            } else {
                Decimal::ZERO
            },
            escalation_count: 0,
        }
    }

    /// Age in whole years on `at`.
    pub fn age_at(&self, at: NaiveDate) -> u32 {
        whole_years_between(self.birth_date, at)
    }

    /// Completed years of service on `at`.
    pub fn tenure_at(&self, at: NaiveDate) -> u32 {
        whole_years_between(self.hire_date, at)
    }

    /// Whether the member is currently deferring.
    pub fn is_enrolled(&self) -> bool {
        self.enrollment_status == EnrollmentStatus::Enrolled
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn census(is_eligible: bool, is_enrolled: bool) -> BaselineEmployee {
        BaselineEmployee {
            employee_id: EmployeeId::new("EMP_000001"),
            birth_date: NaiveDate::from_ymd_opt(1985, 3, 9).unwrap_or_default(),
            hire_date: NaiveDate::from_ymd_opt(2015, 6, 1).unwrap_or_default(),
            level: 2,
            annual_compensation: dec!(72000),
            is_eligible,
            eligibility_date: None,
            is_enrolled,
            enrollment_date: None,
            deferral_rate: dec!(0.05),
        }
    }

    #[test]
    fn census_flags_map_to_enrollment_status() {
        assert_eq!(
            WorkforceMember::from_baseline(&census(false, false)).enrollment_status,
            EnrollmentStatus::NotEligible
        );
        assert_eq!(
            WorkforceMember::from_baseline(&census(true, false)).enrollment_status,
            EnrollmentStatus::EligibleNotEnrolled
        );
        let enrolled = WorkforceMember::from_baseline(&census(true, true));
        assert_eq!(enrolled.enrollment_status, EnrollmentStatus::Enrolled);
        assert_eq!(enrolled.enrollment_method, Some(EnrollmentMethod::Baseline));
        assert_eq!(enrolled.deferral_rate, dec!(0.05));
    }

    #[test]
    fn non_participants_carry_no_deferral_rate() {
        assert_eq!(
            WorkforceMember::from_baseline(&census(true, false)).deferral_rate,
            Decimal::ZERO
        );
    }

    #[test]
    fn age_and_tenure_are_whole_years() {
        let member = WorkforceMember::from_baseline(&census(false, false));
        let at = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
        assert_eq!(member.age_at(at), 39);
        assert_eq!(member.tenure_at(at), 9);
    }
}
