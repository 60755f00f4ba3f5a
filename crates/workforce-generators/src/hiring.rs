//! Hiring plan.
//!
//! Hires replace experienced terminations, add the growth target, and
//! over-hire for the new hires expected to leave in the same year:
//!
//! ```text
//! total_hires = ceil((experienced_terminations + growth_target)
//!                    / (1 - new_hire_termination_rate))
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;
use crate::numeric::{ceil_count, div, mul, round_count, sub};

/// Hires needed to reach the growth target.
pub fn total_hires(
    experienced_terminations: u64,
    growth_target: u64,
    new_hire_termination_rate: Decimal,
) -> Result<u64, GeneratorError> {
    if new_hire_termination_rate < Decimal::ZERO || new_hire_termination_rate >= Decimal::ONE {
        return Err(GeneratorError::InvalidParameters {
            reason: format!(
                "new_hire_termination_rate must be within [0, 1), got {new_hire_termination_rate}"
            ),
        });
    }
    let needed = Decimal::from(experienced_terminations)
        .checked_add(Decimal::from(growth_target))
        .ok_or_else(|| GeneratorError::overflow("hiring need"))?;
    let retained = sub(Decimal::ONE, new_hire_termination_rate, "retention rate")?;
    ceil_count(div(needed, retained, "total hires")?, "total hires")
}

/// New hires who leave in their hire year.
pub fn new_hire_terminations(
    total_hires: u64,
    new_hire_termination_rate: Decimal,
) -> Result<u64, GeneratorError> {
    round_count(
        mul(
            Decimal::from(total_hires),
            new_hire_termination_rate,
            "new hire terminations",
        )?,
        "new hire terminations",
    )
}

/// The year's hiring plan, computed in the Foundation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiringPlan {
    /// Active headcount entering the year.
    pub starting_headcount: u64,
    /// Experienced terminations the planning rate predicts.
    pub expected_experienced_terminations: u64,
    /// Net headcount growth to achieve.
    pub growth_target: u64,
    /// Hires needed if terminations land exactly as expected.
    pub total_hires: u64,
    /// New hires expected to leave in the same year.
    pub expected_new_hire_terminations: u64,
    /// Rate used for new-hire terminations.
    pub new_hire_termination_rate: Decimal,
}

impl HiringPlan {
    /// Plan a year from the starting headcount and the configured rates.
    pub fn from_rates(
        starting_headcount: u64,
        termination_rate: Decimal,
        growth_rate: Decimal,
        new_hire_termination_rate: Decimal,
    ) -> Result<Self, GeneratorError> {
        let headcount = Decimal::from(starting_headcount);
        let expected_experienced_terminations = round_count(
            mul(headcount, termination_rate, "expected terminations")?,
            "expected terminations",
        )?;
        let growth_target =
            round_count(mul(headcount, growth_rate, "growth target")?, "growth target")?;
        let total = total_hires(
            expected_experienced_terminations,
            growth_target,
            new_hire_termination_rate,
        )?;
        Ok(Self {
            starting_headcount,
            expected_experienced_terminations,
            growth_target,
            total_hires: total,
            expected_new_hire_terminations: new_hire_terminations(
                total,
                new_hire_termination_rate,
            )?,
            new_hire_termination_rate,
        })
    }

    /// Hires needed given the experienced terminations that actually occurred.
    pub fn hires_for(&self, experienced_terminations: u64) -> Result<u64, GeneratorError> {
        total_hires(
            experienced_terminations,
            self.growth_target,
            self.new_hire_termination_rate,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn thousand_employees_need_two_hundred_hires() {
        let plan = HiringPlan::from_rates(1000, dec!(0.12), dec!(0.03), dec!(0.25)).unwrap();
        assert_eq!(plan.expected_experienced_terminations, 120);
        assert_eq!(plan.growth_target, 30);
        assert_eq!(plan.total_hires, 200);
        assert_eq!(plan.expected_new_hire_terminations, 50);
    }

    #[test]
    fn fractional_need_rounds_up() {
        assert_eq!(total_hires(121, 30, dec!(0.25)).ok(), Some(202));
    }

    #[test]
    fn certain_new_hire_attrition_is_rejected() {
        assert!(matches!(
            total_hires(10, 10, Decimal::ONE),
            Err(GeneratorError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn hires_follow_actual_terminations() {
        let plan = HiringPlan::from_rates(1000, dec!(0.12), dec!(0.03), dec!(0.25));
        assert_eq!(plan.and_then(|p| p.hires_for(90)).ok(), Some(160));
    }
}
