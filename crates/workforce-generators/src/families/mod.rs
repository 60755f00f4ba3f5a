//! The generator families, one module per family.
//!
//! Each family is a unit struct implementing
//! [`EventGenerator`](crate::generator::EventGenerator). Names are the
//! stable keys used in dependency declarations and in the execution plan.

pub mod deferral_escalation;
pub mod eligibility;
pub mod enrollment;
pub mod experienced_termination;
pub mod hire;
pub mod new_hire_termination;
pub mod promotion;
pub mod raise;

pub use deferral_escalation::DeferralEscalationGenerator;
pub use eligibility::EligibilityGenerator;
pub use enrollment::EnrollmentGenerator;
pub use experienced_termination::ExperiencedTerminationGenerator;
pub use hire::HireGenerator;
pub use new_hire_termination::NewHireTerminationGenerator;
pub use promotion::PromotionGenerator;
pub use raise::RaiseGenerator;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use crate::error::GeneratorError;
use crate::numeric::scale_draw;

/// A date in `[from, to]` chosen by `draw`. Returns `from` when the range
/// is empty.
pub(crate) fn date_between(
    draw: Decimal,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<NaiveDate, GeneratorError> {
    let span = to.signed_duration_since(from).num_days();
    let Ok(span) = u32::try_from(span) else {
        return Ok(from);
    };
    let offset = scale_draw(draw, span.saturating_add(1));
    from.checked_add_days(Days::new(u64::from(offset)))
        .ok_or_else(|| GeneratorError::overflow("drawn date"))
}
