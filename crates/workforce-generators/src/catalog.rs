//! The default generator set, in plan order.

use std::sync::Arc;

use crate::families::{
    DeferralEscalationGenerator, EligibilityGenerator, EnrollmentGenerator,
    ExperiencedTerminationGenerator, HireGenerator, NewHireTerminationGenerator,
    PromotionGenerator, RaiseGenerator,
};
use crate::generator::EventGenerator;

/// Every generator family, each listed after all of its dependencies.
pub fn default_generators() -> Vec<Arc<dyn EventGenerator>> {
    vec![
        Arc::new(ExperiencedTerminationGenerator),
        Arc::new(HireGenerator),
        Arc::new(PromotionGenerator),
        Arc::new(DeferralEscalationGenerator),
        Arc::new(NewHireTerminationGenerator),
        Arc::new(RaiseGenerator),
        Arc::new(EligibilityGenerator),
        Arc::new(EnrollmentGenerator),
    ]
}
