//! Event generators and the numeric policies of the workforce simulation.
//!
//! Each simulated year, a fixed set of generators turns the prior workforce
//! and the read-only parameter tables into the year's business events.
//! Generation is reproducible: every random decision is a stable hash of
//! `(seed, employee, year, decision family)` mapped into `[0, 1)`, so the
//! same inputs always produce the same events, whatever the schedule.
//!
//! # Modules
//!
//! - [`generator`] -- [`EventGenerator`] trait, context, year assembly
//! - [`families`] -- The eight generator families
//! - [`catalog`] -- [`default_generators`] in plan order
//! - [`params`] -- Hazard tables, pay policy, plan design, statutory limits
//! - [`hiring`] -- Hiring plan and the total-hires formula
//! - [`compensation`] -- Time-weighted compensation
//! - [`contributions`] -- Deferrals, match and core, with limit clamping
//! - [`hash`] -- Stable uniform draws
//! - [`numeric`] -- Checked decimal arithmetic and rounding
//!
//! # Generators
//!
//! | Generator | Emits | Depends on |
//! |-----------|-------|-----------|
//! | `experienced_termination` | Termination | -- |
//! | `hire` | Hire | `experienced_termination` |
//! | `promotion` | Promotion | `experienced_termination` |
//! | `deferral_escalation` | `DeferralEscalation` | `experienced_termination` |
//! | `new_hire_termination` | Termination | `hire` |
//! | `raise` | Raise | `experienced_termination`, `promotion` |
//! | `eligibility` | Eligibility | `hire`, both terminations |
//! | `enrollment` | Enrollment, `EnrollmentOptOut` | `eligibility`, both terminations |

pub mod catalog;
pub mod compensation;
pub mod contributions;
pub mod error;
pub mod families;
pub mod generator;
pub mod hash;
pub mod hiring;
pub mod numeric;
pub mod params;
pub mod workforce;

pub use catalog::default_generators;
pub use compensation::{SalaryChange, time_weighted_compensation};
pub use contributions::{ContributionCalculator, ContributionInput};
pub use error::GeneratorError;
pub use generator::{
    EventDraft, EventGenerator, ExecutionMode, GenerationContext, Upstream, assemble_year_events,
    check_declared, run_generator, run_in_order, upstream_for,
};
pub use hash::stable_uniform;
pub use hiring::{HiringPlan, new_hire_terminations, total_hires};
pub use params::{
    AgeLimit, CompensationPolicy, EscalationPolicy, GeneratorParameters, HazardEntry, HazardTable,
    LevelPolicy, LimitTable, MatchTier, PlanDesign, StatutoryLimits, WorkforcePolicy,
};
pub use workforce::WorkforceMember;
