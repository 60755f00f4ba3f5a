//! State accumulators for the workforce simulation.
//!
//! An accumulator turns one year's events into point-in-time employee
//! state, one row per employee and year in a table it alone owns. Year N
//! reads only the accumulator's own year N-1 rows (or the baseline census
//! at the start year) plus year N events, so state can never run ahead of
//! the year it describes.
//!
//! ```text
//!   baseline_workforce ──(start year)──┐
//!                                      ▼
//!   year N-1 own rows ───────────► fold ◄─── year N events
//!                                      │
//!                                      ▼
//!                          year N own rows (replace-year)
//! ```
//!
//! # Modules
//!
//! - [`accumulator`] -- [`Accumulator`] / [`StateAccumulator`] traits and the fold
//! - [`employment`], [`enrollment`], [`deferral`] -- The registered accumulators
//! - [`registry`] -- [`AccumulatorRegistry`] and contract validation
//! - [`validator`] -- [`YearDependencyValidator`]
//! - [`error`] -- Error types

pub mod accumulator;
pub mod deferral;
pub mod employment;
pub mod enrollment;
pub mod error;
pub mod registry;
pub mod validator;

pub use accumulator::{Accumulator, FoldInput, StateAccumulator, Typed, erase, fold_year};
pub use deferral::{DeferralAttributes, DeferralRateAccumulator};
pub use employment::{EmploymentAccumulator, EmploymentAttributes};
pub use enrollment::{EnrollmentAccumulator, EnrollmentAttributes};
pub use error::{AccumulatorError, DependencyGap, RegistryError, YearDependencyError};
pub use registry::{AccumulatorRegistry, validate_contract};
pub use validator::YearDependencyValidator;
