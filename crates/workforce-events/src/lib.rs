//! Event store for the workforce simulation.
//!
//! Every change to an employee's situation is an immutable
//! [`SimulationEvent`](workforce_types::SimulationEvent). Events are the
//! source of truth: accumulated state is a fold over them. This crate owns
//! the event table, validates events before they are written, and gives
//! per-year replace semantics so a year can be re-run idempotently.
//!
//! # Modules
//!
//! - [`store`] -- [`EventStore`] append / query / delete
//! - [`schema`] -- Per-event validation rules
//! - [`error`] -- [`EventStoreError`]

pub mod error;
pub mod schema;
pub mod store;

pub use error::EventStoreError;
pub use schema::{SchemaViolation, validate_event};
pub use store::EventStore;
