//! Configuration, scheduling and the staged multi-year pipeline for the
//! workforce simulation.
//!
//! This crate owns the per-year stage sequence that turns a baseline
//! census into simulated history: Initialization, Foundation, Event
//! Generation, State Accumulation, Validation and Reporting. Years run in
//! order, each gated on the previous year's accumulated state, with a
//! checkpoint after every stage.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `workforce-config.yaml` into
//!   strongly-typed structs.
//! - [`plan`] -- [`ExecutionPlan`]: validated, wave-grouped generator steps.
//! - [`pool`] -- [`WorkerPool`]: bounded concurrent generation with
//!   sequential fallback.
//! - [`monitor`] -- Resident memory sampling for the pool.
//! - [`orchestrator`] -- [`Orchestrator`]: the stage loop, checkpoints and
//!   resume.
//! - [`validation`] -- Post-accumulation data-quality checks.
//! - [`snapshot`] -- [`SnapshotMaterializer`]: the year-end workforce fact.
//! - [`manager`] -- [`RunManager`]: run, status and cancel.
//! - [`control`] -- Shared run status and cancellation.
//! - [`fingerprint`] -- SHA-256 state and configuration fingerprints.
//! - [`error`] -- [`PipelineError`].
//!
//! [`ExecutionPlan`]: plan::ExecutionPlan
//! [`WorkerPool`]: pool::WorkerPool
//! [`Orchestrator`]: orchestrator::Orchestrator
//! [`SnapshotMaterializer`]: snapshot::SnapshotMaterializer
//! [`RunManager`]: manager::RunManager
//! [`PipelineError`]: error::PipelineError

pub mod config;
pub mod control;
pub mod error;
pub mod fingerprint;
pub mod manager;
pub mod monitor;
pub mod orchestrator;
pub mod plan;
pub mod pool;
pub mod snapshot;
pub mod validation;

pub use config::{ConfigError, SimulationConfig};
pub use control::{NoOpObserver, RunControl, RunState, RunStatus, StageObserver};
pub use error::PipelineError;
pub use manager::{RunHandle, RunManager, RunRequest};
pub use orchestrator::{Orchestrator, RunOutcome};
pub use pool::WorkerPool;
