//! Data layer for the workforce simulation.
//!
//! Every component reads and writes through the [`AnalyticalStore`] trait, a
//! generic execute interface over JSON rows. Two backends implement it:
//!
//! ```text
//! Pipeline stages
//!     |
//!     +-- RetryingStore (bounded backoff on lock contention)
//!         |
//!         +-- MemoryStore    (tests, local runs)
//!         +-- PostgresStore  (sim_rows JSONB table, UNNEST batch inserts)
//! ```
//!
//! # Modules
//!
//! - [`statement`] -- Rows, filters and statements
//! - [`store`] -- The [`AnalyticalStore`] trait and typed helpers
//! - [`memory`] -- In-memory backend
//! - [`postgres`] -- `PostgreSQL` connection pool and backend
//! - [`retry`] -- Exponential backoff wrapper
//! - [`checkpoint_store`] -- Pipeline checkpoint persistence
//! - [`tables`] -- Shared table names
//! - [`error`] -- Shared error types

pub mod checkpoint_store;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod retry;
pub mod statement;
pub mod store;
pub mod tables;

// Re-export primary types for convenience.
pub use checkpoint_store::CheckpointStore;
pub use error::DbError;
pub use memory::{MemoryStore, StatementRecord};
pub use postgres::{PostgresConfig, PostgresPool, PostgresStore};
pub use retry::{RetryPolicy, RetryingStore};
pub use statement::{Filter, Row, Statement};
pub use store::AnalyticalStore;
