//! Persistence for pipeline checkpoints.
//!
//! One row per (run, year, stage) in the `run_checkpoints` table. Rows are
//! only ever appended; the latest checkpoint of a scenario is the one with
//! the highest (year, stage) pair.

use serde_json::Value;
use workforce_types::{Checkpoint, ScenarioId};

use crate::error::DbError;
use crate::statement::Filter;
use crate::store::{AnalyticalStore, insert, select};
use crate::tables::RUN_CHECKPOINTS;

/// Operations on the `run_checkpoints` table.
pub struct CheckpointStore<'a> {
    store: &'a dyn AnalyticalStore,
}

impl<'a> CheckpointStore<'a> {
    /// Create a checkpoint store over an analytical store.
    pub const fn new(store: &'a dyn AnalyticalStore) -> Self {
        Self { store }
    }

    /// Persist a checkpoint.
    pub async fn save(&self, checkpoint: &Checkpoint) -> Result<(), DbError> {
        insert(self.store, RUN_CHECKPOINTS, std::slice::from_ref(checkpoint)).await?;
        tracing::debug!(
            run_id = %checkpoint.run_id,
            simulation_year = checkpoint.simulation_year,
            stage = %checkpoint.stage,
            "Checkpoint saved"
        );
        Ok(())
    }

    /// All checkpoints of a scenario, in write order.
    pub async fn history(&self, scenario_id: &ScenarioId) -> Result<Vec<Checkpoint>, DbError> {
        select(
            self.store,
            RUN_CHECKPOINTS,
            Filter::all().with_eq("scenario_id", Value::from(scenario_id.as_str())),
        )
        .await
    }

    /// The most advanced checkpoint of a scenario, if any.
    pub async fn latest(&self, scenario_id: &ScenarioId) -> Result<Option<Checkpoint>, DbError> {
        let history = self.history(scenario_id).await?;
        Ok(history
            .into_iter()
            .max_by_key(|c| (c.simulation_year, c.stage.index(), c.timestamp)))
    }
}
