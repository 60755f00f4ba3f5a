//! Store selection and census seeding.

use std::sync::Arc;

use tracing::info;
use workforce_core::SimulationConfig;
use workforce_db::store::{count, insert};
use workforce_db::tables::BASELINE_WORKFORCE;
use workforce_db::{
    AnalyticalStore, Filter, MemoryStore, PostgresConfig, PostgresPool, PostgresStore,
    RetryingStore,
};

use crate::census;
use crate::error::EngineError;

/// Open the configured backend behind the retry wrapper.
///
/// `postgres` connects and runs pending migrations first.
pub async fn open(config: &SimulationConfig) -> Result<Arc<dyn AnalyticalStore>, EngineError> {
    let policy = config.execution.retry.policy();
    let infra = &config.infrastructure;
    if infra.backend == "postgres" {
        let pg_config =
            PostgresConfig::new(&infra.database_url).with_max_connections(infra.max_connections);
        let pool = PostgresPool::connect(&pg_config).await?;
        pool.run_migrations().await?;
        info!(max_attempts = policy.max_attempts, "PostgreSQL store ready");
        Ok(Arc::new(RetryingStore::new(PostgresStore::new(pool), policy)))
    } else {
        info!(max_attempts = policy.max_attempts, "In-memory store ready");
        Ok(Arc::new(RetryingStore::new(MemoryStore::new(), policy)))
    }
}

/// Load a synthetic census unless the store already holds a baseline.
///
/// Returns the number of employees written.
pub async fn ensure_baseline(
    store: &dyn AnalyticalStore,
    config: &SimulationConfig,
) -> Result<usize, EngineError> {
    let existing = count(store, BASELINE_WORKFORCE, Filter::all()).await?;
    if existing > 0 {
        info!(employees = existing, "Baseline census already loaded");
        return Ok(0);
    }
    let employees = census::generate(config)?;
    insert(store, BASELINE_WORKFORCE, &employees).await?;
    info!(employees = employees.len(), table = BASELINE_WORKFORCE, "Baseline census loaded");
    Ok(employees.len())
}
