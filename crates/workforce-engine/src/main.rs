//! Engine binary for the workforce simulation.
//!
//! Loads configuration, opens the analytical store, seeds a synthetic
//! baseline census when none is loaded, and runs the multi-year pipeline
//! until every configured year is reported or the run fails.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `workforce-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Open the configured store behind the retry wrapper
//! 4. Seed the baseline census if the store has none
//! 5. Start the run (`--resume` continues from the latest checkpoint)
//! 6. Log the yearly summaries

mod census;
mod error;
mod store;

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use workforce_core::{RunManager, RunRequest, SimulationConfig};
use workforce_types::ToStructured;

use crate::error::EngineError;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the run itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet; it reads its level
    //    from the config.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config);
    info!(
        scenario_id = %config.simulation.scenario_id,
        plan_design_id = %config.simulation.plan_design_id,
        start_year = config.simulation.start_year,
        end_year = config.simulation.end_year,
        seed = config.simulation.seed,
        backend = %config.infrastructure.backend,
        "Configuration loaded"
    );

    // 3. Open the store.
    let store = store::open(&config).await?;

    // 4. Seed the census.
    store::ensure_baseline(store.as_ref(), &config).await?;

    // 5. Start the run.
    let resume = std::env::args().skip(1).any(|arg| arg == "--resume");
    let request = RunRequest::from_config(&config, resume);
    let manager = Arc::new(RunManager::new(config, store));
    let handle = manager.run(request).await.map_err(EngineError::from)?;
    let run_id = handle.run_id();

    let signal_manager = Arc::clone(&manager);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!(%run_id, "Interrupt received, cancelling after the current stage");
            signal_manager.cancel(run_id).await;
        }
    });

    // 6. Log results.
    match handle.wait().await {
        Ok(outcome) => {
            for summary in &outcome.summaries {
                info!(
                    simulation_year = summary.simulation_year,
                    active_headcount = summary.active_headcount,
                    hires = summary.hires,
                    experienced_terminations = summary.experienced_terminations,
                    new_hire_terminations = summary.new_hire_terminations,
                    participation_rate = %summary.participation_rate,
                    total_compensation = %summary.total_compensation,
                    total_employee_deferrals = %summary.total_employee_deferrals,
                    total_employer_contributions = %summary.total_employer_contributions,
                    "Year summary"
                );
            }
            info!(
                %run_id,
                years = outcome.summaries.len(),
                resumed_from_year = outcome.resumed_from.as_ref().map(|c| c.simulation_year),
                "workforce-engine shutdown complete"
            );
            Ok(())
        }
        Err(e) => {
            let err = EngineError::from(e);
            let structured = err.to_structured();
            tracing::error!(
                %run_id,
                error_code = %structured.error_code,
                hint = %structured.resolution_hint,
                context = %structured.context,
                "Run failed: {}",
                structured.message
            );
            Err(err.into())
        }
    }
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level`; `logging.json` switches to JSON
/// lines.
fn init_logging(config: &SimulationConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load the simulation configuration from `workforce-config.yaml`.
///
/// Looks for the config file relative to the current working directory.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config_path = Path::new("workforce-config.yaml");
    let config = if config_path.exists() {
        SimulationConfig::from_file(config_path)?
    } else {
        SimulationConfig::parse("")?
    };
    config.validate()?;
    Ok(config)
}
