//! Run lifecycle: start, observe and cancel pipeline runs.
//!
//! Each accepted run gets its own [`Orchestrator`] and [`RunControl`] and
//! executes on a tokio task. The manager keeps the control of every run
//! still executing, plus the most recent finished ones, so callers can
//! poll status or cancel by run id.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use workforce_db::AnalyticalStore;
use workforce_types::{RunId, ScenarioId};

use crate::config::SimulationConfig;
use crate::control::{NoOpObserver, RunControl, RunStatus, StageObserver};
use crate::error::PipelineError;
use crate::orchestrator::{Orchestrator, RunOutcome};
use crate::pool::WorkerPool;

/// Finished runs kept for status queries unless configured otherwise.
pub const DEFAULT_RETAINED_RUNS: usize = 32;

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Scenario to simulate.
    pub scenario_id: ScenarioId,
    /// First simulated year.
    pub start_year: i32,
    /// Last simulated year, inclusive.
    pub end_year: i32,
    /// Continue from the scenario's latest checkpoint instead of starting
    /// at `start_year`.
    pub resume_from_checkpoint: bool,
}

impl RunRequest {
    /// Request covering the configured scenario and years.
    pub fn from_config(config: &SimulationConfig, resume_from_checkpoint: bool) -> Self {
        Self {
            scenario_id: config.simulation.scenario_id.clone(),
            start_year: config.simulation.start_year,
            end_year: config.simulation.end_year,
            resume_from_checkpoint,
        }
    }
}

/// A started run.
#[derive(Debug)]
pub struct RunHandle {
    run_id: RunId,
    control: Arc<RunControl>,
    task: JoinHandle<Result<RunOutcome, PipelineError>>,
}

impl RunHandle {
    /// The run's id.
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Ask the run to stop before its next stage.
    pub fn cancel(&self) {
        self.control.request_cancel();
    }

    /// Current status.
    pub async fn status(&self) -> RunStatus {
        self.control.status().await
    }

    /// Wait for the run to end.
    pub async fn wait(self) -> Result<RunOutcome, PipelineError> {
        self.task.await.map_err(|e| PipelineError::Worker {
            task: "pipeline",
            detail: e.to_string(),
        })?
    }
}

/// Starts runs and tracks their control state.
pub struct RunManager {
    config: SimulationConfig,
    store: Arc<dyn AnalyticalStore>,
    observer: Arc<dyn StageObserver>,
    pool: Option<WorkerPool>,
    retained_runs: usize,
    runs: Mutex<HashMap<RunId, Arc<RunControl>>>,
}

impl core::fmt::Debug for RunManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RunManager")
            .field("backend", &self.store.backend_name())
            .finish_non_exhaustive()
    }
}

impl RunManager {
    /// Manager running `config` against `store`.
    pub fn new(config: SimulationConfig, store: Arc<dyn AnalyticalStore>) -> Self {
        Self {
            config,
            store,
            observer: Arc::new(NoOpObserver),
            pool: None,
            retained_runs: DEFAULT_RETAINED_RUNS,
            runs: Mutex::new(HashMap::new()),
        }
    }

    /// Notify `observer` of every stage of every run.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn StageObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Use `pool` instead of the one the configuration describes.
    #[must_use]
    pub fn with_pool(mut self, pool: WorkerPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Keep at most `retained_runs` finished runs for status queries.
    #[must_use]
    pub const fn with_retained_runs(mut self, retained_runs: usize) -> Self {
        self.retained_runs = retained_runs;
        self
    }

    /// Validate the request and start the run on a new task.
    ///
    /// Configuration errors are returned here; everything after is
    /// reported through the handle.
    pub async fn run(&self, request: RunRequest) -> Result<RunHandle, PipelineError> {
        let mut config = self.config.clone();
        config.simulation.scenario_id = request.scenario_id;
        config.simulation.start_year = request.start_year;
        config.simulation.end_year = request.end_year;

        let mut orchestrator = Orchestrator::new(config, Arc::clone(&self.store))?;
        if let Some(pool) = &self.pool {
            orchestrator = orchestrator.with_pool(pool.clone());
        }

        let run_id = RunId::new();
        let control = Arc::new(RunControl::new(run_id, request.start_year, request.end_year));
        {
            let mut runs = self.runs.lock().await;
            evict_finished(&mut runs, self.retained_runs);
            runs.insert(run_id, Arc::clone(&control));
        }
        info!(
            %run_id,
            start_year = request.start_year,
            end_year = request.end_year,
            resume = request.resume_from_checkpoint,
            "Run accepted"
        );

        let task_control = Arc::clone(&control);
        let observer = Arc::clone(&self.observer);
        let resume = request.resume_from_checkpoint;
        let task = tokio::spawn(async move {
            task_control.mark_running().await;
            let outcome = Box::pin(orchestrator.run(
                run_id,
                resume,
                &task_control,
                observer.as_ref(),
            ))
            .await;
            if let Err(e) = &outcome {
                warn!(%run_id, error = %e, "Run ended without completing");
            }
            task_control.finish(&outcome).await;
            outcome
        });

        Ok(RunHandle {
            run_id,
            control,
            task,
        })
    }

    /// Status of a run this manager started.
    pub async fn status(&self, run_id: RunId) -> Option<RunStatus> {
        let control = self.runs.lock().await.get(&run_id).cloned()?;
        Some(control.status().await)
    }

    /// Request cancellation of a run. Returns whether the run is known.
    pub async fn cancel(&self, run_id: RunId) -> bool {
        let Some(control) = self.runs.lock().await.get(&run_id).cloned() else {
            return false;
        };
        control.request_cancel();
        info!(%run_id, "Cancellation requested");
        true
    }
}

/// Drop the oldest finished runs beyond `keep`. Run ids are time-ordered.
fn evict_finished(runs: &mut HashMap<RunId, Arc<RunControl>>, keep: usize) {
    let mut finished: Vec<RunId> = runs
        .iter()
        .filter(|(_, control)| control.is_finished())
        .map(|(run_id, _)| *run_id)
        .collect();
    let excess = finished.len().saturating_sub(keep);
    if excess == 0 {
        return;
    }
    finished.sort_unstable();
    for run_id in finished.into_iter().take(excess) {
        runs.remove(&run_id);
    }
    debug!(evicted = excess, remaining = runs.len(), "Finished runs evicted");
}
