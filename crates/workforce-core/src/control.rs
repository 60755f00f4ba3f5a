//! Run control state shared between a pipeline task and its callers.
//!
//! The pipeline reads the cancel flag between stages and publishes its
//! position after every checkpoint. Callers read a [`RunStatus`] snapshot
//! and may request cancellation at any time; the run stops before its next
//! stage.

use std::sync::atomic::{AtomicBool, Ordering};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use workforce_types::{Checkpoint, PipelineStage, RunId, StructuredError, ToStructured};

use crate::error::PipelineError;

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Accepted, not started.
    Pending,
    /// Executing stages.
    Running,
    /// Every year completed.
    Completed,
    /// Ended with an error.
    Failed,
    /// Stopped by a cancel request.
    Cancelled,
}

impl RunState {
    /// Whether the run has ended.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Point-in-time view of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatus {
    /// Run described.
    pub run_id: RunId,
    /// Lifecycle state.
    pub state: RunState,
    /// Last completed stage, or the stage that failed.
    pub stage: Option<PipelineStage>,
    /// Year of `stage`.
    pub simulation_year: Option<i32>,
    /// Completed fraction of all stages of all years, four decimal places.
    pub progress: Decimal,
    /// Why the run failed or was cancelled.
    pub error: Option<StructuredError>,
}

/// Shared control and status of one run.
#[derive(Debug)]
pub struct RunControl {
    cancel_requested: AtomicBool,
    finished: AtomicBool,
    start_year: i32,
    total_stages: u64,
    status: Mutex<RunStatus>,
}

impl RunControl {
    /// Control for a run over `start_year..=end_year`.
    pub fn new(run_id: RunId, start_year: i32, end_year: i32) -> Self {
        let years =
            u64::try_from(end_year.saturating_sub(start_year).saturating_add(1)).unwrap_or(0);
        let per_year = u64::try_from(PipelineStage::ALL.len()).unwrap_or(u64::MAX);
        Self {
            cancel_requested: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            start_year,
            total_stages: years.saturating_mul(per_year),
            status: Mutex::new(RunStatus {
                run_id,
                state: RunState::Pending,
                stage: None,
                simulation_year: None,
                progress: Decimal::ZERO,
                error: None,
            }),
        }
    }

    /// Ask the run to stop before its next stage.
    pub fn request_cancel(&self) {
        self.cancel_requested.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }

    /// Whether [`finish`](Self::finish) has recorded an outcome.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Current status.
    pub async fn status(&self) -> RunStatus {
        self.status.lock().await.clone()
    }

    /// Mark the run as started.
    pub async fn mark_running(&self) {
        self.status.lock().await.state = RunState::Running;
    }

    /// Record a completed stage.
    pub async fn record_stage(&self, simulation_year: i32, stage: PipelineStage) {
        let progress = self.progress_after(simulation_year, stage);
        let mut status = self.status.lock().await;
        status.stage = Some(stage);
        status.simulation_year = Some(simulation_year);
        status.progress = progress;
    }

    /// Record the run's outcome.
    pub async fn finish<T>(&self, outcome: &Result<T, PipelineError>) {
        let mut status = self.status.lock().await;
        match outcome {
            Ok(_) => {
                status.state = RunState::Completed;
                status.progress = Decimal::ONE;
            }
            Err(e) => {
                status.state = if e.is_cancelled() {
                    RunState::Cancelled
                } else {
                    RunState::Failed
                };
                if let Some((simulation_year, stage)) = e.failed_at() {
                    status.stage = Some(stage);
                    status.simulation_year = Some(simulation_year);
                }
                status.error = Some(e.to_structured());
            }
        }
        self.finished.store(true, Ordering::Release);
    }

    fn progress_after(&self, simulation_year: i32, stage: PipelineStage) -> Decimal {
        let per_year = u64::try_from(PipelineStage::ALL.len()).unwrap_or(u64::MAX);
        let years_done =
            u64::try_from(simulation_year.saturating_sub(self.start_year)).unwrap_or(0);
        let stage_done = u64::try_from(stage.index()).unwrap_or(0).saturating_add(1);
        let done = years_done.saturating_mul(per_year).saturating_add(stage_done);
        Decimal::from(done.min(self.total_stages))
            .checked_div(Decimal::from(self.total_stages))
            .map_or(Decimal::ZERO, |p| p.round_dp(4))
    }
}

/// Notified after every checkpoint is saved.
pub trait StageObserver: Send + Sync {
    /// Called with the checkpoint of a completed stage.
    fn on_stage(&self, checkpoint: &Checkpoint);
}

/// Observer that ignores every stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl StageObserver for NoOpObserver {
    fn on_stage(&self, _checkpoint: &Checkpoint) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[tokio::test]
    async fn progress_counts_stages_across_years() {
        let control = RunControl::new(RunId::new(), 2025, 2026);
        control.mark_running().await;
        control.record_stage(2025, PipelineStage::Reporting).await;
        let status = control.status().await;
        assert_eq!(status.state, RunState::Running);
        assert_eq!(status.progress, dec!(0.5));

        control.record_stage(2026, PipelineStage::Initialization).await;
        assert_eq!(control.status().await.progress, dec!(0.5833));
    }

    #[tokio::test]
    async fn cancellation_is_terminal_with_error() {
        let control = RunControl::new(RunId::new(), 2025, 2025);
        control.request_cancel();
        assert!(control.is_cancel_requested());
        let outcome: Result<(), PipelineError> = Err(PipelineError::Cancelled {
            simulation_year: 2025,
            stage: PipelineStage::Foundation,
        });
        control.finish(&outcome).await;
        let status = control.status().await;
        assert_eq!(status.state, RunState::Cancelled);
        assert!(status.state.is_terminal());
        assert!(status.error.is_some());
    }

    #[tokio::test]
    async fn failure_records_the_stage_that_failed() {
        let control = RunControl::new(RunId::new(), 2025, 2026);
        control.mark_running().await;
        control.record_stage(2025, PipelineStage::Foundation).await;
        let outcome: Result<(), PipelineError> = Err(PipelineError::DataQuality {
            simulation_year: 2025,
            check: "headcount",
            detail: "off by one".to_owned(),
        }
        .at_stage(2025, PipelineStage::EventGeneration));
        control.finish(&outcome).await;
        let status = control.status().await;
        assert_eq!(status.state, RunState::Failed);
        assert_eq!(status.stage, Some(PipelineStage::EventGeneration));
        assert_eq!(status.simulation_year, Some(2025));
        assert_eq!(status.progress, dec!(0.1667));
    }
}
