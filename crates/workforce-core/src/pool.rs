//! Bounded worker pool for a year's event generation.
//!
//! Waves of the [`ExecutionPlan`] run one after another. Within a wave each
//! generator is a blocking task on the tokio blocking pool, admitted by a
//! semaphore sized to `max_workers`. Outputs are keyed by generator name
//! and errors are reported in plan order, so a concurrent year and a
//! sequential year produce the same drafts and fail the same way.
//!
//! The pool falls back to running the plan in registration order when
//! concurrency is disabled, when the plan carries a declaration conflict,
//! or when resident memory reaches the configured ceiling before a wave.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use workforce_generators::{EventDraft, GenerationContext, run_generator, upstream_for};

use crate::error::PipelineError;
use crate::monitor::{ProcMemoryMonitor, ResourceMonitor, under_pressure};
use crate::plan::{ExecutionPlan, PlanStep};

/// Outputs of every generator of a year, keyed by generator name.
pub type GeneratorOutputs = BTreeMap<&'static str, Arc<Vec<EventDraft>>>;

/// Why a year ran sequentially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Concurrency is switched off or limited to one worker.
    Disabled,
    /// A parallel-safe step declared dependencies.
    DependencyConflict,
    /// Resident memory reached the ceiling.
    MemoryPressure,
}

/// How a year's generators were scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Every wave ran concurrently.
    Concurrent,
    /// Some or all steps ran in plan order.
    Sequential(FallbackReason),
}

/// Result of one year's generation.
#[derive(Debug, Clone)]
pub struct GenerationRun {
    /// Drafts by generator.
    pub outputs: GeneratorOutputs,
    /// Schedule actually used.
    pub schedule: Schedule,
}

/// Bounded pool that runs an [`ExecutionPlan`].
#[derive(Clone)]
pub struct WorkerPool {
    max_workers: usize,
    memory_limit_mb: u64,
    concurrent: bool,
    monitor: Arc<dyn ResourceMonitor>,
}

impl core::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("max_workers", &self.max_workers)
            .field("memory_limit_mb", &self.memory_limit_mb)
            .field("concurrent", &self.concurrent)
            .finish_non_exhaustive()
    }
}

impl WorkerPool {
    /// Pool admitting up to `max_workers` generators at once, sampling
    /// `/proc/self/status` against `memory_limit_mb`.
    pub fn new(max_workers: usize, memory_limit_mb: u64) -> Self {
        Self {
            max_workers: max_workers.max(1),
            memory_limit_mb,
            concurrent: max_workers > 1,
            monitor: Arc::new(ProcMemoryMonitor),
        }
    }

    /// Pool that always runs the plan in registration order.
    pub fn sequential() -> Self {
        Self {
            concurrent: false,
            ..Self::new(1, 0)
        }
    }

    /// Replace the memory monitor.
    #[must_use]
    pub fn with_monitor(mut self, monitor: Arc<dyn ResourceMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Run every step of `plan` for the context's year.
    pub async fn run(
        &self,
        plan: &ExecutionPlan,
        ctx: Arc<GenerationContext>,
    ) -> Result<GenerationRun, PipelineError> {
        let mut outputs = GeneratorOutputs::new();
        let fallback = if !self.concurrent {
            Some(FallbackReason::Disabled)
        } else if plan.has_conflict() {
            warn!(
                simulation_year = ctx.simulation_year,
                demoted = ?plan.demoted(),
                "Dependency conflict in plan, generating sequentially"
            );
            Some(FallbackReason::DependencyConflict)
        } else {
            None
        };
        if let Some(reason) = fallback {
            run_in_plan_order(plan.steps(), &ctx, &mut outputs)?;
            return Ok(GenerationRun {
                outputs,
                schedule: Schedule::Sequential(reason),
            });
        }

        for (number, members) in plan.waves().iter().enumerate() {
            if under_pressure(self.monitor.as_ref(), self.memory_limit_mb) {
                warn!(
                    simulation_year = ctx.simulation_year,
                    wave = number,
                    resident_mb = self.monitor.resident_mb(),
                    limit_mb = self.memory_limit_mb,
                    "Memory ceiling reached, finishing the year sequentially"
                );
                let remaining: Vec<PlanStep> = plan
                    .steps()
                    .iter()
                    .filter(|s| !outputs.contains_key(s.generator.name()))
                    .cloned()
                    .collect();
                run_in_plan_order(&remaining, &ctx, &mut outputs)?;
                return Ok(GenerationRun {
                    outputs,
                    schedule: Schedule::Sequential(FallbackReason::MemoryPressure),
                });
            }
            let steps: Vec<&PlanStep> =
                members.iter().filter_map(|&i| plan.steps().get(i)).collect();
            if let [only] = steps.as_slice() {
                run_in_plan_order(std::slice::from_ref(*only), &ctx, &mut outputs)?;
            } else {
                self.run_wave(&steps, &ctx, &mut outputs).await?;
            }
            debug!(
                simulation_year = ctx.simulation_year,
                wave = number,
                steps = steps.len(),
                "Wave complete"
            );
        }
        info!(
            simulation_year = ctx.simulation_year,
            waves = plan.waves().len(),
            workers = self.max_workers,
            "Generation ran concurrently"
        );
        Ok(GenerationRun {
            outputs,
            schedule: Schedule::Concurrent,
        })
    }

    async fn run_wave(
        &self,
        steps: &[&PlanStep],
        ctx: &Arc<GenerationContext>,
        outputs: &mut GeneratorOutputs,
    ) -> Result<(), PipelineError> {
        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut tasks = JoinSet::new();
        for (position, step) in steps.iter().enumerate() {
            let generator = Arc::clone(&step.generator);
            let upstream = upstream_for(generator.as_ref(), outputs);
            let ctx = Arc::clone(ctx);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let name = generator.name();
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => tokio::task::spawn_blocking(move || {
                        run_generator(generator.as_ref(), &ctx, &upstream)
                    })
                    .await
                    .map_err(|e| PipelineError::Worker {
                        task: name,
                        detail: e.to_string(),
                    })
                    .and_then(|drafts| drafts.map_err(PipelineError::from)),
                    Err(e) => Err(PipelineError::Worker {
                        task: name,
                        detail: e.to_string(),
                    }),
                };
                (position, name, result)
            });
        }

        let mut finished = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (position, name, result) = joined.map_err(|e| PipelineError::Worker {
                task: "worker",
                detail: e.to_string(),
            })?;
            finished.insert(position, (name, result));
        }
        // Position order is plan order.
        for (name, result) in finished.into_values() {
            outputs.insert(name, Arc::new(result?));
        }
        Ok(())
    }
}

fn run_in_plan_order(
    steps: &[PlanStep],
    ctx: &GenerationContext,
    outputs: &mut GeneratorOutputs,
) -> Result<(), PipelineError> {
    for step in steps {
        let upstream = upstream_for(step.generator.as_ref(), outputs);
        let drafts = run_generator(step.generator.as_ref(), ctx, &upstream)?;
        outputs.insert(step.generator.name(), Arc::new(drafts));
    }
    Ok(())
}

/// Concatenate the outputs in plan order.
pub fn merge_in_plan_order(plan: &ExecutionPlan, outputs: &GeneratorOutputs) -> Vec<EventDraft> {
    plan.steps()
        .iter()
        .filter_map(|s| outputs.get(s.generator.name()))
        .flat_map(|drafts| drafts.iter().cloned())
        .collect()
}
