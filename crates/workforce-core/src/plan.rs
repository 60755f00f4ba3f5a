//! The execution plan of a year's event generation.
//!
//! The plan lists every generator in the order it was registered, checks
//! the declared dependencies as a whole before anything runs, and groups
//! the steps into waves. Every step of a wave depends only on steps of
//! earlier waves, so a wave may run concurrently. A [`Sequential`] step
//! forms a wave of its own and nothing after it shares an earlier wave.
//!
//! A step declared [`ParallelSafe`] that nevertheless lists dependencies is
//! a declaration conflict. It is demoted to [`Sequential`], and the worker
//! pool runs the whole year in plan order.
//!
//! [`Sequential`]: ExecutionMode::Sequential
//! [`ParallelSafe`]: ExecutionMode::ParallelSafe

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};
use workforce_generators::{EventGenerator, ExecutionMode};
use workforce_types::{ErrorCode, StructuredError, ToStructured};

/// Errors found while validating a plan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// Two steps share a name.
    #[error("step {step} is registered twice")]
    DuplicateStep {
        /// The repeated name.
        step: &'static str,
    },

    /// A step lists the same dependency twice.
    #[error("step {step} lists dependency {dependency} more than once")]
    DuplicateDependency {
        /// Offending step.
        step: &'static str,
        /// The repeated dependency.
        dependency: &'static str,
    },

    /// A step depends on itself.
    #[error("step {step} depends on itself")]
    SelfDependency {
        /// Offending step.
        step: &'static str,
    },

    /// A step depends on a name no step has.
    #[error("step {step} depends on unknown step {dependency}")]
    UnknownDependency {
        /// Offending step.
        step: &'static str,
        /// The unknown name.
        dependency: &'static str,
    },

    /// A step depends on a step registered after it.
    #[error("step {step} depends on {dependency}, which is registered after it")]
    ForwardDependency {
        /// Offending step.
        step: &'static str,
        /// The later step.
        dependency: &'static str,
    },
}

impl ToStructured for PlanError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::ConfigurationInvalid
    }

    fn to_structured(&self) -> StructuredError {
        StructuredError::new(
            self.error_code(),
            self.to_string(),
            "Register every generator after the generators it depends on, once.",
        )
        .with_context(json!({ "detail": format!("{self:?}") }))
    }
}

/// One generator as scheduled.
#[derive(Clone)]
pub struct PlanStep {
    /// The generator.
    pub generator: Arc<dyn EventGenerator>,
    /// Scheduling class after demotion.
    pub mode: ExecutionMode,
    /// Wave the step runs in.
    pub wave: usize,
}

impl core::fmt::Debug for PlanStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PlanStep")
            .field("name", &self.generator.name())
            .field("mode", &self.mode)
            .field("wave", &self.wave)
            .finish()
    }
}

/// A validated, wave-grouped plan.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    steps: Vec<PlanStep>,
    waves: Vec<Vec<usize>>,
    demoted: Vec<&'static str>,
}

impl ExecutionPlan {
    /// Validate `generators` in registration order and group them into waves.
    pub fn build(generators: &[Arc<dyn EventGenerator>]) -> Result<Self, PlanError> {
        let mut position: BTreeMap<&'static str, usize> = BTreeMap::new();
        for (index, generator) in generators.iter().enumerate() {
            if position.insert(generator.name(), index).is_some() {
                return Err(PlanError::DuplicateStep {
                    step: generator.name(),
                });
            }
        }

        let mut steps: Vec<PlanStep> = Vec::with_capacity(generators.len());
        let mut waves: Vec<Vec<usize>> = Vec::new();
        let mut demoted = Vec::new();
        let mut floor = 0_usize;

        for (index, generator) in generators.iter().enumerate() {
            let step = generator.name();
            let dependencies = generator.dependencies();
            let mut earliest = floor;
            for (i, &dependency) in dependencies.iter().enumerate() {
                if dependency == step {
                    return Err(PlanError::SelfDependency { step });
                }
                if dependencies.iter().take(i).any(|d| *d == dependency) {
                    return Err(PlanError::DuplicateDependency { step, dependency });
                }
                let Some(&at) = position.get(dependency) else {
                    return Err(PlanError::UnknownDependency { step, dependency });
                };
                // Only earlier steps have been placed so far.
                let Some(upstream) = steps.get(at) else {
                    return Err(PlanError::ForwardDependency { step, dependency });
                };
                earliest = earliest.max(upstream.wave.saturating_add(1));
            }

            let mut mode = generator.mode();
            if mode == ExecutionMode::ParallelSafe && !dependencies.is_empty() {
                warn!(
                    step,
                    dependencies = ?dependencies,
                    "Parallel-safe step declares dependencies, demoting to sequential"
                );
                mode = ExecutionMode::Sequential;
                demoted.push(step);
            }

            let wave = if mode == ExecutionMode::Sequential {
                let own = waves.len().max(earliest);
                floor = own.saturating_add(1);
                own
            } else {
                earliest
            };
            while waves.len() <= wave {
                waves.push(Vec::new());
            }
            if let Some(members) = waves.get_mut(wave) {
                members.push(index);
            }
            steps.push(PlanStep {
                generator: Arc::clone(generator),
                mode,
                wave,
            });
        }
        debug!(
            steps = steps.len(),
            waves = waves.len(),
            demoted = demoted.len(),
            "Execution plan built"
        );
        Ok(Self {
            steps,
            waves,
            demoted,
        })
    }

    /// Steps in registration order.
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Step indices grouped by wave.
    pub fn waves(&self) -> &[Vec<usize>] {
        &self.waves
    }

    /// Steps demoted from parallel-safe to sequential.
    pub fn demoted(&self) -> &[&'static str] {
        &self.demoted
    }

    /// Whether a declaration conflict forces a sequential year.
    pub fn has_conflict(&self) -> bool {
        !self.demoted.is_empty()
    }

    /// Step names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.generator.name()).collect()
    }
}
