//! The staged multi-year pipeline.
//!
//! Years run one after another. Each year runs its stages in strict order:
//!
//! ```text
//! Initialization -> Foundation -> EventGeneration -> StateAccumulation
//!                -> Validation -> Reporting
//! ```
//!
//! A checkpoint is saved after every stage. Resuming loads the scenario's
//! latest checkpoint, checks it against the current configuration and the
//! stored rows, re-validates the year chain and continues at the next
//! stage. Inputs a resumed stage needs from earlier stages of the same
//! year are rebuilt from the store.
//!
//! Accumulation is gated twice on year N-1 state: once in Initialization,
//! before the year writes anything, and again immediately before the first
//! accumulator runs.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{debug, error, info, warn};
use workforce_accumulators::{
    AccumulatorRegistry, DeferralAttributes, EmploymentAttributes, EnrollmentAttributes, FoldInput,
    YearDependencyValidator, deferral, employment, enrollment,
};
use workforce_db::statement::from_rows;
use workforce_db::store::{replace_year, select};
use workforce_db::tables::{
    BASELINE_WORKFORCE, EMPLOYEE_CONTRIBUTIONS, SIMULATION_EVENTS, WORKFORCE_SNAPSHOT,
};
use workforce_db::{AnalyticalStore, CheckpointStore, Filter, Row, Statement};
use workforce_events::EventStore;
use workforce_generators::{
    ContributionCalculator, ContributionInput, EventGenerator, GenerationContext,
    GeneratorParameters, HiringPlan, WorkforceMember, assemble_year_events, default_generators,
};
use workforce_types::{
    BaselineEmployee, Checkpoint, ContributionRecord, EmployeeId, EmployeeYearState,
    EnrollmentStatus, PipelineStage, RunId, SimulationEvent, WorkforceSummary,
};

use crate::config::SimulationConfig;
use crate::control::{RunControl, StageObserver};
use crate::error::PipelineError;
use crate::fingerprint::{fingerprint_rows, fingerprint_value};
use crate::plan::ExecutionPlan;
use crate::pool::{WorkerPool, merge_in_plan_order};
use crate::snapshot::{SnapshotMaterializer, keyed};
use crate::validation::{check_clamps, check_single_state, reconcile_headcount};

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Run that completed.
    pub run_id: RunId,
    /// Summaries of the years this run reported, in year order.
    pub summaries: Vec<WorkforceSummary>,
    /// Checkpoint the run resumed from.
    pub resumed_from: Option<Checkpoint>,
}

/// Prior workforce and hiring plan of a year.
#[derive(Debug, Clone)]
struct Foundation {
    workforce: Arc<Vec<WorkforceMember>>,
    hiring: HiringPlan,
}

/// In-memory hand-offs between the stages of one year.
#[derive(Debug, Default)]
struct YearInputs {
    plan: Option<ExecutionPlan>,
    baseline: Option<Arc<Vec<BaselineEmployee>>>,
    foundation: Option<Foundation>,
    events: Option<Arc<Vec<SimulationEvent>>>,
}

/// Drives the per-year stages over an analytical store.
pub struct Orchestrator {
    config: SimulationConfig,
    params: Arc<GeneratorParameters>,
    store: Arc<dyn AnalyticalStore>,
    registry: Arc<AccumulatorRegistry>,
    generators: Vec<Arc<dyn EventGenerator>>,
    pool: WorkerPool,
    config_fingerprint: String,
}

impl core::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("scenario_id", &self.config.simulation.scenario_id)
            .field("backend", &self.store.backend_name())
            .field("accumulators", &self.registry.len())
            .field("generators", &self.generators.len())
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Validate `config` and build an orchestrator with the default
    /// generators and accumulators.
    pub fn new(
        config: SimulationConfig,
        store: Arc<dyn AnalyticalStore>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let config_fingerprint = config.fingerprint()?;
        let pool = if config.execution.parallel_generation {
            WorkerPool::new(config.execution.max_workers, config.execution.memory_limit_mb)
        } else {
            WorkerPool::sequential()
        };
        Ok(Self {
            params: Arc::new(config.generator_parameters()),
            registry: Arc::new(AccumulatorRegistry::with_defaults()?),
            generators: default_generators(),
            store,
            pool,
            config_fingerprint,
            config,
        })
    }

    /// Replace the accumulator registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<AccumulatorRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the generator set, in plan order.
    #[must_use]
    pub fn with_generators(mut self, generators: Vec<Arc<dyn EventGenerator>>) -> Self {
        self.generators = generators;
        self
    }

    /// Replace the worker pool.
    #[must_use]
    pub fn with_pool(mut self, pool: WorkerPool) -> Self {
        self.pool = pool;
        self
    }

    /// The validated configuration.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Fingerprint every checkpoint of this configuration carries.
    pub fn config_fingerprint(&self) -> &str {
        &self.config_fingerprint
    }

    fn validator(&self) -> YearDependencyValidator {
        YearDependencyValidator::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.store),
            self.config.simulation.start_year,
        )
    }

    /// Run every configured year, optionally resuming from the scenario's
    /// latest checkpoint.
    pub async fn run(
        &self,
        run_id: RunId,
        resume_from_checkpoint: bool,
        control: &RunControl,
        observer: &dyn StageObserver,
    ) -> Result<RunOutcome, PipelineError> {
        let sim = &self.config.simulation;
        info!(
            %run_id,
            scenario_id = %sim.scenario_id,
            start_year = sim.start_year,
            end_year = sim.end_year,
            backend = self.store.backend_name(),
            resume_from_checkpoint,
            "Pipeline run starting"
        );

        let resumed_from = if resume_from_checkpoint {
            self.resume_point().await?
        } else {
            None
        };
        let (first_year, first_stage) = match &resumed_from {
            Some(cp) => match cp.stage.next() {
                Some(stage) => (cp.simulation_year, stage),
                None => (cp.simulation_year.saturating_add(1), PipelineStage::Initialization),
            },
            None => (sim.start_year, PipelineStage::Initialization),
        };

        let mut summaries = Vec::new();
        for year in first_year..=sim.end_year {
            let stage = if year == first_year {
                first_stage
            } else {
                PipelineStage::Initialization
            };
            let summary =
                Box::pin(self.run_year_from(run_id, year, stage, control, observer)).await?;
            summaries.push(summary);
        }

        info!(%run_id, years = summaries.len(), "Pipeline run completed");
        Ok(RunOutcome {
            run_id,
            summaries,
            resumed_from,
        })
    }

    /// Run every stage of one year.
    pub async fn run_year(
        &self,
        run_id: RunId,
        simulation_year: i32,
        control: &RunControl,
        observer: &dyn StageObserver,
    ) -> Result<WorkforceSummary, PipelineError> {
        Box::pin(self.run_year_from(
            run_id,
            simulation_year,
            PipelineStage::Initialization,
            control,
            observer,
        ))
        .await
    }

    async fn run_year_from(
        &self,
        run_id: RunId,
        simulation_year: i32,
        first: PipelineStage,
        control: &RunControl,
        observer: &dyn StageObserver,
    ) -> Result<WorkforceSummary, PipelineError> {
        info!(simulation_year, first_stage = %first, "Year starting");
        let checkpoints = CheckpointStore::new(self.store.as_ref());
        let mut inputs = YearInputs::default();
        let mut summary = None;
        let mut stage = first;
        loop {
            if control.is_cancel_requested() {
                warn!(simulation_year, %stage, "Run cancelled between stages");
                return Err(PipelineError::Cancelled {
                    simulation_year,
                    stage,
                });
            }

            let state_fingerprint = match self
                .run_stage(simulation_year, stage, &mut inputs, &mut summary)
                .await
            {
                Ok(fingerprint) => fingerprint,
                Err(e) => {
                    error!(simulation_year, %stage, error = %e, "Stage failed");
                    return Err(e.at_stage(simulation_year, stage));
                }
            };

            let checkpoint = Checkpoint {
                run_id,
                scenario_id: self.config.simulation.scenario_id.clone(),
                simulation_year,
                stage,
                timestamp: Utc::now(),
                state_fingerprint,
                config_fingerprint: self.config_fingerprint.clone(),
            };
            checkpoints
                .save(&checkpoint)
                .await
                .map_err(|e| PipelineError::from(e).at_stage(simulation_year, stage))?;
            control.record_stage(simulation_year, stage).await;
            observer.on_stage(&checkpoint);
            info!(simulation_year, %stage, "Stage completed");

            match stage.next() {
                Some(next) => stage = next,
                None => break,
            }
        }

        summary.ok_or_else(|| PipelineError::DataQuality {
            simulation_year,
            check: "reporting",
            detail: "year ended without a snapshot".to_owned(),
        })
    }

    /// Run one stage and return the fingerprint its checkpoint records.
    async fn run_stage(
        &self,
        simulation_year: i32,
        stage: PipelineStage,
        inputs: &mut YearInputs,
        summary: &mut Option<WorkforceSummary>,
    ) -> Result<String, PipelineError> {
        match stage {
            PipelineStage::Initialization => self.initialize(simulation_year, inputs).await,
            PipelineStage::Foundation => {
                let foundation = self.foundation(simulation_year, inputs).await?;
                Ok(fingerprint_value(&json!({
                    "workforce": &*foundation.workforce,
                    "hiring": foundation.hiring,
                }))?)
            }
            PipelineStage::EventGeneration => {
                Box::pin(self.generate(simulation_year, inputs)).await
            }
            PipelineStage::StateAccumulation => {
                Box::pin(self.accumulate(simulation_year, inputs)).await
            }
            PipelineStage::Validation => self.validate(simulation_year, inputs).await,
            PipelineStage::Reporting => {
                let year_summary = SnapshotMaterializer::new(
                    self.store.as_ref(),
                    &self.config.simulation.scenario_id,
                    &self.config.simulation.plan_design_id,
                )
                .materialize(simulation_year)
                .await?;
                *summary = Some(year_summary);
                self.table_fingerprint(WORKFORCE_SNAPSHOT, simulation_year).await
            }
        }
    }

    // -----------------------------------------------------------------------
    // Resume
    // -----------------------------------------------------------------------

    async fn resume_point(&self) -> Result<Option<Checkpoint>, PipelineError> {
        let scenario_id = &self.config.simulation.scenario_id;
        let Some(checkpoint) = CheckpointStore::new(self.store.as_ref())
            .latest(scenario_id)
            .await?
        else {
            info!(%scenario_id, "No checkpoint to resume from, starting fresh");
            return Ok(None);
        };

        let mismatch = |reason: String| PipelineError::CheckpointMismatch {
            simulation_year: checkpoint.simulation_year,
            stage: checkpoint.stage,
            reason,
        };
        if checkpoint.config_fingerprint != self.config_fingerprint {
            return Err(mismatch(
                "configuration changed since the checkpoint was taken".to_owned(),
            ));
        }
        self.validator()
            .validate_checkpoint_dependencies(checkpoint.simulation_year)
            .await?;
        if let Some(stored) = self
            .stored_fingerprint(checkpoint.stage, checkpoint.simulation_year)
            .await?
            && stored != checkpoint.state_fingerprint
        {
            return Err(mismatch(format!(
                "rows written by {} have changed",
                checkpoint.stage
            )));
        }
        info!(
            %scenario_id,
            simulation_year = checkpoint.simulation_year,
            stage = %checkpoint.stage,
            from_run = %checkpoint.run_id,
            "Resuming from checkpoint"
        );
        Ok(Some(checkpoint))
    }

    /// Fingerprint of what a data-bearing stage left in the store.
    async fn stored_fingerprint(
        &self,
        stage: PipelineStage,
        simulation_year: i32,
    ) -> Result<Option<String>, PipelineError> {
        let fingerprint = match stage {
            PipelineStage::EventGeneration => {
                self.table_fingerprint(SIMULATION_EVENTS, simulation_year).await?
            }
            PipelineStage::StateAccumulation => {
                let mut digests = BTreeMap::new();
                for table in self.accumulation_tables() {
                    let digest = self.table_fingerprint(&table, simulation_year).await?;
                    digests.insert(table, digest);
                }
                fingerprint_value(&digests)?
            }
            PipelineStage::Reporting => {
                self.table_fingerprint(WORKFORCE_SNAPSHOT, simulation_year).await?
            }
            PipelineStage::Initialization
            | PipelineStage::Foundation
            | PipelineStage::Validation => {
                return Ok(None);
            }
        };
        Ok(Some(fingerprint))
    }

    async fn table_fingerprint(
        &self,
        table: &str,
        simulation_year: i32,
    ) -> Result<String, PipelineError> {
        let rows = self.year_rows(table, simulation_year).await?;
        Ok(fingerprint_rows(&rows)?)
    }

    async fn year_rows(
        &self,
        table: &str,
        simulation_year: i32,
    ) -> Result<Vec<Row>, PipelineError> {
        Ok(self
            .store
            .execute(Statement::Select {
                table: table.to_owned(),
                filter: Filter::year(simulation_year),
            })
            .await?)
    }

    fn accumulation_tables(&self) -> Vec<String> {
        let mut tables = self.registry.get_tables();
        tables.push(EMPLOYEE_CONTRIBUTIONS.to_owned());
        tables
    }

    // -----------------------------------------------------------------------
    // Stages
    // -----------------------------------------------------------------------

    async fn initialize(
        &self,
        simulation_year: i32,
        inputs: &mut YearInputs,
    ) -> Result<String, PipelineError> {
        self.validator().validate_year_dependencies(simulation_year).await?;
        let plan = self.plan(inputs)?;
        debug!(
            simulation_year,
            steps = ?plan.names(),
            waves = plan.waves().len(),
            "Year plan ready"
        );
        Ok(fingerprint_value(&json!({
            "simulation_year": simulation_year,
            "steps": plan.names(),
            "waves": plan.waves(),
        }))?)
    }

    fn plan(&self, inputs: &mut YearInputs) -> Result<ExecutionPlan, PipelineError> {
        if let Some(plan) = &inputs.plan {
            return Ok(plan.clone());
        }
        let plan = ExecutionPlan::build(&self.generators)?;
        inputs.plan = Some(plan.clone());
        Ok(plan)
    }

    async fn baseline(
        &self,
        inputs: &mut YearInputs,
    ) -> Result<Arc<Vec<BaselineEmployee>>, PipelineError> {
        if let Some(baseline) = &inputs.baseline {
            return Ok(Arc::clone(baseline));
        }
        let mut census: Vec<BaselineEmployee> =
            select(self.store.as_ref(), BASELINE_WORKFORCE, Filter::all()).await?;
        census.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        let census = Arc::new(census);
        inputs.baseline = Some(Arc::clone(&census));
        Ok(census)
    }

    async fn foundation(
        &self,
        simulation_year: i32,
        inputs: &mut YearInputs,
    ) -> Result<Foundation, PipelineError> {
        if let Some(foundation) = &inputs.foundation {
            return Ok(foundation.clone());
        }
        let workforce = if simulation_year == self.config.simulation.start_year {
            let census = self.baseline(inputs).await?;
            if census.is_empty() {
                warn!(simulation_year, table = BASELINE_WORKFORCE, "Baseline census is empty");
            }
            census.iter().map(WorkforceMember::from_baseline).collect()
        } else {
            self.prior_workforce(simulation_year).await?
        };

        let policy = &self.params.workforce;
        let hiring = HiringPlan::from_rates(
            u64::try_from(workforce.len()).unwrap_or(u64::MAX),
            policy.planning_termination_rate,
            policy.target_growth_rate,
            policy.new_hire_termination_rate,
        )?;
        info!(
            simulation_year,
            headcount = workforce.len(),
            expected_terminations = hiring.expected_experienced_terminations,
            planned_hires = hiring.total_hires,
            "Foundation built"
        );
        let foundation = Foundation {
            workforce: Arc::new(workforce),
            hiring,
        };
        inputs.foundation = Some(foundation.clone());
        Ok(foundation)
    }

    /// Employees active at the end of year N-1, joined across accumulators.
    ///
    /// Each starts the year on the salary it actually earned in N-1.
    async fn prior_workforce(
        &self,
        simulation_year: i32,
    ) -> Result<Vec<WorkforceMember>, PipelineError> {
        let prior = simulation_year.saturating_sub(1);
        let store = self.store.as_ref();
        let jobs: Vec<EmployeeYearState<EmploymentAttributes>> =
            select(store, employment::TABLE, Filter::year(prior)).await?;
        let plans: BTreeMap<_, EnrollmentAttributes> =
            keyed(select(store, enrollment::TABLE, Filter::year(prior)).await?);
        let rates: BTreeMap<_, DeferralAttributes> =
            keyed(select(store, deferral::TABLE, Filter::year(prior)).await?);

        let missing = |table: &str, id: &EmployeeId| PipelineError::DataQuality {
            simulation_year,
            check: "prior_state_join",
            detail: format!("{id} is active in {prior} but has no {table} row"),
        };
        let mut workforce = Vec::new();
        for job in jobs.into_iter().filter(|s| s.is_active) {
            let id = job.employee_id;
            let plan = plans.get(&id).ok_or_else(|| missing(enrollment::TABLE, &id))?;
            let rate = rates.get(&id).ok_or_else(|| missing(deferral::TABLE, &id))?;
            workforce.push(WorkforceMember {
                birth_date: job.attributes.birth_date,
                hire_date: job.attributes.hire_date,
                level: job.attributes.level,
                annual_compensation: job.attributes.prorated_compensation,
                is_eligible: plan.is_eligible,
                eligibility_date: plan.eligibility_date,
                enrollment_status: plan.enrollment_status,
                enrollment_method: plan.enrollment_method,
                enrollment_date: plan.enrollment_date,
                deferral_rate: rate.deferral_rate,
                escalation_count: rate.escalation_count,
                employee_id: id,
            });
        }
        workforce.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(workforce)
    }

    async fn generate(
        &self,
        simulation_year: i32,
        inputs: &mut YearInputs,
    ) -> Result<String, PipelineError> {
        let plan = self.plan(inputs)?;
        let foundation = self.foundation(simulation_year, inputs).await?;
        let ctx = Arc::new(GenerationContext {
            simulation_year,
            scenario_id: self.config.simulation.scenario_id.clone(),
            plan_design_id: self.config.simulation.plan_design_id.clone(),
            seed: self.config.simulation.seed,
            workforce: foundation.workforce,
            hiring: foundation.hiring,
            params: Arc::clone(&self.params),
        });

        let generation = self.pool.run(&plan, Arc::clone(&ctx)).await?;
        let events = assemble_year_events(&ctx, merge_in_plan_order(&plan, &generation.outputs));
        let written = EventStore::new(self.store.as_ref())
            .append(simulation_year, &events)
            .await?;
        info!(
            simulation_year,
            events = written,
            schedule = ?generation.schedule,
            "Events generated"
        );
        inputs.events = Some(Arc::new(events));
        self.table_fingerprint(SIMULATION_EVENTS, simulation_year).await
    }

    async fn events(
        &self,
        simulation_year: i32,
        inputs: &mut YearInputs,
    ) -> Result<Arc<Vec<SimulationEvent>>, PipelineError> {
        if let Some(events) = &inputs.events {
            return Ok(Arc::clone(events));
        }
        let events = Arc::new(
            EventStore::new(self.store.as_ref())
                .events_for(None, simulation_year, None)
                .await?,
        );
        inputs.events = Some(Arc::clone(&events));
        Ok(events)
    }

    async fn accumulate(
        &self,
        simulation_year: i32,
        inputs: &mut YearInputs,
    ) -> Result<String, PipelineError> {
        self.validator().validate_year_dependencies(simulation_year).await?;

        let start_year = self.config.simulation.start_year;
        let baseline = if simulation_year == start_year {
            self.baseline(inputs).await?
        } else {
            Arc::new(Vec::new())
        };
        let events = self.events(simulation_year, inputs).await?;
        let input = FoldInput {
            simulation_year,
            start_year,
            baseline: &baseline,
            events: &events,
        };
        for accumulator in self.registry.accumulators() {
            accumulator.accumulate(self.store.as_ref(), &input).await?;
        }

        let records = self.contributions(simulation_year).await?;
        replace_year(self.store.as_ref(), EMPLOYEE_CONTRIBUTIONS, simulation_year, &records).await?;
        info!(
            simulation_year,
            accumulators = self.registry.len(),
            contribution_records = records.len(),
            "State accumulated"
        );
        self.stored_fingerprint(PipelineStage::StateAccumulation, simulation_year)
            .await?
            .ok_or_else(|| PipelineError::DataQuality {
                simulation_year,
                check: "state_fingerprint",
                detail: "accumulation left no fingerprint".to_owned(),
            })
    }

    async fn contributions(
        &self,
        simulation_year: i32,
    ) -> Result<Vec<ContributionRecord>, PipelineError> {
        let store = self.store.as_ref();
        let jobs: Vec<EmployeeYearState<EmploymentAttributes>> =
            select(store, employment::TABLE, Filter::year(simulation_year)).await?;
        let plans: BTreeMap<_, EnrollmentAttributes> =
            keyed(select(store, enrollment::TABLE, Filter::year(simulation_year)).await?);
        let rates: BTreeMap<_, DeferralAttributes> =
            keyed(select(store, deferral::TABLE, Filter::year(simulation_year)).await?);

        let calculator =
            ContributionCalculator::new(&self.params.plan_design, &self.params.statutory_limits);
        let mut records = Vec::with_capacity(jobs.len());
        for job in &jobs {
            let id = &job.employee_id;
            let (Some(plan), Some(rate)) = (plans.get(id), rates.get(id)) else {
                return Err(PipelineError::DataQuality {
                    simulation_year,
                    check: "contribution_join",
                    detail: format!("{id} has employment state but no participation state"),
                });
            };
            let deferral_rate = if plan.enrollment_status == EnrollmentStatus::Enrolled {
                rate.deferral_rate
            } else {
                Decimal::ZERO
            };
            records.push(calculator.calculate(
                simulation_year,
                &ContributionInput {
                    employee_id: id.clone(),
                    birth_date: job.attributes.birth_date,
                    prorated_compensation: job.attributes.prorated_compensation,
                    deferral_rate,
                    is_eligible: plan.is_eligible,
                },
            )?);
        }
        Ok(records)
    }

    async fn validate(
        &self,
        simulation_year: i32,
        inputs: &mut YearInputs,
    ) -> Result<String, PipelineError> {
        let mut tables = BTreeMap::new();
        for table in self.accumulation_tables() {
            let rows = self.year_rows(&table, simulation_year).await?;
            check_single_state(simulation_year, &table, &rows)?;
            tables.insert(table, rows);
        }

        let employment_rows = tables.remove(employment::TABLE).unwrap_or_default();
        let contribution_rows = tables.remove(EMPLOYEE_CONTRIBUTIONS).unwrap_or_default();
        if employment_rows.len() != contribution_rows.len() {
            return Err(PipelineError::DataQuality {
                simulation_year,
                check: "contribution_coverage",
                detail: format!(
                    "{} employment rows but {} contribution records",
                    employment_rows.len(),
                    contribution_rows.len()
                ),
            });
        }
        let jobs: Vec<EmployeeYearState<EmploymentAttributes>> = from_rows(employment_rows)?;
        let records: Vec<ContributionRecord> = from_rows(contribution_rows)?;

        let opening = self.foundation(simulation_year, inputs).await?.workforce.len();
        let events = self.events(simulation_year, inputs).await?;
        let mut report = reconcile_headcount(simulation_year, opening, &jobs, &events)?;
        report.limit_breaches = check_clamps(simulation_year, &records)?;
        if report.limit_breaches > 0 {
            warn!(
                simulation_year,
                limit_breaches = report.limit_breaches,
                "Deferrals clamped to statutory limits"
            );
        }
        info!(
            simulation_year,
            starting_headcount = report.starting_headcount,
            hires = report.hires,
            terminations = report.terminations,
            ending_headcount = report.ending_headcount,
            "Year validated"
        );
        Ok(fingerprint_value(&report)?)
    }
}
