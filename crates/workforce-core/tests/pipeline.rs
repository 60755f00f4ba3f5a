//! Multi-year pipeline runs against the in-memory store: determinism,
//! year ordering, resume and cancellation.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

mod common;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use workforce_accumulators::{
    EmploymentAttributes, YearDependencyError, deferral, employment, enrollment,
};
use workforce_core::{
    NoOpObserver, Orchestrator, PipelineError, RunControl, RunManager, RunRequest, RunState,
    StageObserver, WorkerPool,
};
use workforce_db::tables::{EMPLOYEE_CONTRIBUTIONS, SIMULATION_EVENTS, WORKFORCE_SNAPSHOT};
use workforce_db::store::select;
use workforce_db::{
    AnalyticalStore, CheckpointStore, DbError, Filter, MemoryStore, RetryPolicy, RetryingStore,
    Row, Statement,
};
use workforce_events::EventStore;
use workforce_generators::{
    EventDraft, EventGenerator, ExecutionMode, GenerationContext, GeneratorError, Upstream,
};
use workforce_types::{
    Checkpoint, EmployeeYearState, ErrorCode, EventPayload, EventType, PipelineStage, RunId,
    ToStructured,
};

const ACCUMULATOR_TABLES: [&str; 3] = [employment::TABLE, enrollment::TABLE, deferral::TABLE];

async fn seeded_store(n: u32) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::with_statement_log());
    common::seed(store.as_ref(), n).await;
    store
}

fn orchestrator(start: i32, end: i32, store: Arc<dyn AnalyticalStore>) -> Orchestrator {
    Orchestrator::new(common::config(start, end), store).unwrap()
}

async fn run_all(orchestrator: &Orchestrator) -> Result<workforce_core::RunOutcome, PipelineError> {
    let sim = &orchestrator.config().simulation;
    let control = RunControl::new(RunId::new(), sim.start_year, sim.end_year);
    orchestrator.run(RunId::new(), false, &control, &NoOpObserver).await
}

async fn data_rows(store: &dyn AnalyticalStore, year: i32) -> Vec<(String, Vec<Row>)> {
    let mut tables = vec![SIMULATION_EVENTS, EMPLOYEE_CONTRIBUTIONS, WORKFORCE_SNAPSHOT];
    tables.extend(ACCUMULATOR_TABLES);
    let mut out = Vec::new();
    for table in tables {
        out.push((table.to_owned(), common::year_rows(store, table, year).await));
    }
    out
}

#[tokio::test]
async fn identical_inputs_produce_identical_history() {
    let first = seeded_store(60).await;
    let second = seeded_store(60).await;

    let a = run_all(&orchestrator(2025, 2029, first.clone())).await.unwrap();
    let b = run_all(&orchestrator(2025, 2029, second.clone())).await.unwrap();

    assert_eq!(a.summaries.len(), 5);
    assert_eq!(a.summaries, b.summaries);
    for year in 2025..=2029 {
        let events = common::year_rows(first.as_ref(), SIMULATION_EVENTS, year).await;
        assert!(!events.is_empty(), "no events in {year}");
        assert_eq!(data_rows(first.as_ref(), year).await, data_rows(second.as_ref(), year).await);
    }
}

#[tokio::test]
async fn concurrent_generation_matches_sequential() {
    let parallel = seeded_store(40).await;
    let sequential = seeded_store(40).await;

    let concurrent = orchestrator(2025, 2026, parallel.clone()).with_pool(WorkerPool::new(4, 0));
    let serial = orchestrator(2025, 2026, sequential.clone()).with_pool(WorkerPool::sequential());
    run_all(&concurrent).await.unwrap();
    run_all(&serial).await.unwrap();

    for year in 2025..=2026 {
        assert_eq!(
            common::year_rows(parallel.as_ref(), SIMULATION_EVENTS, year).await,
            common::year_rows(sequential.as_ref(), SIMULATION_EVENTS, year).await
        );
    }
}

#[tokio::test]
async fn year_n_reads_only_year_n_and_prior_state() {
    let store = seeded_store(30).await;
    let orchestrator = orchestrator(2025, 2028, store.clone());
    let control = RunControl::new(RunId::new(), 2025, 2028);
    let run_id = RunId::new();

    for year in 2025..=2028 {
        store.clear_statement_log().await;
        orchestrator.run_year(run_id, year, &control, &NoOpObserver).await.unwrap();
        let log = store.statement_log().await;
        let touched: Vec<_> = log
            .iter()
            .filter(|r| ACCUMULATOR_TABLES.contains(&r.table.as_str()))
            .collect();
        assert!(!touched.is_empty());
        for record in touched {
            let seen = record.simulation_year.unwrap();
            assert!(
                seen == year || seen == year - 1,
                "{} {} for {seen} while running {year}",
                record.kind,
                record.table
            );
        }
    }
}

#[tokio::test]
async fn skipping_a_year_fails_before_writing() {
    let store = seeded_store(20).await;
    let orchestrator = orchestrator(2025, 2027, store.clone());
    let control = RunControl::new(RunId::new(), 2025, 2027);
    let run_id = RunId::new();
    orchestrator.run_year(run_id, 2025, &control, &NoOpObserver).await.unwrap();

    store.clear_statement_log().await;
    let err = orchestrator
        .run_year(run_id, 2027, &control, &NoOpObserver)
        .await
        .unwrap_err();
    let PipelineError::Dependency(YearDependencyError::MissingPriorYear {
        simulation_year,
        missing_year,
        missing_tables,
        row_counts,
        execution_order,
    }) = err.root()
    else {
        panic!("expected a missing prior year, got {err:?}");
    };
    assert_eq!(*simulation_year, 2027);
    assert_eq!(*missing_year, 2026);
    assert_eq!(missing_tables.len(), 3);
    assert_eq!(execution_order, &vec![2025, 2026, 2027]);
    assert_eq!(err.error_code(), ErrorCode::YearDependencyViolation);
    let context = err.to_structured().context;
    assert_eq!(context["expected_min_rows"], 1);
    assert_eq!(context["stage"], "initialization");
    for table in missing_tables {
        assert_eq!(row_counts[table], 0);
        assert_eq!(context["row_counts"][table], 0);
    }

    let log = store.statement_log().await;
    assert!(log.iter().all(|r| r.kind == "select" || r.kind == "count"));
    let history = CheckpointStore::new(store.as_ref())
        .history(&orchestrator.config().simulation.scenario_id)
        .await
        .unwrap();
    assert!(history.iter().all(|c| c.simulation_year == 2025));
    assert_eq!(history.len(), PipelineStage::ALL.len());
}

/// Fails the first write of one table and year, then behaves normally.
struct CrashOnce {
    inner: Arc<MemoryStore>,
    table: &'static str,
    simulation_year: i32,
    armed: AtomicBool,
}

#[async_trait]
impl AnalyticalStore for CrashOnce {
    async fn execute(&self, statement: Statement) -> Result<Vec<Row>, DbError> {
        if let Statement::ReplaceYear {
            table,
            simulation_year,
            ..
        } = &statement
            && table == self.table
            && *simulation_year == self.simulation_year
            && self.armed.swap(false, Ordering::SeqCst)
        {
            return Err(DbError::Config("process killed".to_owned()));
        }
        self.inner.execute(statement).await
    }

    fn backend_name(&self) -> &'static str {
        "crash-once"
    }
}

#[tokio::test]
async fn resume_after_crash_matches_an_uninterrupted_run() {
    let memory = seeded_store(40).await;
    let store = Arc::new(CrashOnce {
        inner: memory.clone(),
        table: WORKFORCE_SNAPSHOT,
        simulation_year: 2026,
        armed: AtomicBool::new(true),
    });
    let crashing = orchestrator(2025, 2027, store.clone());
    let err = run_all(&crashing).await.unwrap_err();
    assert!(matches!(err.root(), PipelineError::Store(DbError::Config(_))));
    assert_eq!(err.failed_at(), Some((2026, PipelineStage::Reporting)));

    memory.clear_statement_log().await;
    let control = RunControl::new(RunId::new(), 2025, 2027);
    let resumed = crashing
        .run(RunId::new(), true, &control, &NoOpObserver)
        .await
        .unwrap();
    let from = resumed.resumed_from.unwrap();
    assert_eq!(from.simulation_year, 2026);
    assert_eq!(from.stage, PipelineStage::Validation);
    assert_eq!(resumed.summaries.len(), 2);

    let log = memory.statement_log().await;
    assert!(
        !log.iter()
            .any(|r| r.kind == "replace_year" && r.simulation_year == Some(2025)),
        "2025 was rewritten on resume"
    );
    assert!(!log.iter().any(|r| {
        r.table == SIMULATION_EVENTS && r.kind == "replace_year" && r.simulation_year == Some(2026)
    }));

    let clean = seeded_store(40).await;
    run_all(&orchestrator(2025, 2027, clean.clone())).await.unwrap();
    for year in 2025..=2027 {
        assert_eq!(data_rows(memory.as_ref(), year).await, data_rows(clean.as_ref(), year).await);
    }
}

#[tokio::test]
async fn extending_the_horizon_resumes_after_the_last_year() {
    let store = seeded_store(20).await;
    run_all(&orchestrator(2025, 2026, store.clone())).await.unwrap();

    let extended = orchestrator(2025, 2027, store.clone());
    let control = RunControl::new(RunId::new(), 2025, 2027);
    let outcome = extended.run(RunId::new(), true, &control, &NoOpObserver).await.unwrap();
    let from = outcome.resumed_from.unwrap();
    assert_eq!((from.simulation_year, from.stage), (2026, PipelineStage::Reporting));
    assert_eq!(outcome.summaries.len(), 1);
    assert_eq!(outcome.summaries[0].simulation_year, 2027);
}

#[tokio::test]
async fn changed_configuration_refuses_to_resume() {
    let store = seeded_store(20).await;
    run_all(&orchestrator(2025, 2025, store.clone())).await.unwrap();

    let mut changed = common::config(2025, 2026);
    changed.simulation.seed = 7;
    let orchestrator = Orchestrator::new(changed, store).unwrap();
    let control = RunControl::new(RunId::new(), 2025, 2026);
    let err = orchestrator
        .run(RunId::new(), true, &control, &NoOpObserver)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::CheckpointMismatch {
            simulation_year: 2025,
            stage: PipelineStage::Reporting,
            ..
        }
    ));
}

#[tokio::test]
async fn tampered_rows_refuse_to_resume() {
    let store = seeded_store(20).await;
    run_all(&orchestrator(2025, 2025, store.clone())).await.unwrap();
    store
        .execute(Statement::DeleteYear {
            table: WORKFORCE_SNAPSHOT.to_owned(),
            simulation_year: 2025,
        })
        .await
        .unwrap();

    let control = RunControl::new(RunId::new(), 2025, 2026);
    let err = orchestrator(2025, 2026, store)
        .run(RunId::new(), true, &control, &NoOpObserver)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::CheckpointMismatch);
}

/// Cancels its run once a given stage completes.
struct CancelAfter {
    control: Arc<RunControl>,
    stage: PipelineStage,
}

impl StageObserver for CancelAfter {
    fn on_stage(&self, checkpoint: &Checkpoint) {
        if checkpoint.stage == self.stage {
            self.control.request_cancel();
        }
    }
}

#[tokio::test]
async fn cancellation_stops_at_the_next_stage_boundary() {
    let store = seeded_store(20).await;
    let orchestrator = orchestrator(2025, 2026, store.clone());
    let control = Arc::new(RunControl::new(RunId::new(), 2025, 2026));
    let observer = CancelAfter {
        control: Arc::clone(&control),
        stage: PipelineStage::EventGeneration,
    };

    let err = orchestrator
        .run(RunId::new(), false, &control, &observer)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Cancelled {
            simulation_year: 2025,
            stage: PipelineStage::StateAccumulation,
        }
    ));
    assert!(common::year_rows(store.as_ref(), employment::TABLE, 2025).await.is_empty());
    let status = control.status().await;
    assert_eq!(status.stage, Some(PipelineStage::EventGeneration));
}

#[tokio::test]
async fn manager_reports_completion_and_cancellation() {
    let store: Arc<dyn AnalyticalStore> = seeded_store(20).await;
    let manager = RunManager::new(common::config(2025, 2026), Arc::clone(&store));
    let request = RunRequest::from_config(&common::config(2025, 2026), false);

    let handle = manager.run(request.clone()).await.unwrap();
    let run_id = handle.run_id();
    let outcome = handle.wait().await.unwrap();
    assert_eq!(outcome.summaries.len(), 2);
    let status = manager.status(run_id).await.unwrap();
    assert_eq!(status.state, RunState::Completed);
    assert_eq!(status.progress, rust_decimal::Decimal::ONE);

    // The current-thread runtime does not start the task before the
    // cancel below.
    let handle = manager.run(request).await.unwrap();
    handle.cancel();
    let run_id = handle.run_id();
    let err = handle.wait().await.unwrap_err();
    assert!(err.is_cancelled());
    let status = manager.status(run_id).await.unwrap();
    assert_eq!(status.state, RunState::Cancelled);
    assert_eq!(status.error.unwrap().error_code, ErrorCode::RunCancelled);
    assert!(!manager.cancel(RunId::new()).await);
}

#[tokio::test]
async fn lock_contention_is_retried_until_the_budget_runs_out() {
    let memory = seeded_store(20).await;
    let policy = RetryPolicy {
        max_attempts: 4,
        base_delay: std::time::Duration::from_millis(1),
        max_delay: std::time::Duration::from_millis(2),
    };
    let retrying: Arc<dyn AnalyticalStore> =
        Arc::new(RetryingStore::new(memory.clone(), policy));

    memory.inject_lock_contention(3);
    let outcome = run_all(&orchestrator(2025, 2025, Arc::clone(&retrying))).await.unwrap();
    assert_eq!(outcome.summaries.len(), 1);

    let fresh = seeded_store(20).await;
    let retrying: Arc<dyn AnalyticalStore> = Arc::new(RetryingStore::new(fresh.clone(), policy));
    fresh.inject_lock_contention(50);
    let err = run_all(&orchestrator(2025, 2025, retrying)).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::StoreUnavailable);
    assert_eq!(err.to_structured().error_code, ErrorCode::StoreUnavailable);
}

#[tokio::test]
async fn next_year_starts_from_time_weighted_pay() {
    let store = seeded_store(40).await;
    run_all(&orchestrator(2025, 2026, store.clone())).await.unwrap();

    let jobs: Vec<EmployeeYearState<EmploymentAttributes>> =
        select(store.as_ref(), employment::TABLE, Filter::year(2025)).await.unwrap();
    assert!(jobs.iter().any(|j| {
        j.is_active && j.attributes.prorated_compensation != j.attributes.full_year_compensation
    }));
    let earned: BTreeMap<_, _> = jobs
        .iter()
        .filter(|j| j.is_active)
        .map(|j| (j.employee_id.clone(), j.attributes.prorated_compensation))
        .collect();

    // Ordered by employee, then sequence: the first pay change of each
    // employee starts from last year's earned pay.
    let events = EventStore::new(store.as_ref()).events_for(None, 2026, None).await.unwrap();
    let mut changed = BTreeSet::new();
    for event in &events {
        let previous = match &event.payload {
            EventPayload::Promotion(p) => p.previous_compensation,
            EventPayload::Raise(r) => r.previous_compensation,
            _ => continue,
        };
        if changed.insert(event.employee_id.clone()) {
            assert_eq!(Some(&previous), earned.get(&event.employee_id), "{}", event.employee_id);
        }
    }
    assert!(!changed.is_empty());

    let next: Vec<EmployeeYearState<EmploymentAttributes>> =
        select(store.as_ref(), employment::TABLE, Filter::year(2026)).await.unwrap();
    for job in next.iter().filter(|j| !changed.contains(&j.employee_id)) {
        if let Some(prior) = earned.get(&job.employee_id) {
            assert_eq!(&job.attributes.full_year_compensation, prior);
        }
    }
}

/// Generator whose every run fails.
struct AlwaysFails;

impl EventGenerator for AlwaysFails {
    fn name(&self) -> &'static str {
        "always_fails"
    }

    fn event_types(&self) -> &'static [EventType] {
        &[EventType::Raise]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::ParallelSafe
    }

    fn generate(
        &self,
        _ctx: &GenerationContext,
        _upstream: &Upstream,
    ) -> Result<Vec<EventDraft>, GeneratorError> {
        Err(GeneratorError::InvalidParameters {
            reason: "merit table unreadable".to_owned(),
        })
    }
}

#[tokio::test]
async fn failed_run_reports_the_stage_and_year_it_failed_in() {
    let store = seeded_store(20).await;
    let orchestrator =
        orchestrator(2025, 2026, store.clone()).with_generators(vec![Arc::new(AlwaysFails)]);
    let control = RunControl::new(RunId::new(), 2025, 2026);
    control.mark_running().await;

    let outcome = orchestrator.run(RunId::new(), false, &control, &NoOpObserver).await;
    control.finish(&outcome).await;
    let err = outcome.unwrap_err();
    assert_eq!(err.failed_at(), Some((2025, PipelineStage::EventGeneration)));
    assert!(matches!(err.root(), PipelineError::Generator(_)));

    let status = control.status().await;
    assert_eq!(status.state, RunState::Failed);
    assert_eq!(status.stage, Some(PipelineStage::EventGeneration));
    assert_eq!(status.simulation_year, Some(2025));
    let error = status.error.unwrap();
    assert_eq!(error.error_code, err.error_code());
    assert_eq!(error.context["stage"], "event_generation");
    assert_eq!(error.context["simulation_year"], 2025);
    assert!(common::year_rows(store.as_ref(), SIMULATION_EVENTS, 2025).await.is_empty());
}

#[tokio::test]
async fn manager_evicts_the_oldest_finished_runs() {
    let store: Arc<dyn AnalyticalStore> = seeded_store(10).await;
    let manager =
        RunManager::new(common::config(2025, 2025), Arc::clone(&store)).with_retained_runs(1);
    let request = RunRequest::from_config(&common::config(2025, 2025), false);

    let mut finished = Vec::new();
    for _ in 0..2 {
        let handle = manager.run(request.clone()).await.unwrap();
        finished.push(handle.run_id());
        handle.wait().await.unwrap();
    }
    assert!(manager.status(finished[0]).await.is_some());

    let handle = manager.run(request).await.unwrap();
    let latest = handle.run_id();
    assert!(manager.status(finished[0]).await.is_none());
    assert!(manager.status(finished[1]).await.is_some());
    handle.wait().await.unwrap();
    assert_eq!(manager.status(latest).await.unwrap().state, RunState::Completed);
}
