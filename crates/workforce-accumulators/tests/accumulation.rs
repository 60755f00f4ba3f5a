//! Accumulators, registry and year dependency validator against the
//! in-memory store.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use workforce_accumulators::{
    AccumulatorError, AccumulatorRegistry, DeferralAttributes, EmploymentAttributes,
    EnrollmentAttributes, FoldInput, RegistryError, StateAccumulator, YearDependencyError,
    YearDependencyValidator,
};
use workforce_db::statement::from_rows;
use workforce_db::{AnalyticalStore, MemoryStore, Row};
use workforce_types::{
    BaselineEmployee, DeferralEscalationDetails, EmployeeId, EmployeeYearState, EnrollmentDetails,
    EnrollmentMethod, EnrollmentStatus, EventId, EventPayload, HireDetails, PlanDesignId,
    Provenance, ScenarioId, SimulationEvent, StateAccumulatorContract, TerminationDetails,
    TerminationKind,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn census(id: &str, enrolled: bool) -> BaselineEmployee {
    BaselineEmployee {
        employee_id: EmployeeId::new(id),
        birth_date: d(1980, 2, 2),
        hire_date: d(2015, 3, 1),
        level: 2,
        annual_compensation: dec!(70000),
        is_eligible: true,
        eligibility_date: Some(d(2015, 6, 1)),
        is_enrolled: enrolled,
        enrollment_date: enrolled.then(|| d(2015, 6, 1)),
        deferral_rate: if enrolled { dec!(0.05) } else { Decimal::ZERO },
    }
}

fn event(
    id: &str,
    year: i32,
    date: NaiveDate,
    sequence: u32,
    payload: EventPayload,
) -> SimulationEvent {
    SimulationEvent {
        event_id: EventId::derive(&format!("{id}:{year}:{sequence}")),
        employee_id: EmployeeId::new(id),
        simulation_year: year,
        effective_date: date,
        scenario_id: ScenarioId::new("baseline"),
        plan_design_id: PlanDesignId::new("standard"),
        event_type: payload.event_type(),
        payload,
        sequence_in_year: sequence,
    }
}

fn termination(id: &str, year: i32) -> SimulationEvent {
    event(
        id,
        year,
        d(year, 5, 15),
        1,
        EventPayload::Termination(TerminationDetails {
            kind: TerminationKind::Experienced,
            final_compensation: dec!(70000),
        }),
    )
}

fn hire(id: &str, year: i32) -> SimulationEvent {
    event(
        id,
        year,
        d(year, 9, 1),
        1,
        EventPayload::Hire(HireDetails {
            level: 1,
            annual_compensation: dec!(50000),
            birth_date: d(1998, 1, 1),
        }),
    )
}

async fn run_year(
    registry: &AccumulatorRegistry,
    store: &dyn AnalyticalStore,
    year: i32,
    baseline: &[BaselineEmployee],
    events: &[SimulationEvent],
) -> Vec<Vec<Row>> {
    let input = FoldInput {
        simulation_year: year,
        start_year: 2025,
        baseline,
        events,
    };
    let mut out = Vec::new();
    for acc in registry.accumulators() {
        out.push(acc.accumulate(store, &input).await.unwrap());
    }
    out
}

#[tokio::test]
async fn start_year_seeds_from_baseline_without_reading_prior_state() {
    let registry = AccumulatorRegistry::with_defaults().unwrap();
    let store = MemoryStore::with_statement_log();
    let baseline = vec![census("EMP_1", true), census("EMP_2", false)];

    let rows = run_year(&registry, &store, 2025, &baseline, &[]).await;
    let employment: Vec<EmployeeYearState<EmploymentAttributes>> =
        from_rows(rows[0].clone()).unwrap();
    assert_eq!(employment.len(), 2);
    assert!(employment.iter().all(|r| r.provenance == Provenance::Baseline));

    let log = store.statement_log().await;
    assert!(log.iter().all(|r| r.kind != "select"));
    assert_eq!(log.iter().filter(|r| r.kind == "replace_year").count(), 3);
}

#[tokio::test]
async fn later_years_read_only_their_own_prior_year() {
    let registry = AccumulatorRegistry::with_defaults().unwrap();
    let store = MemoryStore::with_statement_log();
    let baseline = vec![census("EMP_1", true), census("EMP_2", false)];
    run_year(&registry, &store, 2025, &baseline, &[]).await;
    store.clear_statement_log().await;

    run_year(&registry, &store, 2026, &baseline, &[termination("EMP_2", 2026)]).await;

    let reads: Vec<_> = store
        .statement_log()
        .await
        .into_iter()
        .filter(|r| r.kind == "select")
        .map(|r| (r.table, r.simulation_year))
        .collect();
    let expected: Vec<_> = registry
        .get_tables()
        .into_iter()
        .map(|t| (t, Some(2025)))
        .collect();
    assert_eq!(reads, expected);
}

#[tokio::test]
async fn terminated_rows_close_and_are_not_carried() {
    let registry = AccumulatorRegistry::with_defaults().unwrap();
    let store = MemoryStore::new();
    let baseline = vec![census("EMP_1", true), census("EMP_2", false)];
    run_year(&registry, &store, 2025, &baseline, &[termination("EMP_2", 2025)]).await;
    let rows = run_year(&registry, &store, 2026, &[], &[hire("NH_2026_000001", 2026)]).await;

    let employment: Vec<EmployeeYearState<EmploymentAttributes>> =
        from_rows(rows[0].clone()).unwrap();
    let ids: Vec<_> = employment.iter().map(|r| r.employee_id.as_str()).collect();
    assert_eq!(ids, vec!["EMP_1", "NH_2026_000001"]);
    assert_eq!(employment[0].provenance, Provenance::PriorYearAccumulator);
    assert_eq!(employment[0].attributes.prorated_compensation, dec!(70000.00));
    assert!(employment[1].attributes.is_new_hire);
    assert_eq!(employment[1].provenance, Provenance::CurrentYearEvent);
}

#[tokio::test]
async fn enrollment_and_escalation_fold_into_separate_tables() {
    let registry = AccumulatorRegistry::with_defaults().unwrap();
    let store = MemoryStore::new();
    let baseline = vec![census("EMP_1", true), census("EMP_2", false)];
    run_year(&registry, &store, 2025, &baseline, &[]).await;

    let events = vec![
        event(
            "EMP_1",
            2026,
            d(2026, 3, 1),
            1,
            EventPayload::DeferralEscalation(DeferralEscalationDetails {
                previous_rate: dec!(0.05),
                new_rate: dec!(0.06),
                escalation_number: 1,
            }),
        ),
        event(
            "EMP_2",
            2026,
            d(2026, 4, 1),
            1,
            EventPayload::Enrollment(EnrollmentDetails {
                method: EnrollmentMethod::Voluntary,
                deferral_rate: dec!(0.06),
            }),
        ),
    ];
    let rows = run_year(&registry, &store, 2026, &[], &events).await;
    let enrollment: Vec<EmployeeYearState<EnrollmentAttributes>> =
        from_rows(rows[1].clone()).unwrap();
    let deferral: Vec<EmployeeYearState<DeferralAttributes>> =
        from_rows(rows[2].clone()).unwrap();

    assert_eq!(enrollment[0].provenance, Provenance::PriorYearAccumulator);
    assert_eq!(enrollment[1].attributes.enrollment_status, EnrollmentStatus::Enrolled);
    assert_eq!(enrollment[1].attributes.enrollment_method, Some(EnrollmentMethod::Voluntary));
    assert_eq!(deferral[0].attributes.deferral_rate, dec!(0.06));
    assert_eq!(deferral[0].attributes.escalation_count, 1);
    assert_eq!(deferral[1].attributes.deferral_rate, dec!(0.06));
}

#[tokio::test]
async fn events_for_unknown_employees_are_rejected() {
    let registry = AccumulatorRegistry::with_defaults().unwrap();
    let store = MemoryStore::new();
    let input = FoldInput {
        simulation_year: 2025,
        start_year: 2025,
        baseline: &[],
        events: &[termination("GHOST", 2025)],
    };
    let err = registry.accumulators()[0]
        .accumulate(&store, &input)
        .await
        .unwrap_err();
    assert!(matches!(err, AccumulatorError::OrphanEvents { .. }));
}

#[tokio::test]
async fn events_of_another_year_breach_the_contract() {
    let registry = AccumulatorRegistry::with_defaults().unwrap();
    let store = MemoryStore::new();
    let baseline = vec![census("EMP_1", true)];
    let input = FoldInput {
        simulation_year: 2025,
        start_year: 2025,
        baseline: &baseline,
        events: &[termination("EMP_1", 2024)],
    };
    let err = registry.accumulators()[0]
        .accumulate(&store, &input)
        .await
        .unwrap_err();
    assert!(matches!(err, AccumulatorError::ContractViolation { .. }));
}

#[tokio::test]
async fn missing_prior_year_fails_naming_every_table() {
    let registry = Arc::new(AccumulatorRegistry::with_defaults().unwrap());
    let memory = Arc::new(MemoryStore::with_statement_log());
    let store: Arc<dyn AnalyticalStore> = memory.clone();
    run_year(&registry, store.as_ref(), 2025, &[census("EMP_1", true)], &[]).await;
    memory.clear_statement_log().await;
    let validator = YearDependencyValidator::new(Arc::clone(&registry), store, 2025);

    let err = validator.validate_year_dependencies(2027).await.unwrap_err();
    match err {
        YearDependencyError::MissingPriorYear {
            simulation_year,
            missing_year,
            missing_tables,
            row_counts,
            execution_order,
        } => {
            assert_eq!(simulation_year, 2027);
            assert_eq!(missing_year, 2026);
            assert_eq!(missing_tables, registry.get_tables());
            assert_eq!(row_counts.len(), missing_tables.len());
            assert!(row_counts.values().all(|rows| *rows == 0));
            assert_eq!(execution_order, vec![2025, 2026, 2027]);
        }
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(validator.get_missing_years(2027).await.unwrap().len(), 1);
    let log = memory.statement_log().await;
    assert!(log.iter().all(|r| r.kind == "count"));
    assert!(log.iter().all(|r| r.simulation_year == Some(2026)));
}

#[tokio::test]
async fn start_year_is_exempt_and_earlier_years_are_rejected() {
    let registry = Arc::new(AccumulatorRegistry::with_defaults().unwrap());
    let store: Arc<dyn AnalyticalStore> = Arc::new(MemoryStore::new());
    let validator = YearDependencyValidator::new(registry, store, 2025);

    assert!(validator.validate_year_dependencies(2025).await.is_ok());
    assert!(matches!(
        validator.validate_year_dependencies(2024).await,
        Err(YearDependencyError::BeforeStartYear { .. })
    ));
}

#[tokio::test]
async fn checkpoint_chain_reports_every_gap() {
    let registry = Arc::new(AccumulatorRegistry::with_defaults().unwrap());
    let store: Arc<dyn AnalyticalStore> = Arc::new(MemoryStore::new());
    run_year(&registry, store.as_ref(), 2025, &[census("EMP_1", true)], &[]).await;
    let validator = YearDependencyValidator::new(Arc::clone(&registry), Arc::clone(&store), 2025);

    assert!(validator.validate_checkpoint_dependencies(2026).await.is_ok());
    let Err(YearDependencyError::BrokenChain { gaps, .. }) =
        validator.validate_checkpoint_dependencies(2028).await
    else {
        panic!("expected a broken chain");
    };
    let years: Vec<_> = gaps.iter().map(|g| g.simulation_year).collect();
    assert_eq!(years, vec![2026, 2027]);
}

struct Impostor(StateAccumulatorContract);

#[async_trait]
impl StateAccumulator for Impostor {
    fn contract(&self) -> &StateAccumulatorContract {
        &self.0
    }

    async fn accumulate(
        &self,
        _store: &dyn AnalyticalStore,
        _input: &FoldInput<'_>,
    ) -> Result<Vec<Row>, AccumulatorError> {
        Ok(Vec::new())
    }
}

#[test]
fn a_table_has_a_single_owner() {
    let mut registry = AccumulatorRegistry::with_defaults().unwrap();
    let table = "int_employment_state_accumulator";
    let err = registry
        .register(Arc::new(Impostor(StateAccumulatorContract {
            model_name: "shadow_employment".to_owned(),
            target_table: table.to_owned(),
            prior_year_source: table.to_owned(),
            start_year_source: "baseline_workforce".to_owned(),
            description: "writes someone else's table".to_owned(),
        })))
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::DuplicateTable {
            table: table.to_owned(),
            owner: "employment_state".to_owned(),
        }
    );
}
