//! Whole-year generation over a synthetic workforce.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use workforce_events::validate_event;
use workforce_generators::{
    EventDraft, GenerationContext, GeneratorParameters, HiringPlan, WorkforceMember,
    assemble_year_events, default_generators, new_hire_terminations, run_in_order,
};
use workforce_types::{
    EmployeeId, EnrollmentMethod, EnrollmentStatus, EventPayload, EventType, PlanDesignId,
    ScenarioId, TerminationKind,
};

fn member(i: u32) -> WorkforceMember {
    let level = u8::try_from(1 + i % 5).unwrap();
    let eligible = i % 3 != 0;
    let enrolled = eligible && i % 2 == 0;
    WorkforceMember {
        employee_id: EmployeeId::new(format!("EMP_{i:06}")),
        birth_date: NaiveDate::from_ymd_opt(
            1960 + i32::try_from(i % 40).unwrap(),
            1 + i % 12,
            1 + i % 28,
        )
        .unwrap(),
        hire_date: NaiveDate::from_ymd_opt(
            2000 + i32::try_from(i % 24).unwrap(),
            1 + i % 12,
            1 + i % 28,
        )
        .unwrap(),
        level,
        annual_compensation: Decimal::from(40_000 + 20_000 * u64::from(level)),
        is_eligible: eligible,
        eligibility_date: None,
        enrollment_status: if enrolled {
            EnrollmentStatus::Enrolled
        } else if eligible {
            EnrollmentStatus::EligibleNotEnrolled
        } else {
            EnrollmentStatus::NotEligible
        },
        enrollment_method: enrolled.then_some(EnrollmentMethod::Baseline),
        enrollment_date: None,
        deferral_rate: if enrolled {
            dec!(0.03) + Decimal::new(i64::from(i % 8), 2)
        } else {
            Decimal::ZERO
        },
        escalation_count: 0,
    }
}

fn context(params: GeneratorParameters, workforce: Vec<WorkforceMember>) -> GenerationContext {
    let w = &params.workforce;
    let hiring = HiringPlan::from_rates(
        u64::try_from(workforce.len()).unwrap(),
        w.planning_termination_rate,
        w.target_growth_rate,
        w.new_hire_termination_rate,
    )
    .unwrap();
    GenerationContext {
        simulation_year: 2025,
        scenario_id: ScenarioId::new("baseline"),
        plan_design_id: PlanDesignId::new("standard"),
        seed: 42,
        workforce: Arc::new(workforce),
        hiring,
        params: Arc::new(params),
    }
}

fn thousand() -> Vec<WorkforceMember> {
    (1..=1000).map(member).collect()
}

fn merged(outputs: &BTreeMap<&'static str, Arc<Vec<EventDraft>>>) -> Vec<EventDraft> {
    default_generators()
        .iter()
        .flat_map(|g| outputs.get(g.name()).map(|d| d.as_ref().clone()).unwrap_or_default())
        .collect()
}

#[test]
fn generation_is_reproducible_and_schema_valid() {
    let ctx = context(GeneratorParameters::default(), thousand());
    let generators = default_generators();
    let first = assemble_year_events(&ctx, merged(&run_in_order(&generators, &ctx).unwrap()));
    let second = assemble_year_events(&ctx, merged(&run_in_order(&generators, &ctx).unwrap()));
    assert_eq!(first, second);
    assert!(!first.is_empty());
    for event in &first {
        validate_event(event).unwrap();
        assert_eq!(event.effective_date.year(), 2025);
    }
}

#[test]
fn hires_cover_actual_terminations_and_attrition() {
    let ctx = context(GeneratorParameters::default(), thousand());
    let outputs = run_in_order(&default_generators(), &ctx).unwrap();
    let experienced = outputs["experienced_termination"].len();
    let hires = outputs["hire"].len();
    let leavers = outputs["new_hire_termination"].len();

    let expected_hires = ctx.hiring.hires_for(u64::try_from(experienced).unwrap()).unwrap();
    assert_eq!(u64::try_from(hires).unwrap(), expected_hires);
    assert_eq!(
        u64::try_from(leavers).unwrap(),
        new_hire_terminations(expected_hires, dec!(0.25)).unwrap()
    );
    assert!(outputs["new_hire_termination"].iter().all(|d| matches!(
        &d.payload,
        EventPayload::Termination(t) if t.kind == TerminationKind::NewHire
            && d.employee_id.as_str().starts_with("NH_2025_")
    )));
    // Roughly the base hazard across the synthetic population.
    assert!((40..250).contains(&experienced), "{experienced} experienced terminations");
}

#[test]
fn raises_compound_on_promotions() {
    let mut params = GeneratorParameters::default();
    params.promotion_hazards.base_rate = Decimal::ONE;
    params.promotion_hazards.entries.clear();
    params.termination_hazards.base_rate = Decimal::ZERO;
    params.termination_hazards.entries.clear();
    let ctx = context(params, thousand());
    let outputs = run_in_order(&default_generators(), &ctx).unwrap();

    let promoted: BTreeMap<_, _> = outputs["promotion"]
        .iter()
        .filter_map(|d| match &d.payload {
            EventPayload::Promotion(p) => Some((d.employee_id.clone(), p.clone())),
            _ => None,
        })
        .collect();
    // Everyone below the top level is promoted.
    assert_eq!(promoted.len(), 800);
    for draft in outputs["raise"].iter() {
        let EventPayload::Raise(raise) = &draft.payload else {
            panic!("raise generator emitted {:?}", draft.event_type());
        };
        if let Some(p) = promoted.get(&draft.employee_id) {
            assert_eq!(raise.previous_compensation, p.new_compensation);
        }
        assert!(raise.new_compensation > raise.previous_compensation);
    }
    assert_eq!(outputs["raise"].len(), 1000);
}

#[test]
fn escalation_stops_at_the_cap() {
    let mut near_cap = member(2);
    near_cap.deferral_rate = dec!(0.095);
    let mut at_cap = member(4);
    at_cap.deferral_rate = dec!(0.10);
    let mut params = GeneratorParameters::default();
    params.termination_hazards.base_rate = Decimal::ZERO;
    params.termination_hazards.entries.clear();
    let ctx = context(params, vec![near_cap, at_cap]);
    let outputs = run_in_order(&default_generators(), &ctx).unwrap();

    let escalations = &outputs["deferral_escalation"];
    assert_eq!(escalations.len(), 1);
    let draft = escalations.first().unwrap();
    assert_eq!(draft.employee_id.as_str(), "EMP_000002");
    assert!(matches!(
        &draft.payload,
        EventPayload::DeferralEscalation(e) if e.new_rate == dec!(0.10) && e.escalation_number == 1
    ));
}

#[test]
fn auto_enrollment_follows_eligibility() {
    let ctx = context(GeneratorParameters::default(), thousand());
    let outputs = run_in_order(&default_generators(), &ctx).unwrap();
    let eligible: BTreeMap<_, _> = outputs["eligibility"]
        .iter()
        .map(|d| (d.employee_id.clone(), d.effective_date))
        .collect();
    let auto: Vec<_> = outputs["enrollment"]
        .iter()
        .filter(|d| {
            matches!(&d.payload, EventPayload::Enrollment(e) if e.method == EnrollmentMethod::Auto)
        })
        .collect();
    assert_eq!(auto.len(), eligible.len());
    for draft in auto {
        assert_eq!(eligible.get(&draft.employee_id), Some(&draft.effective_date));
    }
    for draft in outputs["enrollment"].iter() {
        if draft.event_type() == EventType::EnrollmentOptOut {
            let on = eligible[&draft.employee_id];
            assert!(draft.effective_date >= on);
            assert!(draft.effective_date <= on + chrono::Days::new(60));
        }
    }
}
