//! The event generator trait, its inputs, and year assembly.
//!
//! A year's events are produced by a fixed set of generators, each of which
//! declares the event types it may emit, the generators whose output it
//! reads, and how it may be scheduled. A generator is a pure function of its
//! [`GenerationContext`] and its dependencies' [`EventDraft`]s, so running
//! the set concurrently or in order yields the same drafts.
//!
//! Drafts carry no sequence or id. [`assemble_year_events`] orders each
//! employee's drafts, numbers them from 1 and derives the event ids.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;
use workforce_types::{
    EmployeeId, EventId, EventPayload, EventType, HireDetails, PlanDesignId, PromotionDetails,
    ScenarioId, SimulationEvent, TerminationKind,
};

use crate::error::GeneratorError;
use crate::hash::stable_uniform;
use crate::hiring::HiringPlan;
use crate::params::GeneratorParameters;
use crate::workforce::WorkforceMember;

/// How a generator may be scheduled within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExecutionMode {
    /// Must run alone, in plan order.
    Sequential,
    /// Has no dependencies and may run alongside any other step.
    ParallelSafe,
    /// May run concurrently once its dependencies have completed.
    Conditional,
}

/// An event before sequencing: who, when and what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    /// Employee the event applies to.
    pub employee_id: EmployeeId,
    /// Date the event takes effect.
    pub effective_date: NaiveDate,
    /// Type-specific payload.
    pub payload: EventPayload,
}

impl EventDraft {
    /// The draft's event type.
    pub const fn event_type(&self) -> EventType {
        self.payload.event_type()
    }
}

/// Read-only inputs shared by every generator for one year.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    /// Year being generated.
    pub simulation_year: i32,
    /// Scenario being simulated.
    pub scenario_id: ScenarioId,
    /// Plan design the scenario runs against.
    pub plan_design_id: PlanDesignId,
    /// Scenario seed for stable draws.
    pub seed: u64,
    /// Employees active at the start of the year, ordered by id.
    pub workforce: Arc<Vec<WorkforceMember>>,
    /// Hiring plan computed in Foundation.
    pub hiring: HiringPlan,
    /// Parameter tables and policies.
    pub params: Arc<GeneratorParameters>,
}

impl GenerationContext {
    /// Stable draw in `[0, 1)` for an employee and decision family.
    pub fn draw(&self, employee_id: &EmployeeId, salt: &str) -> Decimal {
        stable_uniform(self.seed, employee_id.as_str(), self.simulation_year, salt)
    }
}

/// Outputs of a generator's declared dependencies, keyed by generator name.
#[derive(Debug, Clone, Default)]
pub struct Upstream {
    outputs: BTreeMap<&'static str, Arc<Vec<EventDraft>>>,
}

impl Upstream {
    /// Empty upstream, for generators without dependencies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one dependency's output.
    pub fn insert(&mut self, generator: &'static str, drafts: Arc<Vec<EventDraft>>) {
        self.outputs.insert(generator, drafts);
    }

    /// Whether the named generator's output is present.
    pub fn contains(&self, generator: &str) -> bool {
        self.outputs.contains_key(generator)
    }

    fn drafts(&self) -> impl Iterator<Item = &EventDraft> {
        self.outputs.values().flat_map(|d| d.iter())
    }

    /// Termination dates of every upstream termination.
    pub fn termination_dates(&self) -> BTreeMap<EmployeeId, NaiveDate> {
        self.drafts()
            .filter(|d| d.event_type() == EventType::Termination)
            .map(|d| (d.employee_id.clone(), d.effective_date))
            .collect()
    }

    /// Number of upstream terminations of the given kind.
    pub fn termination_count(&self, kind: TerminationKind) -> u64 {
        let count = self
            .drafts()
            .filter(|d| matches!(&d.payload, EventPayload::Termination(t) if t.kind == kind))
            .count();
        u64::try_from(count).unwrap_or(u64::MAX)
    }

    /// Upstream hires with their details, ordered by employee id.
    pub fn hires(&self) -> Vec<(&EmployeeId, NaiveDate, &HireDetails)> {
        let mut hires: Vec<_> = self
            .drafts()
            .filter_map(|d| match &d.payload {
                EventPayload::Hire(h) => Some((&d.employee_id, d.effective_date, h)),
                _ => None,
            })
            .collect();
        hires.sort_by(|a, b| a.0.cmp(b.0));
        hires
    }

    /// Upstream promotions by employee.
    pub fn promotions(&self) -> BTreeMap<EmployeeId, (NaiveDate, &PromotionDetails)> {
        self.drafts()
            .filter_map(|d| match &d.payload {
                EventPayload::Promotion(p) => Some((d.employee_id.clone(), (d.effective_date, p))),
                _ => None,
            })
            .collect()
    }

    /// Upstream eligibility dates by employee.
    pub fn eligibility_dates(&self) -> BTreeMap<EmployeeId, NaiveDate> {
        self.drafts()
            .filter(|d| d.event_type() == EventType::Eligibility)
            .map(|d| (d.employee_id.clone(), d.effective_date))
            .collect()
    }
}

/// A family of business events.
pub trait EventGenerator: Send + Sync {
    /// Unique generator name, used in dependency declarations.
    fn name(&self) -> &'static str;

    /// The only event types this generator may emit.
    fn event_types(&self) -> &'static [EventType];

    /// Generators whose output this one reads.
    fn dependencies(&self) -> &'static [&'static str];

    /// Scheduling class.
    fn mode(&self) -> ExecutionMode;

    /// Produce this family's drafts for the context's year.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError`] if a policy computation overflows or a
    /// parameter table is unusable for the year.
    fn generate(
        &self,
        ctx: &GenerationContext,
        upstream: &Upstream,
    ) -> Result<Vec<EventDraft>, GeneratorError>;
}

/// Run one generator and reject any draft outside its declared types.
///
/// # Errors
///
/// Returns [`GeneratorError::UndeclaredEventType`] for the first offending
/// draft, or whatever the generator itself returned.
pub fn run_generator(
    generator: &dyn EventGenerator,
    ctx: &GenerationContext,
    upstream: &Upstream,
) -> Result<Vec<EventDraft>, GeneratorError> {
    let drafts = generator.generate(ctx, upstream)?;
    check_declared(generator, &drafts)?;
    debug!(
        generator = generator.name(),
        simulation_year = ctx.simulation_year,
        drafts = drafts.len(),
        "Generator finished"
    );
    Ok(drafts)
}

/// Reject drafts whose type the generator did not declare.
///
/// # Errors
///
/// Returns [`GeneratorError::UndeclaredEventType`] for the first offending
/// draft.
pub fn check_declared(
    generator: &dyn EventGenerator,
    drafts: &[EventDraft],
) -> Result<(), GeneratorError> {
    let declared = generator.event_types();
    match drafts.iter().find(|d| !declared.contains(&d.event_type())) {
        Some(draft) => Err(GeneratorError::UndeclaredEventType {
            generator: generator.name(),
            event_type: draft.event_type(),
        }),
        None => Ok(()),
    }
}

/// Collect the declared dependencies' outputs for `generator`.
///
/// Dependencies that have not produced output are skipped; the execution
/// plan guarantees they have by the time the generator runs.
pub fn upstream_for(
    generator: &dyn EventGenerator,
    outputs: &BTreeMap<&'static str, Arc<Vec<EventDraft>>>,
) -> Upstream {
    let mut upstream = Upstream::new();
    for dep in generator.dependencies() {
        if let Some((name, drafts)) = outputs.get_key_value(dep) {
            upstream.insert(name, Arc::clone(drafts));
        }
    }
    upstream
}

/// Run generators one after another in the given order.
///
/// This is the reference schedule: any concurrent schedule of the same plan
/// must produce the same outputs.
///
/// # Errors
///
/// Returns the first generator error.
pub fn run_in_order(
    generators: &[Arc<dyn EventGenerator>],
    ctx: &GenerationContext,
) -> Result<BTreeMap<&'static str, Arc<Vec<EventDraft>>>, GeneratorError> {
    let mut outputs = BTreeMap::new();
    for generator in generators {
        let upstream = upstream_for(generator.as_ref(), &outputs);
        let drafts = run_generator(generator.as_ref(), ctx, &upstream)?;
        outputs.insert(generator.name(), Arc::new(drafts));
    }
    Ok(outputs)
}

/// Turn the year's drafts into sequenced events with derived ids.
///
/// `drafts` must already be merged in plan order. Each employee's drafts are
/// sorted by effective date, then by fold order of their type; the sort is
/// stable so same-day same-type drafts keep plan order. The result is
/// ordered by employee id, then sequence.
pub fn assemble_year_events(
    ctx: &GenerationContext,
    drafts: Vec<EventDraft>,
) -> Vec<SimulationEvent> {
    let mut by_employee: BTreeMap<EmployeeId, Vec<EventDraft>> = BTreeMap::new();
    for draft in drafts {
        by_employee
            .entry(draft.employee_id.clone())
            .or_default()
            .push(draft);
    }

    let mut events = Vec::new();
    for (employee_id, mut own) in by_employee {
        own.sort_by_key(|d| (d.effective_date, d.event_type().fold_order()));
        for (sequence_in_year, draft) in (1_u32..).zip(own) {
            let mut event = SimulationEvent {
                event_id: EventId::derive(""),
                employee_id: employee_id.clone(),
                simulation_year: ctx.simulation_year,
                effective_date: draft.effective_date,
                scenario_id: ctx.scenario_id.clone(),
                plan_design_id: ctx.plan_design_id.clone(),
                event_type: draft.event_type(),
                payload: draft.payload,
                sequence_in_year,
            };
            event.event_id = EventId::derive(&event.stable_key());
            events.push(event);
        }
    }
    events
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use workforce_types::{RaiseDetails, TerminationDetails};

    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn ctx() -> GenerationContext {
        GenerationContext {
            simulation_year: 2025,
            scenario_id: ScenarioId::new("baseline"),
            plan_design_id: PlanDesignId::new("standard"),
            seed: 42,
            workforce: Arc::new(Vec::new()),
            hiring: HiringPlan::from_rates(0, dec!(0.12), dec!(0.03), dec!(0.25)).unwrap(),
            params: Arc::new(GeneratorParameters::default()),
        }
    }

    fn termination(id: &str, date: NaiveDate) -> EventDraft {
        EventDraft {
            employee_id: EmployeeId::new(id),
            effective_date: date,
            payload: EventPayload::Termination(TerminationDetails {
                kind: TerminationKind::Experienced,
                final_compensation: dec!(50000),
            }),
        }
    }

    fn raise(id: &str, date: NaiveDate) -> EventDraft {
        EventDraft {
            employee_id: EmployeeId::new(id),
            effective_date: date,
            payload: EventPayload::Raise(RaiseDetails {
                previous_compensation: dec!(50000),
                new_compensation: dec!(52000),
                merit_rate: dec!(0.02),
                cola_rate: dec!(0.02),
            }),
        }
    }

    struct Rogue;

    impl EventGenerator for Rogue {
        fn name(&self) -> &'static str {
            "rogue"
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
            Ok(vec![termination("E1", d(3, 1))])
        }
    }

    #[test]
    fn undeclared_event_types_are_rejected() {
        let err = run_generator(&Rogue, &ctx(), &Upstream::new()).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::UndeclaredEventType {
                generator: "rogue",
                event_type: EventType::Termination
            }
        ));
    }

    #[test]
    fn same_day_termination_sequences_after_raise() {
        let events = assemble_year_events(
            &ctx(),
            vec![termination("E1", d(7, 1)), raise("E1", d(7, 1)), raise("E0", d(7, 1))],
        );
        let e1: Vec<_> = events
            .iter()
            .filter(|e| e.employee_id.as_str() == "E1")
            .map(|e| (e.event_type, e.sequence_in_year))
            .collect();
        assert_eq!(e1, vec![(EventType::Raise, 1), (EventType::Termination, 2)]);
        assert_eq!(events.first().map(|e| e.employee_id.as_str()), Some("E0"));
    }

    #[test]
    fn event_ids_derive_from_stable_key() {
        let first = assemble_year_events(&ctx(), vec![raise("E1", d(7, 1))]);
        let second = assemble_year_events(&ctx(), vec![raise("E1", d(7, 1))]);
        assert_eq!(first, second);
        let event = first.first().unwrap();
        assert_eq!(event.event_id, EventId::derive(&event.stable_key()));
    }

    #[test]
    fn upstream_exposes_only_declared_dependencies() {
        let mut outputs = BTreeMap::new();
        outputs.insert("rogue", Arc::new(vec![termination("E1", d(2, 1))]));
        let upstream = upstream_for(&Rogue, &outputs);
        assert!(!upstream.contains("rogue"));
        assert!(upstream.termination_dates().is_empty());
    }
}
