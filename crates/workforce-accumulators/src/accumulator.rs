//! The accumulator contract in code, and the year fold every accumulator
//! shares.
//!
//! A year's state is an explicit two-input fold:
//!
//! ```text
//! (year N-1 own rows | baseline at start year, year N events) -> year N rows
//! ```
//!
//! Opening state comes from the baseline census at the start year and from
//! the accumulator's own active year N-1 rows afterwards. An employee
//! without opening state must be opened by a hire. Each employee's events
//! are applied in sequence order; a termination closes the row
//! (`is_active = false`) and closed rows are not carried into N+1.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use workforce_db::statement::to_rows;
use workforce_db::store::select;
use workforce_db::{AnalyticalStore, Filter, Row, Statement};
use workforce_types::{
    BaselineEmployee, EmployeeId, EmployeeYearState, EventType, Provenance, SimulationEvent,
    StateAccumulatorContract,
};

use crate::error::AccumulatorError;

/// Year-N inputs shared by every accumulator.
#[derive(Debug, Clone, Copy)]
pub struct FoldInput<'a> {
    /// Year being accumulated.
    pub simulation_year: i32,
    /// Configured start year of the run.
    pub start_year: i32,
    /// Census rows; read only when `simulation_year == start_year`.
    pub baseline: &'a [BaselineEmployee],
    /// Every event of `simulation_year`.
    pub events: &'a [SimulationEvent],
}

impl FoldInput<'_> {
    /// Whether the year seeds from the baseline census.
    pub const fn is_start_year(&self) -> bool {
        self.simulation_year == self.start_year
    }
}

/// A typed accumulator: how one table's attributes open, carry, change and
/// close.
pub trait Accumulator: Send + Sync + 'static {
    /// Attributes stored in the accumulator's table next to the common
    /// state columns.
    type Attributes: Serialize + DeserializeOwned + Clone + Send + Sync;

    /// The accumulator's registered contract.
    fn contract(&self) -> &StateAccumulatorContract;

    /// Opening attributes of a census employee at the start year.
    fn seed(&self, employee: &BaselineEmployee) -> Self::Attributes;

    /// Opening attributes carried from the employee's year N-1 row.
    fn carry(&self, prior: &Self::Attributes) -> Self::Attributes {
        prior.clone()
    }

    /// Opening attributes of an employee hired this year, from the hire
    /// event. `None` if the event is not a hire.
    fn open(&self, hire: &SimulationEvent) -> Option<Self::Attributes>;

    /// Fold one event into the attributes. Returns whether the event
    /// concerned this accumulator.
    fn apply(
        &self,
        attributes: &mut Self::Attributes,
        event: &SimulationEvent,
    ) -> Result<bool, AccumulatorError>;

    /// Final pass over an employee's year, after every event is applied.
    fn finish(
        &self,
        _attributes: &mut Self::Attributes,
        _simulation_year: i32,
        _events: &[&SimulationEvent],
    ) -> Result<(), AccumulatorError> {
        Ok(())
    }
}

/// Fold one year for a typed accumulator.
///
/// `prior` must hold only the accumulator's own year N-1 rows, and must be
/// empty at the start year. Output is ordered by employee id.
pub fn fold_year<T: Accumulator>(
    accumulator: &T,
    input: &FoldInput<'_>,
    prior: Vec<EmployeeYearState<T::Attributes>>,
) -> Result<Vec<EmployeeYearState<T::Attributes>>, AccumulatorError> {
    let contract = accumulator.contract();
    let year = input.simulation_year;
    let violation = |reason: String| AccumulatorError::ContractViolation {
        model: contract.model_name.clone(),
        reason,
    };

    let mut opening: BTreeMap<EmployeeId, (T::Attributes, Provenance)> = BTreeMap::new();
    if input.is_start_year() {
        if !prior.is_empty() {
            return Err(violation(format!(
                "start year {year} must seed from {}, not prior-year rows",
                contract.start_year_source
            )));
        }
        for employee in input.baseline {
            opening.insert(
                employee.employee_id.clone(),
                (accumulator.seed(employee), Provenance::Baseline),
            );
        }
    } else {
        let expected = year.saturating_sub(1);
        for row in prior {
            if row.simulation_year != expected {
                return Err(violation(format!(
                    "read {} rows of year {} while accumulating {year}",
                    contract.prior_year_source, row.simulation_year
                )));
            }
            if row.is_active {
                opening.insert(
                    row.employee_id,
                    (accumulator.carry(&row.attributes), Provenance::PriorYearAccumulator),
                );
            }
        }
    }

    let mut by_employee: BTreeMap<EmployeeId, Vec<&SimulationEvent>> = BTreeMap::new();
    for event in input.events {
        if event.simulation_year != year {
            return Err(violation(format!(
                "received a {} event of year {} while accumulating {year}",
                event.event_type, event.simulation_year
            )));
        }
        by_employee
            .entry(event.employee_id.clone())
            .or_default()
            .push(event);
    }
    for events in by_employee.values_mut() {
        events.sort_by_key(|e| e.sequence_in_year);
    }

    let mut employees: Vec<EmployeeId> = opening.keys().cloned().collect();
    employees.extend(by_employee.keys().filter(|id| !opening.contains_key(*id)).cloned());
    employees.sort();

    let mut rows = Vec::with_capacity(employees.len());
    for employee_id in employees {
        let events = by_employee.remove(&employee_id).unwrap_or_default();
        let (mut attributes, mut provenance) = match opening.remove(&employee_id) {
            Some(open) => open,
            None => events
                .iter()
                .find(|e| e.event_type == EventType::Hire)
                .and_then(|hire| accumulator.open(hire))
                .map(|a| (a, Provenance::CurrentYearEvent))
                .ok_or_else(|| AccumulatorError::OrphanEvents {
                    model: contract.model_name.clone(),
                    employee_id: employee_id.to_string(),
                    simulation_year: year,
                })?,
        };

        let mut is_active = true;
        for event in &events {
            let touched = accumulator.apply(&mut attributes, event)?;
            let terminated = event.event_type == EventType::Termination;
            if terminated {
                is_active = false;
            }
            if touched || terminated {
                provenance = Provenance::CurrentYearEvent;
            }
        }
        accumulator.finish(&mut attributes, year, &events)?;

        rows.push(EmployeeYearState {
            employee_id,
            simulation_year: year,
            is_active,
            provenance,
            attributes,
        });
    }
    Ok(rows)
}

/// An accumulator as the registry and the orchestrator see it.
#[async_trait]
pub trait StateAccumulator: Send + Sync {
    /// The accumulator's contract.
    fn contract(&self) -> &StateAccumulatorContract;

    /// Read year N-1 own state (none at the start year), fold year N and
    /// replace the year-N partition of the target table.
    ///
    /// Returns the rows written.
    async fn accumulate(
        &self,
        store: &dyn AnalyticalStore,
        input: &FoldInput<'_>,
    ) -> Result<Vec<Row>, AccumulatorError>;
}

/// Adapter from a typed [`Accumulator`] to [`StateAccumulator`].
#[derive(Debug)]
pub struct Typed<T>(pub T);

/// Box a typed accumulator for registration.
pub fn erase<T: Accumulator>(accumulator: T) -> Arc<dyn StateAccumulator> {
    Arc::new(Typed(accumulator))
}

#[async_trait]
impl<T: Accumulator> StateAccumulator for Typed<T> {
    fn contract(&self) -> &StateAccumulatorContract {
        self.0.contract()
    }

    async fn accumulate(
        &self,
        store: &dyn AnalyticalStore,
        input: &FoldInput<'_>,
    ) -> Result<Vec<Row>, AccumulatorError> {
        let contract = self.0.contract();
        let prior: Vec<EmployeeYearState<T::Attributes>> = if input.is_start_year() {
            Vec::new()
        } else {
            select(
                store,
                &contract.prior_year_source,
                Filter::year(input.simulation_year.saturating_sub(1)),
            )
            .await?
        };
        let carried = prior.len();
        let state = fold_year(&self.0, input, prior)?;
        let rows = to_rows(&contract.target_table, &state)?;
        store
            .execute(Statement::ReplaceYear {
                table: contract.target_table.clone(),
                simulation_year: input.simulation_year,
                rows: rows.clone(),
            })
            .await?;
        debug!(
            model = %contract.model_name,
            simulation_year = input.simulation_year,
            prior_rows = carried,
            events = input.events.len(),
            rows = rows.len(),
            "Accumulator folded"
        );
        info!(
            model = %contract.model_name,
            table = %contract.target_table,
            simulation_year = input.simulation_year,
            active = state.iter().filter(|s| s.is_active).count(),
            "State accumulated"
        );
        Ok(rows)
    }
}
