//! Append and query operations on `fct_simulation_events`.
//!
//! Events are the source of truth for the simulation's history. A year is
//! written as a unit: [`EventStore::append`] validates the whole batch and
//! then replaces the year's partition, so re-running a year never leaves
//! stale or duplicated events behind.

use std::collections::BTreeSet;

use serde_json::Value;
use workforce_db::store::{count, delete_year, replace_year, select};
use workforce_db::tables::SIMULATION_EVENTS;
use workforce_db::{AnalyticalStore, Filter};
use workforce_types::{EmployeeId, EventType, SimulationEvent};

use crate::error::EventStoreError;
use crate::schema::validate_event;

/// Operations on the simulation event table.
pub struct EventStore<'a> {
    store: &'a dyn AnalyticalStore,
}

impl<'a> EventStore<'a> {
    /// Create an event store over an analytical store.
    pub const fn new(store: &'a dyn AnalyticalStore) -> Self {
        Self { store }
    }

    /// Validate `events` and make them the complete event set of
    /// `simulation_year`.
    ///
    /// Every event must declare `simulation_year` and pass its schema
    /// rules; a single rejection writes nothing. Any events previously
    /// stored for the year are deleted in the same statement.
    ///
    /// Returns the number of events written.
    pub async fn append(
        &self,
        simulation_year: i32,
        events: &[SimulationEvent],
    ) -> Result<usize, EventStoreError> {
        let mut seen = BTreeSet::new();
        for event in events {
            if event.simulation_year != simulation_year {
                return Err(EventStoreError::YearMismatch {
                    expected: simulation_year,
                    found: event.simulation_year,
                    employee_id: event.employee_id.to_string(),
                });
            }
            validate_event(event)?;
            if !seen.insert(event.event_id) {
                return Err(EventStoreError::DuplicateEventId {
                    event_id: event.event_id,
                });
            }
        }

        replace_year(self.store, SIMULATION_EVENTS, simulation_year, events).await?;
        tracing::debug!(
            simulation_year,
            count = events.len(),
            "Appended simulation events"
        );
        Ok(events.len())
    }

    /// Events of one year, optionally narrowed to an employee and a type.
    ///
    /// Ordered by employee, then by `sequence_in_year`.
    pub async fn events_for(
        &self,
        employee_id: Option<&EmployeeId>,
        simulation_year: i32,
        event_type: Option<EventType>,
    ) -> Result<Vec<SimulationEvent>, EventStoreError> {
        let mut filter = Filter::year(simulation_year);
        if let Some(id) = employee_id {
            filter = filter.with_employee(id.as_str());
        }
        if let Some(t) = event_type {
            filter = filter.with_eq("event_type", Value::from(t.as_str()));
        }
        let mut events: Vec<SimulationEvent> = select(self.store, SIMULATION_EVENTS, filter).await?;
        events.sort_by(|a, b| {
            a.employee_id
                .cmp(&b.employee_id)
                .then(a.sequence_in_year.cmp(&b.sequence_in_year))
        });
        Ok(events)
    }

    /// Number of events stored for a year.
    pub async fn count_for_year(&self, simulation_year: i32) -> Result<u64, EventStoreError> {
        Ok(count(self.store, SIMULATION_EVENTS, Filter::year(simulation_year)).await?)
    }

    /// Delete every event of a year.
    pub async fn delete_year(&self, simulation_year: i32) -> Result<(), EventStoreError> {
        delete_year(self.store, SIMULATION_EVENTS, simulation_year).await?;
        tracing::info!(simulation_year, "Deleted simulation events for year");
        Ok(())
    }
}
