//! Year dependency validator.
//!
//! Year N may be accumulated only when every registered accumulator has
//! year N-1 rows. The start year is exempt; it seeds from the census.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};
use workforce_db::store::count;
use workforce_db::{AnalyticalStore, Filter};

use crate::error::{DependencyGap, YearDependencyError};
use crate::registry::AccumulatorRegistry;

/// Checks the linear year chain against the store.
pub struct YearDependencyValidator {
    registry: Arc<AccumulatorRegistry>,
    store: Arc<dyn AnalyticalStore>,
    start_year: i32,
}

impl YearDependencyValidator {
    /// Validator for a run starting at `start_year`.
    pub fn new(
        registry: Arc<AccumulatorRegistry>,
        store: Arc<dyn AnalyticalStore>,
        start_year: i32,
    ) -> Self {
        Self {
            registry,
            store,
            start_year,
        }
    }

    /// Fail unless every accumulator has year N-1 state.
    pub async fn validate_year_dependencies(
        &self,
        simulation_year: i32,
    ) -> Result<(), YearDependencyError> {
        let Some(gap) = self.get_missing_years(simulation_year).await?.into_iter().next() else {
            debug!(simulation_year, "Year dependencies satisfied");
            return Ok(());
        };
        warn!(
            simulation_year,
            missing_year = gap.simulation_year,
            tables = ?gap.missing_tables,
            "Year dependency violation"
        );
        Err(YearDependencyError::MissingPriorYear {
            simulation_year,
            missing_year: gap.simulation_year,
            missing_tables: gap.missing_tables,
            row_counts: gap.row_counts,
            execution_order: (self.start_year..=simulation_year).collect(),
        })
    }

    /// The year N-1 gap, if any, without failing.
    ///
    /// Empty at the start year and when every table is populated.
    pub async fn get_missing_years(
        &self,
        simulation_year: i32,
    ) -> Result<Vec<DependencyGap>, YearDependencyError> {
        self.check_not_before_start(simulation_year)?;
        if simulation_year == self.start_year {
            return Ok(Vec::new());
        }
        let prior = simulation_year.saturating_sub(1);
        Ok(self.gap_for(prior).await?.into_iter().collect())
    }

    /// Walk the chain from the start year to the year before a checkpoint.
    pub async fn validate_checkpoint_dependencies(
        &self,
        checkpoint_year: i32,
    ) -> Result<(), YearDependencyError> {
        self.check_not_before_start(checkpoint_year)?;
        let mut gaps = Vec::new();
        for year in self.start_year..checkpoint_year {
            if let Some(gap) = self.gap_for(year).await? {
                gaps.push(gap);
            }
        }
        if gaps.is_empty() {
            Ok(())
        } else {
            Err(YearDependencyError::BrokenChain {
                checkpoint_year,
                gaps,
            })
        }
    }

    /// Configured start year.
    pub const fn start_year(&self) -> i32 {
        self.start_year
    }

    const fn check_not_before_start(
        &self,
        simulation_year: i32,
    ) -> Result<(), YearDependencyError> {
        if simulation_year < self.start_year {
            return Err(YearDependencyError::BeforeStartYear {
                simulation_year,
                start_year: self.start_year,
            });
        }
        Ok(())
    }

    // Each table is checked on its own; a populated table does not vouch
    // for another.
    async fn gap_for(&self, year: i32) -> Result<Option<DependencyGap>, YearDependencyError> {
        let mut missing_tables = Vec::new();
        let mut row_counts = BTreeMap::new();
        for table in self.registry.get_tables() {
            let rows = count(self.store.as_ref(), &table, Filter::year(year)).await?;
            if rows == 0 {
                missing_tables.push(table.clone());
            }
            row_counts.insert(table, rows);
        }
        Ok((!missing_tables.is_empty()).then_some(DependencyGap {
            simulation_year: year,
            missing_tables,
            row_counts,
        }))
    }
}
