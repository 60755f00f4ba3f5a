//! The accumulator registry.
//!
//! Built once at startup and shared as `Arc<AccumulatorRegistry>`.
//! Registration order is execution order. A contract is validated when it
//! is registered; any failure is fatal at startup.

use std::sync::Arc;

use tracing::info;
use workforce_db::tables::BASELINE_WORKFORCE;
use workforce_types::StateAccumulatorContract;

use crate::accumulator::{StateAccumulator, erase};
use crate::deferral::DeferralRateAccumulator;
use crate::employment::EmploymentAccumulator;
use crate::enrollment::EnrollmentAccumulator;
use crate::error::RegistryError;

/// Contract of a self-referencing accumulator seeded from the census.
pub fn contract(
    model_name: &str,
    target_table: &str,
    description: &str,
) -> StateAccumulatorContract {
    StateAccumulatorContract {
        model_name: model_name.to_owned(),
        target_table: target_table.to_owned(),
        prior_year_source: target_table.to_owned(),
        start_year_source: BASELINE_WORKFORCE.to_owned(),
        description: description.to_owned(),
    }
}

/// Check a contract on its own: every field set, prior-year source is the
/// target table itself.
pub fn validate_contract(contract: &StateAccumulatorContract) -> Result<(), RegistryError> {
    let invalid = |reason: &str| RegistryError::InvalidContract {
        model_name: contract.model_name.clone(),
        reason: reason.to_owned(),
    };
    for (field, value) in [
        ("model_name", &contract.model_name),
        ("target_table", &contract.target_table),
        ("prior_year_source", &contract.prior_year_source),
        ("start_year_source", &contract.start_year_source),
        ("description", &contract.description),
    ] {
        if value.trim().is_empty() {
            return Err(invalid(&format!("{field} is empty")));
        }
    }
    if contract.prior_year_source != contract.target_table {
        return Err(invalid(&format!(
            "prior_year_source {} must be the target table {}",
            contract.prior_year_source, contract.target_table
        )));
    }
    if contract.start_year_source == contract.target_table {
        return Err(invalid("start_year_source must not be the target table"));
    }
    Ok(())
}

/// Every registered accumulator, in execution order.
#[derive(Default)]
pub struct AccumulatorRegistry {
    accumulators: Vec<Arc<dyn StateAccumulator>>,
}

impl core::fmt::Debug for AccumulatorRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccumulatorRegistry")
            .field("models", &self.names())
            .finish()
    }
}

impl AccumulatorRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the employment, enrollment and deferral-rate
    /// accumulators, in that order.
    pub fn with_defaults() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register(erase(EmploymentAccumulator::new()))?;
        registry.register(erase(EnrollmentAccumulator::new()))?;
        registry.register(erase(DeferralRateAccumulator::new()))?;
        Ok(registry)
    }

    /// Register an accumulator after validating its contract.
    pub fn register(
        &mut self,
        accumulator: Arc<dyn StateAccumulator>,
    ) -> Result<(), RegistryError> {
        let contract = accumulator.contract();
        validate_contract(contract)?;
        for existing in &self.accumulators {
            let other = existing.contract();
            if other.model_name == contract.model_name {
                return Err(RegistryError::DuplicateName {
                    model_name: contract.model_name.clone(),
                });
            }
            if other.target_table == contract.target_table {
                return Err(RegistryError::DuplicateTable {
                    table: contract.target_table.clone(),
                    owner: other.model_name.clone(),
                });
            }
        }
        info!(
            model = %contract.model_name,
            table = %contract.target_table,
            "Accumulator registered"
        );
        self.accumulators.push(accumulator);
        Ok(())
    }

    /// Look up an accumulator by model name.
    pub fn get(&self, model_name: &str) -> Result<Arc<dyn StateAccumulator>, RegistryError> {
        self.accumulators
            .iter()
            .find(|a| a.contract().model_name == model_name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                model_name: model_name.to_owned(),
                registered: self.names(),
            })
    }

    /// Every contract, in registration order.
    pub fn list_all(&self) -> Vec<StateAccumulatorContract> {
        self.accumulators.iter().map(|a| a.contract().clone()).collect()
    }

    /// Every target table, in registration order.
    pub fn get_tables(&self) -> Vec<String> {
        self.accumulators
            .iter()
            .map(|a| a.contract().target_table.clone())
            .collect()
    }

    /// Accumulators in execution order.
    pub fn accumulators(&self) -> &[Arc<dyn StateAccumulator>] {
        &self.accumulators
    }

    /// Number of registered accumulators.
    pub fn len(&self) -> usize {
        self.accumulators.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.accumulators.is_empty()
    }

    fn names(&self) -> Vec<String> {
        self.accumulators
            .iter()
            .map(|a| a.contract().model_name.clone())
            .collect()
    }
}
