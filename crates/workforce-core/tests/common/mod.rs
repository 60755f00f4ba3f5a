//! Shared fixtures for the pipeline tests.

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::missing_panics_doc
)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use workforce_core::SimulationConfig;
use workforce_db::store::insert;
use workforce_db::tables::BASELINE_WORKFORCE;
use workforce_db::{AnalyticalStore, Filter, Row, Statement};
use workforce_types::{BaselineEmployee, EmployeeId};

/// Configuration over `start..=end` with the default policies.
pub fn config(start: i32, end: i32) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.simulation.start_year = start;
    config.simulation.end_year = end;
    config.execution.max_workers = 4;
    config.execution.retry.base_delay_ms = 1;
    config.execution.retry.max_delay_ms = 4;
    config
}

/// Deterministic census of `n` employees hired before 2025.
pub fn census(n: u32) -> Vec<BaselineEmployee> {
    (0..n)
        .map(|i| {
            let level = u8::try_from(1 + i % 5).unwrap();
            let eligible = i % 4 != 0;
            let enrolled = eligible && i % 3 != 0;
            let hire_date = NaiveDate::from_ymd_opt(
                2005 + i32::try_from(i % 19).unwrap(),
                1 + i % 12,
                1 + i % 28,
            )
            .unwrap();
            BaselineEmployee {
                employee_id: EmployeeId::new(format!("EMP_{i:06}")),
                birth_date: NaiveDate::from_ymd_opt(
                    1962 + i32::try_from(i % 38).unwrap(),
                    1 + (i * 7) % 12,
                    1 + (i * 3) % 28,
                )
                .unwrap(),
                hire_date,
                level,
                annual_compensation: Decimal::from(
                    45_000 + 18_000 * u64::from(level) + 250 * u64::from(i % 40),
                ),
                is_eligible: eligible,
                eligibility_date: eligible.then_some(hire_date),
                is_enrolled: enrolled,
                enrollment_date: enrolled.then_some(hire_date),
                deferral_rate: if enrolled {
                    Decimal::new(3 + i64::from(i % 8), 2)
                } else {
                    Decimal::ZERO
                },
            }
        })
        .collect()
}

/// Load a census of `n` employees into `store`.
pub async fn seed(store: &dyn AnalyticalStore, n: u32) {
    insert(store, BASELINE_WORKFORCE, &census(n)).await.unwrap();
}

/// Rows of one table and year, in a stable order.
pub async fn year_rows(store: &dyn AnalyticalStore, table: &str, year: i32) -> Vec<Row> {
    let mut rows = store
        .execute(Statement::Select {
            table: table.to_owned(),
            filter: Filter::year(year),
        })
        .await
        .unwrap();
    rows.sort_by_key(|row| serde_json::to_string(&Value::Object(row.clone())).unwrap());
    rows
}
