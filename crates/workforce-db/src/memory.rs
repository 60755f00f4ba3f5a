//! In-process [`AnalyticalStore`] backed by per-table row vectors.
//!
//! Used by tests and local runs. Every statement takes the table lock for
//! its whole duration, so a year replace is atomic with respect to readers.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::error::DbError;
use crate::statement::{Row, Statement, check_rows_year, count_row, row_year};
use crate::store::AnalyticalStore;

/// What a single executed statement touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementRecord {
    /// Statement kind (see [`Statement::kind`]).
    pub kind: &'static str,
    /// Target table.
    pub table: String,
    /// Year the statement was scoped or filtered to.
    pub simulation_year: Option<i32>,
}

impl StatementRecord {
    fn of(statement: &Statement) -> Self {
        let simulation_year = match statement {
            Statement::ReplaceYear {
                simulation_year, ..
            }
            | Statement::DeleteYear {
                simulation_year, ..
            } => Some(*simulation_year),
            Statement::Select { filter, .. } | Statement::Count { filter, .. } => {
                filter.simulation_year
            }
            Statement::Insert { .. } => None,
        };
        Self {
            kind: statement.kind(),
            table: statement.table().to_owned(),
            simulation_year,
        }
    }
}

/// In-memory analytical store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<BTreeMap<String, Vec<Row>>>,
    contention: AtomicU32,
    log: Option<Mutex<Vec<StatementRecord>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that records every executed statement.
    pub fn with_statement_log() -> Self {
        Self {
            log: Some(Mutex::new(Vec::new())),
            ..Self::default()
        }
    }

    /// Make the next `failures` statements fail with lock contention.
    pub fn inject_lock_contention(&self, failures: u32) {
        self.contention.store(failures, Ordering::SeqCst);
    }

    /// Statements executed so far (empty unless created with
    /// [`MemoryStore::with_statement_log`]).
    pub async fn statement_log(&self) -> Vec<StatementRecord> {
        match self.log {
            Some(ref log) => log.lock().await.clone(),
            None => Vec::new(),
        }
    }

    /// Forget the recorded statements.
    pub async fn clear_statement_log(&self) {
        if let Some(ref log) = self.log {
            log.lock().await.clear();
        }
    }

    /// Names of all tables that hold at least one row.
    pub async fn table_names(&self) -> Vec<String> {
        self.tables
            .read()
            .await
            .iter()
            .filter(|(_, rows)| !rows.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn take_contention(&self, table: &str) -> Result<(), DbError> {
        let claimed = self
            .contention
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if claimed.is_ok() {
            return Err(DbError::LockContention {
                table: table.to_owned(),
                detail: "injected contention".to_owned(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AnalyticalStore for MemoryStore {
    async fn execute(&self, statement: Statement) -> Result<Vec<Row>, DbError> {
        if let Some(ref log) = self.log {
            log.lock().await.push(StatementRecord::of(&statement));
        }
        self.take_contention(statement.table())?;

        match statement {
            Statement::ReplaceYear {
                table,
                simulation_year,
                rows,
            } => {
                check_rows_year(&table, simulation_year, &rows)?;
                let mut tables = self.tables.write().await;
                let existing = tables.entry(table).or_default();
                existing.retain(|row| row_year(row) != Some(i64::from(simulation_year)));
                existing.extend(rows);
                Ok(Vec::new())
            }
            Statement::Insert { table, rows } => {
                self.tables.write().await.entry(table).or_default().extend(rows);
                Ok(Vec::new())
            }
            Statement::Select { table, filter } => {
                let tables = self.tables.read().await;
                Ok(tables
                    .get(&table)
                    .map(|rows| rows.iter().filter(|r| filter.matches(r)).cloned().collect())
                    .unwrap_or_default())
            }
            Statement::Count { table, filter } => {
                let tables = self.tables.read().await;
                let n = tables
                    .get(&table)
                    .map_or(0, |rows| rows.iter().filter(|r| filter.matches(r)).count());
                Ok(vec![count_row(u64::try_from(n).unwrap_or(u64::MAX))])
            }
            Statement::DeleteYear {
                table,
                simulation_year,
            } => {
                if let Some(rows) = self.tables.write().await.get_mut(&table) {
                    rows.retain(|row| row_year(row) != Some(i64::from(simulation_year)));
                }
                Ok(Vec::new())
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::statement::{Filter, count_from_rows};

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => Row::new(),
        }
    }

    fn replace(year: i32, ids: &[&str]) -> Statement {
        Statement::ReplaceYear {
            table: "t".to_owned(),
            simulation_year: year,
            rows: ids
                .iter()
                .map(|id| row(json!({"simulation_year": year, "employee_id": id})))
                .collect(),
        }
    }

    async fn count_year(store: &MemoryStore, year: i32) -> u64 {
        let rows = store
            .execute(Statement::Count {
                table: "t".to_owned(),
                filter: Filter::year(year),
            })
            .await
            .unwrap();
        count_from_rows(&rows)
    }

    #[tokio::test]
    async fn replace_year_only_touches_its_partition() {
        let store = MemoryStore::new();
        store.execute(replace(2025, &["A", "B"])).await.unwrap();
        store.execute(replace(2026, &["A"])).await.unwrap();
        store.execute(replace(2025, &["C"])).await.unwrap();

        assert_eq!(count_year(&store, 2025).await, 1);
        assert_eq!(count_year(&store, 2026).await, 1);
    }

    #[tokio::test]
    async fn rejected_replace_writes_nothing() {
        let store = MemoryStore::new();
        store.execute(replace(2025, &["A"])).await.unwrap();
        let bad = Statement::ReplaceYear {
            table: "t".to_owned(),
            simulation_year: 2025,
            rows: vec![row(json!({"simulation_year": 2024, "employee_id": "X"}))],
        };
        assert!(store.execute(bad).await.is_err());
        assert_eq!(count_year(&store, 2025).await, 1);
    }

    #[tokio::test]
    async fn injected_contention_fails_then_clears() {
        let store = MemoryStore::new();
        store.inject_lock_contention(2);
        assert!(matches!(
            store.execute(replace(2025, &["A"])).await,
            Err(DbError::LockContention { .. })
        ));
        assert!(store.execute(replace(2025, &["A"])).await.is_err());
        assert!(store.execute(replace(2025, &["A"])).await.is_ok());
    }

    #[tokio::test]
    async fn statement_log_records_years() {
        let store = MemoryStore::with_statement_log();
        store.execute(replace(2025, &["A"])).await.unwrap();
        count_year(&store, 2025).await;
        let log = store.statement_log().await;
        assert_eq!(log.len(), 2);
        assert_eq!(log.first().map(|r| r.kind), Some("replace_year"));
        assert_eq!(log.get(1).and_then(|r| r.simulation_year), Some(2025));
    }
}
