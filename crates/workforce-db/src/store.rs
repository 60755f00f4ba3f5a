//! The [`AnalyticalStore`] trait and typed helpers on top of it.
//!
//! Backends only implement [`AnalyticalStore::execute`]. Callers work with
//! typed rows through [`select`], [`replace_year`], [`insert`] and
//! [`count`], which serialize with `serde_json`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::DbError;
use crate::statement::{Filter, Row, Statement, count_from_rows, from_rows, to_rows};

/// A columnar analytical store reached through a generic execute interface.
#[async_trait]
pub trait AnalyticalStore: Send + Sync {
    /// Execute one statement and return its result rows.
    ///
    /// Writes return no rows. [`Statement::Count`] returns a single
    /// `{ "count": n }` row.
    async fn execute(&self, statement: Statement) -> Result<Vec<Row>, DbError>;

    /// Short backend name, for logs.
    fn backend_name(&self) -> &'static str;
}

#[async_trait]
impl<S: AnalyticalStore + ?Sized> AnalyticalStore for Arc<S> {
    async fn execute(&self, statement: Statement) -> Result<Vec<Row>, DbError> {
        (**self).execute(statement).await
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

/// Read typed rows from `table`.
pub async fn select<T: DeserializeOwned>(
    store: &dyn AnalyticalStore,
    table: &str,
    filter: Filter,
) -> Result<Vec<T>, DbError> {
    let rows = store
        .execute(Statement::Select {
            table: table.to_owned(),
            filter,
        })
        .await?;
    from_rows(rows)
}

/// Replace the `simulation_year` partition of `table` with typed rows.
pub async fn replace_year<T: Serialize + Sync>(
    store: &dyn AnalyticalStore,
    table: &str,
    simulation_year: i32,
    values: &[T],
) -> Result<(), DbError> {
    let rows = to_rows(table, values)?;
    store
        .execute(Statement::ReplaceYear {
            table: table.to_owned(),
            simulation_year,
            rows,
        })
        .await?;
    tracing::debug!(table, simulation_year, rows = values.len(), "Replaced year partition");
    Ok(())
}

/// Append typed rows to `table`.
pub async fn insert<T: Serialize + Sync>(
    store: &dyn AnalyticalStore,
    table: &str,
    values: &[T],
) -> Result<(), DbError> {
    let rows = to_rows(table, values)?;
    store
        .execute(Statement::Insert {
            table: table.to_owned(),
            rows,
        })
        .await?;
    Ok(())
}

/// Count rows of `table` matching `filter`.
pub async fn count(
    store: &dyn AnalyticalStore,
    table: &str,
    filter: Filter,
) -> Result<u64, DbError> {
    let rows = store
        .execute(Statement::Count {
            table: table.to_owned(),
            filter,
        })
        .await?;
    Ok(count_from_rows(&rows))
}

/// Delete the `simulation_year` partition of `table`.
pub async fn delete_year(
    store: &dyn AnalyticalStore,
    table: &str,
    simulation_year: i32,
) -> Result<(), DbError> {
    store
        .execute(Statement::DeleteYear {
            table: table.to_owned(),
            simulation_year,
        })
        .await?;
    Ok(())
}
