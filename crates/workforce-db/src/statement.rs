//! Statements, filters and rows of the generic tabular interface.
//!
//! A row is a JSON object. Two columns are understood by every backend:
//! `simulation_year` (integer) and `employee_id` (string). Year-scoped
//! writes use them for partitioning and filters use them for indexed
//! lookups; every other column is opaque payload.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DbError;

/// A single row of a logical table.
pub type Row = serde_json::Map<String, Value>;

/// Column holding the simulation year.
pub const YEAR_COLUMN: &str = "simulation_year";

/// Column holding the employee id.
pub const EMPLOYEE_COLUMN: &str = "employee_id";

/// Row predicate.
///
/// All present conditions must hold. An empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    /// Match rows of this simulation year.
    pub simulation_year: Option<i32>,
    /// Match rows of this employee.
    pub employee_id: Option<String>,
    /// Match rows whose column equals the given value.
    pub equals: BTreeMap<String, Value>,
}

impl Filter {
    /// A filter that matches every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter on a single simulation year.
    pub fn year(simulation_year: i32) -> Self {
        Self {
            simulation_year: Some(simulation_year),
            ..Self::default()
        }
    }

    /// Restrict to one employee.
    #[must_use]
    pub fn with_employee(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    /// Restrict to rows whose `column` equals `value`.
    #[must_use]
    pub fn with_eq(mut self, column: impl Into<String>, value: Value) -> Self {
        self.equals.insert(column.into(), value);
        self
    }

    /// Evaluate the filter against a row.
    pub fn matches(&self, row: &Row) -> bool {
        if let Some(year) = self.simulation_year
            && row_year(row) != Some(i64::from(year))
        {
            return false;
        }
        if let Some(ref employee) = self.employee_id
            && row.get(EMPLOYEE_COLUMN).and_then(Value::as_str) != Some(employee.as_str())
        {
            return false;
        }
        self.equals
            .iter()
            .all(|(column, expected)| row.get(column) == Some(expected))
    }
}

/// A statement against the analytical store.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Atomically delete every row of `table` for the year, then insert `rows`.
    ReplaceYear {
        /// Target table.
        table: String,
        /// Year partition being replaced.
        simulation_year: i32,
        /// New contents of the partition. Every row must carry the same year.
        rows: Vec<Row>,
    },
    /// Append rows.
    Insert {
        /// Target table.
        table: String,
        /// Rows to append.
        rows: Vec<Row>,
    },
    /// Read matching rows in insertion order.
    Select {
        /// Source table.
        table: String,
        /// Row predicate.
        filter: Filter,
    },
    /// Count matching rows; returns a single `{ "count": n }` row.
    Count {
        /// Source table.
        table: String,
        /// Row predicate.
        filter: Filter,
    },
    /// Delete every row of `table` for the year.
    DeleteYear {
        /// Target table.
        table: String,
        /// Year partition being deleted.
        simulation_year: i32,
    },
}

impl Statement {
    /// The table the statement targets.
    pub fn table(&self) -> &str {
        match self {
            Self::ReplaceYear { table, .. }
            | Self::Insert { table, .. }
            | Self::Select { table, .. }
            | Self::Count { table, .. }
            | Self::DeleteYear { table, .. } => table,
        }
    }

    /// Short name of the statement kind, for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ReplaceYear { .. } => "replace_year",
            Self::Insert { .. } => "insert",
            Self::Select { .. } => "select",
            Self::Count { .. } => "count",
            Self::DeleteYear { .. } => "delete_year",
        }
    }

    /// Whether the statement mutates the store.
    pub const fn is_write(&self) -> bool {
        matches!(
            self,
            Self::ReplaceYear { .. } | Self::Insert { .. } | Self::DeleteYear { .. }
        )
    }
}

/// The `simulation_year` column of a row, if present.
pub fn row_year(row: &Row) -> Option<i64> {
    row.get(YEAR_COLUMN).and_then(Value::as_i64)
}

/// Check that every row of a year-scoped write carries that year.
pub fn check_rows_year(table: &str, simulation_year: i32, rows: &[Row]) -> Result<(), DbError> {
    for row in rows {
        let found = row_year(row);
        if found != Some(i64::from(simulation_year)) {
            return Err(DbError::RowYearMismatch {
                table: table.to_owned(),
                expected: simulation_year,
                found,
            });
        }
    }
    Ok(())
}

/// Serialize a value into a row.
pub fn to_row<T: Serialize>(table: &str, value: &T) -> Result<Row, DbError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(DbError::NotARow {
            table: table.to_owned(),
        }),
    }
}

/// Serialize a slice of values into rows.
pub fn to_rows<T: Serialize>(table: &str, values: &[T]) -> Result<Vec<Row>, DbError> {
    values.iter().map(|v| to_row(table, v)).collect()
}

/// Deserialize rows into typed values.
pub fn from_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, DbError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(Value::Object(row)).map_err(DbError::from))
        .collect()
}

/// Extract the count from the result of a [`Statement::Count`].
pub fn count_from_rows(rows: &[Row]) -> u64 {
    rows.first()
        .and_then(|row| row.get("count"))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

/// Build the single-row result of a count.
pub fn count_row(count: u64) -> Row {
    let mut row = Row::new();
    row.insert("count".to_owned(), Value::from(count));
    row
}
