//! Generic query execution
//!
//! [`execute_query`] is the single entry point the rest of foodshare uses to
//! run an arbitrary statement: it opens a fresh connection, binds parameters
//! positionally, and either returns every resulting row as a [`Table`] or
//! commits the write and reports how many rows it touched.
//!
//! ```rust,ignore
//! use foodshare::database::{execute_query, ConnectionParams, QueryOutcome, Value};
//!
//! let params = ConnectionParams::new("/tmp/foodshare.sqlite3");
//! let outcome = execute_query(
//!     &params,
//!     "SELECT name, city FROM providers WHERE city = ?1",
//!     &[Value::from("Springfield")],
//! )?;
//! ```

use super::connection::{ConnectionParams, DatabaseConn};
use super::error::DataError;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, Statement, ToSql, Transaction};
use serde::Serialize;
use std::fmt;
use tracing::{debug, error, warn};

/// A single cell value, mirroring SQLite's storage classes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Real(f) => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(v: ValueRef<'_>) -> Self {
        match v {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(*i)),
            Value::Real(f) => ToSqlOutput::Owned(rusqlite::types::Value::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b.as_slice())),
        })
    }
}

/// Tabular result: ordered column names plus ordered rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column, matched case-insensitively
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Value at `row` in the named column
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// All values of the named column, in row order
    pub fn column(&self, name: &str) -> Vec<&Value> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().filter_map(|r| r.get(idx)).collect(),
            None => Vec::new(),
        }
    }

    /// First cell of the first row, for single-value aggregates
    pub fn scalar(&self) -> Option<&Value> {
        self.rows.first().and_then(|r| r.first())
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_json_records(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row.iter())
                    .map(|(col, val)| {
                        (
                            col.clone(),
                            serde_json::to_value(val).unwrap_or(serde_json::Value::Null),
                        )
                    })
                    .collect()
            })
            .collect()
    }
}

/// Whether a statement reads rows or modifies the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Read,
    Write,
}

impl StatementKind {
    /// Classify a prepared statement by whether SQLite reports it as read-only
    pub fn of(stmt: &Statement<'_>) -> Self {
        if stmt.readonly() {
            StatementKind::Read
        } else {
            StatementKind::Write
        }
    }
}

/// Result of a generic statement
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Rows produced by a read (or by a write with `RETURNING`)
    Rows(Table),
    /// A committed write and the number of rows it affected
    Applied { rows_affected: usize },
}

impl QueryOutcome {
    pub fn into_table(self) -> Option<Table> {
        match self {
            QueryOutcome::Rows(table) => Some(table),
            QueryOutcome::Applied { .. } => None,
        }
    }

    pub fn rows_affected(&self) -> Option<usize> {
        match self {
            QueryOutcome::Applied { rows_affected } => Some(*rows_affected),
            QueryOutcome::Rows(_) => None,
        }
    }
}

/// Run a statement on a fresh connection
///
/// The connection is closed before this function returns, whatever the
/// outcome. Failures are logged here and handed back as a typed error.
pub fn execute_query(
    params: &ConnectionParams,
    sql: &str,
    args: &[Value],
) -> Result<QueryOutcome, DataError> {
    let db = DatabaseConn::connect(params).inspect_err(|e| {
        error!(kind = e.kind(), "database connection failed: {}", e);
    })?;

    run_statement(&db.conn, sql, args).inspect_err(|e| {
        error!(
            kind = e.kind(),
            sql = sql.trim(),
            params = ?args,
            "error executing query: {}",
            e
        );
    })
}

/// Run a read statement on a fresh connection and return its rows
pub fn fetch(params: &ConnectionParams, sql: &str, args: &[Value]) -> Result<Table, DataError> {
    match execute_query(params, sql, args)? {
        QueryOutcome::Rows(table) => Ok(table),
        QueryOutcome::Applied { .. } => Ok(Table::default()),
    }
}

/// Run a write statement on a fresh connection and return the affected row count
pub fn execute(params: &ConnectionParams, sql: &str, args: &[Value]) -> Result<usize, DataError> {
    match execute_query(params, sql, args)? {
        QueryOutcome::Applied { rows_affected } => Ok(rows_affected),
        QueryOutcome::Rows(table) => Ok(table.len()),
    }
}

/// Run a statement on an existing connection
///
/// Writes are wrapped in a transaction that is committed on success and
/// rolled back on failure.
pub fn run_statement(
    conn: &Connection,
    sql: &str,
    args: &[Value],
) -> Result<QueryOutcome, DataError> {
    let mut stmt = conn.prepare(sql)?;
    match StatementKind::of(&stmt) {
        StatementKind::Read => collect_rows(&mut stmt, args).map(QueryOutcome::Rows),
        StatementKind::Write => {
            let outcome = with_transaction(conn, |_| write_prepared(&mut stmt, args))?;
            debug!(?outcome, "statement committed");
            Ok(outcome)
        }
    }
}

/// Run `op` inside a transaction: commit when it succeeds, roll back when it fails
pub fn with_transaction<T>(
    conn: &Connection,
    op: impl FnOnce(&Transaction<'_>) -> Result<T, DataError>,
) -> Result<T, DataError> {
    let tx = conn.unchecked_transaction()?;
    match op(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!("rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

fn write_prepared(stmt: &mut Statement<'_>, args: &[Value]) -> Result<QueryOutcome, DataError> {
    if stmt.column_count() > 0 {
        // INSERT/UPDATE/DELETE ... RETURNING
        return collect_rows(stmt, args).map(QueryOutcome::Rows);
    }
    let rows_affected = stmt.execute(params_from_iter(args.iter()))?;
    Ok(QueryOutcome::Applied { rows_affected })
}

/// Run a read statement on an existing connection and collect every row
pub fn query_table(conn: &Connection, sql: &str, args: &[Value]) -> Result<Table, DataError> {
    let mut stmt = conn.prepare(sql)?;
    collect_rows(&mut stmt, args)
}

fn collect_rows(stmt: &mut Statement<'_>, args: &[Value]) -> Result<Table, DataError> {
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();
    let width = columns.len();

    let mut table = Table::new(columns);
    let mut rows = stmt.query(params_from_iter(args.iter()))?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(width);
        for idx in 0..width {
            values.push(Value::from(row.get_ref(idx)?));
        }
        table.rows.push(values);
    }
    Ok(table)
}
