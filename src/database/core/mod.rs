//! Core database infrastructure
//!
//! This module provides the foundational database components used throughout foodshare:
//! - `DatabaseConn` / `ConnectionParams`: per-operation SQLite connections
//! - `execute_query`: generic statement execution returning a `Table` or a row count
//! - `SchemaManager`: schema initialization and management
//! - `DataError`: typed failures of the data-access layer

mod connection;
mod error;
mod query;
mod schema;

pub use connection::{ConnectionParams, DatabaseConn};
pub use error::DataError;
pub use query::{
    execute, execute_query, fetch, query_table, run_statement, with_transaction, QueryOutcome,
    StatementKind, Table, Value,
};
pub use schema::{SchemaDefinitions, SchemaManager, SchemaStatus, REQUIRED_TABLES, SCHEMA_VERSION};
