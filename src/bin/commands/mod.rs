pub mod analysis;
pub mod claim;
pub mod config;
pub mod dashboard;
pub mod database;
pub mod food;
pub mod provider;
pub mod receiver;
pub mod table;

use foodshare::lens::utils::{render_records, render_table, OutputFormat};
use foodshare::{DataError, FoodshareConfig, FoodshareDatabase, Table};
use serde::Serialize;
use tabled::Tabled;

/// Open the configured database or exit
pub(crate) fn open_database(config: &FoodshareConfig) -> FoodshareDatabase {
    match FoodshareDatabase::open(config.connection_params()) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    }
}

/// Unwrap a data-access result or report it and exit
pub(crate) fn or_exit<T>(result: Result<T, DataError>, action: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("ERROR: {} failed ({}): {}", action, e.kind(), e);
            std::process::exit(1);
        }
    }
}

/// Print a query result, or `empty_message` on stderr when there are no rows
pub(crate) fn print_table(table: &Table, output_format: OutputFormat, empty_message: &str) {
    if table.is_empty() && !output_format.is_json() {
        eprintln!("{}", empty_message);
        return;
    }
    println!("{}", render_table(table, output_format, true));
}

pub(crate) fn print_records<T: Tabled + Serialize>(records: &[T], output_format: OutputFormat) {
    println!("{}", render_records(records, output_format));
}

/// Print a serializable value as JSON in the requested JSON flavour
pub(crate) fn print_json<T: Serialize>(value: &T, output_format: OutputFormat) {
    let result = match output_format {
        OutputFormat::JsonPretty => serde_json::to_string_pretty(value),
        _ => serde_json::to_string(value),
    };
    match result {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing output: {}", e),
    }
}

/// Outcome of a single write, for JSON output
#[derive(Debug, Serialize)]
pub(crate) struct WriteOutcome {
    pub action: &'static str,
    pub id: i64,
    pub success: bool,
}

pub(crate) fn print_outcome(outcome: WriteOutcome, message: String, output_format: OutputFormat) {
    if output_format.is_json() {
        print_json(&outcome, output_format);
    } else if outcome.success {
        println!("{}", message);
    } else {
        eprintln!("{}", message);
    }
}
