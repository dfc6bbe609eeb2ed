use super::{open_database, or_exit, print_table};
use clap::Args;
use foodshare::lens::utils::OutputFormat;
use foodshare::{EntityTable, FoodshareConfig};

/// Arguments for the Table command
#[derive(Args)]
pub struct TableArgs {
    /// Table to show: providers, receivers, food or claims
    #[clap(value_name = "TABLE")]
    pub table: EntityTable,
}

pub fn run(config: &FoodshareConfig, args: TableArgs, output_format: OutputFormat) {
    let db = open_database(config);
    let table = or_exit(db.view_table(args.table), "reading table");
    print_table(
        &table,
        output_format,
        &format!("Table '{}' is empty.", args.table),
    );
}
