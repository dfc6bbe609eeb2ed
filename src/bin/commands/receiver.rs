use super::{open_database, or_exit, print_table};
use clap::{Args, Subcommand};
use foodshare::lens::utils::OutputFormat;
use foodshare::FoodshareConfig;

/// Arguments for the Receiver command
#[derive(Args)]
pub struct ReceiverArgs {
    #[clap(subcommand)]
    pub command: ReceiverCommands,
}

#[derive(Subcommand)]
pub enum ReceiverCommands {
    /// List all receivers
    List,
}

pub fn run(config: &FoodshareConfig, args: ReceiverArgs, output_format: OutputFormat) {
    let db = open_database(config);

    match args.command {
        ReceiverCommands::List => {
            let table = or_exit(db.list_receivers(), "listing receivers");
            print_table(&table, output_format, "No receivers registered.");
        }
    }
}
