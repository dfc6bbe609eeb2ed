use super::{open_database, or_exit, print_json};
use clap::{Args, Subcommand};
use foodshare::lens::utils::OutputFormat;
use foodshare::{format_size, get_database_info, DatabaseInfo, FoodshareConfig, SchemaStatus};

/// Arguments for the Db command
#[derive(Args)]
pub struct DatabaseArgs {
    #[clap(subcommand)]
    pub command: Option<DatabaseCommands>,
}

#[derive(Subcommand)]
pub enum DatabaseCommands {
    /// Create the database and its schema if missing
    Init,

    /// Show database status (default when no subcommand)
    Status,

    /// Drop every table and recreate an empty schema
    Reset {
        /// Skip confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },
}

pub fn run(config: &FoodshareConfig, args: DatabaseArgs, output_format: OutputFormat) {
    match args.command {
        None | Some(DatabaseCommands::Status) => run_status(config, output_format),
        Some(DatabaseCommands::Init) => run_init(config, output_format),
        Some(DatabaseCommands::Reset { yes }) => run_reset(config, yes, output_format),
    }
}

fn run_init(config: &FoodshareConfig, output_format: OutputFormat) {
    let db = open_database(config);
    let status = or_exit(db.schema_status(), "checking schema");
    if status != SchemaStatus::Current {
        eprintln!(
            "Schema is {}. Run `foodshare db reset` to rebuild it (this deletes all records).",
            status
        );
        std::process::exit(1);
    }
    if output_format.is_json() {
        print_json(&get_database_info(config), output_format);
    } else {
        println!("Database ready at {}", config.sqlite_path());
    }
}

fn run_status(config: &FoodshareConfig, output_format: OutputFormat) {
    let info = get_database_info(config);
    if output_format.is_json() {
        print_json(&info, output_format);
    } else {
        print_status_table(&info);
    }
}

pub(crate) fn print_status_table(info: &DatabaseInfo) {
    println!("SQLite Database:");
    println!("  Path:           {}", info.path);
    println!(
        "  Status:         {}",
        if info.exists { "exists" } else { "not created" }
    );
    if let Some(size) = info.size_bytes {
        println!("  Size:           {}", format_size(size));
    }
    println!("  Schema:         {}", info.schema);
    if let Some(counts) = &info.counts {
        println!("  Providers:      {}", counts.providers);
        println!("  Receivers:      {}", counts.receivers);
        println!("  Food listings:  {}", counts.food);
        println!("  Claims:         {}", counts.claims);
    }
}

fn run_reset(config: &FoodshareConfig, yes: bool, output_format: OutputFormat) {
    if !yes {
        eprint!(
            "This deletes every provider, receiver, listing and claim in {}. Continue? [y/N] ",
            config.sqlite_path()
        );
        let mut answer = String::new();
        if std::io::stdin().read_line(&mut answer).is_err()
            || !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
        {
            eprintln!("Aborted.");
            return;
        }
    }

    let db = open_database(config);
    or_exit(db.reset(), "resetting database");

    if output_format.is_json() {
        print_json(&get_database_info(config), output_format);
    } else {
        println!("Database reset: {}", config.sqlite_path());
    }
}
