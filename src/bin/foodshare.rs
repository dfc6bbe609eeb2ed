use clap::{Parser, Subcommand};
use foodshare::lens::utils::OutputFormat;
use foodshare::FoodshareConfig;
use tracing::Level;

mod commands;

use commands::analysis::AnalysisCmdArgs;
use commands::claim::ClaimArgs;
use commands::config::ConfigArgs;
use commands::dashboard::{DashboardArgs, FiltersArgs};
use commands::database::DatabaseArgs;
use commands::food::FoodArgs;
use commands::provider::ProviderArgs;
use commands::receiver::ReceiverArgs;
use commands::table::TableArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.foodshare/foodshare.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long, global = true)]
    debug: bool,

    /// Output format: table, markdown, json, json-pretty, json-line, psv
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register and list food providers
    Provider(ProviderArgs),

    /// List receivers
    Receiver(ReceiverArgs),

    /// Add, list and delete food listings
    Food(FoodArgs),

    /// Record, list and update claims
    Claim(ClaimArgs),

    /// Key metrics and the filtered listings view
    Dashboard(DashboardArgs),

    /// Show the values available for dashboard filters
    Filters(FiltersArgs),

    /// Run the predefined analysis queries
    Analysis(AnalysisCmdArgs),

    /// Show every row of one table
    Table(TableArgs),

    /// Database initialization, status and reset
    Db(DatabaseArgs),

    /// Show configuration
    Config(ConfigArgs),
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            // filter spans/events with level INFO or higher.
            .with_max_level(Level::INFO)
            .init();
    }

    let config = match FoodshareConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let output_format = cli.format;

    match cli.command {
        Commands::Provider(args) => commands::provider::run(&config, args, output_format),
        Commands::Receiver(args) => commands::receiver::run(&config, args, output_format),
        Commands::Food(args) => commands::food::run(&config, args, output_format),
        Commands::Claim(args) => commands::claim::run(&config, args, output_format),
        Commands::Dashboard(args) => commands::dashboard::run(&config, args, output_format),
        Commands::Filters(args) => commands::dashboard::run_filters(&config, args, output_format),
        Commands::Analysis(args) => commands::analysis::run(&config, args, output_format),
        Commands::Table(args) => commands::table::run(&config, args, output_format),
        Commands::Db(args) => commands::database::run(&config, args, output_format),
        Commands::Config(args) => commands::config::run(&config, cli.config, args, output_format),
    }
}
