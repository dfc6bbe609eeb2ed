use super::database::print_status_table;
use super::print_json;
use clap::Args;
use foodshare::lens::utils::OutputFormat;
use foodshare::{get_database_info, DatabaseInfo, FoodshareConfig};
use serde::Serialize;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Also show database status and record counts
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo {
    config_file: String,
    data_dir: String,
    database_name: String,
    sqlite_path: String,
    filter_cache_ttl_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<DatabaseInfo>,
}

pub fn run(
    config: &FoodshareConfig,
    config_path: Option<String>,
    args: ConfigArgs,
    output_format: OutputFormat,
) {
    let info = ConfigInfo {
        config_file: config_path.unwrap_or_else(FoodshareConfig::config_file_path),
        data_dir: config.data_dir.clone(),
        database_name: config.database_name.clone(),
        sqlite_path: config.sqlite_path(),
        filter_cache_ttl_secs: config.filter_cache_ttl_secs,
        database: args.verbose.then(|| get_database_info(config)),
    };

    if output_format.is_json() {
        print_json(&info, output_format);
        return;
    }

    println!("Foodshare Configuration");
    println!("=======================\n");
    println!("Config file:        {}", info.config_file);
    println!("{}", config.summary());

    if let Some(database) = &info.database {
        println!();
        print_status_table(database);
    }

    eprintln!();
    eprintln!("Tips:");
    eprintln!("  Use --verbose (-v) to see database status");
    eprintln!("  Use --format json for machine-readable output");
    eprintln!("  Set FOODSHARE_DATA_DIR or FOODSHARE_DATABASE_NAME to override settings");
}
