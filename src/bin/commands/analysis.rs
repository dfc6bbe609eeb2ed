use super::{open_database, or_exit, print_json, print_table};
use clap::Args;
use foodshare::lens::analysis::{AnalysisArgs, AnalysisLens, AnalysisQuery, AnalysisResult};
use foodshare::lens::utils::OutputFormat;
use foodshare::FoodshareConfig;

/// Arguments for the Analysis command
#[derive(Args)]
pub struct AnalysisCmdArgs {
    /// Analysis to run, by number (1-15) or name; all fifteen when omitted
    #[clap(value_name = "NAME")]
    pub query: Option<AnalysisQuery>,

    /// List the available analyses instead of running them
    #[clap(long)]
    pub list: bool,

    #[clap(flatten)]
    pub args: AnalysisArgs,
}

pub fn run(config: &FoodshareConfig, args: AnalysisCmdArgs, output_format: OutputFormat) {
    let AnalysisCmdArgs { query, list, args } = args;

    if list {
        for query in AnalysisQuery::numbered() {
            println!(
                "{:>2}. {:<32} {}",
                query.number().unwrap_or_default(),
                query.name(),
                query.title()
            );
        }
        for query in [AnalysisQuery::ClaimStatusDistribution, AnalysisQuery::ClaimsPerDay] {
            println!("    {:<32} {}", query.name(), query.title());
        }
        return;
    }

    let db = open_database(config);
    let lens = AnalysisLens::new(&db);

    let results = match query {
        Some(query) => vec![or_exit(lens.run(query, &args), "running analysis")],
        None => or_exit(lens.run_all(&args), "running analyses"),
    };

    if output_format.is_json() {
        print_json(&results, output_format);
        return;
    }

    for (idx, result) in results.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        print_result(result, output_format);
    }
}

fn print_result(result: &AnalysisResult, output_format: OutputFormat) {
    match result.query.number() {
        Some(n) => println!("{}. {}", n, result.title),
        None => println!("{}", result.title),
    }
    print_table(&result.table, output_format, "No results found for this query.");
}
