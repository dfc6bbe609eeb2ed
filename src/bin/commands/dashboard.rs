use super::{open_database, or_exit, print_json, print_records, print_table};
use clap::Args;
use foodshare::lens::analysis::AnalysisLens;
use foodshare::lens::dashboard::{DashboardLens, FilterOptionsCache, Kpis, ListingFilters};
use foodshare::lens::utils::OutputFormat;
use foodshare::FoodshareConfig;
use serde::Serialize;
use tabled::Tabled;

/// Arguments for the Dashboard command
#[derive(Args)]
pub struct DashboardArgs {
    #[clap(flatten)]
    pub filters: ListingFilters,

    /// Also show chart series (food by provider type, claim statuses, claims per day)
    #[clap(long)]
    pub charts: bool,
}

#[derive(Serialize)]
struct DashboardOutput {
    kpis: Kpis,
    listings: Vec<serde_json::Map<String, serde_json::Value>>,
    provider_contacts: Vec<serde_json::Map<String, serde_json::Value>>,
}

pub fn run(config: &FoodshareConfig, args: DashboardArgs, output_format: OutputFormat) {
    let db = open_database(config);
    let lens = DashboardLens::new(&db);

    let kpis = or_exit(lens.kpis(), "computing KPIs");
    let listings = or_exit(lens.listings(&args.filters), "filtering listings");
    let contacts = or_exit(lens.provider_contacts(&args.filters), "collecting contacts");

    if output_format.is_json() {
        print_json(
            &DashboardOutput {
                kpis,
                listings: listings.to_json_records(),
                provider_contacts: contacts.to_json_records(),
            },
            output_format,
        );
        return;
    }

    println!("Key Metrics");
    print_records(&kpis.to_rows(), output_format);
    println!();

    println!("Filtered Food Listings");
    print_table(
        &listings,
        output_format,
        "No food listings available matching your criteria.",
    );
    if !listings.is_empty() {
        println!();
        println!("Contact Information for Providers");
        print_table(
            &contacts,
            output_format,
            "No provider contact information available for these listings.",
        );
    }

    if args.charts {
        let charts = or_exit(AnalysisLens::new(&db).charts(), "loading charts");
        for chart in charts {
            println!();
            println!("{}", chart.title);
            print_table(&chart.table, output_format, "No data to display.");
        }
    }
}

/// Arguments for the Filters command
#[derive(Args)]
pub struct FiltersArgs {}

#[derive(Serialize, Tabled)]
struct FilterRow {
    filter: &'static str,
    values: String,
}

pub fn run_filters(config: &FoodshareConfig, _args: FiltersArgs, output_format: OutputFormat) {
    let db = open_database(config);
    let mut cache = FilterOptionsCache::new(config.filter_cache_ttl());
    let options = or_exit(cache.get(&db), "loading filter options");

    if output_format.is_json() {
        print_json(options, output_format);
        return;
    }

    let rows = [
        ("City", &options.cities),
        ("Provider", &options.providers),
        ("Provider Type", &options.provider_types),
        ("Receiver Type", &options.receiver_types),
        ("Food Type", &options.food_types),
        ("Meal Type", &options.meal_types),
    ]
    .into_iter()
    .map(|(filter, values)| FilterRow {
        filter,
        values: values.join(", "),
    })
    .collect::<Vec<_>>();

    print_records(&rows, output_format);
}
