use super::{open_database, or_exit, print_outcome, print_table, WriteOutcome};
use clap::{Args, Subcommand};
use foodshare::lens::utils::OutputFormat;
use foodshare::{FoodshareConfig, NewProvider};

/// Arguments for the Provider command
#[derive(Args)]
pub struct ProviderArgs {
    #[clap(subcommand)]
    pub command: ProviderCommands,
}

#[derive(Subcommand)]
pub enum ProviderCommands {
    /// Register a new food provider
    Add {
        /// Provider name
        name: String,

        /// Provider type, e.g. Restaurant, Supermarket, Grocery Store
        #[clap(long = "type", short = 't')]
        provider_type: String,

        /// Street address
        #[clap(long, short)]
        address: String,

        #[clap(long)]
        city: String,

        /// Phone number or email
        #[clap(long)]
        contact: String,
    },

    /// List all providers
    List,
}

pub fn run(config: &FoodshareConfig, args: ProviderArgs, output_format: OutputFormat) {
    let db = open_database(config);

    match args.command {
        ProviderCommands::Add {
            name,
            provider_type,
            address,
            city,
            contact,
        } => {
            let provider = NewProvider::new(&name, &provider_type, &address, &city, &contact);
            let id = or_exit(db.create_provider(&provider), "adding provider");
            print_outcome(
                WriteOutcome {
                    action: "create_provider",
                    id,
                    success: true,
                },
                format!("Provider '{}' added with ID: {}", name, id),
                output_format,
            );
        }
        ProviderCommands::List => {
            let table = or_exit(db.list_providers(), "listing providers");
            print_table(&table, output_format, "No providers registered yet.");
        }
    }
}
