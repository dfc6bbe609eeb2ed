use super::{open_database, or_exit, print_outcome, print_table, WriteOutcome};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use foodshare::lens::utils::OutputFormat;
use foodshare::{FoodshareConfig, NewFoodListing};

/// Arguments for the Food command
#[derive(Args)]
pub struct FoodArgs {
    #[clap(subcommand)]
    pub command: FoodCommands,
}

#[derive(Subcommand)]
pub enum FoodCommands {
    /// Add a food listing for an existing provider
    Add {
        /// Food name, e.g. "Vegetable Soup"
        name: String,

        /// Number of units on offer, at least 1
        #[clap(long, short, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,

        /// Expiry date (YYYY-MM-DD)
        #[clap(long, short)]
        expiry: NaiveDate,

        /// ID of the provider offering the food
        #[clap(long, short)]
        provider_id: i64,

        /// Food type, e.g. Vegetarian, Non-Vegetarian, Vegan
        #[clap(long)]
        food_type: String,

        /// Meal type, e.g. Breakfast, Lunch, Dinner, Snacks
        #[clap(long)]
        meal_type: String,
    },

    /// List all food listings, newest first
    List,

    /// Delete a food listing and every claim made against it
    Delete {
        /// Food listing ID
        food_id: i64,
    },
}

pub fn run(config: &FoodshareConfig, args: FoodArgs, output_format: OutputFormat) {
    let db = open_database(config);

    match args.command {
        FoodCommands::Add {
            name,
            quantity,
            expiry,
            provider_id,
            food_type,
            meal_type,
        } => {
            let listing = NewFoodListing {
                food_name: name,
                quantity,
                expiry_date: expiry,
                provider_id,
                food_type,
                meal_type,
            };
            let id = or_exit(db.create_food_listing(&listing), "adding food listing");
            print_outcome(
                WriteOutcome {
                    action: "create_food_listing",
                    id,
                    success: true,
                },
                format!("Food listing '{}' added with ID: {}", listing.food_name, id),
                output_format,
            );
        }
        FoodCommands::List => {
            let table = or_exit(db.list_food_listings(), "listing food");
            print_table(&table, output_format, "No food listings available.");
        }
        FoodCommands::Delete { food_id } => {
            let deleted = or_exit(db.delete_food_listing(food_id), "deleting food listing");
            let message = if deleted {
                format!("Food listing {} and its claims deleted.", food_id)
            } else {
                format!("Food listing {} not found.", food_id)
            };
            print_outcome(
                WriteOutcome {
                    action: "delete_food_listing",
                    id: food_id,
                    success: deleted,
                },
                message,
                output_format,
            );
            if !deleted {
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct FoodCli {
        #[clap(subcommand)]
        command: FoodCommands,
    }

    fn parse_add(quantity: &str) -> Result<FoodCli, clap::Error> {
        FoodCli::try_parse_from([
            "food",
            "add",
            "Bread",
            "--quantity",
            quantity,
            "--expiry",
            "2030-01-01",
            "--provider-id",
            "1",
            "--food-type",
            "Vegan",
            "--meal-type",
            "Breakfast",
        ])
    }

    #[test]
    fn test_add_rejects_zero_quantity() {
        assert!(parse_add("0").is_err());
    }

    #[test]
    fn test_add_accepts_positive_quantity() {
        let cli = parse_add("12").unwrap();
        match cli.command {
            FoodCommands::Add {
                quantity, expiry, ..
            } => {
                assert_eq!(quantity, 12);
                assert_eq!(expiry, NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
            }
            _ => panic!("expected the add subcommand"),
        }
    }
}
