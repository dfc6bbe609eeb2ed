use super::{open_database, or_exit, print_outcome, print_table, WriteOutcome};
use clap::{Args, Subcommand};
use foodshare::lens::utils::OutputFormat;
use foodshare::{ClaimStatus, FoodshareConfig};

/// Arguments for the Claim command
#[derive(Args)]
pub struct ClaimArgs {
    #[clap(subcommand)]
    pub command: ClaimCommands,
}

#[derive(Subcommand)]
pub enum ClaimCommands {
    /// Record a receiver's claim on a food listing, timestamped now
    Add {
        food_id: i64,

        receiver_id: i64,

        /// Initial status: pending, completed or cancelled
        #[clap(long, short, default_value = "pending")]
        status: ClaimStatus,
    },

    /// List claims with food and receiver names, newest first
    List,

    /// Change the status of a claim
    Update {
        claim_id: i64,

        /// New status: pending, completed or cancelled
        status: ClaimStatus,
    },
}

pub fn run(config: &FoodshareConfig, args: ClaimArgs, output_format: OutputFormat) {
    let db = open_database(config);

    match args.command {
        ClaimCommands::Add {
            food_id,
            receiver_id,
            status,
        } => {
            let id = or_exit(
                db.create_claim(food_id, receiver_id, status),
                "recording claim",
            );
            print_outcome(
                WriteOutcome {
                    action: "create_claim",
                    id,
                    success: true,
                },
                format!("Claim {} recorded as {}", id, status),
                output_format,
            );
        }
        ClaimCommands::List => {
            let table = or_exit(db.list_claims(), "listing claims");
            print_table(&table, output_format, "No claims recorded yet.");
        }
        ClaimCommands::Update { claim_id, status } => {
            let updated = or_exit(
                db.update_claim_status(claim_id, status),
                "updating claim status",
            );
            let message = if updated {
                format!("Claim {} status updated to '{}'.", claim_id, status)
            } else {
                format!("Claim {} not found.", claim_id)
            };
            print_outcome(
                WriteOutcome {
                    action: "update_claim_status",
                    id: claim_id,
                    success: updated,
                },
                message,
                output_format,
            );
            if !updated {
                std::process::exit(1);
            }
        }
    }
}
