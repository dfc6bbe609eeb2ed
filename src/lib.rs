#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Foodshare - a surplus food redistribution ledger
//!
//! Foodshare records food providers, receivers, the food listings providers
//! offer and the claims receivers make against them. It can be used as both a
//! command-line application and a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none) | SQLite data access and configuration | `rusqlite`, `config` |
//! | `display` | Lenses and table rendering | `tabled` |
//! | `cli` | The `foodshare` binary | All above + `clap`, `tracing-subscriber` |
//!
//! ```toml
//! # Data access only
//! foodshare = { version = "0.3", default-features = false }
//!
//! # Default (CLI binary)
//! foodshare = "0.3"
//! ```
//!
//! # Architecture
//!
//! - **[`database`]**: all data access (always available)
//!   - `core`: connections, generic query execution, schema, errors
//!   - `foodshare`: entity repositories and the `FoodshareDatabase` facade
//! - **`lens`**: dashboard and analysis helpers (requires `display`)
//! - **[`config`]**: configuration management
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use foodshare::{ClaimStatus, FoodshareConfig, FoodshareDatabase, NewProvider};
//!
//! let config = FoodshareConfig::new(&None)?;
//! let db = FoodshareDatabase::open(config.connection_params())?;
//!
//! let provider_id = db.create_provider(&NewProvider::new(
//!     "Joe's Deli", "Restaurant", "12 Elm St", "Springfield", "555-0100",
//! ))?;
//!
//! for claim_id in [3, 4] {
//!     if !db.update_claim_status(claim_id, ClaimStatus::Completed)? {
//!         eprintln!("claim {} not found", claim_id);
//!     }
//! }
//!
//! let listings = db.list_food_listings()?;
//! println!("{} listings", listings.len());
//! ```

pub mod config;
pub mod database;

#[cfg(feature = "display")]
pub mod lens;

pub use config::{format_size, get_database_info, DatabaseInfo, FoodshareConfig};

pub use database::{
    execute_query, ClaimRecord, ClaimStatus, ConnectionParams, DataError, EntityCounts,
    EntityTable, FilterOptions, FoodListing, FoodshareDatabase, NewFoodListing, NewProvider,
    ProviderRecord, QueryOutcome, ReceiverRecord, SchemaStatus, Table, Value,
};

#[cfg(feature = "display")]
pub use lens::utils::OutputFormat;
