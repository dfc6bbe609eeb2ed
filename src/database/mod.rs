//! Database module
//!
//! This module provides all database functionality for foodshare, organized into:
//!
//! - **core**: connection management, generic query execution, schema, errors
//! - **foodshare**: entity repositories and the [`FoodshareDatabase`] facade
//!
//! # Architecture
//!
//! ```text
//! database/
//! ├── core/            # Foundation
//! │   ├── connection   # ConnectionParams + per-operation DatabaseConn
//! │   ├── query        # execute_query, Table, Value
//! │   ├── schema       # table definitions and SchemaManager
//! │   └── error        # DataError
//! │
//! └── foodshare/       # Entity storage
//!     ├── providers    # create / look up / list providers
//!     ├── receivers    # read-only receivers
//!     ├── food         # food listings (delete cascades to claims)
//!     └── claims       # claims and their status
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use foodshare::database::{ClaimStatus, FoodshareDatabase, NewProvider};
//!
//! let db = FoodshareDatabase::open_in_dir("~/.foodshare", "foodshare")?;
//!
//! let id = db.create_provider(&NewProvider::new(
//!     "Joe's Deli", "Restaurant", "12 Elm St", "Springfield", "555-0100",
//! ))?;
//!
//! if !db.update_claim_status(7, ClaimStatus::Completed)? {
//!     println!("claim 7 does not exist");
//! }
//!
//! let listings = db.list_food_listings()?;
//! ```

pub mod core;
pub mod foodshare;

pub use core::{
    execute, execute_query, fetch, ConnectionParams, DataError, DatabaseConn, QueryOutcome,
    SchemaDefinitions, SchemaManager, SchemaStatus, StatementKind, Table, Value, SCHEMA_VERSION,
};

pub use foodshare::{
    ClaimRecord, ClaimRepository, ClaimStatus, EntityCounts, EntityTable, FilterOptions, FoodListing,
    FoodRepository, FoodshareDatabase, NewFoodListing, NewProvider, ProviderRecord,
    ProviderRepository, ReceiverRecord, ReceiverRepository, CLAIM_TIMESTAMP_FORMAT,
};
