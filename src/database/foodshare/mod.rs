//! Foodshare database operations
//!
//! [`FoodshareDatabase`] is the only surface the presentation layer calls. It
//! keeps no open connection: every operation connects, runs one round trip
//! through a repository, and drops the connection before returning. Failures
//! are logged here and returned as a typed [`DataError`].

mod claims;
mod food;
mod providers;
mod receivers;

pub use claims::{ClaimRecord, ClaimRepository, ClaimStatus, CLAIM_TIMESTAMP_FORMAT};
pub use food::{FoodListing, FoodRepository, NewFoodListing};
pub use providers::{NewProvider, ProviderRecord, ProviderRepository};
pub use receivers::{ReceiverRecord, ReceiverRepository};

use crate::database::core::{
    execute_query, fetch, query_table, ConnectionParams, DataError, DatabaseConn, QueryOutcome,
    SchemaManager, SchemaStatus, Table, Value,
};
use chrono::{NaiveDateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{error, info, warn};

/// The four entity tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityTable {
    Providers,
    Receivers,
    Food,
    Claims,
}

impl EntityTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityTable::Providers => "providers",
            EntityTable::Receivers => "receivers",
            EntityTable::Food => "food",
            EntityTable::Claims => "claims",
        }
    }

    fn primary_key(&self) -> &'static str {
        match self {
            EntityTable::Providers => "provider_id",
            EntityTable::Receivers => "receiver_id",
            EntityTable::Food => "food_id",
            EntityTable::Claims => "claim_id",
        }
    }
}

impl fmt::Display for EntityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for EntityTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "providers" | "provider" => Ok(EntityTable::Providers),
            "receivers" | "receiver" => Ok(EntityTable::Receivers),
            "food" | "food_listings" | "listings" => Ok(EntityTable::Food),
            "claims" | "claim" => Ok(EntityTable::Claims),
            _ => Err(format!(
                "Unknown table '{}'. Valid tables: providers, receivers, food, claims",
                s
            )),
        }
    }
}

/// Row counts of the entity tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub providers: u64,
    pub receivers: u64,
    pub food: u64,
    pub claims: u64,
}

/// Distinct values offered as dashboard filters, each sorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub cities: Vec<String>,
    pub providers: Vec<String>,
    pub provider_types: Vec<String>,
    pub receiver_types: Vec<String>,
    pub food_types: Vec<String>,
    pub meal_types: Vec<String>,
}

/// Entry point for all foodshare data access
#[derive(Debug, Clone)]
pub struct FoodshareDatabase {
    params: ConnectionParams,
}

impl FoodshareDatabase {
    /// Open the foodshare database described by `params`
    ///
    /// A fresh database gets its schema created. Any other non-current schema
    /// is reported but left as is; user records are never dropped implicitly.
    pub fn open(params: ConnectionParams) -> Result<Self, DataError> {
        let db = FoodshareDatabase { params };
        db.with_connection("open", |conn| {
            let schema = SchemaManager::new(conn);
            match schema.check_status()? {
                SchemaStatus::Current => {
                    info!("Foodshare database schema is current");
                }
                SchemaStatus::NotInitialized => {
                    info!("Initializing foodshare database schema");
                    schema.initialize()?;
                }
                status => {
                    warn!(
                        "Foodshare database schema is {}; run `foodshare db reset` to rebuild it",
                        status
                    );
                }
            }
            Ok(())
        })?;
        Ok(db)
    }

    /// Open the database in a data directory: `{data_dir}/{database_name}.sqlite3`
    pub fn open_in_dir(data_dir: &str, database_name: &str) -> Result<Self, DataError> {
        Self::open(ConnectionParams::in_dir(data_dir, database_name))
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Connect, run `op`, release the connection; errors are logged with the operation name
    fn with_connection<T>(
        &self,
        operation: &'static str,
        op: impl FnOnce(&Connection) -> Result<T, DataError>,
    ) -> Result<T, DataError> {
        let result = DatabaseConn::connect(&self.params).and_then(|db| op(&db.conn));
        if let Err(e) = &result {
            error!(operation, kind = e.kind(), "{}", e);
        }
        result
    }

    pub fn schema_status(&self) -> Result<SchemaStatus, DataError> {
        self.with_connection("schema_status", |conn| {
            SchemaManager::new(conn).check_status()
        })
    }

    /// Drop every table and create an empty schema
    pub fn reset(&self) -> Result<(), DataError> {
        self.with_connection("reset", |conn| {
            let schema = SchemaManager::new(conn);
            schema.reset()?;
            schema.initialize()
        })?;
        info!("Foodshare database reset");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Generic statements
    // -------------------------------------------------------------------------

    /// Run any statement with positional parameters
    pub fn execute_query(&self, sql: &str, args: &[Value]) -> Result<QueryOutcome, DataError> {
        execute_query(&self.params, sql, args)
    }

    /// Run a read statement and return its rows
    pub fn fetch(&self, sql: &str, args: &[Value]) -> Result<Table, DataError> {
        fetch(&self.params, sql, args)
    }

    // -------------------------------------------------------------------------
    // Providers
    // -------------------------------------------------------------------------

    /// Register a provider and return its new id
    pub fn create_provider(&self, provider: &NewProvider) -> Result<i64, DataError> {
        let id = self.with_connection("create_provider", |conn| {
            ProviderRepository::new(conn).create(provider)
        })?;
        info!("Provider '{}' added with ID: {}", provider.name, id);
        Ok(id)
    }

    pub fn get_provider(&self, provider_id: i64) -> Result<Option<ProviderRecord>, DataError> {
        self.with_connection("get_provider", |conn| {
            ProviderRepository::new(conn).get(provider_id)
        })
    }

    pub fn list_providers(&self) -> Result<Table, DataError> {
        self.with_connection("list_providers", |conn| {
            ProviderRepository::new(conn).list()
        })
    }

    // -------------------------------------------------------------------------
    // Receivers
    // -------------------------------------------------------------------------

    pub fn get_receiver(&self, receiver_id: i64) -> Result<Option<ReceiverRecord>, DataError> {
        self.with_connection("get_receiver", |conn| {
            ReceiverRepository::new(conn).get(receiver_id)
        })
    }

    pub fn list_receivers(&self) -> Result<Table, DataError> {
        self.with_connection("list_receivers", |conn| {
            ReceiverRepository::new(conn).list()
        })
    }

    // -------------------------------------------------------------------------
    // Food listings
    // -------------------------------------------------------------------------

    /// Every food listing, ordered by id descending
    pub fn list_food_listings(&self) -> Result<Table, DataError> {
        self.with_connection("list_food_listings", |conn| {
            FoodRepository::new(conn).list()
        })
    }

    pub fn get_food_listing(&self, food_id: i64) -> Result<Option<FoodListing>, DataError> {
        self.with_connection("get_food_listing", |conn| {
            FoodRepository::new(conn).get(food_id)
        })
    }

    /// Add a listing for an existing provider and return its new id
    pub fn create_food_listing(&self, listing: &NewFoodListing) -> Result<i64, DataError> {
        let id = self.with_connection("create_food_listing", |conn| {
            FoodRepository::new(conn).create(listing)
        })?;
        info!("Food listing '{}' added with ID: {}", listing.food_name, id);
        Ok(id)
    }

    /// Delete a listing and, through the store's cascade, its claims
    ///
    /// Returns false when no listing has this id.
    pub fn delete_food_listing(&self, food_id: i64) -> Result<bool, DataError> {
        let deleted = self.with_connection("delete_food_listing", |conn| {
            FoodRepository::new(conn).delete(food_id)
        })?;
        if deleted {
            info!("Food listing {} and associated claims deleted", food_id);
        } else {
            info!("Food listing {} not found", food_id);
        }
        Ok(deleted)
    }

    // -------------------------------------------------------------------------
    // Claims
    // -------------------------------------------------------------------------

    /// Record a claim timestamped now (UTC)
    pub fn create_claim(
        &self,
        food_id: i64,
        receiver_id: i64,
        status: ClaimStatus,
    ) -> Result<i64, DataError> {
        self.create_claim_at(food_id, receiver_id, status, Utc::now().naive_utc())
    }

    /// Record a claim with an explicit timestamp
    pub fn create_claim_at(
        &self,
        food_id: i64,
        receiver_id: i64,
        status: ClaimStatus,
        timestamp: NaiveDateTime,
    ) -> Result<i64, DataError> {
        let id = self.with_connection("create_claim", |conn| {
            ClaimRepository::new(conn).create(food_id, receiver_id, status, timestamp)
        })?;
        info!(
            "Claim {} recorded for food {} by receiver {}",
            id, food_id, receiver_id
        );
        Ok(id)
    }

    pub fn get_claim(&self, claim_id: i64) -> Result<Option<ClaimRecord>, DataError> {
        self.with_connection("get_claim", |conn| ClaimRepository::new(conn).get(claim_id))
    }

    /// Set a claim's status; returns false when no claim has this id
    pub fn update_claim_status(
        &self,
        claim_id: i64,
        status: ClaimStatus,
    ) -> Result<bool, DataError> {
        let updated = self.with_connection("update_claim_status", |conn| {
            ClaimRepository::new(conn).update_status(claim_id, status)
        })?;
        if updated {
            info!("Claim {} status updated to '{}'", claim_id, status);
        } else {
            info!("Claim {} not found", claim_id);
        }
        Ok(updated)
    }

    pub fn count_claims_for_food(&self, food_id: i64) -> Result<u64, DataError> {
        self.with_connection("count_claims_for_food", |conn| {
            ClaimRepository::new(conn).count_for_food(food_id)
        })
    }

    pub fn list_claims(&self) -> Result<Table, DataError> {
        self.with_connection("list_claims", |conn| {
            ClaimRepository::new(conn).list_detailed()
        })
    }

    // -------------------------------------------------------------------------
    // Whole tables
    // -------------------------------------------------------------------------

    /// Every row of one entity table, in primary-key order
    pub fn view_table(&self, table: EntityTable) -> Result<Table, DataError> {
        let sql = format!(
            "SELECT * FROM {} ORDER BY {}",
            table.table_name(),
            table.primary_key()
        );
        self.with_connection("view_table", |conn| query_table(conn, &sql, &[]))
    }

    /// Current filter values; providers are only those with at least one listing
    pub fn filter_options(&self) -> Result<FilterOptions, DataError> {
        self.with_connection("filter_options", |conn| {
            let providers = ProviderRepository::new(conn);
            let food = FoodRepository::new(conn);
            Ok(FilterOptions {
                cities: providers.cities()?,
                providers: providers.names_with_listings()?,
                provider_types: providers.types()?,
                receiver_types: ReceiverRepository::new(conn).types()?,
                food_types: food.food_types()?,
                meal_types: food.meal_types()?,
            })
        })
    }

    pub fn counts(&self) -> Result<EntityCounts, DataError> {
        self.with_connection("counts", |conn| {
            Ok(EntityCounts {
                providers: ProviderRepository::new(conn).count()?,
                receivers: ReceiverRepository::new(conn).count()?,
                food: FoodRepository::new(conn).count()?,
                claims: ClaimRepository::new(conn).count()?,
            })
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A freshly initialised database in a temporary directory
    pub fn scratch_database() -> (tempfile::TempDir, FoodshareDatabase) {
        let dir = tempfile::tempdir().unwrap();
        let db = FoodshareDatabase::open_in_dir(dir.path().to_str().unwrap(), "foodshare").unwrap();
        (dir, db)
    }

    pub fn add_receiver(db: &FoodshareDatabase, name: &str, receiver_type: &str, city: &str) -> i64 {
        let table = db
            .execute_query(
                "INSERT INTO receivers (name, type, city, contact) VALUES (?1, ?2, ?3, ?4) RETURNING receiver_id",
                &[
                    Value::from(name),
                    Value::from(receiver_type),
                    Value::from(city),
                    Value::from("555-0000"),
                ],
            )
            .unwrap()
            .into_table()
            .unwrap();
        table.scalar().and_then(Value::as_i64).unwrap()
    }

    pub fn listing(provider_id: i64, name: &str, expiry: (i32, u32, u32)) -> NewFoodListing {
        NewFoodListing {
            food_name: name.to_string(),
            quantity: 10,
            expiry_date: chrono::NaiveDate::from_ymd_opt(expiry.0, expiry.1, expiry.2).unwrap(),
            provider_id,
            food_type: "Vegetarian".to_string(),
            meal_type: "Lunch".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn joes_deli() -> NewProvider {
        NewProvider::new("Joe's Deli", "Restaurant", "12 Elm St", "Springfield", "555-0100")
    }

    #[test]
    fn test_open_initializes_schema() {
        let (_dir, db) = scratch_database();
        assert_eq!(db.schema_status().unwrap(), SchemaStatus::Current);
        assert_eq!(db.counts().unwrap(), EntityCounts::default());
    }

    #[test]
    fn test_open_unreachable() {
        let err = FoodshareDatabase::open(ConnectionParams::new(
            "/nonexistent-foodshare-dir/deeper/foodshare.sqlite3",
        ))
        .unwrap_err();
        assert!(err.is_connectivity());
    }

    #[test]
    fn test_create_provider_assigns_fresh_ids() {
        let (_dir, db) = scratch_database();

        let first = db.create_provider(&joes_deli()).unwrap();
        let second = db
            .create_provider(&NewProvider::new("Fresh Mart", "Supermarket", "3 Oak", "Springfield", "555-0101"))
            .unwrap();

        assert!(first > 0);
        assert!(second > 0);
        assert_ne!(first, second);
        assert_eq!(db.get_provider(first).unwrap().unwrap().name, "Joe's Deli");
    }

    #[test]
    fn test_create_duplicate_provider_fails() {
        let (_dir, db) = scratch_database();
        db.create_provider(&joes_deli()).unwrap();

        let err = db.create_provider(&joes_deli()).unwrap_err();
        assert!(err.is_integrity());
        assert_eq!(db.counts().unwrap().providers, 1);
    }

    #[test]
    fn test_provider_listing_round_trip() {
        let (_dir, db) = scratch_database();
        let provider_id = db.create_provider(&joes_deli()).unwrap();

        assert!(db.list_food_listings().unwrap().is_empty());

        let food_id = db
            .create_food_listing(&listing(provider_id, "Sandwiches", (2030, 1, 1)))
            .unwrap();
        let table = db.list_food_listings().unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "food_id"), Some(&Value::Integer(food_id)));
        assert_eq!(table.get(0, "provider_id"), Some(&Value::Integer(provider_id)));
    }

    #[test]
    fn test_list_food_listings_descending() {
        let (_dir, db) = scratch_database();
        let provider_id = db.create_provider(&joes_deli()).unwrap();
        for name in ["Bread", "Soup", "Salad"] {
            db.create_food_listing(&listing(provider_id, name, (2030, 1, 1)))
                .unwrap();
        }
        let newest = db
            .create_food_listing(&listing(provider_id, "Pie", (2030, 1, 1)))
            .unwrap();

        let table = db.list_food_listings().unwrap();
        let ids: Vec<i64> = table
            .column("food_id")
            .into_iter()
            .filter_map(Value::as_i64)
            .collect();

        assert_eq!(ids.first(), Some(&newest));
        assert!(ids.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_update_claim_status() {
        let (_dir, db) = scratch_database();
        let provider_id = db.create_provider(&joes_deli()).unwrap();
        let receiver_id = add_receiver(&db, "Hope Shelter", "Shelter", "Springfield");
        let food_id = db
            .create_food_listing(&listing(provider_id, "Bread", (2030, 1, 1)))
            .unwrap();
        let claim_id = db
            .create_claim(food_id, receiver_id, ClaimStatus::Pending)
            .unwrap();

        for status in ClaimStatus::all() {
            assert!(db.update_claim_status(claim_id, status).unwrap());
            assert_eq!(db.get_claim(claim_id).unwrap().unwrap().status, status);
        }

        assert!(!db
            .update_claim_status(claim_id + 1, ClaimStatus::Completed)
            .unwrap());
        assert_eq!(
            db.get_claim(claim_id).unwrap().unwrap().status,
            ClaimStatus::Cancelled
        );
    }

    #[test]
    fn test_delete_food_listing_cascades() {
        let (_dir, db) = scratch_database();
        let provider_id = db.create_provider(&joes_deli()).unwrap();
        let receiver_id = add_receiver(&db, "Hope Shelter", "Shelter", "Springfield");
        let doomed = db
            .create_food_listing(&listing(provider_id, "Bread", (2030, 1, 1)))
            .unwrap();
        let kept = db
            .create_food_listing(&listing(provider_id, "Soup", (2030, 1, 1)))
            .unwrap();
        db.create_claim(doomed, receiver_id, ClaimStatus::Pending)
            .unwrap();
        db.create_claim(doomed, receiver_id, ClaimStatus::Completed)
            .unwrap();
        db.create_claim(kept, receiver_id, ClaimStatus::Pending)
            .unwrap();

        assert!(db.delete_food_listing(doomed).unwrap());

        assert_eq!(db.count_claims_for_food(doomed).unwrap(), 0);
        assert_eq!(db.count_claims_for_food(kept).unwrap(), 1);
        assert!(db.get_food_listing(doomed).unwrap().is_none());
        assert_eq!(db.counts().unwrap().claims, 1);
    }

    #[test]
    fn test_delete_missing_food_listing() {
        let (_dir, db) = scratch_database();
        let provider_id = db.create_provider(&joes_deli()).unwrap();
        let food_id = db
            .create_food_listing(&listing(provider_id, "Bread", (2030, 1, 1)))
            .unwrap();

        assert!(!db.delete_food_listing(food_id + 1).unwrap());
        assert_eq!(db.counts().unwrap().food, 1);
    }

    #[test]
    fn test_claim_for_missing_food_is_rejected() {
        let (_dir, db) = scratch_database();
        let receiver_id = add_receiver(&db, "Hope Shelter", "Shelter", "Springfield");

        let err = db
            .create_claim(999, receiver_id, ClaimStatus::Pending)
            .unwrap_err();
        assert!(err.is_integrity());
    }

    #[test]
    fn test_view_table() {
        let (_dir, db) = scratch_database();
        db.create_provider(&joes_deli()).unwrap();
        let receiver_id = add_receiver(&db, "Hope Shelter", "Shelter", "Springfield");
        assert_eq!(db.get_receiver(receiver_id).unwrap().unwrap().city, "Springfield");
        assert_eq!(db.list_receivers().unwrap().len(), 1);

        let providers = db.view_table(EntityTable::Providers).unwrap();
        assert_eq!(providers.len(), 1);
        assert!(providers.column_index("contact").is_some());

        let claims = db.view_table(EntityTable::Claims).unwrap();
        assert!(claims.is_empty());
        assert_eq!(claims.columns.len(), 5);
    }

    #[test]
    fn test_entity_table_from_str() {
        assert_eq!("food_listings".parse::<EntityTable>().unwrap(), EntityTable::Food);
        assert_eq!("Claims".parse::<EntityTable>().unwrap(), EntityTable::Claims);
        assert!("users".parse::<EntityTable>().is_err());
    }

    #[test]
    fn test_filter_options() {
        let (_dir, db) = scratch_database();
        let deli = db.create_provider(&joes_deli()).unwrap();
        db.create_provider(&NewProvider::new("Corner Bakery", "Bakery", "1 Main", "Shelbyville", "555-0102"))
            .unwrap();
        add_receiver(&db, "Hope Shelter", "Shelter", "Springfield");
        db.create_food_listing(&listing(deli, "Bread", (2030, 1, 1)))
            .unwrap();

        let options = db.filter_options().unwrap();
        assert_eq!(options.cities, vec!["Shelbyville", "Springfield"]);
        assert_eq!(options.providers, vec!["Joe's Deli"]);
        assert_eq!(options.provider_types, vec!["Bakery", "Restaurant"]);
        assert_eq!(options.receiver_types, vec!["Shelter"]);
        assert_eq!(options.food_types, vec!["Vegetarian"]);
        assert_eq!(options.meal_types, vec!["Lunch"]);
    }

    #[test]
    fn test_reset_clears_records() {
        let (_dir, db) = scratch_database();
        db.create_provider(&joes_deli()).unwrap();

        db.reset().unwrap();
        assert_eq!(db.counts().unwrap().providers, 0);
        assert_eq!(db.schema_status().unwrap(), SchemaStatus::Current);
    }
}
