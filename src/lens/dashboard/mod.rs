//! Dashboard lens
//!
//! Headline KPIs, filter options and the filtered listings view. Everything
//! here goes through [`FoodshareDatabase`]; the lens holds no connection.

pub mod args;
pub mod query_builder;
pub mod types;

pub use args::ListingFilters;
pub use query_builder::ListingQueryBuilder;
pub use types::{KpiRow, Kpis};

use crate::database::{DataError, FilterOptions, FoodshareDatabase, Table, Value};
use chrono::{Local, NaiveDate};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default lifetime of cached filter options: one hour
pub const DEFAULT_FILTER_CACHE_TTL: Duration = Duration::from_secs(3600);

pub struct DashboardLens<'a> {
    db: &'a FoodshareDatabase,
}

impl<'a> DashboardLens<'a> {
    pub fn new(db: &'a FoodshareDatabase) -> Self {
        Self { db }
    }

    fn scalar_i64(&self, sql: &str) -> Result<i64, DataError> {
        let table = self.db.fetch(sql, &[])?;
        Ok(table.scalar().and_then(Value::as_i64).unwrap_or(0))
    }

    fn scalar_string(&self, sql: &str) -> Result<Option<String>, DataError> {
        let table = self.db.fetch(sql, &[])?;
        Ok(table.scalar().and_then(Value::as_str).map(str::to_string))
    }

    /// Compute the headline figures; an empty store yields zeros and `None`
    pub fn kpis(&self) -> Result<Kpis, DataError> {
        Ok(Kpis {
            total_food_quantity: self.scalar_i64("SELECT COALESCE(SUM(quantity), 0) FROM food")?,
            total_claims: self.scalar_i64("SELECT COUNT(*) FROM claims")?,
            total_providers: self.scalar_i64("SELECT COUNT(*) FROM providers")?,
            most_claimed_meal_type: self.scalar_string(
                "SELECT f.meal_type
                 FROM food f JOIN claims c ON f.food_id = c.food_id
                 GROUP BY f.meal_type
                 ORDER BY COUNT(*) DESC, f.meal_type
                 LIMIT 1",
            )?,
            top_city: self.scalar_string(
                "SELECT location FROM food
                 GROUP BY location
                 ORDER BY COUNT(*) DESC, location
                 LIMIT 1",
            )?,
        })
    }

    /// Listings matching `filters`, soonest expiry first
    pub fn listings(&self, filters: &ListingFilters) -> Result<Table, DataError> {
        let (sql, args) = filters.to_query_builder(today()).build();
        debug!(%sql, ?args, "filtered listings");
        self.db.fetch(&sql, &args)
    }

    /// Contact details of the providers behind the listings matching `filters`
    pub fn provider_contacts(&self, filters: &ListingFilters) -> Result<Table, DataError> {
        let (sql, args) = filters.to_query_builder(today()).build_contacts();
        self.db.fetch(&sql, &args)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Caller-owned cache of [`FilterOptions`]
///
/// Options are reloaded once they are older than the TTL. Writes to the store
/// do not invalidate the cache; call [`FilterOptionsCache::clear`] to force a
/// reload.
#[derive(Debug)]
pub struct FilterOptionsCache {
    ttl: Duration,
    entry: Option<(Instant, FilterOptions)>,
}

impl Default for FilterOptionsCache {
    fn default() -> Self {
        Self::new(DEFAULT_FILTER_CACHE_TTL)
    }
}

impl FilterOptionsCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// True when cached options exist and are younger than the TTL
    pub fn is_fresh(&self) -> bool {
        matches!(&self.entry, Some((loaded_at, _)) if loaded_at.elapsed() < self.ttl)
    }

    /// Cached options, reloading them from `db` when stale
    pub fn get(&mut self, db: &FoodshareDatabase) -> Result<&FilterOptions, DataError> {
        let entry = match self.entry.take() {
            Some(entry) if entry.0.elapsed() < self.ttl => entry,
            _ => {
                debug!("reloading dashboard filter options");
                (Instant::now(), db.filter_options()?)
            }
        };
        Ok(&self.entry.insert(entry).1)
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::foodshare::test_support::{add_receiver, listing, scratch_database};
    use crate::database::{ClaimStatus, NewProvider};

    /// Two providers in two cities, three listings (one expired), three claims
    fn seeded() -> (tempfile::TempDir, FoodshareDatabase) {
        let (dir, db) = scratch_database();
        let deli = db
            .create_provider(&NewProvider::new("Joe's Deli", "Restaurant", "12 Elm St", "Springfield", "555-0100"))
            .unwrap();
        let mart = db
            .create_provider(&NewProvider::new("Fresh Mart", "Supermarket", "3 Oak", "Shelbyville", "555-0101"))
            .unwrap();
        let shelter = add_receiver(&db, "Hope Shelter", "Shelter", "Springfield");
        let ngo = add_receiver(&db, "City Pantry", "NGO", "Shelbyville");

        let bread = db.create_food_listing(&listing(deli, "Bread", (2030, 1, 1))).unwrap();
        let mut soup = listing(deli, "Soup", (2030, 2, 1));
        soup.meal_type = "Dinner".to_string();
        let soup = db.create_food_listing(&soup).unwrap();
        db.create_food_listing(&listing(mart, "Milk", (2020, 1, 1))).unwrap();

        db.create_claim(bread, shelter, ClaimStatus::Completed).unwrap();
        db.create_claim(soup, ngo, ClaimStatus::Pending).unwrap();
        db.create_claim(soup, shelter, ClaimStatus::Pending).unwrap();
        (dir, db)
    }

    #[test]
    fn test_kpis_empty_store() {
        let (_dir, db) = scratch_database();
        let kpis = DashboardLens::new(&db).kpis().unwrap();
        assert_eq!(kpis, Kpis::default());
        assert_eq!(kpis.to_rows()[3].value, "N/A");
    }

    #[test]
    fn test_kpis() {
        let (_dir, db) = seeded();
        let kpis = DashboardLens::new(&db).kpis().unwrap();

        assert_eq!(kpis.total_food_quantity, 30);
        assert_eq!(kpis.total_claims, 3);
        assert_eq!(kpis.total_providers, 2);
        assert_eq!(kpis.most_claimed_meal_type.as_deref(), Some("Dinner"));
        assert_eq!(kpis.top_city.as_deref(), Some("Springfield"));
    }

    #[test]
    fn test_listings_hide_expired_and_sort_by_expiry() {
        let (_dir, db) = seeded();
        let lens = DashboardLens::new(&db);

        let filters = ListingFilters {
            as_of: NaiveDate::from_ymd_opt(2025, 1, 1),
            ..Default::default()
        };
        let table = lens.listings(&filters).unwrap();
        let names: Vec<_> = table.column("food_name").into_iter().filter_map(Value::as_str).collect();
        assert_eq!(names, vec!["Bread", "Soup"]);

        let all = ListingFilters {
            include_expired: true,
            ..Default::default()
        };
        assert_eq!(lens.listings(&all).unwrap().len(), 3);
    }

    #[test]
    fn test_listings_filters() {
        let (_dir, db) = seeded();
        let lens = DashboardLens::new(&db);

        let by_receiver = ListingFilters {
            receiver_type: Some("NGO".to_string()),
            include_expired: true,
            ..Default::default()
        };
        let table = lens.listings(&by_receiver).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "food_name"), Some(&Value::from("Soup")));

        let by_city = ListingFilters {
            city: Some("Shelbyville".to_string()),
            include_expired: true,
            ..Default::default()
        };
        let table = lens.listings(&by_city).unwrap();
        assert_eq!(table.get(0, "provider_contact"), Some(&Value::from("555-0101")));

        let nothing = ListingFilters {
            meal_type: Some("Breakfast".to_string()),
            ..Default::default()
        };
        assert!(lens.listings(&nothing).unwrap().is_empty());
    }

    #[test]
    fn test_provider_contacts_are_distinct() {
        let (_dir, db) = seeded();
        let filters = ListingFilters {
            include_expired: true,
            ..Default::default()
        };
        let contacts = DashboardLens::new(&db).provider_contacts(&filters).unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts.columns.len(), 4);
    }

    #[test]
    fn test_filter_cache_reuses_until_stale() {
        let (_dir, db) = seeded();
        let mut cache = FilterOptionsCache::new(Duration::from_secs(3600));
        assert!(!cache.is_fresh());

        assert_eq!(cache.get(&db).unwrap().cities.len(), 2);
        db.create_provider(&NewProvider::new("Farm Co", "Grocery", "9 Road", "Ogdenville", "555-0103"))
            .unwrap();
        assert!(cache.is_fresh());
        assert_eq!(cache.get(&db).unwrap().cities.len(), 2);

        cache.clear();
        assert_eq!(cache.get(&db).unwrap().cities.len(), 3);
    }

    #[test]
    fn test_filter_cache_zero_ttl_always_reloads() {
        let (_dir, db) = seeded();
        let mut cache = FilterOptionsCache::new(Duration::ZERO);
        cache.get(&db).unwrap();
        assert!(!cache.is_fresh());

        db.create_provider(&NewProvider::new("Farm Co", "Grocery", "9 Road", "Ogdenville", "555-0103"))
            .unwrap();
        assert_eq!(cache.get(&db).unwrap().provider_types.len(), 3);
    }
}
