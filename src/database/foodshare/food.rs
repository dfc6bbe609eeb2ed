//! Food listing repository
//!
//! Listings live in the `food` table. Deleting a listing removes its claims
//! through the store's `ON DELETE CASCADE`; nothing here deletes claims by hand.

use super::providers::distinct_strings;
use crate::database::core::{query_table, with_transaction, DataError, Table};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

pub struct FoodRepository<'a> {
    conn: &'a Connection,
}

/// Input for a new food listing
///
/// The provider's type and city are copied onto the listing when it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFoodListing {
    pub food_name: String,
    pub quantity: u32,
    pub expiry_date: NaiveDate,
    pub provider_id: i64,
    pub food_type: String,
    pub meal_type: String,
}

/// A row of the `food` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodListing {
    pub food_id: i64,
    pub food_name: String,
    pub quantity: i64,
    pub expiry_date: NaiveDate,
    pub provider_id: i64,
    pub provider_type: String,
    pub location: String,
    pub food_type: String,
    pub meal_type: String,
}

impl<'a> FoodRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn count(&self) -> Result<u64, DataError> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM food", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert a listing for an existing provider and return its id
    pub fn create(&self, listing: &NewFoodListing) -> Result<i64, DataError> {
        with_transaction(self.conn, |tx| {
            let id: Option<i64> = tx
                .query_row(
                    "INSERT INTO food (food_name, quantity, expiry_date, provider_id,
                                       provider_type, location, food_type, meal_type)
                     SELECT ?1, ?2, ?3, p.provider_id, p.type, p.city, ?5, ?6
                     FROM providers p WHERE p.provider_id = ?4
                     RETURNING food_id",
                    params![
                        listing.food_name,
                        listing.quantity,
                        listing.expiry_date,
                        listing.provider_id,
                        listing.food_type,
                        listing.meal_type,
                    ],
                    |row| row.get(0),
                )
                .optional()?;

            id.ok_or_else(|| {
                DataError::integrity(format!(
                    "provider {} does not exist",
                    listing.provider_id
                ))
            })
        })
    }

    pub fn get(&self, food_id: i64) -> Result<Option<FoodListing>, DataError> {
        let record = self
            .conn
            .query_row(
                "SELECT food_id, food_name, quantity, expiry_date, provider_id,
                        provider_type, location, food_type, meal_type
                 FROM food WHERE food_id = ?1",
                [food_id],
                |row| {
                    Ok(FoodListing {
                        food_id: row.get(0)?,
                        food_name: row.get(1)?,
                        quantity: row.get(2)?,
                        expiry_date: row.get(3)?,
                        provider_id: row.get(4)?,
                        provider_type: row.get(5)?,
                        location: row.get(6)?,
                        food_type: row.get(7)?,
                        meal_type: row.get(8)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Every listing, most recent (highest id) first
    pub fn list(&self) -> Result<Table, DataError> {
        query_table(
            self.conn,
            "SELECT food_id, food_name, quantity, expiry_date, provider_id,
                    provider_type, location, food_type, meal_type
             FROM food ORDER BY food_id DESC",
            &[],
        )
    }

    /// Delete a listing; returns false when no listing has this id
    pub fn delete(&self, food_id: i64) -> Result<bool, DataError> {
        with_transaction(self.conn, |tx| {
            let removed = tx.execute("DELETE FROM food WHERE food_id = ?1", [food_id])?;
            Ok(removed > 0)
        })
    }

    pub fn food_types(&self) -> Result<Vec<String>, DataError> {
        distinct_strings(self.conn, "SELECT DISTINCT food_type FROM food ORDER BY food_type")
    }

    pub fn meal_types(&self) -> Result<Vec<String>, DataError> {
        distinct_strings(self.conn, "SELECT DISTINCT meal_type FROM food ORDER BY meal_type")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::core::{DatabaseConn, SchemaManager, Value};
    use crate::database::foodshare::providers::{NewProvider, ProviderRepository};

    fn setup() -> (DatabaseConn, i64) {
        let db = DatabaseConn::open_in_memory().unwrap();
        SchemaManager::new(&db.conn).initialize().unwrap();
        let provider_id = ProviderRepository::new(&db.conn)
            .create(&NewProvider::new(
                "Joe's Deli",
                "Restaurant",
                "12 Elm St",
                "Springfield",
                "555-0100",
            ))
            .unwrap();
        (db, provider_id)
    }

    fn listing(provider_id: i64, name: &str) -> NewFoodListing {
        NewFoodListing {
            food_name: name.to_string(),
            quantity: 12,
            expiry_date: NaiveDate::from_ymd_opt(2030, 3, 1).unwrap(),
            provider_id,
            food_type: "Vegetarian".to_string(),
            meal_type: "Lunch".to_string(),
        }
    }

    #[test]
    fn test_create_copies_provider_details() {
        let (db, provider_id) = setup();
        let repo = FoodRepository::new(&db.conn);

        let id = repo.create(&listing(provider_id, "Bread")).unwrap();
        let stored = repo.get(id).unwrap().unwrap();

        assert_eq!(stored.food_name, "Bread");
        assert_eq!(stored.provider_type, "Restaurant");
        assert_eq!(stored.location, "Springfield");
        assert_eq!(stored.expiry_date, NaiveDate::from_ymd_opt(2030, 3, 1).unwrap());
    }

    #[test]
    fn test_create_for_missing_provider() {
        let (db, provider_id) = setup();
        let repo = FoodRepository::new(&db.conn);

        let err = repo.create(&listing(provider_id + 100, "Soup")).unwrap_err();
        assert!(err.is_integrity());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_list_is_newest_first() {
        let (db, provider_id) = setup();
        let repo = FoodRepository::new(&db.conn);

        let first = repo.create(&listing(provider_id, "Bread")).unwrap();
        let second = repo.create(&listing(provider_id, "Soup")).unwrap();

        let table = repo.list().unwrap();
        assert_eq!(table.column("food_id"), vec![&Value::Integer(second), &Value::Integer(first)]);
        assert_eq!(table.get(1, "expiry_date"), Some(&Value::Text("2030-03-01".into())));
    }

    #[test]
    fn test_delete() {
        let (db, provider_id) = setup();
        let repo = FoodRepository::new(&db.conn);
        let id = repo.create(&listing(provider_id, "Bread")).unwrap();

        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_type_lists() {
        let (db, provider_id) = setup();
        let repo = FoodRepository::new(&db.conn);
        let mut dinner = listing(provider_id, "Stew");
        dinner.meal_type = "Dinner".to_string();
        dinner.food_type = "Non-Vegetarian".to_string();
        repo.create(&dinner).unwrap();
        repo.create(&listing(provider_id, "Bread")).unwrap();

        assert_eq!(repo.food_types().unwrap(), vec!["Non-Vegetarian", "Vegetarian"]);
        assert_eq!(repo.meal_types().unwrap(), vec!["Dinner", "Lunch"]);
    }
}
