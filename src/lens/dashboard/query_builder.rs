//! Parameterised query builder for the filtered listings view
//!
//! Filter values are always bound as positional parameters; only fixed column
//! names ever reach the SQL text.
//!
//! # Usage
//!
//! ```rust,ignore
//! use foodshare::lens::dashboard::ListingQueryBuilder;
//!
//! let (sql, args) = ListingQueryBuilder::new()
//!     .with_city("Springfield")
//!     .with_meal_type("Dinner")
//!     .unexpired_as_of(chrono::Local::now().date_naive())
//!     .build();
//! ```

use crate::database::Value;
use chrono::NaiveDate;

const LISTING_COLUMNS: &str = "f.food_id,
       f.food_name,
       f.quantity,
       f.expiry_date,
       f.food_type,
       f.meal_type,
       p.name AS provider_name,
       p.type AS provider_type,
       p.city AS provider_city,
       p.contact AS provider_contact";

/// Query builder for listings joined with their provider
#[derive(Debug, Clone, Default)]
pub struct ListingQueryBuilder {
    /// Provider city
    city: Option<String>,
    /// Provider name
    provider: Option<String>,
    provider_type: Option<String>,
    /// Type of a receiver that has claimed the listing
    receiver_type: Option<String>,
    food_type: Option<String>,
    meal_type: Option<String>,
    /// Hide listings that expire before this date
    unexpired_as_of: Option<NaiveDate>,
}

impl ListingQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }

    pub fn with_provider(mut self, provider: &str) -> Self {
        self.provider = Some(provider.to_string());
        self
    }

    pub fn with_provider_type(mut self, provider_type: &str) -> Self {
        self.provider_type = Some(provider_type.to_string());
        self
    }

    /// Keep listings with at least one claim from a receiver of this type
    pub fn with_receiver_type(mut self, receiver_type: &str) -> Self {
        self.receiver_type = Some(receiver_type.to_string());
        self
    }

    pub fn with_food_type(mut self, food_type: &str) -> Self {
        self.food_type = Some(food_type.to_string());
        self
    }

    pub fn with_meal_type(mut self, meal_type: &str) -> Self {
        self.meal_type = Some(meal_type.to_string());
        self
    }

    /// Only listings whose expiry date is on or after `date`
    pub fn unexpired_as_of(mut self, date: NaiveDate) -> Self {
        self.unexpired_as_of = Some(date);
        self
    }

    fn from_and_where(&self) -> (String, Vec<Value>) {
        let mut conditions = Vec::new();
        let mut args = Vec::new();

        let mut push = |condition: &str, value: Value| {
            args.push(value);
            conditions.push(condition.replace("{}", &format!("?{}", args.len())));
        };

        if let Some(date) = self.unexpired_as_of {
            push("f.expiry_date >= {}", Value::from(date.to_string()));
        }
        if let Some(city) = &self.city {
            push("p.city = {}", Value::from(city.as_str()));
        }
        if let Some(provider) = &self.provider {
            push("p.name = {}", Value::from(provider.as_str()));
        }
        if let Some(provider_type) = &self.provider_type {
            push("p.type = {}", Value::from(provider_type.as_str()));
        }
        if let Some(receiver_type) = &self.receiver_type {
            push(
                "EXISTS (SELECT 1 FROM claims c
                         JOIN receivers r ON r.receiver_id = c.receiver_id
                         WHERE c.food_id = f.food_id AND r.type = {})",
                Value::from(receiver_type.as_str()),
            );
        }
        if let Some(food_type) = &self.food_type {
            push("f.food_type = {}", Value::from(food_type.as_str()));
        }
        if let Some(meal_type) = &self.meal_type {
            push("f.meal_type = {}", Value::from(meal_type.as_str()));
        }

        let mut sql = "FROM food f JOIN providers p ON f.provider_id = p.provider_id".to_string();
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        (sql, args)
    }

    /// Listing rows, soonest expiry first
    pub fn build(&self) -> (String, Vec<Value>) {
        let (from_where, args) = self.from_and_where();
        let sql = format!(
            "SELECT {} {} ORDER BY f.expiry_date ASC, p.name, f.food_name",
            LISTING_COLUMNS, from_where
        );
        (sql, args)
    }

    /// Distinct contact details of the providers behind the matching listings
    pub fn build_contacts(&self) -> (String, Vec<Value>) {
        let (from_where, args) = self.from_and_where();
        let sql = format!(
            "SELECT DISTINCT p.name AS provider_name,
                    p.type AS provider_type,
                    p.city AS provider_city,
                    p.contact AS provider_contact
             {} ORDER BY p.name, p.city",
            from_where
        );
        (sql, args)
    }
}
