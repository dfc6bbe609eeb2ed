//! Dashboard lens arguments

use super::query_builder::ListingQueryBuilder;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Filters for the listings view
///
/// Every filter is optional; an unset filter matches everything. Unless
/// `include_expired` is set, listings that expired before `as_of` (default:
/// today) are hidden.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct ListingFilters {
    /// Provider city
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub city: Option<String>,

    /// Provider name
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub provider: Option<String>,

    /// Provider type, e.g. Restaurant or Supermarket
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub provider_type: Option<String>,

    /// Only listings claimed by a receiver of this type
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub receiver_type: Option<String>,

    /// Food type, e.g. Vegetarian
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub food_type: Option<String>,

    /// Meal type, e.g. Breakfast or Dinner
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub meal_type: Option<String>,

    /// Reference date for expiry (YYYY-MM-DD), defaults to today
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub as_of: Option<NaiveDate>,

    /// Show expired listings too
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub include_expired: bool,
}

impl ListingFilters {
    /// Convert to a ListingQueryBuilder, using `today` when no reference date is set
    pub fn to_query_builder(&self, today: NaiveDate) -> ListingQueryBuilder {
        let mut builder = ListingQueryBuilder::new();

        if !self.include_expired {
            builder = builder.unexpired_as_of(self.as_of.unwrap_or(today));
        }
        if let Some(city) = &self.city {
            builder = builder.with_city(city);
        }
        if let Some(provider) = &self.provider {
            builder = builder.with_provider(provider);
        }
        if let Some(provider_type) = &self.provider_type {
            builder = builder.with_provider_type(provider_type);
        }
        if let Some(receiver_type) = &self.receiver_type {
            builder = builder.with_receiver_type(receiver_type);
        }
        if let Some(food_type) = &self.food_type {
            builder = builder.with_food_type(food_type);
        }
        if let Some(meal_type) = &self.meal_type {
            builder = builder.with_meal_type(meal_type);
        }

        builder
    }
}
