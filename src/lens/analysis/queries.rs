//! Named analysis queries
//!
//! Fifteen numbered analyses plus two chart-only series. [`AnalysisQuery::charts`]
//! returns three series for the dashboard: the two chart-only ones and food
//! quantity by provider type. Each query is fixed SQL; the only inputs (a city
//! and a reference date) are bound as parameters.

use crate::database::Value;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisQuery {
    ProvidersReceiversPerCity,
    FoodByProviderType,
    ProviderContacts,
    TopReceivers,
    TotalAvailableFood,
    CityWithMostListings,
    FoodTypes,
    ClaimsPerFood,
    TopProvider,
    ClaimStatusPercentages,
    AverageClaimedPerReceiver,
    MealTypesByCompletedClaims,
    QuantityPerProvider,
    ExpiringSoon,
    PendingClaims,
    // chart series
    ClaimStatusDistribution,
    ClaimsPerDay,
}

/// Inputs a query may bind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    None,
    City,
    AsOf,
}

impl AnalysisQuery {
    /// The fifteen numbered analyses, in order
    pub fn numbered() -> [AnalysisQuery; 15] {
        use AnalysisQuery::*;
        [
            ProvidersReceiversPerCity,
            FoodByProviderType,
            ProviderContacts,
            TopReceivers,
            TotalAvailableFood,
            CityWithMostListings,
            FoodTypes,
            ClaimsPerFood,
            TopProvider,
            ClaimStatusPercentages,
            AverageClaimedPerReceiver,
            MealTypesByCompletedClaims,
            QuantityPerProvider,
            ExpiringSoon,
            PendingClaims,
        ]
    }

    pub fn charts() -> [AnalysisQuery; 3] {
        [
            AnalysisQuery::FoodByProviderType,
            AnalysisQuery::ClaimStatusDistribution,
            AnalysisQuery::ClaimsPerDay,
        ]
    }

    /// 1-based position among the numbered analyses
    pub fn number(&self) -> Option<usize> {
        Self::numbered()
            .iter()
            .position(|q| q == self)
            .map(|idx| idx + 1)
    }

    pub fn name(&self) -> &'static str {
        use AnalysisQuery::*;
        match self {
            ProvidersReceiversPerCity => "providers-receivers-per-city",
            FoodByProviderType => "food-by-provider-type",
            ProviderContacts => "provider-contacts",
            TopReceivers => "top-receivers",
            TotalAvailableFood => "total-available-food",
            CityWithMostListings => "city-with-most-listings",
            FoodTypes => "food-types",
            ClaimsPerFood => "claims-per-food",
            TopProvider => "top-provider",
            ClaimStatusPercentages => "claim-status-percentages",
            AverageClaimedPerReceiver => "average-claimed-per-receiver",
            MealTypesByCompletedClaims => "meal-types-by-completed-claims",
            QuantityPerProvider => "quantity-per-provider",
            ExpiringSoon => "expiring-soon",
            PendingClaims => "pending-claims",
            ClaimStatusDistribution => "claim-status-distribution",
            ClaimsPerDay => "claims-per-day",
        }
    }

    pub fn title(&self) -> &'static str {
        use AnalysisQuery::*;
        match self {
            ProvidersReceiversPerCity => "Providers & Receivers per City",
            FoodByProviderType => "Food Quantity by Provider Type",
            ProviderContacts => "Contact Info of Providers",
            TopReceivers => "Receivers Who Claimed Most Food",
            TotalAvailableFood => "Total Quantity of Unexpired Food",
            CityWithMostListings => "City with Most Food Listings",
            FoodTypes => "Most Common Food Types",
            ClaimsPerFood => "Claims per Food Item",
            TopProvider => "Provider with Most Successful Claims",
            ClaimStatusPercentages => "Claim Status Percentages",
            AverageClaimedPerReceiver => "Average Quantity Claimed per Receiver",
            MealTypesByCompletedClaims => "Most Claimed Meal Types",
            QuantityPerProvider => "Total Quantity Donated per Provider",
            ExpiringSoon => "Food Expiring in the Next 7 Days",
            PendingClaims => "Pending Claims",
            ClaimStatusDistribution => "Claim Status Distribution",
            ClaimsPerDay => "Claims per Day",
        }
    }

    pub fn sql(&self) -> &'static str {
        use AnalysisQuery::*;
        match self {
            ProvidersReceiversPerCity => {
                "WITH cities AS (SELECT city FROM providers UNION SELECT city FROM receivers)
                 SELECT c.city,
                        (SELECT COUNT(*) FROM providers p WHERE p.city = c.city) AS num_providers,
                        (SELECT COUNT(*) FROM receivers r WHERE r.city = c.city) AS num_receivers
                 FROM cities c
                 ORDER BY c.city"
            }
            FoodByProviderType => {
                "SELECT p.type AS provider_type, SUM(f.quantity) AS total_food_quantity
                 FROM food f
                 JOIN providers p ON f.provider_id = p.provider_id
                 GROUP BY p.type
                 ORDER BY total_food_quantity DESC, p.type"
            }
            ProviderContacts => {
                "SELECT city, name, address, contact
                 FROM providers
                 WHERE ?1 IS NULL OR city = ?1
                 ORDER BY city, name"
            }
            TopReceivers => {
                "SELECT r.name AS receiver_name, SUM(f.quantity) AS total_food_claimed
                 FROM claims c
                 JOIN food f ON c.food_id = f.food_id
                 JOIN receivers r ON c.receiver_id = r.receiver_id
                 WHERE c.status = 'Completed'
                 GROUP BY r.receiver_id, r.name
                 ORDER BY total_food_claimed DESC, r.name
                 LIMIT 10"
            }
            TotalAvailableFood => {
                "SELECT COALESCE(SUM(quantity), 0) AS total_available_food
                 FROM food
                 WHERE expiry_date >= ?1"
            }
            CityWithMostListings => {
                "SELECT location AS city, COUNT(*) AS number_of_listings
                 FROM food
                 GROUP BY location
                 ORDER BY number_of_listings DESC, location
                 LIMIT 1"
            }
            FoodTypes => {
                "SELECT food_type, COUNT(*) AS number_of_listings
                 FROM food
                 GROUP BY food_type
                 ORDER BY number_of_listings DESC, food_type"
            }
            ClaimsPerFood => {
                "SELECT f.food_name, COUNT(c.claim_id) AS number_of_claims
                 FROM food f
                 LEFT JOIN claims c ON f.food_id = c.food_id
                 GROUP BY f.food_name
                 ORDER BY number_of_claims DESC, f.food_name"
            }
            TopProvider => {
                "SELECT p.name AS provider_name, COUNT(c.claim_id) AS number_of_successful_claims
                 FROM providers p
                 JOIN food f ON p.provider_id = f.provider_id
                 JOIN claims c ON f.food_id = c.food_id
                 WHERE c.status = 'Completed'
                 GROUP BY p.provider_id, p.name
                 ORDER BY number_of_successful_claims DESC, p.name
                 LIMIT 1"
            }
            ClaimStatusPercentages => {
                "SELECT status,
                        COUNT(*) AS num_claims,
                        ROUND(COUNT(*) * 100.0 / (SELECT COUNT(*) FROM claims), 2) AS percentage
                 FROM claims
                 GROUP BY status
                 ORDER BY num_claims DESC, status"
            }
            AverageClaimedPerReceiver => {
                "SELECT AVG(total_food_claimed) AS average_quantity_claimed_per_receiver
                 FROM (
                     SELECT c.receiver_id, SUM(f.quantity) AS total_food_claimed
                     FROM claims c
                     JOIN food f ON c.food_id = f.food_id
                     WHERE c.status = 'Completed'
                     GROUP BY c.receiver_id
                 )"
            }
            MealTypesByCompletedClaims => {
                "SELECT f.meal_type, COUNT(*) AS number_of_claims
                 FROM claims c
                 JOIN food f ON c.food_id = f.food_id
                 WHERE c.status = 'Completed'
                 GROUP BY f.meal_type
                 ORDER BY number_of_claims DESC, f.meal_type"
            }
            QuantityPerProvider => {
                "SELECT p.name AS provider_name, SUM(f.quantity) AS total_donated_quantity
                 FROM providers p
                 JOIN food f ON p.provider_id = f.provider_id
                 GROUP BY p.provider_id, p.name
                 ORDER BY total_donated_quantity DESC, p.name"
            }
            ExpiringSoon => {
                "SELECT f.food_name, f.quantity, f.expiry_date,
                        p.name AS provider_name, p.city AS provider_city
                 FROM food f
                 JOIN providers p ON f.provider_id = p.provider_id
                 WHERE f.expiry_date BETWEEN ?1 AND date(?1, '+7 days')
                 ORDER BY f.expiry_date ASC, f.food_name"
            }
            PendingClaims => {
                "SELECT c.claim_id, f.food_name, f.quantity,
                        r.name AS receiver_name, r.contact AS receiver_contact, c.timestamp
                 FROM claims c
                 JOIN food f ON c.food_id = f.food_id
                 JOIN receivers r ON c.receiver_id = r.receiver_id
                 WHERE c.status = 'Pending'
                 ORDER BY c.timestamp DESC, c.claim_id DESC"
            }
            ClaimStatusDistribution => {
                "SELECT status, COUNT(*) AS num_claims
                 FROM claims
                 GROUP BY status
                 ORDER BY status"
            }
            ClaimsPerDay => {
                "SELECT date(timestamp) AS day, COUNT(*) AS claims
                 FROM claims
                 GROUP BY day
                 ORDER BY day"
            }
        }
    }

    fn binding(&self) -> Binding {
        match self {
            AnalysisQuery::ProviderContacts => Binding::City,
            AnalysisQuery::TotalAvailableFood | AnalysisQuery::ExpiringSoon => Binding::AsOf,
            _ => Binding::None,
        }
    }

    /// Positional arguments for this query
    pub fn params(&self, city: Option<&str>, as_of: NaiveDate) -> Vec<Value> {
        match self.binding() {
            Binding::None => Vec::new(),
            Binding::City => vec![Value::from(city)],
            Binding::AsOf => vec![Value::from(as_of.to_string())],
        }
    }
}

impl fmt::Display for AnalysisQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnalysisQuery {
    type Err = String;

    /// Accepts a query name or its number (1-15)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if let Ok(n) = s.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|idx| Self::numbered().get(idx).copied())
                .ok_or_else(|| format!("Analysis number must be between 1 and 15, got {}", n));
        }

        let all = Self::numbered().into_iter().chain([
            AnalysisQuery::ClaimStatusDistribution,
            AnalysisQuery::ClaimsPerDay,
        ]);
        for query in all {
            if query.name() == s.replace('_', "-") {
                return Ok(query);
            }
        }
        Err(format!(
            "Unknown analysis '{}'. Use a number from 1 to 15 or one of the names listed by `foodshare analysis`",
            s
        ))
    }
}
