//! Dashboard lens types

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Headline figures for the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Sum of quantity over every listing
    pub total_food_quantity: i64,
    pub total_claims: i64,
    pub total_providers: i64,
    /// Meal type with the most claims, if any claim exists
    pub most_claimed_meal_type: Option<String>,
    /// City (listing location) with the most listings
    pub top_city: Option<String>,
}

/// One KPI as a display row
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KpiRow {
    pub metric: &'static str,
    pub value: String,
}

impl Kpis {
    pub fn to_rows(&self) -> Vec<KpiRow> {
        let or_none = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
        vec![
            KpiRow {
                metric: "Total Food Quantity",
                value: self.total_food_quantity.to_string(),
            },
            KpiRow {
                metric: "Total Claims",
                value: self.total_claims.to_string(),
            },
            KpiRow {
                metric: "Total Providers",
                value: self.total_providers.to_string(),
            },
            KpiRow {
                metric: "Most Claimed Meal Type",
                value: or_none(&self.most_claimed_meal_type),
            },
            KpiRow {
                metric: "City With Most Listings",
                value: or_none(&self.top_city),
            },
        ]
    }
}
