//! Lens module
//!
//! Lenses are the presentation-side helpers: they compose the data-access
//! operations of [`FoodshareDatabase`](crate::database::FoodshareDatabase)
//! and shape their results for display. They never open connections or
//! issue SQL outside of the database module's entry points.
//!
//! | Lens | Purpose |
//! |------|---------|
//! | `DashboardLens` | KPIs, filter options, filtered listings, provider contacts |
//! | `AnalysisLens` | The fifteen analysis queries and chart series |
//!
//! # Usage
//!
//! ```rust,ignore
//! use foodshare::database::FoodshareDatabase;
//! use foodshare::lens::dashboard::{DashboardLens, FilterOptionsCache, ListingFilters};
//! use foodshare::lens::utils::{render_table, OutputFormat};
//!
//! let db = FoodshareDatabase::open_in_dir("~/.foodshare", "foodshare")?;
//! let lens = DashboardLens::new(&db);
//!
//! let mut cache = FilterOptionsCache::default();
//! let options = cache.get(&db)?;
//!
//! let listings = lens.listings(&ListingFilters::default())?;
//! println!("{}", render_table(&listings, OutputFormat::Table, true));
//! ```

pub mod utils;

pub mod analysis;
pub mod dashboard;
