//! Analysis lens
//!
//! Runs the fixed analysis queries through [`FoodshareDatabase::fetch`].

pub mod queries;

pub use queries::AnalysisQuery;

use crate::database::{DataError, FoodshareDatabase, Table};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Arguments shared by every analysis query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct AnalysisArgs {
    /// Restrict provider contacts to one city
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub city: Option<String>,

    /// Reference date (YYYY-MM-DD) for expiry-based queries, defaults to today
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl AnalysisArgs {
    fn reference_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// One analysis and its rows
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub query: AnalysisQuery,
    pub title: &'static str,
    pub table: Table,
}

pub struct AnalysisLens<'a> {
    db: &'a FoodshareDatabase,
}

impl<'a> AnalysisLens<'a> {
    pub fn new(db: &'a FoodshareDatabase) -> Self {
        Self { db }
    }

    pub fn run(&self, query: AnalysisQuery, args: &AnalysisArgs) -> Result<AnalysisResult, DataError> {
        let params = query.params(args.city.as_deref(), args.reference_date());
        let table = self.db.fetch(query.sql(), &params)?;
        Ok(AnalysisResult {
            query,
            title: query.title(),
            table,
        })
    }

    /// Run the fifteen numbered analyses in order, stopping at the first failure
    pub fn run_all(&self, args: &AnalysisArgs) -> Result<Vec<AnalysisResult>, DataError> {
        AnalysisQuery::numbered()
            .into_iter()
            .map(|query| self.run(query, args))
            .collect()
    }

    /// The chart series shown on the dashboard
    pub fn charts(&self) -> Result<Vec<AnalysisResult>, DataError> {
        let args = AnalysisArgs::default();
        AnalysisQuery::charts()
            .into_iter()
            .map(|query| self.run(query, &args))
            .collect()
    }
}
