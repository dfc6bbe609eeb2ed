//! Claim repository
//!
//! A claim is a receiver's request against a food listing. Claims are removed
//! by the store when their listing is deleted.

use crate::database::core::{query_table, with_transaction, DataError, Table};
use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp layout used for `claims.timestamp`
pub const CLAIM_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Status of a claim; the store rejects anything outside this set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    Pending,
    Completed,
    Cancelled,
}

impl ClaimStatus {
    pub fn all() -> [ClaimStatus; 3] {
        [
            ClaimStatus::Pending,
            ClaimStatus::Completed,
            ClaimStatus::Cancelled,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "Pending",
            ClaimStatus::Completed => "Completed",
            ClaimStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ClaimStatus::Pending),
            "completed" => Ok(ClaimStatus::Completed),
            "cancelled" | "canceled" => Ok(ClaimStatus::Cancelled),
            _ => Err(format!(
                "Unknown claim status '{}'. Valid statuses: pending, completed, cancelled",
                s
            )),
        }
    }
}

impl ToSql for ClaimStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(ValueRef::Text(self.as_str().as_bytes())))
    }
}

impl FromSql for ClaimStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// A row of the `claims` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub claim_id: i64,
    pub food_id: i64,
    pub receiver_id: i64,
    pub status: ClaimStatus,
    pub timestamp: NaiveDateTime,
}

pub struct ClaimRepository<'a> {
    conn: &'a Connection,
}

impl<'a> ClaimRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn count(&self) -> Result<u64, DataError> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM claims", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Record a claim and return its id
    ///
    /// Unknown listing or receiver ids are rejected by the store.
    pub fn create(
        &self,
        food_id: i64,
        receiver_id: i64,
        status: ClaimStatus,
        timestamp: NaiveDateTime,
    ) -> Result<i64, DataError> {
        let timestamp = timestamp.format(CLAIM_TIMESTAMP_FORMAT).to_string();
        with_transaction(self.conn, |tx| {
            let id: i64 = tx.query_row(
                "INSERT INTO claims (food_id, receiver_id, status, timestamp)
                 VALUES (?1, ?2, ?3, ?4) RETURNING claim_id",
                params![food_id, receiver_id, status, timestamp],
                |row| row.get(0),
            )?;
            Ok(id)
        })
    }

    pub fn get(&self, claim_id: i64) -> Result<Option<ClaimRecord>, DataError> {
        let record = self
            .conn
            .query_row(
                "SELECT claim_id, food_id, receiver_id, status, timestamp
                 FROM claims WHERE claim_id = ?1",
                [claim_id],
                |row| {
                    Ok(ClaimRecord {
                        claim_id: row.get(0)?,
                        food_id: row.get(1)?,
                        receiver_id: row.get(2)?,
                        status: row.get(3)?,
                        timestamp: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Set the status of one claim; returns false when no claim has this id
    pub fn update_status(&self, claim_id: i64, status: ClaimStatus) -> Result<bool, DataError> {
        with_transaction(self.conn, |tx| {
            let updated = tx.execute(
                "UPDATE claims SET status = ?1 WHERE claim_id = ?2",
                params![status, claim_id],
            )?;
            Ok(updated > 0)
        })
    }

    pub fn count_for_food(&self, food_id: i64) -> Result<u64, DataError> {
        let count: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM claims WHERE food_id = ?1",
            [food_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Claims joined with their listing and receiver, newest claim first
    pub fn list_detailed(&self) -> Result<Table, DataError> {
        query_table(
            self.conn,
            "SELECT c.claim_id, f.food_name, r.name AS receiver_name, c.status, c.timestamp
             FROM claims c
             JOIN food f ON c.food_id = f.food_id
             JOIN receivers r ON c.receiver_id = r.receiver_id
             ORDER BY c.claim_id DESC",
            &[],
        )
    }
}
