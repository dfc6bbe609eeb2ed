//! Provider repository
//!
//! Providers donate food listings. They are created here and referenced by
//! listings; deleting a provider is not supported.

use crate::database::core::{query_table, with_transaction, DataError, Table};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

/// Repository for provider operations
pub struct ProviderRepository<'a> {
    conn: &'a Connection,
}

/// Input for registering a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProvider {
    pub name: String,
    #[serde(rename = "type")]
    pub provider_type: String,
    pub address: String,
    pub city: String,
    pub contact: String,
}

impl NewProvider {
    pub fn new(
        name: impl Into<String>,
        provider_type: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            provider_type: provider_type.into(),
            address: address.into(),
            city: city.into(),
            contact: contact.into(),
        }
    }
}

/// A provider row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub provider_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub provider_type: String,
    pub address: String,
    pub city: String,
    pub contact: String,
}

impl<'a> ProviderRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn count(&self) -> Result<u64, DataError> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM providers", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert a provider and return its store-assigned id
    pub fn create(&self, provider: &NewProvider) -> Result<i64, DataError> {
        with_transaction(self.conn, |tx| {
            let id: i64 = tx.query_row(
                "INSERT INTO providers (name, type, address, city, contact)
                 VALUES (?1, ?2, ?3, ?4, ?5) RETURNING provider_id",
                params![
                    provider.name,
                    provider.provider_type,
                    provider.address,
                    provider.city,
                    provider.contact,
                ],
                |row| row.get(0),
            )?;
            Ok(id)
        })
    }

    pub fn get(&self, provider_id: i64) -> Result<Option<ProviderRecord>, DataError> {
        let record = self
            .conn
            .query_row(
                "SELECT provider_id, name, type, address, city, contact
                 FROM providers WHERE provider_id = ?1",
                [provider_id],
                |row| {
                    Ok(ProviderRecord {
                        provider_id: row.get(0)?,
                        name: row.get(1)?,
                        provider_type: row.get(2)?,
                        address: row.get(3)?,
                        city: row.get(4)?,
                        contact: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// All providers ordered by name
    pub fn list(&self) -> Result<Table, DataError> {
        query_table(
            self.conn,
            "SELECT provider_id, name, type, address, city, contact
             FROM providers ORDER BY name, provider_id",
            &[],
        )
    }

    pub fn cities(&self) -> Result<Vec<String>, DataError> {
        distinct_strings(self.conn, "SELECT DISTINCT city FROM providers ORDER BY city")
    }

    pub fn types(&self) -> Result<Vec<String>, DataError> {
        distinct_strings(self.conn, "SELECT DISTINCT type FROM providers ORDER BY type")
    }

    /// Names of providers that have at least one food listing
    pub fn names_with_listings(&self) -> Result<Vec<String>, DataError> {
        distinct_strings(
            self.conn,
            "SELECT DISTINCT p.name
             FROM providers p
             JOIN food f ON p.provider_id = f.provider_id
             ORDER BY p.name",
        )
    }
}

/// Collect the first column of a query as strings
pub(crate) fn distinct_strings(conn: &Connection, sql: &str) -> Result<Vec<String>, DataError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let mut values = Vec::new();
    for value in rows {
        values.push(value?);
    }
    Ok(values)
}
