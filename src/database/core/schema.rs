//! Database schema management
//!
//! This module provides schema definitions and management for the foodshare
//! database. The four entity tables are defined here together so that foreign
//! keys and cascading rules live in one place.

use super::error::DataError;
use rusqlite::Connection;

/// Current schema version
/// Increment this when making breaking schema changes
pub const SCHEMA_VERSION: u32 = 1;

/// Tables that must exist for the schema to be considered intact
pub const REQUIRED_TABLES: &[&str] = &[
    "foodshare_meta",
    "providers",
    "receivers",
    "food",
    "claims",
];

/// Schema definitions for all tables in the foodshare database
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    /// SQL for creating the meta table (tracks schema version and global metadata)
    pub const META_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS foodshare_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );
    "#;

    pub const PROVIDERS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS providers (
            provider_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            address TEXT NOT NULL,
            city TEXT NOT NULL,
            contact TEXT NOT NULL,
            UNIQUE (name, address, city)
        );
    "#;

    pub const RECEIVERS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS receivers (
            receiver_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            city TEXT NOT NULL,
            contact TEXT NOT NULL
        );
    "#;

    /// Food listings; `provider_type` and `location` are copied from the
    /// provider when the listing is created.
    pub const FOOD_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS food (
            food_id INTEGER PRIMARY KEY AUTOINCREMENT,
            food_name TEXT NOT NULL,
            quantity INTEGER NOT NULL CHECK (quantity >= 0),
            expiry_date TEXT NOT NULL,
            provider_id INTEGER NOT NULL REFERENCES providers(provider_id),
            provider_type TEXT NOT NULL,
            location TEXT NOT NULL,
            food_type TEXT NOT NULL,
            meal_type TEXT NOT NULL
        );
    "#;

    pub const CLAIMS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS claims (
            claim_id INTEGER PRIMARY KEY AUTOINCREMENT,
            food_id INTEGER NOT NULL REFERENCES food(food_id) ON DELETE CASCADE,
            receiver_id INTEGER NOT NULL REFERENCES receivers(receiver_id),
            status TEXT NOT NULL CHECK (status IN ('Pending', 'Completed', 'Cancelled')),
            timestamp TEXT NOT NULL
        );
    "#;

    pub const INDEXES: &'static [&'static str] = &[
        "CREATE INDEX IF NOT EXISTS idx_providers_city ON providers(city)",
        "CREATE INDEX IF NOT EXISTS idx_food_provider_id ON food(provider_id)",
        "CREATE INDEX IF NOT EXISTS idx_food_expiry_date ON food(expiry_date)",
        "CREATE INDEX IF NOT EXISTS idx_claims_food_id ON claims(food_id)",
        "CREATE INDEX IF NOT EXISTS idx_claims_receiver_id ON claims(receiver_id)",
        "CREATE INDEX IF NOT EXISTS idx_claims_status ON claims(status)",
    ];
}

/// Schema manager for the foodshare database
///
/// Handles schema initialization, version checking and reset.
pub struct SchemaManager<'a> {
    conn: &'a Connection,
}

impl<'a> SchemaManager<'a> {
    /// Create a new schema manager for the given connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Initialize the database schema
    ///
    /// Creates all tables and indexes if they don't exist and records the
    /// schema version in the meta table.
    pub fn initialize(&self) -> Result<(), DataError> {
        let tables = [
            SchemaDefinitions::META_TABLE,
            SchemaDefinitions::PROVIDERS_TABLE,
            SchemaDefinitions::RECEIVERS_TABLE,
            SchemaDefinitions::FOOD_TABLE,
            SchemaDefinitions::CLAIMS_TABLE,
        ];
        for table_sql in tables {
            self.conn.execute(table_sql, [])?;
        }

        for index_sql in SchemaDefinitions::INDEXES {
            self.conn.execute(index_sql, [])?;
        }

        self.set_meta("schema_version", &SCHEMA_VERSION.to_string())?;
        Ok(())
    }

    /// Check the current schema status
    pub fn check_status(&self) -> Result<SchemaStatus, DataError> {
        if !self.table_exists("foodshare_meta")? {
            return Ok(SchemaStatus::NotInitialized);
        }

        let current_version = self.get_schema_version()?;

        if current_version == SCHEMA_VERSION {
            if self.verify_integrity()? {
                Ok(SchemaStatus::Current)
            } else {
                Ok(SchemaStatus::Corrupted)
            }
        } else if current_version < SCHEMA_VERSION {
            Ok(SchemaStatus::NeedsMigration {
                from: current_version,
                to: SCHEMA_VERSION,
            })
        } else {
            Ok(SchemaStatus::Incompatible {
                database_version: current_version,
                required_version: SCHEMA_VERSION,
            })
        }
    }

    /// Get the current schema version from the database (0 when unset)
    fn get_schema_version(&self) -> Result<u32, DataError> {
        let version = self
            .get_meta("schema_version")?
            .unwrap_or_else(|| "0".to_string());

        version.parse().map_err(|e| DataError::Decode {
            column: "schema_version".to_string(),
            reason: format!("{}", e),
        })
    }

    fn table_exists(&self, table: &str) -> Result<bool, DataError> {
        let exists: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table],
            |row| row.get(0),
        )?;
        Ok(exists > 0)
    }

    /// Verify schema integrity by checking required tables exist
    fn verify_integrity(&self) -> Result<bool, DataError> {
        for table in REQUIRED_TABLES {
            if !self.table_exists(table)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Set a metadata value
    pub fn set_meta(&self, key: &str, value: &str) -> Result<(), DataError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO foodshare_meta (key, value, updated_at) VALUES (?1, ?2, strftime('%s', 'now'))",
            [key, value],
        )?;
        Ok(())
    }

    /// Get a metadata value
    pub fn get_meta(&self, key: &str) -> Result<Option<String>, DataError> {
        let result: Result<String, _> = self.conn.query_row(
            "SELECT value FROM foodshare_meta WHERE key = ?1",
            [key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Reset the database by dropping all tables
    ///
    /// Dependent tables are dropped before the tables they reference.
    pub fn reset(&self) -> Result<(), DataError> {
        self.conn.execute("DROP TABLE IF EXISTS claims", [])?;
        self.conn.execute("DROP TABLE IF EXISTS food", [])?;
        self.conn.execute("DROP TABLE IF EXISTS receivers", [])?;
        self.conn.execute("DROP TABLE IF EXISTS providers", [])?;
        self.conn.execute("DROP TABLE IF EXISTS foodshare_meta", [])?;
        Ok(())
    }
}

/// Status of the database schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    /// Database is not initialized (fresh database)
    NotInitialized,

    /// Schema is current and valid
    Current,

    /// Schema needs migration from an older version
    NeedsMigration { from: u32, to: u32 },

    /// Database is from a newer version (incompatible)
    Incompatible {
        database_version: u32,
        required_version: u32,
    },

    /// Schema is corrupted (missing tables)
    Corrupted,
}

impl std::fmt::Display for SchemaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaStatus::NotInitialized => write!(f, "not initialized"),
            SchemaStatus::Current => write!(f, "current (v{})", SCHEMA_VERSION),
            SchemaStatus::NeedsMigration { from, to } => {
                write!(f, "needs migration (v{} -> v{})", from, to)
            }
            SchemaStatus::Incompatible {
                database_version,
                required_version,
            } => write!(
                f,
                "incompatible (database v{}, required v{})",
                database_version, required_version
            ),
            SchemaStatus::Corrupted => write!(f, "corrupted"),
        }
    }
}
