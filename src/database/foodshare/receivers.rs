//! Receiver repository
//!
//! Receivers are read-only through foodshare: they are loaded by whoever owns
//! the store and only listed, looked up and used as filter values here.

use super::providers::distinct_strings;
use crate::database::core::{query_table, DataError, Table};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

pub struct ReceiverRepository<'a> {
    conn: &'a Connection,
}

/// A receiver row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverRecord {
    pub receiver_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub receiver_type: String,
    pub city: String,
    pub contact: String,
}

impl<'a> ReceiverRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn count(&self) -> Result<u64, DataError> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM receivers", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn get(&self, receiver_id: i64) -> Result<Option<ReceiverRecord>, DataError> {
        let record = self
            .conn
            .query_row(
                "SELECT receiver_id, name, type, city, contact
                 FROM receivers WHERE receiver_id = ?1",
                [receiver_id],
                |row| {
                    Ok(ReceiverRecord {
                        receiver_id: row.get(0)?,
                        name: row.get(1)?,
                        receiver_type: row.get(2)?,
                        city: row.get(3)?,
                        contact: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// All receivers ordered by name
    pub fn list(&self) -> Result<Table, DataError> {
        query_table(
            self.conn,
            "SELECT receiver_id, name, type, city, contact
             FROM receivers ORDER BY name, receiver_id",
            &[],
        )
    }

    pub fn types(&self) -> Result<Vec<String>, DataError> {
        distinct_strings(self.conn, "SELECT DISTINCT type FROM receivers ORDER BY type")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::core::{DatabaseConn, SchemaManager};

    #[test]
    fn test_read_only_queries() {
        let db = DatabaseConn::open_in_memory().unwrap();
        SchemaManager::new(&db.conn).initialize().unwrap();
        db.conn.execute(
            "INSERT INTO receivers (name, type, city, contact) VALUES
             ('Hope Shelter', 'Shelter', 'Springfield', '555-1'),
             ('City Pantry', 'NGO', 'Springfield', '555-2')",
            [],
        )
        .unwrap();

        let repo = ReceiverRepository::new(&db.conn);
        assert_eq!(repo.count().unwrap(), 2);
        assert_eq!(repo.types().unwrap(), vec!["NGO", "Shelter"]);

        let hope = repo.get(1).unwrap().unwrap();
        assert_eq!(hope.name, "Hope Shelter");
        assert_eq!(hope.receiver_type, "Shelter");
        assert!(repo.get(3).unwrap().is_none());

        let table = repo.list().unwrap();
        assert_eq!(table.column("name").len(), 2);
    }
}
