//! SQLite-backed enrollment storage.

use super::{storage_key, EnrollmentStore, StoreError};
use crate::registration::EnrollmentRecord;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_enrollments.sql");

pub struct SqliteStore {
    db: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `db_path` and initializes the schema.
    ///
    /// Pass `":memory:"` for a throwaway database.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)?;
        conn.execute_batch(SCHEMA_SQL)?;

        info!(path = %db_path.display(), "Opened enrollment database");

        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EnrollmentStore for SqliteStore {
    fn load(&self, student_id: &str) -> Result<Vec<EnrollmentRecord>, StoreError> {
        let db = self.conn();
        let json: Option<String> = db
            .query_row(
                "SELECT records FROM enrollments WHERE storage_key = ?",
                [storage_key(student_id)],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, student_id: &str, records: &[EnrollmentRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string(records)?;
        let db = self.conn();
        db.execute(
            "INSERT INTO enrollments (storage_key, records, updated_at)
             VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(storage_key) DO UPDATE SET
                records = excluded.records,
                updated_at = excluded.updated_at",
            (storage_key(student_id), json),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::sample_records;

    #[test]
    fn test_sqlite_missing_student_is_empty() {
        let store = SqliteStore::open(":memory:").unwrap();
        assert!(store.load("S123456").unwrap().is_empty());
    }

    #[test]
    fn test_sqlite_save_then_load() {
        let store = SqliteStore::open(":memory:").unwrap();
        let records = sample_records();

        store.save("S123456", &records).unwrap();
        let loaded = store.load("S123456").unwrap();

        assert_eq!(loaded, records);
        assert!(loaded[0].course.meeting.is_some());
    }

    #[test]
    fn test_sqlite_save_overwrites_previous_set() {
        let store = SqliteStore::open(":memory:").unwrap();
        let records = sample_records();

        store.save("S1", &records).unwrap();
        store.save("S1", &[]).unwrap();
        store.save("S2", &records[1..]).unwrap();

        assert!(store.load("S1").unwrap().is_empty());
        assert_eq!(store.load("S2").unwrap(), records[1..].to_vec());
    }
}
