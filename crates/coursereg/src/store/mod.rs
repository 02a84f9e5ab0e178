/// Persistence for enrollment sets, keyed by student
mod sqlite;

pub use sqlite::SqliteStore;

use crate::registration::EnrollmentRecord;
use dashmap::DashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value storage for a student's enrollment set.
///
/// `load` returns an empty set for a student that has never saved anything;
/// `save` replaces whatever was stored before.
pub trait EnrollmentStore: Send + Sync {
    fn load(&self, student_id: &str) -> Result<Vec<EnrollmentRecord>, StoreError>;

    fn save(&self, student_id: &str, records: &[EnrollmentRecord]) -> Result<(), StoreError>;
}

/// The key an enrollment set is stored under.
pub fn storage_key(student_id: &str) -> String {
    format!("enrolled_{student_id}")
}

/// In-process store holding serialized enrollment sets.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EnrollmentStore for MemoryStore {
    fn load(&self, student_id: &str) -> Result<Vec<EnrollmentRecord>, StoreError> {
        match self.entries.get(&storage_key(student_id)) {
            Some(json) => Ok(serde_json::from_str(json.value())?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, student_id: &str, records: &[EnrollmentRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string(records)?;
        self.entries.insert(storage_key(student_id), json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    pub(crate) fn sample_records() -> Vec<EnrollmentRecord> {
        let catalog = Catalog::mock();
        vec![
            EnrollmentRecord::new(catalog.find("CS101").unwrap().clone()),
            EnrollmentRecord::new(catalog.find("MATH202").unwrap().clone()),
        ]
    }

    #[test]
    fn test_storage_key() {
        assert_eq!(storage_key("S123456"), "enrolled_S123456");
    }

    #[test]
    fn test_memory_store_missing_student_is_empty() {
        let store = MemoryStore::new();
        assert!(store.load("S1").unwrap().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_save_overwrites() {
        let store = MemoryStore::new();
        let records = sample_records();

        store.save("S1", &records).unwrap();
        assert_eq!(store.load("S1").unwrap(), records);

        store.save("S1", &records[..1]).unwrap();
        assert_eq!(store.load("S1").unwrap(), records[..1].to_vec());
        assert!(store.load("S2").unwrap().is_empty());
        assert_eq!(store.len(), 1);
    }
}
