//! Persistence for word groups and saved stories
//!
//! A store holds one collection of records, newest first. Upserting a
//! record whose id is already present replaces it where it stands;
//! anything else goes to the front.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::models::{SavedStory, WordGroup};
use crate::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

pub const LIBRARY_FILE: &str = "library.json";
pub const STORIES_FILE: &str = "stories.json";

pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

impl Record for WordGroup {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for SavedStory {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    async fn list(&self) -> Result<Vec<T>>;

    async fn get(&self, id: Uuid) -> Result<Option<T>> {
        Ok(self.list().await?.into_iter().find(|r| r.id() == id))
    }

    /// Insert at the front, or replace in place if the id exists.
    async fn upsert(&self, record: T) -> Result<()>;

    /// Returns whether anything was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Returns true when an existing record was replaced.
pub(crate) fn upsert_into<T: Record>(records: &mut Vec<T>, record: T) -> bool {
    match records.iter().position(|r| r.id() == record.id()) {
        Some(pos) => {
            records[pos] = record;
            true
        }
        None => {
            records.insert(0, record);
            false
        }
    }
}

pub(crate) fn remove_from<T: Record>(records: &mut Vec<T>, id: Uuid) -> bool {
    let before = records.len();
    records.retain(|r| r.id() != id);
    records.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::test_support::fruit;
    use pretty_assertions::assert_eq;

    fn group(name: &str) -> WordGroup {
        WordGroup::new(name.to_string(), fruit())
    }

    #[test]
    fn test_upsert_inserts_new_records_first() {
        let mut records = vec![group("old")];
        assert!(!upsert_into(&mut records, group("new")));
        let names: Vec<&str> = records.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["new", "old"]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut records = vec![group("a"), group("b"), group("c")];
        let mut renamed = records[1].clone();
        renamed.name = "b2".to_string();

        assert!(upsert_into(&mut records, renamed));
        let names: Vec<&str> = records.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b2", "c"]);
    }

    #[test]
    fn test_remove_reports_whether_anything_went() {
        let mut records = vec![group("a")];
        let id = records[0].id;
        assert!(!remove_from(&mut records, Uuid::new_v4()));
        assert!(remove_from(&mut records, id));
        assert!(records.is_empty());
    }
}
