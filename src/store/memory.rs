use super::{remove_from, upsert_into, Record, RecordStore};
use crate::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Process-local store, used in tests and when no data directory is wanted.
#[derive(Clone)]
pub struct MemoryStore<T> {
    records: Arc<Mutex<Vec<T>>>,
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<T>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for MemoryStore<T> {
    async fn list(&self) -> Result<Vec<T>> {
        Ok(self.lock().clone())
    }

    async fn upsert(&self, record: T) -> Result<()> {
        upsert_into(&mut self.lock(), record);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(remove_from(&mut self.lock(), id))
    }
}
