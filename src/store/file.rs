use super::{remove_from, upsert_into, Record, RecordStore};
use crate::{Error, Result};
use async_trait::async_trait;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

/// One JSON array per collection. Writes go to a temp file in the same
/// directory and are renamed over the target.
pub struct JsonFileStore<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    /// `{dir}/{file}`, e.g. the library file under the data directory.
    pub fn in_dir(dir: &Path, file: &str) -> Self {
        Self::new(dir.join(file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<T>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!("Ignoring unreadable store {}: {}", self.path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    async fn write(&self, records: &[T]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(records)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &bytes))
            .await
            .map_err(|e| Error::Storage(format!("store write task failed: {}", e)))??;
        debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(bytes)?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl<T: Record> RecordStore<T> for JsonFileStore<T> {
    async fn list(&self) -> Result<Vec<T>> {
        self.read().await
    }

    async fn upsert(&self, record: T) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read().await?;
        upsert_into(&mut records, record);
        self.write(&records).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read().await?;
        if !remove_from(&mut records, id) {
            return Ok(false);
        }
        self.write(&records).await?;
        Ok(true)
    }
}
