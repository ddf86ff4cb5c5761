use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::StateError;

use super::record::StateRecord;

/// Keyed record store for per-resource deployment state.
///
/// Implementations must make `put` an atomic single-record upsert and must
/// survive process restarts (the in-memory store exists for tests and
/// ephemeral runs).
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, node_id: &str) -> Result<Option<StateRecord>, StateError>;
    async fn put(&self, record: StateRecord) -> Result<(), StateError>;
    async fn delete(&self, node_id: &str) -> Result<(), StateError>;
    async fn list(&self) -> Result<Vec<StateRecord>, StateError>;
}

#[derive(Default)]
pub struct MemoryStateStore {
    data: tokio::sync::RwLock<HashMap<String, StateRecord>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self {
            data: tokio::sync::RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, node_id: &str) -> Result<Option<StateRecord>, StateError> {
        Ok(self.data.read().await.get(node_id).cloned())
    }

    async fn put(&self, record: StateRecord) -> Result<(), StateError> {
        self.data
            .write()
            .await
            .insert(record.node_id.clone(), record);
        Ok(())
    }

    async fn delete(&self, node_id: &str) -> Result<(), StateError> {
        self.data.write().await.remove(node_id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<StateRecord>, StateError> {
        Ok(self.data.read().await.values().cloned().collect())
    }
}

/// One JSON file per resource under a state directory.
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StateError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| StateError::Storage(e.to_string()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, node_id: &str) -> PathBuf {
        self.dir.join(format!("{}.state.json", node_id))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn get(&self, node_id: &str) -> Result<Option<StateRecord>, StateError> {
        let path = self.path_for(node_id);
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StateError::Storage(e.to_string())),
        };

        let record = serde_json::from_slice::<StateRecord>(&bytes)
            .map_err(|e| StateError::Corrupted(e.to_string()))?;
        Ok(Some(record))
    }

    async fn put(&self, record: StateRecord) -> Result<(), StateError> {
        let path = self.path_for(&record.node_id);
        let bytes =
            serde_json::to_vec_pretty(&record).map_err(|e| StateError::Serialization(e.to_string()))?;

        // Write-then-rename keeps the upsert atomic: readers see either the
        // old record or the new one, never a torn file.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| StateError::Storage(e.to_string()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StateError::Storage(e.to_string()))
    }

    async fn delete(&self, node_id: &str) -> Result<(), StateError> {
        let path = self.path_for(node_id);
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            // Deleting an absent record is a no-op.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            // Anything else leaves the stale record on disk, which a later
            // apply would mistake for an up-to-date resource.
            Err(e) => Err(StateError::Storage(e.to_string())),
        }
    }

    async fn list(&self) -> Result<Vec<StateRecord>, StateError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| StateError::Storage(e.to_string()))?;

        let mut records = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StateError::Storage(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| StateError::Storage(e.to_string()))?;
            let record = serde_json::from_slice::<StateRecord>(&bytes)
                .map_err(|e| StateError::Corrupted(e.to_string()))?;
            records.push(record);
        }

        Ok(records)
    }
}
