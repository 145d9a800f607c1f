//! JSON file backed store
//!
//! The whole store is one JSON object of key to value, rewritten on every
//! put. Fine for a single demo record.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use super::traits::KeyValueStore;
use crate::error::StorageError;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Map<String, Value>, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(StorageError::Unavailable(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn put(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(entries))?;
        fs::write(&self.path, content).await?;
        tracing::debug!("Stored {key} in {}", self.path.display());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store() -> (JsonFileStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("access-flow-store-{}", uuid::Uuid::new_v4()));
        (JsonFileStore::new(dir.join("nested").join("store.json")), dir)
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let (store, dir) = temp_store();
        assert_eq!(store.get("anything").await.unwrap(), None);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_put_creates_parent_and_persists() {
        let (store, dir) = temp_store();
        store.put("user", json!({"email": "a@b.io"})).await.unwrap();
        store.put("other", json!(true)).await.unwrap();

        let reopened = JsonFileStore::new(store.path().to_path_buf());
        assert_eq!(
            reopened.get("user").await.unwrap(),
            Some(json!({"email": "a@b.io"}))
        );
        assert_eq!(reopened.get("other").await.unwrap(), Some(json!(true)));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_non_object_file_is_rejected() {
        let (store, dir) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "[1, 2]").unwrap();

        let err = store.put("k", json!(1)).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let (store, dir) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{oops").unwrap();

        let err = store.get("k").await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
        let _ = std::fs::remove_dir_all(dir);
    }
}
