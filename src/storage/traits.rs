//! Trait abstraction for key-value storage to enable mocking in tests

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageError;

/// Minimal key-value store, in the spirit of browser local storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    async fn put(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Fetch the value under `key`
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
}
