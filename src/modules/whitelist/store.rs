// src/modules/whitelist/store.rs

use crate::modules::whitelist::record::Record;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backing store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode backing store response: {0}")]
    Decode(String),

    #[error("authentication failed: {0}")]
    Auth(String),
}

/// The whole-table persistence contract. Every mutation rewrites the table;
/// there is no per-row update.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Returns every row in stored order.
    async fn read_table(&self) -> Result<Vec<Record>, StoreError>;
    /// Clears the table, then writes `records` in order.
    async fn write_table(&self, records: &[Record]) -> Result<(), StoreError>;
    fn describe(&self) -> String;
}

// Process-local table for development and tests.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            rows: RwLock::new(records),
        }
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn read_table(&self) -> Result<Vec<Record>, StoreError> {
        Ok(self.rows.read().await.clone())
    }

    async fn write_table(&self, records: &[Record]) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        rows.clear();
        rows.extend_from_slice(records);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_replaces_whole_table() {
        let store = MemoryStore::with_records(vec![Record::new_active("a".into(), "o".into(), "x".into())]);
        let replacement = vec![
            Record::new_active("b".into(), "o".into(), "x".into()),
            Record::new_active("c".into(), "o".into(), "x".into()),
        ];
        store.write_table(&replacement).await.unwrap();
        let rows = store.read_table().await.unwrap();
        let addresses: Vec<&str> = rows.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(addresses, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn empty_write_leaves_empty_table() {
        let store = MemoryStore::with_records(vec![Record::new_active("a".into(), "o".into(), "x".into())]);
        store.write_table(&[]).await.unwrap();
        assert!(store.read_table().await.unwrap().is_empty());
    }
}
