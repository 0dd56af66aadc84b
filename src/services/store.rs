//! Signal persistence interface and the in-process store

use crate::error::StoreError;
use crate::models::signal::{SignalExit, SignalRecord};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

#[async_trait]
pub trait SignalStore: Send + Sync {
    /// Persist a new signal and return its id
    async fn insert(&self, record: &SignalRecord) -> Result<i64, StoreError>;

    /// Open signals, optionally for a single symbol, oldest first
    async fn open_signals(&self, symbol: Option<&str>) -> Result<Vec<SignalRecord>, StoreError>;

    /// Write exit fields and return the updated record
    async fn close_signal(&self, id: i64, exit: &SignalExit) -> Result<SignalRecord, StoreError>;

    async fn all_signals(&self) -> Result<Vec<SignalRecord>, StoreError>;
}

/// Store used when no database is configured, and in tests
#[derive(Clone, Default)]
pub struct InMemorySignalStore {
    records: Arc<RwLock<Vec<SignalRecord>>>,
}

impl InMemorySignalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SignalStore for InMemorySignalStore {
    async fn insert(&self, record: &SignalRecord) -> Result<i64, StoreError> {
        let mut records = self.records.write().await;
        let id = records.len() as i64 + 1;
        let mut stored = record.clone();
        stored.id = Some(id);
        records.push(stored);
        Ok(id)
    }

    async fn open_signals(&self, symbol: Option<&str>) -> Result<Vec<SignalRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.is_open())
            .filter(|r| symbol.map_or(true, |s| r.symbol == s))
            .cloned()
            .collect())
    }

    async fn close_signal(&self, id: i64, exit: &SignalExit) -> Result<SignalRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == Some(id))
            .ok_or(StoreError::NotFound(id))?;
        record.apply_exit(exit);
        Ok(record.clone())
    }

    async fn all_signals(&self) -> Result<Vec<SignalRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }
}
