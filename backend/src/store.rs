use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use c4_core::{Data, C4_ID};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no record with id {0:?}")]
    NotFound(String),
}

/// Keyed game records with whole-value replacement.
///
/// Implementations must never expose a half-written record: a reader sees
/// either the value before a `put` or the value after it.
pub trait StateStore: Send + Sync + 'static {
    fn contains(&self, id: &str) -> impl Future<Output = bool> + Send;

    fn get(&self, id: &str) -> impl Future<Output = Result<Data, StoreError>> + Send;

    /// Replaces the record for an existing id and returns what is now stored.
    /// Unknown ids are never created.
    fn put(&self, id: &str, data: Data) -> impl Future<Output = Result<Data, StoreError>> + Send;
}

/// In-process store. The set of ids is fixed at construction; each record
/// has its own lock so writers on one id never wait on another.
#[derive(Clone)]
pub struct MemoryStore {
    records: Arc<HashMap<String, RwLock<Data>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new([(C4_ID.to_string(), Data::initial())])
    }
}

impl MemoryStore {
    pub fn new(seed: impl IntoIterator<Item = (String, Data)>) -> Self {
        let records = seed
            .into_iter()
            .map(|(id, data)| (id, RwLock::new(data)))
            .collect();
        Self {
            records: Arc::new(records),
        }
    }

    fn record(&self, id: &str) -> Result<&RwLock<Data>, StoreError> {
        self.records
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl StateStore for MemoryStore {
    async fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    async fn get(&self, id: &str) -> Result<Data, StoreError> {
        let record = self.record(id)?;
        let data = record.read().await.clone();
        Ok(data)
    }

    async fn put(&self, id: &str, data: Data) -> Result<Data, StoreError> {
        let record = self.record(id)?;
        let mut slot = record.write().await;
        *slot = data;
        tracing::info!(id, "record replaced");
        Ok(slot.clone())
    }
}
