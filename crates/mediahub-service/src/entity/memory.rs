//! In-memory entity store for tests and dry runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::traits::entity::{EntityReader, EntityWriter};
use mediahub_core::types::OwnerRef;

type Record = BTreeMap<String, Option<String>>;

/// Entity store keeping each record's fields in memory.
#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    records: RwLock<HashMap<OwnerRef, Record>>,
    writes: AtomicUsize,
}

impl MemoryEntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record for `owner`, if none exists.
    pub async fn insert_record(&self, owner: &OwnerRef) {
        self.records
            .write()
            .await
            .entry(owner.clone())
            .or_default();
    }

    /// Set a field directly, creating the record if needed. Does not count
    /// as a reference write.
    pub async fn set_field(&self, owner: &OwnerRef, field: &str, value: Option<&str>) {
        self.records
            .write()
            .await
            .entry(owner.clone())
            .or_default()
            .insert(field.to_string(), value.map(str::to_string));
    }

    /// Current value of a field.
    pub async fn field(&self, owner: &OwnerRef, field: &str) -> Option<String> {
        self.records
            .read()
            .await
            .get(owner)
            .and_then(|record| record.get(field).cloned().flatten())
    }

    /// Number of successful reference writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntityWriter for MemoryEntityStore {
    async fn write_reference(&self, owner: &OwnerRef, field: &str, url: &str) -> AppResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(owner)
            .ok_or_else(|| AppError::record_not_found(format!("Record {owner} does not exist")))?;
        record.insert(field.to_string(), Some(url.to_string()));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl EntityReader for MemoryEntityStore {
    async fn read_reference(&self, owner: &OwnerRef, field: &str) -> AppResult<Option<String>> {
        let records = self.records.read().await;
        let record = records
            .get(owner)
            .ok_or_else(|| AppError::record_not_found(format!("Record {owner} does not exist")))?;
        Ok(record.get(field).cloned().flatten())
    }
}
