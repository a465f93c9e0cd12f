//! In-memory record store
//!
//! Authoritative metadata kept in process, reconciled from the drive's file index.

use async_trait::async_trait;
use log::{info, warn};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::reconciler::MetadataReconciler;
use super::results::OracleSyncResult;
use crate::drive::AccessLevel;
use crate::error::OracleError;
use crate::storage::{FileIndex, IndexEntry};

/// Authoritative record for a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub name: String,
    pub owner: String,
    pub access_level: AccessLevel,
    pub size: u64,
    pub mime_type: String,
    pub tags: BTreeSet<String>,
    pub encrypted: bool,
}

impl From<&IndexEntry> for StoredRecord {
    fn from(entry: &IndexEntry) -> Self {
        Self {
            name: entry.name.clone(),
            owner: entry.owner.clone(),
            access_level: entry.access_level,
            size: entry.size,
            mime_type: entry.mime_type.clone(),
            tags: entry.tags.clone(),
            encrypted: entry.encrypted,
        }
    }
}

/// Record store that mirrors the local file index.
pub struct InMemoryRecordStore {
    index: FileIndex,
    records: RwLock<HashMap<String, StoredRecord>>,
    offline: AtomicBool,
}

impl InMemoryRecordStore {
    pub fn new(index: FileIndex) -> Self {
        Self {
            index,
            records: RwLock::new(HashMap::new()),
            offline: AtomicBool::new(false),
        }
    }

    /// Simulate losing the connection to the store.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    pub async fn record(&self, id: &str) -> Option<StoredRecord> {
        self.records.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl MetadataReconciler for InMemoryRecordStore {
    async fn sync_database_metadata(&self) -> Result<OracleSyncResult, OracleError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(OracleError::Unavailable(
                "record store is offline".to_string(),
            ));
        }

        let local = self.index.snapshot().await;
        let mut records = self.records.write().await;
        let mut result = OracleSyncResult::default();

        for entry in &local {
            if entry.owner.trim().is_empty() {
                result
                    .errors
                    .push(format!("invalid schema: {} has no owner", entry.id));
                continue;
            }
            let record = StoredRecord::from(entry);
            if records.get(&entry.id) != Some(&record) {
                records.insert(entry.id.clone(), record);
                result.records_updated += 1;
            }
        }

        let stale: Vec<String> = records
            .keys()
            .filter(|id| !local.iter().any(|entry| &entry.id == *id))
            .cloned()
            .collect();
        for id in stale {
            records.remove(&id);
            result.records_updated += 1;
        }

        result.success = result.errors.is_empty();
        if result.success {
            info!("Reconciled {} records", result.records_updated);
        } else {
            warn!(
                "Reconciled {} records with {} errors",
                result.records_updated,
                result.errors.len()
            );
        }
        Ok(result)
    }
}
