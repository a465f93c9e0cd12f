//! File index
//!
//! Shared record of every file the drive holds. The storage backend writes it,
//! the security gate and the metadata store only read it.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;

use crate::drive::{AccessLevel, DriveFile, FileMetadata};

/// Owner assigned to files adopted from disk rather than uploaded.
pub const SYSTEM_OWNER: &str = "system";

/// Index record for a stored file
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub access_level: AccessLevel,
    pub tags: BTreeSet<String>,
    pub encrypted: bool,
    pub size: u64,
    pub mime_type: String,
    pub stored_at: SystemTime,
}

impl IndexEntry {
    pub fn from_upload(file: &DriveFile, metadata: &FileMetadata) -> Self {
        Self {
            id: file.id.clone(),
            name: file.name.clone(),
            owner: metadata.owner_id.clone(),
            access_level: metadata.access_level,
            tags: metadata.tags.clone(),
            encrypted: metadata.encryption_requested,
            size: file.size,
            mime_type: file.mime_type.clone(),
            stored_at: SystemTime::now(),
        }
    }

    /// Entry for a file found on disk without an upload record. The name doubles as id.
    pub fn adopted(name: &str, size: u64, stored_at: SystemTime) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            owner: SYSTEM_OWNER.to_string(),
            access_level: AccessLevel::Private,
            tags: BTreeSet::new(),
            encrypted: false,
            size,
            mime_type: "application/octet-stream".to_string(),
            stored_at,
        }
    }
}

/// Thread-safe file index handle
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    entries: Arc<RwLock<HashMap<String, IndexEntry>>>,
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, returning the previous one with the same id.
    pub async fn insert(&self, entry: IndexEntry) -> Option<IndexEntry> {
        self.entries.write().await.insert(entry.id.clone(), entry)
    }

    pub async fn remove(&self, id: &str) -> Option<IndexEntry> {
        self.entries.write().await.remove(id)
    }

    pub async fn get(&self, id: &str) -> Option<IndexEntry> {
        self.entries.read().await.get(id).cloned()
    }

    pub async fn find_by_name(&self, name: &str) -> Option<IndexEntry> {
        self.entries
            .read()
            .await
            .values()
            .find(|entry| entry.name == name)
            .cloned()
    }

    pub async fn snapshot(&self) -> Vec<IndexEntry> {
        self.entries.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn total_bytes(&self) -> u64 {
        self.entries.read().await.values().map(|e| e.size).sum()
    }

    /// Keep only entries for which `keep` returns true; returns the dropped entries.
    pub async fn retain<F>(&self, mut keep: F) -> Vec<IndexEntry>
    where
        F: FnMut(&IndexEntry) -> bool,
    {
        let mut entries = self.entries.write().await;
        let dropped: Vec<String> = entries
            .values()
            .filter(|entry| !keep(*entry))
            .map(|entry| entry.id.clone())
            .collect();
        dropped
            .iter()
            .filter_map(|id| entries.remove(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, size: u64) -> IndexEntry {
        let file = DriveFile::new(id, name, vec![0; size as usize], "text/plain");
        IndexEntry::from_upload(&file, &FileMetadata::new("alice", AccessLevel::Private))
    }

    #[tokio::test]
    async fn insert_replaces_same_id() {
        let index = FileIndex::new();
        assert!(index.insert(entry("a", "one.txt", 3)).await.is_none());
        let previous = index.insert(entry("a", "two.txt", 5)).await;
        assert_eq!(previous.map(|e| e.name), Some("one.txt".to_string()));
        assert_eq!(index.len().await, 1);
        assert_eq!(index.total_bytes().await, 5);
    }

    #[tokio::test]
    async fn retain_returns_dropped_entries() {
        let index = FileIndex::new();
        index.insert(entry("a", "a.txt", 1)).await;
        index.insert(entry("b", "b.txt", 2)).await;

        let dropped = index.retain(|e| e.id == "a").await;
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].id, "b");
        assert!(index.get("b").await.is_none());
        assert!(index.find_by_name("a.txt").await.is_some());
    }
}
