//! Drive data model
//!
//! Request/response values exchanged between the drive manager and its collaborators.

use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::time::SystemTime;

/// A file as submitted to or produced by the drive.
///
/// `size` and `mime_type` are declared by the caller (or rewritten by the backend during
/// upload optimization). The manager never checks them against `content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub content: Vec<u8>,
    pub size: u64,
    pub mime_type: String,
}

impl DriveFile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        content: Vec<u8>,
        mime_type: impl Into<String>,
    ) -> Self {
        let size = content.len() as u64;
        Self {
            id: id.into(),
            name: name.into(),
            content,
            size,
            mime_type: mime_type.into(),
        }
    }

    /// Lower-cased extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// Access level of a stored file. The policy each level implies belongs to the security gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessLevel {
    Public,
    #[default]
    Private,
    Classified,
}

impl AccessLevel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "public" => Some(AccessLevel::Public),
            "private" => Some(AccessLevel::Private),
            "classified" => Some(AccessLevel::Classified),
            _ => None,
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessLevel::Public => write!(f, "public"),
            AccessLevel::Private => write!(f, "private"),
            AccessLevel::Classified => write!(f, "classified"),
        }
    }
}

/// Ownership and classification data attached to an upload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileMetadata {
    pub owner_id: String,
    pub tags: BTreeSet<String>,
    pub encryption_requested: bool,
    pub access_level: AccessLevel,
}

impl FileMetadata {
    pub fn new(owner_id: impl Into<String>, access_level: AccessLevel) -> Self {
        Self {
            owner_id: owner_id.into(),
            access_level,
            ..Default::default()
        }
    }
}

/// How sync conflicts between local and remote copies are settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictResolution {
    AiDecision,
    NewestWins,
    Manual,
}

impl fmt::Display for ConflictResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictResolution::AiDecision => write!(f, "ai-decision"),
            ConflictResolution::NewestWins => write!(f, "newest-wins"),
            ConflictResolution::Manual => write!(f, "manual"),
        }
    }
}

/// Transfer ceilings in KiB/s. Zero means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BandwidthLimit {
    pub upload_kbps: u64,
    pub download_kbps: u64,
}

/// Parameters of a sync run. Any combination of fields is legal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfiguration {
    pub bidirectional: bool,
    pub conflict_resolution: ConflictResolution,
    pub bandwidth_limit: BandwidthLimit,
}

/// Snapshot of what the drive is doing right now, published by the storage backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DriveConsciousnessState {
    pub is_active: bool,
    pub operations: Vec<String>,
    pub metrics: HashMap<String, f64>,
}

impl DriveConsciousnessState {
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

/// Result of waking the storage backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveConsciousness {
    pub awakened_at: SystemTime,
    pub known_files: usize,
    pub bytes_under_management: u64,
}

/// Result of a storage optimization pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageOptimization {
    pub files_removed: usize,
    pub bytes_reclaimed: u64,
    pub recommendations: Vec<String>,
}
