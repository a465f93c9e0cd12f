//! Local storage backend
//!
//! Stores drive files as plain files under a single root directory using `tokio::fs`.
//! Uploads are written into a staging directory under the root first and renamed into place.

use async_trait::async_trait;
use log::{info, warn};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::SystemTime;
use tokio::fs;
use tokio::sync::watch;

use super::backend::StorageBackend;
use super::index::{FileIndex, IndexEntry};
use super::state::{
    ConsciousnessTracker, METRIC_BYTES_STORED, METRIC_FILES_INDEXED,
};
use crate::config::StorageConfig;
use crate::drive::{
    AccessLevel, BandwidthLimit, ConflictResolution, DriveConsciousness,
    DriveConsciousnessState, DriveFile, FileMetadata, FileResult, StorageOptimization,
    SyncConfiguration,
};
use crate::error::StorageError;
use crate::security::validation::{is_safe_name, sanitize_filename};

/// A regular file found under the drive root
#[derive(Debug, Clone)]
struct DiskFile {
    size: u64,
    modified: SystemTime,
}

/// Filesystem-backed storage backend
pub struct LocalStorageBackend {
    root: PathBuf,
    staging_dir: String,
    index: FileIndex,
    tracker: ConsciousnessTracker,
}

impl LocalStorageBackend {
    pub fn new(config: &StorageConfig, index: FileIndex) -> Self {
        Self {
            root: config.drive_root_path(),
            staging_dir: config.staging_dir.clone(),
            index,
            tracker: ConsciousnessTracker::new(),
        }
    }

    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    /// Mark the drive inactive; in-flight labels and metrics are cleared.
    pub fn shutdown(&self) {
        info!("Drive going to sleep");
        self.tracker.set_active(false);
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn staging_path(&self) -> PathBuf {
        self.root.join(&self.staging_dir)
    }

    fn staged_path_for(&self, name: &str) -> PathBuf {
        self.staging_path().join(name)
    }

    fn ensure_awake(&self) -> Result<(), StorageError> {
        if self.tracker.current().is_active {
            Ok(())
        } else {
            Err(StorageError::NotAwake)
        }
    }

    async fn scan_disk(&self) -> Result<HashMap<String, DiskFile>, StorageError> {
        let mut files = HashMap::new();
        let mut entries = fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    warn!("Skipping {}: {}", name, e);
                    continue;
                }
            };
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.insert(
                name,
                DiskFile {
                    size: metadata.len(),
                    modified,
                },
            );
        }

        Ok(files)
    }

    /// Remove uploads left in the staging directory by an interrupted write.
    async fn clear_staging(
        &self,
        optimization: &mut StorageOptimization,
    ) -> Result<(), StorageError> {
        let mut entries = match fs::read_dir(self.staging_path()).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            let size = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata.len(),
                Ok(_) => continue,
                Err(_) => 0,
            };
            match fs::remove_file(entry.path()).await {
                Ok(()) => {
                    optimization.files_removed += 1;
                    optimization.bytes_reclaimed += size;
                }
                Err(e) => warn!("Failed to remove stale upload {}: {}", name, e),
            }
        }
        Ok(())
    }

    async fn refresh_metrics(&self) {
        self.tracker
            .set_metric(METRIC_FILES_INDEXED, self.index.len().await as f64);
        self.tracker
            .set_metric(METRIC_BYTES_STORED, self.index.total_bytes().await as f64);
    }

    async fn entry_for(&self, file_id: &str) -> Result<IndexEntry, StorageError> {
        self.index
            .get(file_id)
            .await
            .ok_or_else(|| StorageError::FileNotFound(file_id.to_string()))
    }
}

fn describe_limit(kbps: u64) -> String {
    if kbps == 0 {
        "unlimited".to_string()
    } else {
        format!("{} KiB/s", kbps)
    }
}

fn describe_limits(limit: &BandwidthLimit) -> String {
    format!(
        "up {}, down {}",
        describe_limit(limit.upload_kbps),
        describe_limit(limit.download_kbps)
    )
}

#[async_trait]
impl StorageBackend for LocalStorageBackend {
    async fn awake_consciousness(&self) -> Result<DriveConsciousness, StorageError> {
        let _op = self.tracker.begin("awake");
        fs::create_dir_all(self.staging_path()).await?;

        let disk = self.scan_disk().await?;
        let mut adopted = 0;
        for (name, file) in &disk {
            if self.index.find_by_name(name).await.is_none() {
                self.index
                    .insert(IndexEntry::adopted(name, file.size, file.modified))
                    .await;
                adopted += 1;
            }
        }

        self.tracker.set_active(true);
        self.refresh_metrics().await;

        let consciousness = DriveConsciousness {
            awakened_at: SystemTime::now(),
            known_files: self.index.len().await,
            bytes_under_management: self.index.total_bytes().await,
        };
        info!(
            "Drive awake at {} ({} files, {} adopted from disk)",
            self.root.display(),
            consciousness.known_files,
            adopted
        );
        Ok(consciousness)
    }

    async fn optimize_storage(&self) -> Result<StorageOptimization, StorageError> {
        let _op = self.tracker.begin("optimize");
        let mut optimization = StorageOptimization::default();

        self.clear_staging(&mut optimization).await?;

        if optimization.files_removed > 0 {
            optimization.recommendations.push(format!(
                "Removed {} interrupted uploads ({} bytes)",
                optimization.files_removed, optimization.bytes_reclaimed
            ));
        }

        let unencrypted_classified = self
            .index
            .snapshot()
            .await
            .iter()
            .filter(|e| e.access_level == AccessLevel::Classified && !e.encrypted)
            .count();
        if unencrypted_classified > 0 {
            optimization.recommendations.push(format!(
                "{} classified files are stored without encryption",
                unencrypted_classified
            ));
        }

        info!(
            "Storage optimized: {} files removed, {} bytes reclaimed",
            optimization.files_removed, optimization.bytes_reclaimed
        );
        Ok(optimization)
    }

    async fn optimize_for_upload(&self, mut file: DriveFile) -> Result<DriveFile, StorageError> {
        // Unsafe names pass through untouched so the security gate can classify them.
        if let Some(name) = sanitize_filename(&file.name) {
            file.name = name;
        }
        file.size = file.content.len() as u64;
        Ok(file)
    }

    async fn upload_file(
        &self,
        file: DriveFile,
        metadata: FileMetadata,
    ) -> Result<FileResult, StorageError> {
        if !is_safe_name(&file.name) || file.name == self.staging_dir {
            return Err(StorageError::InvalidName(file.name));
        }
        self.ensure_awake()?;
        let _op = self.tracker.begin(format!("upload:{}", file.id));

        let same_id = self.index.get(&file.id).await;
        let same_name = self.index.find_by_name(&file.name).await;
        for existing in same_id.iter().chain(same_name.iter()) {
            if existing.owner != metadata.owner_id {
                warn!(
                    "{} refused to overwrite {} ({}) owned by {}",
                    metadata.owner_id, existing.name, existing.id, existing.owner
                );
                return Ok(FileResult::AccessDenied(format!(
                    "{} is owned by another user",
                    existing.name
                )));
            }
        }

        let staged_path = self.staged_path_for(&file.name);
        let final_path = self.path_for(&file.name);
        fs::write(&staged_path, &file.content).await?;
        if let Err(e) = fs::rename(&staged_path, &final_path).await {
            let _ = fs::remove_file(&staged_path).await;
            return Err(e.into());
        }

        // A new upload under an existing name supersedes that file's record.
        if let Some(existing) = same_name {
            if existing.id != file.id {
                self.index.remove(&existing.id).await;
            }
        }
        let previous = self
            .index
            .insert(IndexEntry::from_upload(&file, &metadata))
            .await;
        if let Some(previous) = previous {
            if previous.name != file.name {
                match fs::remove_file(self.path_for(&previous.name)).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => warn!("Failed to remove renamed file {}: {}", previous.name, e),
                }
            }
        }
        self.refresh_metrics().await;

        info!(
            "Stored {} ({} bytes) for {}",
            file.name, file.size, metadata.owner_id
        );
        Ok(FileResult::Success(format!(
            "Uploaded {} ({} bytes) as {}",
            file.name, file.size, file.id
        )))
    }

    async fn download_file(&self, file_id: &str) -> Result<FileResult, StorageError> {
        self.ensure_awake()?;
        let _op = self.tracker.begin(format!("download:{}", file_id));
        let entry = self.entry_for(file_id).await?;

        let content = match fs::read(self.path_for(&entry.name)).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::FileNotFound(file_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(FileResult::Success(format!(
            "Downloaded {} ({} bytes)",
            entry.name,
            content.len()
        )))
    }

    async fn delete_file(&self, file_id: &str) -> Result<FileResult, StorageError> {
        self.ensure_awake()?;
        let _op = self.tracker.begin(format!("delete:{}", file_id));
        let entry = self.entry_for(file_id).await?;

        match fs::remove_file(self.path_for(&entry.name)).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("{} was already gone from disk", entry.name);
            }
            Err(e) => return Err(e.into()),
        }
        self.index.remove(file_id).await;
        self.refresh_metrics().await;

        Ok(FileResult::Success(format!("Deleted {}", entry.name)))
    }

    async fn intelligent_sync(
        &self,
        config: SyncConfiguration,
    ) -> Result<FileResult, StorageError> {
        self.ensure_awake()?;
        let _op = self.tracker.begin("sync");
        let disk = self.scan_disk().await?;

        let dropped = self
            .index
            .retain(|entry| disk.contains_key(&entry.name))
            .await;

        let mut refreshed = 0;
        let mut conflicts = 0;
        for mut entry in self.index.snapshot().await {
            let Some(on_disk) = disk.get(&entry.name) else {
                continue;
            };
            if on_disk.size == entry.size {
                continue;
            }
            match config.conflict_resolution {
                ConflictResolution::NewestWins | ConflictResolution::AiDecision
                    if on_disk.modified >= entry.stored_at =>
                {
                    entry.size = on_disk.size;
                    entry.stored_at = on_disk.modified;
                    self.index.insert(entry).await;
                    refreshed += 1;
                }
                _ => conflicts += 1,
            }
        }

        let mut adopted = 0;
        if config.bidirectional {
            for (name, file) in &disk {
                if self.index.find_by_name(name).await.is_none() {
                    self.index
                        .insert(IndexEntry::adopted(name, file.size, file.modified))
                        .await;
                    adopted += 1;
                }
            }
        }
        self.refresh_metrics().await;

        let direction = if config.bidirectional {
            "bidirectional"
        } else {
            "one-way"
        };
        info!(
            "Sync finished: {} adopted, {} dropped, {} refreshed, {} conflicts",
            adopted,
            dropped.len(),
            refreshed,
            conflicts
        );
        Ok(FileResult::Success(format!(
            "Sync complete ({}, {}, {}): {} adopted, {} dropped, {} refreshed, {} unresolved",
            direction,
            config.conflict_resolution,
            describe_limits(&config.bandwidth_limit),
            adopted,
            dropped.len(),
            refreshed,
            conflicts
        )))
    }

    fn consciousness_state(&self) -> watch::Receiver<DriveConsciousnessState> {
        self.tracker.subscribe()
    }
}
