//! Storage backend interface
//!
//! Performs the physical effect of file operations once validation has passed.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::drive::{
    DriveConsciousness, DriveConsciousnessState, DriveFile, FileMetadata, FileResult,
    StorageOptimization, SyncConfiguration,
};
use crate::error::StorageError;

/// Storage collaborator of the drive manager.
///
/// Implementations must tolerate concurrent calls from many in-flight operations.
/// Retries and timeouts, if any, live here rather than in the manager.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn awake_consciousness(&self) -> Result<DriveConsciousness, StorageError>;

    async fn optimize_storage(&self) -> Result<StorageOptimization, StorageError>;

    /// Prepare a file for upload. Runs before security validation.
    async fn optimize_for_upload(&self, file: DriveFile) -> Result<DriveFile, StorageError>;

    async fn upload_file(
        &self,
        file: DriveFile,
        metadata: FileMetadata,
    ) -> Result<FileResult, StorageError>;

    async fn download_file(&self, file_id: &str) -> Result<FileResult, StorageError>;

    async fn delete_file(&self, file_id: &str) -> Result<FileResult, StorageError>;

    async fn intelligent_sync(
        &self,
        config: SyncConfiguration,
    ) -> Result<FileResult, StorageError>;

    /// Live operational state. Every call returns a handle onto the same channel.
    fn consciousness_state(&self) -> watch::Receiver<DriveConsciousnessState>;
}
