//! Drive manager
//!
//! Orchestrates initialization, dispatches file operations through the security gate
//! to the storage backend, republishes the backend's state and triggers metadata
//! reconciliation. Holds no mutable state of its own.

use log::{error, info, warn};
use std::sync::Arc;
use tokio::sync::watch;

use super::operations::FileOperation;
use super::results::{DriveInitResult, FileResult};
use super::types::{DriveConsciousnessState, DriveFile, FileMetadata, SyncConfiguration};
use crate::error::DriveError;
use crate::oracle::{MetadataReconciler, OracleSyncResult};
use crate::security::{SecurityGate, SecurityThreat};
use crate::storage::StorageBackend;

/// Stateless coordinator over the three drive collaborators.
///
/// Cheap to clone; clones share the same collaborators.
#[derive(Clone)]
pub struct DriveManager {
    security: Arc<dyn SecurityGate>,
    storage: Arc<dyn StorageBackend>,
    oracle: Arc<dyn MetadataReconciler>,
}

impl DriveManager {
    pub fn new(
        security: Arc<dyn SecurityGate>,
        storage: Arc<dyn StorageBackend>,
        oracle: Arc<dyn MetadataReconciler>,
    ) -> Self {
        Self {
            security,
            storage,
            oracle,
        }
    }

    /// Brings the drive up: access check, then awakening, then storage optimization.
    ///
    /// Stages run strictly in order and a failed stage stops the sequence. Earlier
    /// stages are not rolled back. Collaborator errors are reported as
    /// `DriveInitResult::Error`, never returned raw.
    pub async fn initialize_drive(&self) -> DriveInitResult {
        let access = match self.security.validate_drive_access().await {
            Ok(access) => access,
            Err(e) => {
                error!("Drive access check failed: {}", e);
                return DriveInitResult::Error(e.to_string());
            }
        };
        if !access.valid {
            warn!("Drive access denied: {}", access.reason);
            return DriveInitResult::SecurityFailure(access.reason);
        }

        let consciousness = match self.storage.awake_consciousness().await {
            Ok(consciousness) => consciousness,
            Err(e) => {
                error!("Failed to awaken drive: {}", e);
                return DriveInitResult::Error(e.to_string());
            }
        };

        let optimization = match self.storage.optimize_storage().await {
            Ok(optimization) => optimization,
            Err(e) => {
                error!("Storage optimization failed: {}", e);
                return DriveInitResult::Error(e.to_string());
            }
        };

        info!("Drive initialized ({} files known)", consciousness.known_files);
        DriveInitResult::Success {
            consciousness,
            optimization,
        }
    }

    /// Validates then executes a single file operation.
    ///
    /// Rejections come back as `FileResult` variants. `Err` means a collaborator
    /// failed while the operation was being validated or executed.
    pub async fn manage_files(&self, operation: FileOperation) -> Result<FileResult, DriveError> {
        info!("Dispatching {} operation", operation.kind());
        match operation {
            FileOperation::Upload { file, metadata } => self.upload(file, metadata).await,
            FileOperation::Download {
                file_id,
                requester_id,
            } => self.download(&file_id, &requester_id).await,
            FileOperation::Delete {
                file_id,
                requester_id,
            } => self.delete(&file_id, &requester_id).await,
            FileOperation::Sync(config) => self.sync(config).await,
        }
    }

    /// Reconciles local records with the metadata store. The result is passed through as is.
    pub async fn sync_with_oracle(&self) -> Result<OracleSyncResult, DriveError> {
        Ok(self.oracle.sync_database_metadata().await?)
    }

    /// The backend's state channel, handed out unchanged.
    pub fn drive_consciousness_state(&self) -> watch::Receiver<DriveConsciousnessState> {
        self.storage.consciousness_state()
    }

    async fn upload(
        &self,
        file: DriveFile,
        metadata: FileMetadata,
    ) -> Result<FileResult, DriveError> {
        // The gate inspects the optimized artifact, so optimization comes first.
        let optimized = self.storage.optimize_for_upload(file).await?;

        let validation = self.security.validate_file_upload(&optimized).await?;
        if !validation.secure {
            let threat = validation
                .threat
                .unwrap_or_else(SecurityThreat::unclassified);
            warn!("Upload of {} rejected: {}", optimized.id, threat);
            return Ok(FileResult::SecurityRejection(threat));
        }

        Ok(self.storage.upload_file(optimized, metadata).await?)
    }

    async fn download(&self, file_id: &str, requester_id: &str) -> Result<FileResult, DriveError> {
        let access = self
            .security
            .validate_file_access(file_id, requester_id)
            .await?;
        if !access.has_access {
            warn!("Download of {} by {} denied: {}", file_id, requester_id, access.reason);
            return Ok(FileResult::AccessDenied(access.reason));
        }

        Ok(self.storage.download_file(file_id).await?)
    }

    async fn delete(&self, file_id: &str, requester_id: &str) -> Result<FileResult, DriveError> {
        let authorization = self.security.validate_deletion(file_id, requester_id).await?;
        if !authorization.authorized {
            warn!(
                "Deletion of {} by {} refused: {}",
                file_id, requester_id, authorization.reason
            );
            return Ok(FileResult::UnauthorizedDeletion(authorization.reason));
        }

        Ok(self.storage.delete_file(file_id).await?)
    }

    // Sync goes straight to the backend; the security gate is not consulted.
    async fn sync(&self, config: SyncConfiguration) -> Result<FileResult, DriveError> {
        Ok(self.storage.intelligent_sync(config).await?)
    }
}
