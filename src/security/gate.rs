//! Security gate interface
//!
//! Read-only checks the drive manager runs before every privileged action.

use async_trait::async_trait;

use super::results::{
    DeletionValidationResult, DriveAccessResult, FileAccessResult, UploadValidationResult,
};
use crate::drive::DriveFile;
use crate::error::SecurityError;

/// Validator consulted before the storage backend is touched.
///
/// Implementations must be side-effect free and safe to call from many
/// concurrent operations.
#[async_trait]
pub trait SecurityGate: Send + Sync {
    /// Whether the drive may be brought up at all.
    async fn validate_drive_access(&self) -> Result<DriveAccessResult, SecurityError>;

    /// Inspect a file about to be uploaded. Receives the backend-optimized artifact.
    async fn validate_file_upload(
        &self,
        file: &DriveFile,
    ) -> Result<UploadValidationResult, SecurityError>;

    async fn validate_file_access(
        &self,
        file_id: &str,
        requester_id: &str,
    ) -> Result<FileAccessResult, SecurityError>;

    async fn validate_deletion(
        &self,
        file_id: &str,
        requester_id: &str,
    ) -> Result<DeletionValidationResult, SecurityError>;
}
