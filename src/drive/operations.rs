//! Drive operations
//!
//! The closed set of file operations the drive manager dispatches.

use super::types::{DriveFile, FileMetadata, SyncConfiguration};

/// A file operation submitted to the drive manager.
///
/// Each variant carries exactly what its validate-then-execute path needs.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    Upload {
        file: DriveFile,
        metadata: FileMetadata,
    },
    Download {
        file_id: String,
        requester_id: String,
    },
    Delete {
        file_id: String,
        requester_id: String,
    },
    Sync(SyncConfiguration),
}

impl FileOperation {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FileOperation::Upload { .. } => "upload",
            FileOperation::Download { .. } => "download",
            FileOperation::Delete { .. } => "delete",
            FileOperation::Sync(_) => "sync",
        }
    }
}
