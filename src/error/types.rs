//! Error types
//!
//! Defines domain-specific error types for each area of the drive.
//!
//! These are collaborator faults. Expected outcomes such as a rejected upload are
//! `FileResult` variants, never errors.

use std::io;
use thiserror::Error;

/// Security gate errors
#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("Security gate unavailable: {0}")]
    Unavailable(String),
}

/// Storage backend errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Drive not awake")]
    NotAwake,

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Metadata store errors
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Metadata store unavailable: {0}")]
    Unavailable(String),
}

/// General drive error that encompasses all error types
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("Security error: {0}")]
    Security(#[from] SecurityError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_error_wraps_source_message() {
        let err: DriveError = StorageError::FileNotFound("abc".into()).into();
        assert_eq!(err.to_string(), "Storage error: File not found: abc");

        let err: DriveError = SecurityError::Unavailable("timeout".into()).into();
        assert_eq!(
            err.to_string(),
            "Security error: Security gate unavailable: timeout"
        );
    }

    #[test]
    fn not_awake_reads_as_storage_fault() {
        let err: DriveError = StorageError::NotAwake.into();
        assert_eq!(err.to_string(), "Storage error: Drive not awake");
    }

    #[test]
    fn io_error_converts_into_storage_error() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = StorageError::from(io);
        assert!(matches!(err, StorageError::IoError(_)));
    }
}
