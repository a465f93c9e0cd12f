//! Error handlers
//!
//! Logs drive errors and maps them to console response codes.

use crate::console::responses;
use crate::error::types::{DriveError, StorageError};
use log::error;

/// Handle a drive error
pub fn handle_error(err: &DriveError) {
    error!("Drive error: {}", err);
}

/// Convert error to console response code
pub fn error_to_response_code(err: &DriveError) -> u16 {
    match err {
        DriveError::Storage(StorageError::FileNotFound(_)) => responses::FILE_UNAVAILABLE,
        DriveError::Storage(_) => responses::ACTION_FAILED,
        DriveError::Security(_) => responses::SERVICE_UNAVAILABLE,
        DriveError::Oracle(_) => responses::SERVICE_UNAVAILABLE,
        DriveError::IoError(_) => responses::ACTION_FAILED,
    }
}
