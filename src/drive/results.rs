//! Drive result types
//!
//! Defines the outcomes returned by the drive manager.

use super::types::{DriveConsciousness, StorageOptimization};
use crate::security::SecurityThreat;

/// Outcome of a single file operation. Exactly one variant per call.
#[derive(Debug, Clone, PartialEq)]
pub enum FileResult {
    Success(String),
    SecurityRejection(SecurityThreat),
    AccessDenied(String),
    UnauthorizedDeletion(String),
}

impl FileResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FileResult::Success(_))
    }
}

/// Outcome of a drive initialization attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum DriveInitResult {
    Success {
        consciousness: DriveConsciousness,
        optimization: StorageOptimization,
    },
    SecurityFailure(String),
    Error(String),
}

impl DriveInitResult {
    pub fn is_success(&self) -> bool {
        matches!(self, DriveInitResult::Success { .. })
    }
}
