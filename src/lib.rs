//! rax-drive: security-gated drive management core
//!
//! The `DriveManager` sequences drive initialization, dispatches file operations
//! through a `SecurityGate` to a `StorageBackend`, republishes the backend's live
//! state and triggers reconciliation against a `MetadataReconciler`.

pub mod config;
pub mod console;
pub mod drive;
pub mod error;
pub mod oracle;
pub mod security;
pub mod storage;
pub mod utils;

pub use drive::DriveManager;
