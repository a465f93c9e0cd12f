//! Drive management core
//!
//! Data model, file operations and the `DriveManager` orchestrator.

pub mod manager;
pub mod operations;
pub mod results;
pub mod types;

pub use manager::DriveManager;
pub use operations::FileOperation;
pub use results::{DriveInitResult, FileResult};
pub use types::{
    AccessLevel, BandwidthLimit, ConflictResolution, DriveConsciousness,
    DriveConsciousnessState, DriveFile, FileMetadata, StorageOptimization, SyncConfiguration,
};
