//! Metadata oracle
//!
//! Reconciliation of local file records against an authoritative metadata store.

pub mod reconciler;
pub mod records;
pub mod results;

pub use reconciler::MetadataReconciler;
pub use records::{InMemoryRecordStore, StoredRecord};
pub use results::OracleSyncResult;
