//! Metadata reconciler interface

use async_trait::async_trait;

use super::results::OracleSyncResult;
use crate::error::OracleError;

/// Synchronizes local operation records against an authoritative external store.
#[async_trait]
pub trait MetadataReconciler: Send + Sync {
    async fn sync_database_metadata(&self) -> Result<OracleSyncResult, OracleError>;
}
