//! Oracle result types

/// Result of reconciling local records with the authoritative metadata store.
///
/// `success == true` with a non-empty `errors` list is a legal partial success.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OracleSyncResult {
    pub success: bool,
    pub records_updated: usize,
    pub errors: Vec<String>,
}
