//! Drive storage
//!
//! The storage backend interface, the shared file index, state publishing and the
//! local filesystem backend.

pub mod backend;
pub mod filesystem;
pub mod index;
pub mod state;

pub use backend::StorageBackend;
pub use filesystem::LocalStorageBackend;
pub use index::{FileIndex, IndexEntry};
pub use state::ConsciousnessTracker;
