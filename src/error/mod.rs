//! Error handling
//!
//! Defines error types and handling for the drive.

pub mod handlers;
pub mod types;

pub use types::*;
