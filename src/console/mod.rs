//! Operator console
//!
//! Line-based command interface over the drive manager.

pub mod commands;
pub mod handlers;
pub mod responses;
pub mod session;

pub use commands::{Command, CommandResult, CommandStatus, parse_command};
pub use handlers::handle_command;
pub use session::run_session;
