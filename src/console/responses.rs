//! Console response handling
//!
//! Defines response codes and formatting.

/// Console response codes
pub const OK: u16 = 200;
pub const STATE: u16 = 211;
pub const HELP: u16 = 214;
pub const READY: u16 = 220;
pub const GOODBYE: u16 = 221;
pub const SERVICE_UNAVAILABLE: u16 = 421;
pub const REJECTED: u16 = 450;
pub const ACTION_FAILED: u16 = 451;
pub const UNKNOWN_COMMAND: u16 = 500;
pub const LINE_TOO_LONG: u16 = 501;
pub const FILE_UNAVAILABLE: u16 = 550;

/// Format a console response line
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\n", code, message)
}
