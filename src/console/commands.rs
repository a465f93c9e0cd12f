//! Console commands
//!
//! Defines the operator commands accepted by the drive console and their parser.

use crate::drive::AccessLevel;

/// A command parsed from one console line.
#[derive(Debug, PartialEq)]
pub enum Command {
    Upload {
        path: String,
        owner: String,
        access_level: AccessLevel,
    },
    Download {
        file_id: String,
        requester: String,
    },
    Delete {
        file_id: String,
        requester: String,
    },
    Sync,
    Oracle,
    State,
    Help,
    Quit,
    Unknown(String),
}

/// Outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure,
    CloseSession,
}

/// Full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: String,
}

impl CommandResult {
    pub fn new(status: CommandStatus, message: String) -> Self {
        Self { status, message }
    }
}

/// Parses a raw console line into a `Command`.
///
/// Verbs are case-insensitive. A known verb with the wrong arguments is `Unknown`.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_ascii_uppercase();
    let args: Vec<&str> = parts.collect();

    match (cmd.as_str(), args.as_slice()) {
        ("UPLOAD", [path, owner]) => Command::Upload {
            path: path.to_string(),
            owner: owner.to_string(),
            access_level: AccessLevel::default(),
        },
        ("UPLOAD", [path, owner, level]) => match AccessLevel::parse(level) {
            Some(access_level) => Command::Upload {
                path: path.to_string(),
                owner: owner.to_string(),
                access_level,
            },
            None => Command::Unknown(trimmed.to_string()),
        },
        ("DOWNLOAD", [file_id, requester]) => Command::Download {
            file_id: file_id.to_string(),
            requester: requester.to_string(),
        },
        ("DELETE" | "DEL", [file_id, requester]) => Command::Delete {
            file_id: file_id.to_string(),
            requester: requester.to_string(),
        },
        ("SYNC", []) => Command::Sync,
        ("ORACLE", []) => Command::Oracle,
        ("STATE", []) => Command::State,
        ("HELP", []) => Command::Help,
        ("QUIT" | "Q", []) => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse_command("QUIT"), Command::Quit);
        assert_eq!(parse_command("q"), Command::Quit);
        assert_eq!(parse_command("sync"), Command::Sync);
        assert_eq!(parse_command("ORACLE"), Command::Oracle);
        assert_eq!(parse_command("State"), Command::State);
        assert_eq!(parse_command("HELP"), Command::Help);
    }

    #[test]
    fn test_parse_commands_with_args() {
        assert_eq!(
            parse_command("UPLOAD ./notes.txt alice"),
            Command::Upload {
                path: "./notes.txt".to_string(),
                owner: "alice".to_string(),
                access_level: AccessLevel::Private,
            }
        );
        assert_eq!(
            parse_command("upload report.pdf bob CLASSIFIED"),
            Command::Upload {
                path: "report.pdf".to_string(),
                owner: "bob".to_string(),
                access_level: AccessLevel::Classified,
            }
        );
        assert_eq!(
            parse_command("DOWNLOAD f1 alice"),
            Command::Download {
                file_id: "f1".to_string(),
                requester: "alice".to_string(),
            }
        );
        assert_eq!(
            parse_command("DEL f1 admin"),
            Command::Delete {
                file_id: "f1".to_string(),
                requester: "admin".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_with_whitespace() {
        assert_eq!(parse_command("  QUIT  "), Command::Quit);
        assert_eq!(
            parse_command("DOWNLOAD   f1    alice  "),
            Command::Download {
                file_id: "f1".to_string(),
                requester: "alice".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_commands() {
        assert_eq!(
            parse_command("INVALID"),
            Command::Unknown("INVALID".to_string())
        );
        assert_eq!(
            parse_command("DOWNLOAD f1"),
            Command::Unknown("DOWNLOAD f1".to_string())
        );
        assert_eq!(
            parse_command("UPLOAD a b secret"),
            Command::Unknown("UPLOAD a b secret".to_string())
        );
        assert_eq!(parse_command("SYNC now"), Command::Unknown("SYNC now".to_string()));
        assert_eq!(parse_command(""), Command::Unknown("".to_string()));
    }
}
