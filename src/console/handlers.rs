//! Console command handlers
//!
//! Translates console commands into drive manager calls and formats the outcome.

use log::{error, info};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::commands::{Command, CommandResult, CommandStatus};
use super::responses::{self, format_response};
use crate::config::DriveConfig;
use crate::drive::{DriveFile, DriveManager, FileMetadata, FileOperation, FileResult};
use crate::error::handlers::{error_to_response_code, handle_error};
use crate::error::DriveError;

const HELP_TEXT: &str = "Commands: UPLOAD <path> <owner> [public|private|classified], \
DOWNLOAD <id> <requester>, DELETE <id> <requester>, SYNC, ORACLE, STATE, HELP, QUIT";

/// Dispatches a parsed console command to its handler.
pub async fn handle_command(
    manager: &DriveManager,
    config: &DriveConfig,
    command: Command,
) -> CommandResult {
    match command {
        Command::Upload {
            path,
            owner,
            access_level,
        } => handle_cmd_upload(manager, &path, FileMetadata::new(owner, access_level)).await,
        Command::Download { file_id, requester } => {
            let operation = FileOperation::Download {
                file_id,
                requester_id: requester,
            };
            file_result_response(manager.manage_files(operation).await)
        }
        Command::Delete { file_id, requester } => {
            let operation = FileOperation::Delete {
                file_id,
                requester_id: requester,
            };
            file_result_response(manager.manage_files(operation).await)
        }
        Command::Sync => {
            let operation = FileOperation::Sync(config.sync.to_sync_configuration());
            file_result_response(manager.manage_files(operation).await)
        }
        Command::Oracle => handle_cmd_oracle(manager).await,
        Command::State => handle_cmd_state(manager),
        Command::Help => CommandResult::new(
            CommandStatus::Success,
            format_response(responses::HELP, HELP_TEXT),
        ),
        Command::Quit => CommandResult::new(
            CommandStatus::CloseSession,
            format_response(responses::GOODBYE, "Goodbye"),
        ),
        Command::Unknown(raw) => CommandResult::new(
            CommandStatus::Failure,
            format_response(
                responses::UNKNOWN_COMMAND,
                &format!("Unknown command: {}", raw),
            ),
        ),
    }
}

async fn handle_cmd_upload(
    manager: &DriveManager,
    path: &str,
    metadata: FileMetadata,
) -> CommandResult {
    let content = match tokio::fs::read(path).await {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to read {}: {}", path, e);
            return failure_response(&DriveError::from(e));
        }
    };

    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string());
    let file = DriveFile::new(new_file_id(), name, content, "application/octet-stream");

    info!("Uploading {} for {}", path, metadata.owner_id);
    file_result_response(
        manager
            .manage_files(FileOperation::Upload { file, metadata })
            .await,
    )
}

async fn handle_cmd_oracle(manager: &DriveManager) -> CommandResult {
    match manager.sync_with_oracle().await {
        Ok(result) => {
            let mut message = format!(
                "success={} records_updated={}",
                result.success, result.records_updated
            );
            if !result.errors.is_empty() {
                message.push_str(&format!(" errors=[{}]", result.errors.join("; ")));
            }
            let status = if result.success {
                CommandStatus::Success
            } else {
                CommandStatus::Failure
            };
            CommandResult::new(status, format_response(responses::OK, &message))
        }
        Err(e) => failure_response(&e),
    }
}

fn handle_cmd_state(manager: &DriveManager) -> CommandResult {
    let state = manager.drive_consciousness_state().borrow().clone();

    let mut metrics: Vec<String> = state
        .metrics
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    metrics.sort();

    let message = format!(
        "active={} operations=[{}] metrics=[{}]",
        state.is_active,
        state.operations.join(", "),
        metrics.join(", ")
    );
    CommandResult::new(
        CommandStatus::Success,
        format_response(responses::STATE, &message),
    )
}

fn file_result_response(result: Result<FileResult, DriveError>) -> CommandResult {
    match result {
        Ok(FileResult::Success(message)) => {
            CommandResult::new(CommandStatus::Success, format_response(responses::OK, &message))
        }
        Ok(FileResult::SecurityRejection(threat)) => CommandResult::new(
            CommandStatus::Failure,
            format_response(responses::REJECTED, &format!("Rejected: {}", threat)),
        ),
        Ok(FileResult::AccessDenied(reason)) => CommandResult::new(
            CommandStatus::Failure,
            format_response(responses::REJECTED, &format!("Access denied: {}", reason)),
        ),
        Ok(FileResult::UnauthorizedDeletion(reason)) => CommandResult::new(
            CommandStatus::Failure,
            format_response(
                responses::REJECTED,
                &format!("Unauthorized deletion: {}", reason),
            ),
        ),
        Err(e) => failure_response(&e),
    }
}

fn failure_response(err: &DriveError) -> CommandResult {
    handle_error(err);
    CommandResult::new(
        CommandStatus::Failure,
        format_response(error_to_response_code(err), &err.to_string()),
    )
}

/// Time-based file id, unique enough for a single console session.
fn new_file_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("{:x}", nanos)
}
