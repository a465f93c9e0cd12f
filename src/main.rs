//! rax-drive - Entry Point
//!
//! Brings the drive up with the local reference collaborators and serves the
//! operator console on stdin/stdout.

use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::BufReader;

use rax_drive::config::DriveConfig;
use rax_drive::console::run_session;
use rax_drive::drive::{DriveInitResult, DriveManager};
use rax_drive::oracle::InMemoryRecordStore;
use rax_drive::security::PolicySecurityGate;
use rax_drive::storage::{FileIndex, LocalStorageBackend};
use rax_drive::utils::setup_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match DriveConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    setup_logging(&config.logging.log_level);
    info!("Launching drive at {}", config.storage.drive_root);

    let index = FileIndex::new();
    let storage = Arc::new(LocalStorageBackend::new(&config.storage, index.clone()));
    let security = Arc::new(PolicySecurityGate::new(config.security.clone(), index.clone()));
    let oracle = Arc::new(InMemoryRecordStore::new(index));
    let manager = DriveManager::new(security, storage.clone(), oracle);

    match manager.initialize_drive().await {
        DriveInitResult::Success {
            consciousness,
            optimization,
        } => {
            info!(
                "Drive ready: {} files, {} bytes under management",
                consciousness.known_files, consciousness.bytes_under_management
            );
            for recommendation in &optimization.recommendations {
                info!("Recommendation: {}", recommendation);
            }
        }
        DriveInitResult::SecurityFailure(reason) => {
            error!("Drive refused to start: {}", reason);
            return ExitCode::FAILURE;
        }
        DriveInitResult::Error(cause) => {
            error!("Drive initialization failed: {}", cause);
            return ExitCode::FAILURE;
        }
    }

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    let outcome = run_session(&manager, &config, stdin, stdout).await;
    storage.shutdown();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Console session failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
