//! End-to-end tests of the drive manager over the local reference collaborators.

use std::sync::Arc;
use tempfile::TempDir;

use rax_drive::config::DriveConfig;
use rax_drive::console::run_session;
use rax_drive::drive::{
    AccessLevel, DriveFile, DriveInitResult, DriveManager, FileMetadata, FileOperation,
    FileResult,
};
use rax_drive::oracle::InMemoryRecordStore;
use rax_drive::security::{PolicySecurityGate, ThreatKind};
use rax_drive::storage::{FileIndex, LocalStorageBackend};

const EICAR: &str = "X5O!P%@AP[4\\PZX54(P^)7CC)7}$EICAR";

struct LocalDrive {
    _dir: TempDir,
    config: DriveConfig,
    manager: DriveManager,
    storage: Arc<LocalStorageBackend>,
    oracle: Arc<InMemoryRecordStore>,
}

fn local_drive(lockdown: bool) -> LocalDrive {
    let dir = TempDir::new().unwrap();
    let mut config = DriveConfig::default();
    config.storage.drive_root = dir.path().join("drive").to_string_lossy().to_string();
    config.security.lockdown = lockdown;
    config.security.max_file_size_mb = 1;

    let index = FileIndex::new();
    let storage = Arc::new(LocalStorageBackend::new(&config.storage, index.clone()));
    let security = Arc::new(PolicySecurityGate::new(config.security.clone(), index.clone()));
    let oracle = Arc::new(InMemoryRecordStore::new(index));
    let manager = DriveManager::new(security, storage.clone(), oracle.clone());

    LocalDrive {
        _dir: dir,
        config,
        manager,
        storage,
        oracle,
    }
}

fn upload(id: &str, name: &str, content: &[u8], owner: &str, level: AccessLevel) -> FileOperation {
    FileOperation::Upload {
        file: DriveFile::new(id, name, content.to_vec(), "text/plain"),
        metadata: FileMetadata::new(owner, level),
    }
}

#[tokio::test]
async fn lockdown_blocks_initialization() {
    let drive = local_drive(true);

    let result = drive.manager.initialize_drive().await;

    assert_eq!(
        result,
        DriveInitResult::SecurityFailure("Drive is in lockdown".into())
    );
    assert!(!drive.manager.drive_consciousness_state().borrow().is_active);
}

#[tokio::test]
async fn full_file_lifecycle() {
    let drive = local_drive(false);
    assert!(drive.manager.initialize_drive().await.is_success());
    assert!(drive.manager.drive_consciousness_state().borrow().is_active);

    let stored = drive
        .manager
        .manage_files(upload("f1", "Plan.TXT", b"secret plan", "alice", AccessLevel::Private))
        .await
        .unwrap();
    assert_eq!(
        stored,
        FileResult::Success("Uploaded Plan.txt (11 bytes) as f1".into())
    );

    let denied = drive
        .manager
        .manage_files(FileOperation::Download {
            file_id: "f1".into(),
            requester_id: "bob".into(),
        })
        .await
        .unwrap();
    assert!(matches!(denied, FileResult::AccessDenied(_)));

    let fetched = drive
        .manager
        .manage_files(FileOperation::Download {
            file_id: "f1".into(),
            requester_id: "alice".into(),
        })
        .await
        .unwrap();
    assert_eq!(
        fetched,
        FileResult::Success("Downloaded Plan.txt (11 bytes)".into())
    );

    let refused = drive
        .manager
        .manage_files(FileOperation::Delete {
            file_id: "f1".into(),
            requester_id: "bob".into(),
        })
        .await
        .unwrap();
    assert!(matches!(refused, FileResult::UnauthorizedDeletion(_)));

    let deleted = drive
        .manager
        .manage_files(FileOperation::Delete {
            file_id: "f1".into(),
            requester_id: "admin".into(),
        })
        .await
        .unwrap();
    assert_eq!(deleted, FileResult::Success("Deleted Plan.txt".into()));
    assert_eq!(
        drive.manager.drive_consciousness_state().borrow().metric("files_indexed"),
        Some(0.0)
    );
}

#[tokio::test]
async fn malware_upload_is_rejected_and_not_written() {
    let drive = local_drive(false);
    drive.manager.initialize_drive().await;

    let result = drive
        .manager
        .manage_files(upload("m1", "eicar.txt", EICAR.as_bytes(), "alice", AccessLevel::Public))
        .await
        .unwrap();

    match result {
        FileResult::SecurityRejection(threat) => assert_eq!(threat.kind, ThreatKind::Malware),
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(drive.storage.index().get("m1").await.is_none());
}

#[tokio::test]
async fn traversal_name_is_rejected_before_storage() {
    let drive = local_drive(false);
    drive.manager.initialize_drive().await;

    let result = drive
        .manager
        .manage_files(upload("t1", "../../etc/passwd", b"root", "alice", AccessLevel::Public))
        .await
        .unwrap();

    match result {
        FileResult::SecurityRejection(threat) => {
            assert_eq!(threat.kind, ThreatKind::PathTraversal)
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn oracle_reconciles_uploaded_files() {
    let drive = local_drive(false);
    drive.manager.initialize_drive().await;
    for (id, name) in [("a", "a.txt"), ("b", "b.txt")] {
        drive
            .manager
            .manage_files(upload(id, name, b"data", "alice", AccessLevel::Private))
            .await
            .unwrap();
    }

    let result = drive.manager.sync_with_oracle().await.unwrap();
    assert!(result.success);
    assert_eq!(result.records_updated, 2);
    assert!(result.errors.is_empty());
    assert_eq!(drive.oracle.len().await, 2);

    drive.oracle.set_offline(true);
    assert!(drive.manager.sync_with_oracle().await.is_err());
}

#[tokio::test]
async fn console_session_round_trip() {
    let drive = local_drive(false);
    drive.manager.initialize_drive().await;

    let source = drive._dir.path().join("hello.txt");
    std::fs::write(&source, b"hello drive").unwrap();
    let script = format!(
        "UPLOAD {} alice public\nSTATE\nDOWNLOAD nope alice\nBOGUS\nSYNC\nQUIT\nSTATE\n",
        source.display()
    );

    let mut output = Vec::new();
    run_session(&drive.manager, &drive.config, script.as_bytes(), &mut output)
        .await
        .unwrap();
    let output = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 7, "unexpected transcript: {}", output);
    assert!(lines[0].starts_with("220 "));
    assert!(lines[1].starts_with("200 Uploaded hello.txt (11 bytes)"));
    assert!(lines[2].starts_with("211 active=true"));
    assert_eq!(lines[3], "450 Access denied: File not found: nope");
    assert_eq!(lines[4], "500 Unknown command: BOGUS");
    assert!(lines[5].starts_with("200 Sync complete"));
    assert_eq!(lines[6], "221 Goodbye");
}

#[tokio::test]
async fn console_rejects_overlong_lines() {
    let mut drive = local_drive(false);
    drive.config.console.max_command_length = 8;

    let mut output = Vec::new();
    run_session(&drive.manager, &drive.config, "DOWNLOAD f1 alice\n".as_bytes(), &mut output)
        .await
        .unwrap();
    let output = String::from_utf8(output).unwrap();

    assert!(output.contains("501 Command line too long"));
}

#[tokio::test]
async fn console_skips_rest_of_overlong_line() {
    let mut drive = local_drive(false);
    drive.config.console.max_command_length = 16;
    let script = format!("{}\nHELP\n", "A".repeat(1024 * 1024));

    let mut output = Vec::new();
    run_session(&drive.manager, &drive.config, script.as_bytes(), &mut output)
        .await
        .unwrap();
    let output = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 3, "unexpected transcript: {}", output);
    assert_eq!(lines[1], "501 Command line too long");
    assert!(lines[2].starts_with("214 "));
}

#[tokio::test]
async fn upload_cannot_replace_another_owners_file() {
    let drive = local_drive(false);
    drive.manager.initialize_drive().await;
    drive
        .manager
        .manage_files(upload("f1", "plan.txt", b"secret plan", "alice", AccessLevel::Classified))
        .await
        .unwrap();

    let hijack = drive
        .manager
        .manage_files(upload("m1", "plan.txt", b"mallory", "mallory", AccessLevel::Public))
        .await
        .unwrap();
    assert!(matches!(hijack, FileResult::AccessDenied(_)));

    let entry = drive.storage.index().get("f1").await.unwrap();
    assert_eq!(entry.owner, "alice");
    assert_eq!(entry.access_level, AccessLevel::Classified);
    assert!(drive.storage.index().get("m1").await.is_none());

    let fetched = drive
        .manager
        .manage_files(FileOperation::Download {
            file_id: "f1".into(),
            requester_id: "alice".into(),
        })
        .await
        .unwrap();
    assert_eq!(
        fetched,
        FileResult::Success("Downloaded plan.txt (11 bytes)".into())
    );
}
