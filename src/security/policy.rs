//! Policy-driven security gate
//!
//! Evaluates uploads against the configured security policy and decides access
//! from the owner and access level recorded in the file index.

use async_trait::async_trait;
use log::debug;

use super::gate::SecurityGate;
use super::results::{
    DeletionValidationResult, DriveAccessResult, FileAccessResult, SecurityThreat, ThreatKind,
    UploadValidationResult,
};
use super::validation::is_safe_name;
use crate::config::SecurityConfig;
use crate::drive::{AccessLevel, DriveFile};
use crate::error::SecurityError;
use crate::storage::FileIndex;

/// Security gate backed by `SecurityConfig` and a read handle on the file index.
pub struct PolicySecurityGate {
    policy: SecurityConfig,
    index: FileIndex,
}

impl PolicySecurityGate {
    pub fn new(policy: SecurityConfig, index: FileIndex) -> Self {
        Self { policy, index }
    }

    fn is_admin(&self, user_id: &str) -> bool {
        self.policy.admins.iter().any(|admin| admin == user_id)
    }

    fn inspect(&self, file: &DriveFile) -> Option<SecurityThreat> {
        if !is_safe_name(&file.name) {
            return Some(SecurityThreat::new(
                ThreatKind::PathTraversal,
                8,
                format!("Unsafe file name: {:?}", file.name),
            ));
        }

        if let Some(ext) = file.extension() {
            if self
                .policy
                .blocked_extensions
                .iter()
                .any(|blocked| blocked.eq_ignore_ascii_case(&ext))
            {
                return Some(SecurityThreat::new(
                    ThreatKind::ForbiddenType,
                    6,
                    format!("Extension .{} is not allowed", ext),
                ));
            }
        }

        let limit = self.policy.max_file_size_bytes();
        if file.content.len() as u64 > limit {
            return Some(SecurityThreat::new(
                ThreatKind::OversizedPayload,
                4,
                format!(
                    "Payload of {} bytes exceeds the {} byte limit",
                    file.content.len(),
                    limit
                ),
            ));
        }

        self.policy
            .malware_signatures
            .iter()
            .find(|signature| contains_bytes(&file.content, signature.as_bytes()))
            .map(|_| {
                SecurityThreat::new(
                    ThreatKind::Malware,
                    10,
                    format!("{} matches a known malware signature", file.name),
                )
            })
    }
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty()
        && haystack.len() >= needle.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}

#[async_trait]
impl SecurityGate for PolicySecurityGate {
    async fn validate_drive_access(&self) -> Result<DriveAccessResult, SecurityError> {
        if self.policy.lockdown {
            return Ok(DriveAccessResult {
                valid: false,
                reason: "Drive is in lockdown".to_string(),
            });
        }
        Ok(DriveAccessResult {
            valid: true,
            reason: "Drive access granted".to_string(),
        })
    }

    async fn validate_file_upload(
        &self,
        file: &DriveFile,
    ) -> Result<UploadValidationResult, SecurityError> {
        match self.inspect(file) {
            Some(threat) => {
                debug!("Upload {} flagged: {}", file.id, threat);
                Ok(UploadValidationResult::rejected(threat))
            }
            None => Ok(UploadValidationResult::secure()),
        }
    }

    async fn validate_file_access(
        &self,
        file_id: &str,
        requester_id: &str,
    ) -> Result<FileAccessResult, SecurityError> {
        let Some(entry) = self.index.get(file_id).await else {
            return Ok(FileAccessResult {
                has_access: false,
                reason: format!("File not found: {}", file_id),
            });
        };

        let is_owner = entry.owner == requester_id;
        let (has_access, reason) = match entry.access_level {
            AccessLevel::Public => (true, "File is public".to_string()),
            AccessLevel::Private if is_owner || self.is_admin(requester_id) => {
                (true, "Requester may read private file".to_string())
            }
            AccessLevel::Classified if is_owner => {
                (true, "Requester owns classified file".to_string())
            }
            level => (
                false,
                format!("{} may not read {} file {}", requester_id, level, file_id),
            ),
        };

        Ok(FileAccessResult { has_access, reason })
    }

    async fn validate_deletion(
        &self,
        file_id: &str,
        requester_id: &str,
    ) -> Result<DeletionValidationResult, SecurityError> {
        let Some(entry) = self.index.get(file_id).await else {
            return Ok(DeletionValidationResult {
                authorized: false,
                reason: format!("File not found: {}", file_id),
            });
        };

        let authorized = entry.owner == requester_id
            || (self.is_admin(requester_id) && entry.access_level != AccessLevel::Classified);
        let reason = if authorized {
            format!("{} may delete {}", requester_id, file_id)
        } else {
            format!("{} is not allowed to delete {}", requester_id, file_id)
        };

        Ok(DeletionValidationResult { authorized, reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::FileMetadata;
    use crate::storage::IndexEntry;

    const EICAR: &str = "X5O!P%@AP[4\\PZX54(P^)7CC)7}$EICAR";

    fn policy() -> SecurityConfig {
        SecurityConfig {
            lockdown: false,
            max_file_size_mb: 1,
            blocked_extensions: vec!["exe".into()],
            malware_signatures: vec![EICAR.into()],
            admins: vec!["admin".into()],
        }
    }

    async fn gate_with(entries: &[(&str, &str, AccessLevel)]) -> PolicySecurityGate {
        let index = FileIndex::new();
        for (id, owner, level) in entries {
            let file = DriveFile::new(*id, format!("{}.txt", id), vec![], "text/plain");
            index
                .insert(IndexEntry::from_upload(&file, &FileMetadata::new(*owner, *level)))
                .await;
        }
        PolicySecurityGate::new(policy(), index)
    }

    #[tokio::test]
    async fn lockdown_denies_drive_access() {
        let mut config = policy();
        config.lockdown = true;
        let gate = PolicySecurityGate::new(config, FileIndex::new());

        let result = gate.validate_drive_access().await.unwrap();
        assert!(!result.valid);
        assert_eq!(result.reason, "Drive is in lockdown");
    }

    #[tokio::test]
    async fn upload_threats_are_classified() {
        let gate = gate_with(&[]).await;
        let cases = [
            (
                DriveFile::new("a", "../x.txt", vec![], "text/plain"),
                ThreatKind::PathTraversal,
            ),
            (
                DriveFile::new("b", "setup.EXE", vec![], "application/octet-stream"),
                ThreatKind::ForbiddenType,
            ),
            (
                DriveFile::new("c", "big.bin", vec![0; 1024 * 1024 + 1], "application/octet-stream"),
                ThreatKind::OversizedPayload,
            ),
            (
                DriveFile::new("d", "eicar.txt", EICAR.as_bytes().to_vec(), "text/plain"),
                ThreatKind::Malware,
            ),
        ];

        for (file, kind) in cases {
            let result = gate.validate_file_upload(&file).await.unwrap();
            assert!(!result.secure, "{} should be rejected", file.name);
            assert_eq!(result.threat.map(|t| t.kind), Some(kind));
        }

        let clean = DriveFile::new("e", "notes.txt", b"fine".to_vec(), "text/plain");
        assert_eq!(
            gate.validate_file_upload(&clean).await.unwrap(),
            UploadValidationResult::secure()
        );
    }

    #[tokio::test]
    async fn access_follows_access_level() {
        let gate = gate_with(&[
            ("pub", "alice", AccessLevel::Public),
            ("priv", "alice", AccessLevel::Private),
            ("cls", "alice", AccessLevel::Classified),
        ])
        .await;

        assert!(gate.validate_file_access("pub", "bob").await.unwrap().has_access);
        assert!(!gate.validate_file_access("priv", "bob").await.unwrap().has_access);
        assert!(gate.validate_file_access("priv", "admin").await.unwrap().has_access);
        assert!(!gate.validate_file_access("cls", "admin").await.unwrap().has_access);
        assert!(gate.validate_file_access("cls", "alice").await.unwrap().has_access);

        let missing = gate.validate_file_access("nope", "alice").await.unwrap();
        assert!(!missing.has_access);
        assert_eq!(missing.reason, "File not found: nope");
    }

    #[tokio::test]
    async fn deletion_requires_owner_or_admin() {
        let gate = gate_with(&[
            ("priv", "alice", AccessLevel::Private),
            ("cls", "alice", AccessLevel::Classified),
        ])
        .await;

        assert!(gate.validate_deletion("priv", "alice").await.unwrap().authorized);
        assert!(gate.validate_deletion("priv", "admin").await.unwrap().authorized);
        assert!(!gate.validate_deletion("priv", "bob").await.unwrap().authorized);
        assert!(!gate.validate_deletion("cls", "admin").await.unwrap().authorized);
    }
}
