//! Security result types
//!
//! Defines the verdicts returned by the security gate.

use std::fmt;

/// Classification of a failed security check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreatKind {
    Malware,
    ForbiddenType,
    OversizedPayload,
    PathTraversal,
    Unclassified,
}

impl fmt::Display for ThreatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreatKind::Malware => write!(f, "malware"),
            ThreatKind::ForbiddenType => write!(f, "forbidden-type"),
            ThreatKind::OversizedPayload => write!(f, "oversized-payload"),
            ThreatKind::PathTraversal => write!(f, "path-traversal"),
            ThreatKind::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// A threat produced when a security check fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityThreat {
    pub kind: ThreatKind,
    pub severity: u8,
    pub description: String,
}

impl SecurityThreat {
    pub fn new(kind: ThreatKind, severity: u8, description: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            description: description.into(),
        }
    }

    /// Stand-in for a gate that rejected an upload without naming a threat.
    pub fn unclassified() -> Self {
        Self::new(
            ThreatKind::Unclassified,
            0,
            "Upload rejected without a threat classification",
        )
    }
}

impl fmt::Display for SecurityThreat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (severity {}): {}",
            self.kind, self.severity, self.description
        )
    }
}

/// Result of drive access validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveAccessResult {
    pub valid: bool,
    pub reason: String,
}

/// Result of upload validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadValidationResult {
    pub secure: bool,
    pub threat: Option<SecurityThreat>,
}

impl UploadValidationResult {
    pub fn secure() -> Self {
        Self {
            secure: true,
            threat: None,
        }
    }

    pub fn rejected(threat: SecurityThreat) -> Self {
        Self {
            secure: false,
            threat: Some(threat),
        }
    }
}

/// Result of file access validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAccessResult {
    pub has_access: bool,
    pub reason: String,
}

/// Result of deletion validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionValidationResult {
    pub authorized: bool,
    pub reason: String,
}
