//! Security gate
//!
//! The validator interface consulted before every privileged drive action, its
//! verdict types and the policy-driven reference implementation.

pub mod gate;
pub mod policy;
pub mod results;
pub mod validation;

pub use gate::SecurityGate;
pub use policy::PolicySecurityGate;
pub use results::{
    DeletionValidationResult, DriveAccessResult, FileAccessResult, SecurityThreat, ThreatKind,
    UploadValidationResult,
};
