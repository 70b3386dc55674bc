//! Biometric patient-presence gate.
//!
//! Enrollment captures one normalized face template per patient; verification
//! compares a fresh capture against it and, on a match, grants presence
//! authorization in the injected registry. Deliberately simple numeric
//! matching — no learned model, no liveness checks.

pub mod detect;
pub mod engine;
pub mod template;

pub use detect::{ContrastFaceDetector, FaceDetector, FaceRegion};
pub use engine::{BiometricEngine, EnrollmentRecord, VerifyOutcome};
pub use template::{FaceTemplate, FileTemplateStore, MemoryTemplateStore, TemplateStore};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BiometricError {
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("no face detected in image")]
    NoFaceDetected,
    #[error("template I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("template serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
