//! Consulta — clinical encounter pipeline with a biometric presence gate.
//!
//! Two subsystems share one authorization registry:
//! - the staged workflow engine threads an [`models::EncounterState`] through
//!   scribe, planner, prescription, safety, and symptom stages, pausing for a
//!   physician when red flags appear;
//! - the biometric engine enrolls a per-patient face template and grants
//!   presence authorization on a successful match.
//!
//! Retrieval, record persistence, and face detection are trait-object
//! collaborators; the bundled implementations are enough for local and test
//! use, production deployments inject their own.

pub mod authorization;
pub mod biometrics;
pub mod config;
pub mod models;
pub mod persistence;
pub mod pipeline;
pub mod retrieval;
pub mod review;
pub mod vocabulary;

pub use authorization::AuthorizationRegistry;
pub use biometrics::{BiometricEngine, BiometricError, VerifyOutcome};
pub use models::{EncounterState, VerifyStatus, WorkflowPhase};
pub use pipeline::{WorkflowEngine, WorkflowError};
pub use review::ReviewDecision;
