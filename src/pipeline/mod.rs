//! Staged encounter processing pipeline.
//!
//! Each stage is a free function over `&mut EncounterState` that appends at
//! least one audit line; the engine threads the state through the stages in
//! fixed order and handles the terminal branch.

pub mod engine;
pub mod planner;
pub mod prescription;
pub mod safety;
pub mod scribe;
pub mod symptoms;

pub use engine::WorkflowEngine;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("no encounter awaiting review for patient {0}")]
    NoPendingEncounter(String),
    #[error("record locked: patient {0} has not completed face verification")]
    RecordLocked(String),
}
