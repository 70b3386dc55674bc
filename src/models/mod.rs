pub mod encounter;
pub mod enums;

pub use encounter::{EncounterState, ExecutedAction, GuidelineHit};
pub use enums::{VerifyStatus, WorkflowPhase};
