use serde::{Deserialize, Serialize};

/// Phase of a workflow run.
///
/// Transitions are strictly sequential; the only branch is the terminal one,
/// decided by `requires_review` after the safety stage has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    Created,
    Scribed,
    Planned,
    Prescribed,
    SafetyChecked,
    SymptomsExtracted,
    AwaitingReview,
    Completed,
}

impl WorkflowPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Scribed => "scribed",
            Self::Planned => "planned",
            Self::Prescribed => "prescribed",
            Self::SafetyChecked => "safety_checked",
            Self::SymptomsExtracted => "symptoms_extracted",
            Self::AwaitingReview => "awaiting_review",
            Self::Completed => "completed",
        }
    }

    /// Terminal or paused — a run handed back to the caller is in one of these.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::AwaitingReview | Self::Completed)
    }
}

/// Verification outcome status.
///
/// Input problems (nothing enrolled, undecodable bytes, no face in frame) are
/// normal reportable outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyStatus {
    Ok,
    NoEnrollment,
    DecodeError,
    NoFace,
}

impl VerifyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NoEnrollment => "no_enrollment",
            Self::DecodeError => "decode_error",
            Self::NoFace => "no_face",
        }
    }
}
