//! Encounter state threaded through the workflow pipeline.
//!
//! One instance per workflow run. The list fields only grow within a run —
//! no stage removes entries written by an earlier stage — and `audit_log`
//! is the system's durable explanation of what each stage did and why.

use serde::{Deserialize, Serialize};

use super::enums::WorkflowPhase;

/// A scored guideline snippet returned by the retrieval collaborator.
///
/// Stored raw for traceability; never reprocessed after the planner stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidelineHit {
    pub text: String,
    pub source: String,
    pub score: f32,
}

/// Record of a side effect performed on behalf of this encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutedAction {
    /// Action kind, e.g. "commit_record".
    pub action: String,
    /// Outcome, e.g. "committed" or "failed".
    pub status: String,
    /// Identifier returned by the collaborator, when it produced one.
    pub record_id: Option<String>,
}

/// Mutable state for one clinical encounter run.
///
/// Owned exclusively by the run that created it; concurrent runs for the same
/// patient are independent, unsynchronized instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterState {
    pub patient_id: String,
    /// Output of capture/transcription. The core does not validate it.
    pub raw_transcript: Option<String>,
    /// Short structured summary; defaults to a transcript truncation.
    pub note_summary: Option<String>,
    /// Canonical symptom tokens, deduplicated, insertion order preserved.
    pub symptoms: Vec<String>,
    /// Recommended investigations, deduplicated across all sources.
    pub suggested_tests: Vec<String>,
    pub guideline_hits: Vec<GuidelineHit>,
    /// Free-text draft, overwritten wholesale by the prescription stage.
    pub draft_prescription: Option<String>,
    pub safety_flags: Vec<String>,
    /// Set true by the safety stage; cleared only by an explicit human
    /// decision, never by another automated stage.
    pub requires_review: bool,
    pub executed_actions: Vec<ExecutedAction>,
    pub audit_log: Vec<String>,
    pub phase: WorkflowPhase,
}

impl EncounterState {
    /// Fresh state for one run. `note_text` seeds both the transcript and the
    /// summary slots; the scribe stage shapes them.
    pub fn new(patient_id: impl Into<String>, note_text: impl Into<String>) -> Self {
        let note = note_text.into();
        Self {
            patient_id: patient_id.into(),
            raw_transcript: Some(note.clone()),
            note_summary: Some(note),
            symptoms: Vec::new(),
            suggested_tests: Vec::new(),
            guideline_hits: Vec::new(),
            draft_prescription: None,
            safety_flags: Vec::new(),
            requires_review: false,
            executed_actions: Vec::new(),
            audit_log: Vec::new(),
            phase: WorkflowPhase::Created,
        }
    }

    /// Append one trace line to the audit log.
    pub fn audit(&mut self, line: impl Into<String>) {
        self.audit_log.push(line.into());
    }

    /// The text the stages reason over: summary first, transcript as fallback.
    pub fn note_text(&self) -> &str {
        self.note_summary
            .as_deref()
            .or(self.raw_transcript.as_deref())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_at_created() {
        let state = EncounterState::new("PT-001", "chest pain");
        assert_eq!(state.phase, WorkflowPhase::Created);
        assert!(!state.requires_review);
        assert!(state.symptoms.is_empty());
        assert!(state.audit_log.is_empty());
    }

    #[test]
    fn note_text_falls_back_to_transcript() {
        let mut state = EncounterState::new("PT-001", "fever for two days");
        state.note_summary = None;
        assert_eq!(state.note_text(), "fever for two days");
        state.raw_transcript = None;
        assert_eq!(state.note_text(), "");
    }

    #[test]
    fn audit_appends_in_order() {
        let mut state = EncounterState::new("PT-001", "");
        state.audit("first");
        state.audit("second");
        assert_eq!(state.audit_log, vec!["first", "second"]);
    }
}
