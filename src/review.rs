//! Human-in-the-loop review gate.
//!
//! A run that raised safety flags pauses in `AwaitingReview` and returns
//! control to the caller; the encounter state is the handoff artifact. A
//! follow-up call supplies the physician's decision. The gate never re-runs
//! upstream stages — it flips exactly one boolean and logs the decision.

use serde::{Deserialize, Serialize};

use crate::models::EncounterState;

/// A physician's decision on a paused encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDecision {
    pub approved: bool,
    pub comments: Option<String>,
}

impl ReviewDecision {
    pub fn approve(comments: Option<String>) -> Self {
        Self {
            approved: true,
            comments,
        }
    }

    pub fn reject(comments: Option<String>) -> Self {
        Self {
            approved: false,
            comments,
        }
    }
}

/// Apply a decision to a paused encounter.
///
/// Approval clears `requires_review`; rejection leaves it set — the record
/// stays pending and a later decision may still resolve it. Either branch
/// appends the decision and any comment to the audit log.
pub fn apply_decision(state: &mut EncounterState, decision: &ReviewDecision) {
    if decision.approved {
        state.requires_review = false;
        state.audit("Review gate: physician approved actions.");
    } else {
        state.audit("Review gate: physician rejected or deferred actions.");
    }

    if let Some(comments) = decision.comments.as_deref().filter(|c| !c.is_empty()) {
        state.audit(format!("Physician comment: {comments}"));
    }

    tracing::info!(
        patient_id = %state.patient_id,
        approved = decision.approved,
        "Review decision applied"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paused_state() -> EncounterState {
        let mut state = EncounterState::new("PT-001", "suicidal ideation reported");
        state.requires_review = true;
        state.safety_flags.push("Red flag detected: suicidal".into());
        state
    }

    #[test]
    fn approval_clears_requires_review() {
        let mut state = paused_state();
        apply_decision(&mut state, &ReviewDecision::approve(None));
        assert!(!state.requires_review);
        assert!(state
            .audit_log
            .iter()
            .any(|l| l.contains("physician approved")));
    }

    #[test]
    fn rejection_leaves_requires_review_set() {
        let mut state = paused_state();
        apply_decision(&mut state, &ReviewDecision::reject(None));
        assert!(state.requires_review);
    }

    #[test]
    fn comment_lands_in_audit_log() {
        let mut state = paused_state();
        apply_decision(
            &mut state,
            &ReviewDecision::approve(Some("start sertraline, refer psych".into())),
        );
        assert!(state
            .audit_log
            .iter()
            .any(|l| l.contains("start sertraline, refer psych")));
    }

    #[test]
    fn empty_comment_is_not_logged() {
        let mut state = paused_state();
        let before = state.audit_log.len();
        apply_decision(&mut state, &ReviewDecision::reject(Some(String::new())));
        // one decision line, no comment line
        assert_eq!(state.audit_log.len(), before + 1);
    }

    #[test]
    fn gate_touches_no_upstream_fields() {
        let mut state = paused_state();
        let symptoms = state.symptoms.clone();
        let tests = state.suggested_tests.clone();
        let flags = state.safety_flags.clone();
        apply_decision(&mut state, &ReviewDecision::approve(None));
        assert_eq!(state.symptoms, symptoms);
        assert_eq!(state.suggested_tests, tests);
        assert_eq!(state.safety_flags, flags);
    }
}
