//! Workflow engine.
//!
//! Threads one `EncounterState` through the stages in fixed order:
//! scribe → planner → prescription → safety → symptom extraction, then
//! branches on `requires_review`. A flagged run pauses in `AwaitingReview`
//! and its snapshot is parked in the pending map until a physician decision
//! arrives; the engine never blocks or polls. A run that completes invokes
//! the record-store side effect, absorbing any failure — success means
//! "reached a settled phase with state fully populated", not "side effect
//! persisted".

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::authorization::AuthorizationRegistry;
use crate::config::EngineConfig;
use crate::models::{EncounterState, ExecutedAction, WorkflowPhase};
use crate::persistence::{EncounterSummary, RecordStore};
use crate::retrieval::GuidelineRetriever;
use crate::review::{self, ReviewDecision};

use super::{planner, prescription, safety, scribe, symptoms, WorkflowError};

pub struct WorkflowEngine {
    retriever: Box<dyn GuidelineRetriever>,
    records: Box<dyn RecordStore>,
    registry: Arc<AuthorizationRegistry>,
    config: EngineConfig,
    /// Runs paused for review, keyed by patient id. The snapshot is the
    /// handoff artifact between the initial run and the decision call.
    pending: RwLock<HashMap<String, EncounterState>>,
}

impl WorkflowEngine {
    pub fn new(
        retriever: Box<dyn GuidelineRetriever>,
        records: Box<dyn RecordStore>,
        registry: Arc<AuthorizationRegistry>,
        config: EngineConfig,
    ) -> Self {
        Self {
            retriever,
            records,
            registry,
            config,
            pending: RwLock::new(HashMap::new()),
        }
    }

    /// Execute the automatic portion of the workflow for one encounter.
    ///
    /// Always returns a fully formed state in a settled phase
    /// (`AwaitingReview` or `Completed`) — collaborator failures degrade,
    /// they do not propagate.
    pub fn run_workflow(&self, patient_id: &str, note_text: &str) -> EncounterState {
        let mut state = EncounterState::new(patient_id, note_text);
        state.audit("Workflow: starting initial pipeline.");
        tracing::info!(patient_id, "Workflow run started");

        scribe::run(&mut state, self.config.note_summary_chars);
        state.phase = WorkflowPhase::Scribed;

        planner::run(&mut state, &*self.retriever, self.config.retrieval_top_k);
        state.phase = WorkflowPhase::Planned;

        prescription::run(&mut state);
        state.phase = WorkflowPhase::Prescribed;

        safety::run(&mut state);
        state.phase = WorkflowPhase::SafetyChecked;

        symptoms::run(&mut state);
        state.phase = WorkflowPhase::SymptomsExtracted;

        if state.requires_review {
            state.phase = WorkflowPhase::AwaitingReview;
            state.audit("Workflow: paused for human review.");
            tracing::info!(patient_id, "Workflow paused for review");
            self.pending
                .write()
                .expect("pending lock poisoned")
                .insert(patient_id.to_string(), state.clone());
        } else {
            state.phase = WorkflowPhase::Completed;
            state.audit("Workflow: completed without human review.");
            self.commit_record(&mut state);
            tracing::info!(patient_id, "Workflow completed");
        }

        state
    }

    /// Apply a physician decision to the paused encounter for `patient_id`.
    ///
    /// Approval is a protected action: it is denied with
    /// [`WorkflowError::RecordLocked`] unless the patient has passed the
    /// biometric presence gate. Approval completes the run and commits the
    /// record; rejection leaves the snapshot pending so a later decision can
    /// still resolve it.
    pub fn apply_review_decision(
        &self,
        patient_id: &str,
        approved: bool,
        comments: Option<String>,
    ) -> Result<EncounterState, WorkflowError> {
        if approved && !self.registry.is_authorized(patient_id) {
            tracing::warn!(patient_id, "Approval denied: patient not face-verified");
            return Err(WorkflowError::RecordLocked(patient_id.to_string()));
        }

        let decision = ReviewDecision {
            approved,
            comments,
        };

        if approved {
            let mut state = self
                .pending
                .write()
                .expect("pending lock poisoned")
                .remove(patient_id)
                .ok_or_else(|| WorkflowError::NoPendingEncounter(patient_id.to_string()))?;

            review::apply_decision(&mut state, &decision);
            state.phase = WorkflowPhase::Completed;
            state.audit("Workflow: completed after physician approval.");
            self.commit_record(&mut state);
            Ok(state)
        } else {
            let mut pending = self.pending.write().expect("pending lock poisoned");
            let state = pending
                .get_mut(patient_id)
                .ok_or_else(|| WorkflowError::NoPendingEncounter(patient_id.to_string()))?;

            review::apply_decision(state, &decision);
            Ok(state.clone())
        }
    }

    /// Snapshot of the paused encounter for `patient_id`, if any.
    pub fn pending_for(&self, patient_id: &str) -> Option<EncounterState> {
        self.pending
            .read()
            .expect("pending lock poisoned")
            .get(patient_id)
            .cloned()
    }

    /// Commit the encounter summary to the record store. Failure is caught,
    /// recorded, and never fails the run.
    fn commit_record(&self, state: &mut EncounterState) {
        let summary = EncounterSummary {
            patient_id: state.patient_id.clone(),
            note_summary: state.note_summary.clone(),
            symptoms: state.symptoms.clone(),
            suggested_tests: state.suggested_tests.clone(),
            draft_prescription: state.draft_prescription.clone(),
            safety_flags: state.safety_flags.clone(),
        };

        match self.records.commit(&summary) {
            Ok(receipt) => {
                state.executed_actions.push(ExecutedAction {
                    action: "commit_record".into(),
                    status: "committed".into(),
                    record_id: Some(receipt.record_id.clone()),
                });
                state.audit(format!(
                    "Workflow: encounter record committed ({}).",
                    receipt.record_id
                ));
            }
            Err(e) => {
                tracing::warn!(
                    patient_id = %state.patient_id,
                    error = %e,
                    "Record commit failed; run still counts as settled"
                );
                state.executed_actions.push(ExecutedAction {
                    action: "commit_record".into(),
                    status: "failed".into(),
                    record_id: None,
                });
                state.audit(format!("Workflow: record commit failed: {e}."));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::persistence::{CommitReceipt, PersistenceError};
    use crate::retrieval::{NoopRetriever, RetrievalError};

    struct RecordingStore {
        commits: Mutex<Vec<EncounterSummary>>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                commits: Mutex::new(Vec::new()),
            }
        }
    }

    impl RecordStore for RecordingStore {
        fn commit(&self, summary: &EncounterSummary) -> Result<CommitReceipt, PersistenceError> {
            self.commits.lock().unwrap().push(summary.clone());
            Ok(CommitReceipt {
                record_id: "EMR-test".into(),
                committed_at: chrono::Utc::now(),
            })
        }
    }

    struct FailingStore;

    impl RecordStore for FailingStore {
        fn commit(&self, _: &EncounterSummary) -> Result<CommitReceipt, PersistenceError> {
            Err(PersistenceError::Io(std::io::Error::other("disk full")))
        }
    }

    struct FailingRetriever;

    impl GuidelineRetriever for FailingRetriever {
        fn query(
            &self,
            _: &str,
            _: usize,
        ) -> Result<Vec<crate::models::GuidelineHit>, RetrievalError> {
            Err(RetrievalError::Unavailable("index offline".into()))
        }
    }

    fn engine_with(
        retriever: Box<dyn GuidelineRetriever>,
        records: Box<dyn RecordStore>,
    ) -> (WorkflowEngine, Arc<AuthorizationRegistry>) {
        let registry = Arc::new(AuthorizationRegistry::new());
        let engine = WorkflowEngine::new(
            retriever,
            records,
            Arc::clone(&registry),
            EngineConfig::default(),
        );
        (engine, registry)
    }

    #[test]
    fn benign_note_completes_and_commits() {
        let (engine, _) = engine_with(Box::new(NoopRetriever), Box::new(RecordingStore::new()));
        let state = engine.run_workflow("PT-001", "Patient has chest pain and fever for 2 days");

        assert_eq!(state.phase, WorkflowPhase::Completed);
        assert!(!state.requires_review);
        assert_eq!(state.symptoms, vec!["chest pain", "fever"]);
        assert!(state.suggested_tests.iter().any(|t| t == "ECG 12-lead"));
        assert_eq!(state.executed_actions.len(), 1);
        assert_eq!(state.executed_actions[0].status, "committed");
        assert!(engine.pending_for("PT-001").is_none());
    }

    #[test]
    fn red_flag_pauses_without_committing() {
        let store = Box::new(RecordingStore::new());
        let (engine, _) = engine_with(Box::new(NoopRetriever), store);
        let state = engine.run_workflow("PT-001", "sudden severe chest pain at rest");

        assert_eq!(state.phase, WorkflowPhase::AwaitingReview);
        assert!(state.requires_review);
        assert!(!state.safety_flags.is_empty());
        assert!(state.executed_actions.is_empty());
        assert!(engine.pending_for("PT-001").is_some());
    }

    #[test]
    fn approval_requires_presence_authorization() {
        let (engine, registry) =
            engine_with(Box::new(NoopRetriever), Box::new(RecordingStore::new()));
        engine.run_workflow("PT-001", "patient is suicidal");

        let err = engine
            .apply_review_decision("PT-001", true, None)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::RecordLocked(_)));
        // Denial leaves the snapshot pending.
        assert!(engine.pending_for("PT-001").is_some());

        registry.grant("PT-001");
        let state = engine
            .apply_review_decision("PT-001", true, Some("psych referral".into()))
            .unwrap();
        assert_eq!(state.phase, WorkflowPhase::Completed);
        assert!(!state.requires_review);
        assert_eq!(state.executed_actions[0].status, "committed");
        assert!(engine.pending_for("PT-001").is_none());
    }

    #[test]
    fn rejection_keeps_the_encounter_pending() {
        let (engine, registry) =
            engine_with(Box::new(NoopRetriever), Box::new(RecordingStore::new()));
        engine.run_workflow("PT-001", "possible stroke");

        let state = engine
            .apply_review_decision("PT-001", false, Some("needs imaging first".into()))
            .unwrap();
        assert!(state.requires_review);
        assert_eq!(state.phase, WorkflowPhase::AwaitingReview);
        assert!(engine.pending_for("PT-001").is_some());

        // A later approval can still resolve it.
        registry.grant("PT-001");
        let state = engine.apply_review_decision("PT-001", true, None).unwrap();
        assert_eq!(state.phase, WorkflowPhase::Completed);
    }

    #[test]
    fn decision_without_pending_encounter_is_an_error() {
        let (engine, registry) =
            engine_with(Box::new(NoopRetriever), Box::new(RecordingStore::new()));
        registry.grant("PT-404");
        let err = engine
            .apply_review_decision("PT-404", true, None)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NoPendingEncounter(_)));
    }

    #[test]
    fn retrieval_outage_still_reaches_a_settled_phase() {
        let (engine, _) = engine_with(Box::new(FailingRetriever), Box::new(RecordingStore::new()));
        let state = engine.run_workflow("PT-001", "fever and cough for a week");

        assert_eq!(state.phase, WorkflowPhase::Completed);
        assert!(state.guideline_hits.is_empty());
        assert!(state
            .audit_log
            .iter()
            .any(|l| l.contains("retrieval failed")));
        // Rule tables still contributed.
        assert!(state
            .suggested_tests
            .iter()
            .any(|t| t == "CBC with Differential"));
    }

    #[test]
    fn commit_failure_is_absorbed_into_the_audit_trail() {
        let (engine, _) = engine_with(Box::new(NoopRetriever), Box::new(FailingStore));
        let state = engine.run_workflow("PT-001", "mild headache");

        assert_eq!(state.phase, WorkflowPhase::Completed);
        assert_eq!(state.executed_actions[0].status, "failed");
        assert!(state
            .audit_log
            .iter()
            .any(|l| l.contains("record commit failed")));
    }

    #[test]
    fn every_stage_leaves_an_audit_line() {
        let (engine, _) = engine_with(Box::new(NoopRetriever), Box::new(RecordingStore::new()));
        let state = engine.run_workflow("PT-001", "routine follow-up");

        for marker in [
            "Workflow: starting",
            "Scribe stage:",
            "Planner stage:",
            "Prescription stage:",
            "Safety stage:",
            "Symptom stage:",
        ] {
            assert!(
                state.audit_log.iter().any(|l| l.contains(marker)),
                "missing audit line for {marker}"
            );
        }
    }
}
