//! Prescription drafting stage.
//!
//! Produces one templated free-text draft from the current symptom list and
//! note summary. The draft is advisory only — a clinician edits it before
//! anything downstream commits to it — and is overwritten wholesale on each
//! run, never merged with a prior draft.

use crate::models::EncounterState;

/// Characters of the summary echoed into the draft.
const DRAFT_SUMMARY_CHARS: usize = 200;

pub fn run(state: &mut EncounterState) {
    let symptoms = if state.symptoms.is_empty() {
        "unspecified symptoms".to_string()
    } else {
        state.symptoms.join(", ")
    };
    let summary: String = state.note_text().chars().take(DRAFT_SUMMARY_CHARS).collect();

    let draft = format!(
        "Provisional prescription for {symptoms}.\n\
         Note summary: {summary}...\n\n\
         Medications:\n\
         - (To be decided by physician)\n\n\
         Instructions:\n\
         - Follow up if symptoms worsen.\n"
    );

    state.draft_prescription = Some(draft);
    state.audit("Prescription stage: drafted provisional prescription.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_names_the_symptoms() {
        let mut state = EncounterState::new("PT-001", "fever and cough");
        state.symptoms = vec!["fever".into(), "cough".into()];
        run(&mut state);
        let draft = state.draft_prescription.unwrap();
        assert!(draft.contains("fever, cough"));
    }

    #[test]
    fn empty_symptom_list_falls_back_to_placeholder() {
        let mut state = EncounterState::new("PT-001", "general checkup");
        run(&mut state);
        assert!(state
            .draft_prescription
            .unwrap()
            .contains("unspecified symptoms"));
    }

    #[test]
    fn rerun_overwrites_the_prior_draft_wholesale() {
        let mut state = EncounterState::new("PT-001", "fever");
        state.symptoms = vec!["fever".into()];
        run(&mut state);
        let first = state.draft_prescription.clone().unwrap();

        state.symptoms = vec!["cough".into()];
        run(&mut state);
        let second = state.draft_prescription.unwrap();
        assert_ne!(first, second);
        assert!(!second.contains("fever,"));
    }
}
