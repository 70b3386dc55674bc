//! Symptom extraction stage.
//!
//! Scans the note through the shared phrase table and writes the canonical
//! token list into the state. Pure substring matching, idempotent, and
//! infallible — absent input yields an empty list.

use crate::models::EncounterState;
use crate::vocabulary;

pub fn run(state: &mut EncounterState) {
    let detected: Vec<String> = vocabulary::canonical_symptoms_in(state.note_text())
        .into_iter()
        .map(str::to_string)
        .collect();

    state.audit(format!("Symptom stage: extracted symptoms {detected:?}."));
    state.symptoms = detected;
}
