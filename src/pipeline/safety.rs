//! Safety stage: red-flag scan.
//!
//! Scans summary + transcript against the fixed red-flag phrase list. Each
//! match appends one flag and sets `requires_review`. This is the only stage
//! permitted to set `requires_review`, and within a run the bit is monotonic:
//! once set, no automated stage clears it — only an explicit human decision.

use crate::models::EncounterState;
use crate::vocabulary;

pub fn run(state: &mut EncounterState) {
    let text = format!(
        "{} {}",
        state.note_summary.as_deref().unwrap_or(""),
        state.raw_transcript.as_deref().unwrap_or("")
    );

    let matches = vocabulary::red_flags_in(&text);
    if matches.is_empty() {
        state.audit("Safety stage: no red flags detected.");
        return;
    }

    for flag in &matches {
        state.safety_flags.push(format!("Red flag detected: {flag}"));
    }
    state.requires_review = true;
    tracing::info!(
        patient_id = %state.patient_id,
        flags = matches.len(),
        "Red flags detected, human review required"
    );
    state.audit("Safety stage: red flags detected, human review required.");
}
