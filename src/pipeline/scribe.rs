//! Scribe stage: shape raw input into transcript + summary.
//!
//! Upstream capture (typed note or speech-to-text output) lands in
//! `raw_transcript`. When no summary was supplied, a truncation of the
//! transcript stands in — a deliberate, lossy summarization placeholder.

use crate::models::EncounterState;

/// Ensure both `raw_transcript` and `note_summary` are populated.
pub fn run(state: &mut EncounterState, summary_chars: usize) {
    if state.raw_transcript.is_none() {
        state.raw_transcript = state.note_summary.clone();
    }

    let needs_summary = state
        .note_summary
        .as_deref()
        .map(str::is_empty)
        .unwrap_or(true);
    if needs_summary {
        if let Some(transcript) = state.raw_transcript.as_deref() {
            state.note_summary = Some(truncate_chars(transcript, summary_chars));
        }
    }

    state.audit("Scribe stage: captured note summary.");
}

/// Truncate on a char boundary, never mid code point.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_summary_defaults_to_truncated_transcript() {
        let mut state = EncounterState::new("PT-001", "");
        state.raw_transcript = Some("a".repeat(300));
        state.note_summary = None;
        run(&mut state, 250);
        assert_eq!(state.note_summary.as_deref().unwrap().chars().count(), 250);
    }

    #[test]
    fn existing_summary_is_preserved() {
        let mut state = EncounterState::new("PT-001", "long transcript text");
        state.note_summary = Some("curated summary".into());
        run(&mut state, 250);
        assert_eq!(state.note_summary.as_deref(), Some("curated summary"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "é".repeat(10);
        assert_eq!(truncate_chars(&text, 4), "éééé");
    }

    #[test]
    fn appends_one_audit_line() {
        let mut state = EncounterState::new("PT-001", "fever");
        run(&mut state, 250);
        assert_eq!(state.audit_log.len(), 1);
    }
}
