//! Planner stage: propose investigations for the encounter.
//!
//! Three contributions, merged in fixed order with first-occurrence dedup:
//! 1. rule lookup over the already-extracted symptom list,
//! 2. a direct rescan of the note text through the shared phrase table
//!    (recovers symptoms the extraction stage has not produced yet),
//! 3. keyword scan over retrieved guideline snippets.
//!
//! The retriever is assumed unreliable: any failure degrades to an empty
//! contribution and an audit line, never a stage abort.

use crate::models::EncounterState;
use crate::retrieval::GuidelineRetriever;
use crate::vocabulary;

pub fn run(state: &mut EncounterState, retriever: &dyn GuidelineRetriever, top_k: usize) {
    let note = state.note_text().to_string();
    let symptoms_text = if state.symptoms.is_empty() {
        "unspecified symptoms".to_string()
    } else {
        state.symptoms.join(", ")
    };

    let from_symptoms = tests_from_symptoms(state.symptoms.iter().map(String::as_str));
    let from_text = tests_from_text(&note);

    let query =
        format!("Suggest initial investigations for a patient with: {symptoms_text}. Note: {note}");
    let hits = match retriever.query(&query, top_k) {
        Ok(hits) => hits,
        Err(e) => {
            tracing::warn!(error = %e, "Guideline retrieval failed; continuing without it");
            state.audit(format!(
                "Planner stage: guideline retrieval failed ({e}); continuing with rule tables only."
            ));
            Vec::new()
        }
    };

    let mut from_retrieval: Vec<&'static str> = Vec::new();
    for hit in &hits {
        for test in vocabulary::tests_in_snippet(&hit.text) {
            if !from_retrieval.contains(&test) {
                from_retrieval.push(test);
            }
        }
    }

    let mut combined: Vec<String> = Vec::new();
    for test in from_symptoms
        .iter()
        .chain(from_text.iter())
        .chain(from_retrieval.iter())
    {
        if !combined.iter().any(|t| t == test) {
            combined.push((*test).to_string());
        }
    }

    state.audit(format!(
        "Planner stage: symptoms={:?}, rule_from_symptoms={from_symptoms:?}, \
         rule_from_text={from_text:?}, retrieval_tests={from_retrieval:?}, \
         final_suggested_tests={combined:?}.",
        state.symptoms
    ));

    state.guideline_hits = hits;
    state.suggested_tests = combined;
}

/// Expand canonical symptoms into their standard investigations,
/// deduplicated, symptom order preserved.
fn tests_from_symptoms<'a>(symptoms: impl Iterator<Item = &'a str>) -> Vec<&'static str> {
    let mut tests: Vec<&'static str> = Vec::new();
    for symptom in symptoms {
        for &test in vocabulary::tests_for_symptom(symptom) {
            if !tests.contains(&test) {
                tests.push(test);
            }
        }
    }
    tests
}

/// Rescan note text for symptom phrases and expand those the same way.
fn tests_from_text(note: &str) -> Vec<&'static str> {
    tests_from_symptoms(vocabulary::canonical_symptoms_in(note).into_iter())
}
