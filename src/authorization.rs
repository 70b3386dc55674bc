//! Patient presence authorization registry.
//!
//! Answers one question: "has this patient been face-verified at least once
//! since the process started or was last revoked?" Authorization is a single
//! boolean per patient — not per session, not per device — and persists until
//! explicit revocation or process restart. Deliberately coarse.
//!
//! The registry is an injected service, not module state: construct one at
//! startup, hand an `Arc` to both the biometric engine and the workflow
//! engine, and reset it between test runs.

use std::collections::HashSet;
use std::sync::RwLock;

/// Process-wide set of face-verified patients.
///
/// `RwLock` keeps grant/revoke/lookup atomic under concurrent requests;
/// contention is expected to be low.
#[derive(Debug, Default)]
pub struct AuthorizationRegistry {
    authorized: RwLock<HashSet<String>>,
}

impl AuthorizationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a patient as present. Idempotent.
    pub fn grant(&self, patient_id: &str) {
        let mut set = self.authorized.write().expect("authorization lock poisoned");
        if set.insert(patient_id.to_string()) {
            tracing::info!(patient_id, "Patient presence authorized");
        }
    }

    pub fn is_authorized(&self, patient_id: &str) -> bool {
        self.authorized
            .read()
            .expect("authorization lock poisoned")
            .contains(patient_id)
    }

    /// Remove a patient's authorization. Idempotent.
    pub fn revoke(&self, patient_id: &str) {
        let mut set = self.authorized.write().expect("authorization lock poisoned");
        if set.remove(patient_id) {
            tracing::info!(patient_id, "Patient presence revoked");
        }
    }

    /// Drop every authorization. Used at teardown and between test runs.
    pub fn clear_all(&self) {
        self.authorized
            .write()
            .expect("authorization lock poisoned")
            .clear();
    }
}
