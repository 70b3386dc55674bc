//! Record persistence collaborator seam.
//!
//! The workflow commits a finished encounter summary to a record store. The
//! store is an external collaborator: commit failures are caught by the
//! engine and logged, never fatal to a run. `JsonRecordStore` is the bundled
//! file-backed implementation; production deployments substitute an EMR
//! integration behind the same trait.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The slice of an encounter that gets committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterSummary {
    pub patient_id: String,
    pub note_summary: Option<String>,
    pub symptoms: Vec<String>,
    pub suggested_tests: Vec<String>,
    pub draft_prescription: Option<String>,
    pub safety_flags: Vec<String>,
}

/// Acknowledgement returned by a successful commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub record_id: String,
    pub committed_at: DateTime<Utc>,
}

pub trait RecordStore: Send + Sync {
    fn commit(&self, summary: &EncounterSummary) -> Result<CommitReceipt, PersistenceError>;
}

/// One committed record as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    pub record_id: String,
    pub committed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub summary: EncounterSummary,
}

/// Append-only JSON file store.
///
/// A missing or unreadable file starts from an empty list; writes go through
/// a temp file and rename so a concurrent reader sees either the old or the
/// new record list, never a torn one.
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Vec<StoredRecord> {
        let Ok(bytes) = fs::read(&self.path) else {
            return Vec::new();
        };
        serde_json::from_slice(&bytes).unwrap_or_default()
    }

    /// Records for one patient, newest first. The file is append-only, so
    /// reverse order is newest-first.
    pub fn records_for(&self, patient_id: &str) -> Vec<StoredRecord> {
        let mut records: Vec<StoredRecord> = self
            .read_all()
            .into_iter()
            .filter(|r| r.summary.patient_id == patient_id)
            .collect();
        records.reverse();
        records
    }
}

impl RecordStore for JsonRecordStore {
    fn commit(&self, summary: &EncounterSummary) -> Result<CommitReceipt, PersistenceError> {
        let receipt = CommitReceipt {
            record_id: format!("EMR-{}", Uuid::new_v4().simple()),
            committed_at: Utc::now(),
        };

        let mut records = self.read_all();
        records.push(StoredRecord {
            record_id: receipt.record_id.clone(),
            committed_at: receipt.committed_at,
            summary: summary.clone(),
        });

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, &records)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(
            patient_id = %summary.patient_id,
            record_id = %receipt.record_id,
            "Encounter record committed"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(patient_id: &str) -> EncounterSummary {
        EncounterSummary {
            patient_id: patient_id.into(),
            note_summary: Some("fever for two days".into()),
            symptoms: vec!["fever".into()],
            suggested_tests: vec!["CBC with Differential".into()],
            draft_prescription: None,
            safety_flags: vec![],
        }
    }

    #[test]
    fn commit_appends_and_query_filters_by_patient() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecordStore::new(dir.path().join("records.json"));

        store.commit(&summary("PT-001")).unwrap();
        store.commit(&summary("PT-002")).unwrap();
        store.commit(&summary("PT-001")).unwrap();

        let records = store.records_for("PT-001");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.summary.patient_id == "PT-001"));
    }

    #[test]
    fn records_come_back_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecordStore::new(dir.path().join("records.json"));

        let first = store.commit(&summary("PT-001")).unwrap();
        let second = store.commit(&summary("PT-001")).unwrap();

        let records = store.records_for("PT-001");
        assert_eq!(records[0].record_id, second.record_id);
        assert_eq!(records[1].record_id, first.record_id);
    }

    #[test]
    fn corrupt_file_starts_from_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        fs::write(&path, b"not json at all").unwrap();

        let store = JsonRecordStore::new(&path);
        assert!(store.records_for("PT-001").is_empty());
        store.commit(&summary("PT-001")).unwrap();
        assert_eq!(store.records_for("PT-001").len(), 1);
    }
}
