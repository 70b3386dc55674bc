//! Enrollment and verification engine.
//!
//! Both paths share one capture routine: decode, grayscale, equalize,
//! detect, pick the largest region (the assumed primary subject in a
//! multi-face frame), normalize to the template grid. Verification compares
//! mean squared intensity difference against a fixed threshold and always
//! reports distance and threshold alongside the verdict.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::authorization::AuthorizationRegistry;
use crate::config::BiometricConfig;
use crate::models::VerifyStatus;

use super::detect::FaceDetector;
use super::template::{equalize_histogram, FaceTemplate, TemplateStore};
use super::BiometricError;

/// Descriptor returned on successful enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub patient_id: String,
    pub template_size: u32,
    pub enrolled_at: DateTime<Utc>,
}

/// Structured verification result. Input problems surface here as statuses,
/// not as errors — only storage faults become `BiometricError`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOutcome {
    pub status: VerifyStatus,
    pub matched: bool,
    pub distance: Option<f32>,
    pub threshold: f32,
}

impl VerifyOutcome {
    fn unmatched(status: VerifyStatus, threshold: f32) -> Self {
        Self {
            status,
            matched: false,
            distance: None,
            threshold,
        }
    }
}

pub struct BiometricEngine {
    detector: Box<dyn FaceDetector>,
    store: Box<dyn TemplateStore>,
    registry: Arc<AuthorizationRegistry>,
    config: BiometricConfig,
}

impl BiometricEngine {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        store: Box<dyn TemplateStore>,
        registry: Arc<AuthorizationRegistry>,
        config: BiometricConfig,
    ) -> Self {
        Self {
            detector,
            store,
            registry,
            config,
        }
    }

    /// Register the patient's reference template, overwriting any previous
    /// one. No quality or liveness checks.
    pub fn enroll(
        &self,
        patient_id: &str,
        image_bytes: &[u8],
    ) -> Result<EnrollmentRecord, BiometricError> {
        let template = self.capture_template(image_bytes)?;
        self.store.save(patient_id, &template)?;
        tracing::info!(
            patient_id,
            template_size = template.size(),
            "Face template enrolled"
        );
        Ok(EnrollmentRecord {
            patient_id: patient_id.to_string(),
            template_size: template.size(),
            enrolled_at: Utc::now(),
        })
    }

    /// Compare a fresh capture against the stored template.
    ///
    /// On a match the engine grants presence authorization for the patient
    /// in the injected registry.
    pub fn verify(
        &self,
        patient_id: &str,
        image_bytes: &[u8],
    ) -> Result<VerifyOutcome, BiometricError> {
        let threshold = self.config.match_threshold;

        let Some(stored) = self.store.load(patient_id)? else {
            return Ok(VerifyOutcome::unmatched(VerifyStatus::NoEnrollment, threshold));
        };

        let current = match self.capture_template(image_bytes) {
            Ok(template) => template,
            Err(BiometricError::Decode(e)) => {
                tracing::debug!(patient_id, error = %e, "Verification image undecodable");
                return Ok(VerifyOutcome::unmatched(VerifyStatus::DecodeError, threshold));
            }
            Err(BiometricError::NoFaceDetected) => {
                return Ok(VerifyOutcome::unmatched(VerifyStatus::NoFace, threshold));
            }
            Err(e) => return Err(e),
        };

        let distance = stored.distance(&current);
        let matched = distance <= threshold;
        if matched {
            self.registry.grant(patient_id);
        }
        tracing::info!(patient_id, distance, threshold, matched, "Face verification");

        Ok(VerifyOutcome {
            status: VerifyStatus::Ok,
            matched,
            distance: Some(distance),
            threshold,
        })
    }

    /// Decode, equalize, detect, and normalize the primary face region.
    fn capture_template(&self, image_bytes: &[u8]) -> Result<FaceTemplate, BiometricError> {
        let decoded = image::load_from_memory(image_bytes)
            .map_err(|e| BiometricError::Decode(e.to_string()))?;
        let gray = equalize_histogram(&decoded.to_luma8());

        let primary = self
            .detector
            .detect_faces(&gray)
            .into_iter()
            .max_by_key(|region| region.area())
            .ok_or(BiometricError::NoFaceDetected)?;

        Ok(FaceTemplate::from_gray_region(
            &gray,
            &primary,
            self.config.template_size,
        ))
    }
}
