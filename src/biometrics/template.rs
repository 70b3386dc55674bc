//! Face templates and their storage.
//!
//! A template is a fixed-size grayscale intensity grid scaled to [0,1],
//! built from the primary face region after histogram equalization.
//! Storage is latest-wins single-slot per patient: enrollment overwrites,
//! verification reads, nothing is versioned.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use image::imageops::{self, FilterType};
use image::GrayImage;
use serde::{Deserialize, Serialize};

use super::detect::FaceRegion;
use super::BiometricError;

/// Normalized face reference grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceTemplate {
    size: u32,
    /// Row-major intensities in [0,1], `size * size` entries.
    pixels: Vec<f32>,
}

impl FaceTemplate {
    /// Crop the region out of an (already equalized) grayscale frame and
    /// normalize it to a `size`×`size` grid in [0,1].
    pub fn from_gray_region(gray: &GrayImage, region: &FaceRegion, size: u32) -> Self {
        let crop = imageops::crop_imm(gray, region.x, region.y, region.width, region.height)
            .to_image();
        let resized = imageops::resize(&crop, size, size, FilterType::Triangle);
        let pixels = resized
            .pixels()
            .map(|p| f32::from(p.0[0]) / 255.0)
            .collect();
        Self { size, pixels }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Mean squared intensity difference. Symmetric and deterministic;
    /// 0 means identical grids. Both grids must come from the same
    /// normalization size.
    pub fn distance(&self, other: &FaceTemplate) -> f32 {
        debug_assert_eq!(self.size, other.size);
        if self.pixels.is_empty() {
            return 0.0;
        }
        let sum: f32 = self
            .pixels
            .iter()
            .zip(&other.pixels)
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        sum / self.pixels.len() as f32
    }
}

/// Spread intensities across the full range before cropping, so lighting
/// differences between enrollment and verification captures matter less.
pub fn equalize_histogram(gray: &GrayImage) -> GrayImage {
    let total = u64::from(gray.width()) * u64::from(gray.height());
    if total == 0 {
        return gray.clone();
    }

    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let mut cdf = [0u64; 256];
    let mut running = 0u64;
    for (value, count) in histogram.iter().enumerate() {
        running += count;
        cdf[value] = running;
    }
    let cdf_min = cdf.iter().copied().find(|c| *c > 0).unwrap_or(0);
    if total == cdf_min {
        // Single-intensity frame, nothing to spread.
        return gray.clone();
    }

    let mut lut = [0u8; 256];
    for value in 0..256 {
        let scaled = (cdf[value].saturating_sub(cdf_min) as f64 / (total - cdf_min) as f64) * 255.0;
        lut[value] = scaled.round() as u8;
    }

    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = lut[pixel.0[0] as usize];
    }
    out
}

/// Latest-wins single-slot template storage, one slot per patient.
pub trait TemplateStore: Send + Sync {
    /// Overwrite the patient's template. A reader running concurrently must
    /// observe either the old or the new template, never a mix.
    fn save(&self, patient_id: &str, template: &FaceTemplate) -> Result<(), BiometricError>;
    fn load(&self, patient_id: &str) -> Result<Option<FaceTemplate>, BiometricError>;
}

/// One JSON file per patient under a templates directory. Overwrite goes
/// through a temp file and rename, so concurrent readers never see a torn
/// template.
pub struct FileTemplateStore {
    dir: PathBuf,
}

impl FileTemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn template_path(&self, patient_id: &str) -> PathBuf {
        // Patient ids come from callers; keep them from escaping the dir.
        let safe: String = patient_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl TemplateStore for FileTemplateStore {
    fn save(&self, patient_id: &str, template: &FaceTemplate) -> Result<(), BiometricError> {
        fs::create_dir_all(&self.dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer(&mut tmp, template)?;
        tmp.persist(self.template_path(patient_id))
            .map_err(|e| BiometricError::Io(e.error))?;
        Ok(())
    }

    fn load(&self, patient_id: &str) -> Result<Option<FaceTemplate>, BiometricError> {
        let path = self.template_path(patient_id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

/// In-memory store for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryTemplateStore {
    templates: RwLock<HashMap<String, FaceTemplate>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn save(&self, patient_id: &str, template: &FaceTemplate) -> Result<(), BiometricError> {
        self.templates
            .write()
            .expect("template lock poisoned")
            .insert(patient_id.to_string(), template.clone());
        Ok(())
    }

    fn load(&self, patient_id: &str) -> Result<Option<FaceTemplate>, BiometricError> {
        Ok(self
            .templates
            .read()
            .expect("template lock poisoned")
            .get(patient_id)
            .cloned())
    }
}
