//! Face detection primitive.
//!
//! Detection is an external collaborator behind [`FaceDetector`]: grayscale
//! frame in, candidate regions out. Zero regions is a normal, reportable
//! outcome. Deployments wire in a cascade- or model-backed detector; the
//! bundled [`ContrastFaceDetector`] is a pixel-statistics stand-in that only
//! rejects frames with no usable detail.

use image::GrayImage;

/// Axis-aligned candidate region within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceRegion {
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Face-detection collaborator. Implementations must be deterministic for
/// the same frame.
pub trait FaceDetector: Send + Sync {
    fn detect_faces(&self, gray: &GrayImage) -> Vec<FaceRegion>;
}

/// Near-white intensity floor for the blank-frame check.
const WHITE_THRESHOLD: u8 = 240;
/// Near-black intensity ceiling for the dark-frame check.
const BLACK_THRESHOLD: u8 = 15;
/// Fraction of near-white pixels above which a frame counts as blank.
const BLANK_FRACTION: f32 = 0.95;
/// Fraction of near-black pixels above which a frame counts as dark.
const DARK_FRACTION: f32 = 0.80;
/// RMS contrast below which a frame has no usable detail.
const MIN_RMS_CONTRAST: f32 = 10.0;

/// Pixel-statistics stand-in detector.
///
/// A frame that is mostly blank, mostly dark, or nearly flat yields no
/// regions; anything with usable detail yields the full frame as the single
/// candidate. Good enough for kiosk-style capture where the subject fills
/// the frame; not a substitute for a real detector in open scenes.
#[derive(Debug, Default)]
pub struct ContrastFaceDetector;

impl FaceDetector for ContrastFaceDetector {
    fn detect_faces(&self, gray: &GrayImage) -> Vec<FaceRegion> {
        let (width, height) = gray.dimensions();
        let pixel_count = (width as usize) * (height as usize);
        if pixel_count == 0 {
            return Vec::new();
        }

        let mut white = 0usize;
        let mut black = 0usize;
        let mut sum = 0f64;
        let mut sum_sq = 0f64;
        for pixel in gray.pixels() {
            let v = pixel.0[0];
            if v >= WHITE_THRESHOLD {
                white += 1;
            }
            if v <= BLACK_THRESHOLD {
                black += 1;
            }
            let f = f64::from(v);
            sum += f;
            sum_sq += f * f;
        }

        let n = pixel_count as f64;
        let mean = sum / n;
        let variance = (sum_sq / n - mean * mean).max(0.0);
        let rms_contrast = variance.sqrt() as f32;

        let blank = white as f32 / pixel_count as f32 > BLANK_FRACTION;
        let dark = black as f32 / pixel_count as f32 > DARK_FRACTION;
        let flat = rms_contrast < MIN_RMS_CONTRAST;

        if blank || dark || flat {
            tracing::debug!(blank, dark, rms_contrast, "Frame rejected, no face candidate");
            return Vec::new();
        }

        vec![FaceRegion {
            x: 0,
            y: 0,
            width,
            height,
        }]
    }
}
