//! Face location on single frames.
//!
//! Wraps the SeetaFace cascade classifier (`rustface`) with fixed
//! detection parameters. Detection runs on the luminance channel; zero
//! faces is a valid, non-error result. The classifier model is a
//! capability: when the model file is absent, the content-aware stage is
//! simply constructed without face signals.

use std::path::Path;

use image::GrayImage;
use rustface::{Detector, ImageData};
use tracing::debug;

use clipvert_models::CropAnalysisConfig;

use crate::error::{MediaError, MediaResult};

/// An axis-aligned detected face rectangle in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Face locator with fixed cascade parameters.
///
/// Detection mutates classifier scratch state, so this is built and used
/// inside one blocking analysis pass, never shared across clips.
pub struct FaceLocator {
    detector: Box<dyn Detector>,
    score_threshold: f64,
}

impl FaceLocator {
    /// Load the classifier model from disk and apply fixed parameters.
    pub fn from_model_file(
        model_path: impl AsRef<Path>,
        config: &CropAnalysisConfig,
    ) -> MediaResult<Self> {
        let model_path = model_path.as_ref();
        if !model_path.exists() {
            return Err(MediaError::FaceModelUnavailable(format!(
                "model file not found: {}",
                model_path.display()
            )));
        }

        let mut detector = rustface::create_detector(&model_path.to_string_lossy())
            .map_err(|e| MediaError::FaceModelUnavailable(e.to_string()))?;
        detector.set_min_face_size(config.min_face_size);
        detector.set_score_thresh(config.face_score_threshold);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        Ok(Self {
            detector,
            score_threshold: config.face_score_threshold,
        })
    }

    /// Detect face rectangles in a luminance frame.
    pub fn locate(&mut self, luma: &GrayImage) -> Vec<FaceRegion> {
        let (width, height) = luma.dimensions();
        let mut image = ImageData::new(luma.as_raw(), width, height);

        let faces: Vec<FaceRegion> = self
            .detector
            .detect(&mut image)
            .into_iter()
            .filter(|info| info.score() >= self.score_threshold)
            .map(|info| {
                let bbox = info.bbox();
                FaceRegion {
                    x: bbox.x().max(0) as u32,
                    y: bbox.y().max(0) as u32,
                    width: bbox.width(),
                    height: bbox.height(),
                }
            })
            .collect();

        if !faces.is_empty() {
            debug!(count = faces.len(), "faces located");
        }
        faces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_capability_error() {
        let result = FaceLocator::from_model_file(
            "/nonexistent/seeta_fd.bin",
            &CropAnalysisConfig::default(),
        );
        assert!(matches!(
            result.err(),
            Some(MediaError::FaceModelUnavailable(_))
        ));
    }
}
