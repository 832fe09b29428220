//! Tunables for the content-aware crop analysis.

use serde::{Deserialize, Serialize};

use crate::scene::DEFAULT_MAX_SCENES;

/// Weight painted over detected face rectangles in the heat map.
pub const DEFAULT_FACE_WEIGHT: f32 = 0.6;
/// Upper bound the normalized saliency map is scaled into.
pub const DEFAULT_SALIENCY_WEIGHT: f32 = 0.4;
/// Golden-ratio fraction used by the heuristic positional crop.
pub const GOLDEN_RATIO: f64 = 0.618;

/// Configuration for scene detection, signal fusion, and window search.
///
/// The weights and thresholds are empirical; they ship as fixed defaults
/// but every one of them is operator-tunable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropAnalysisConfig {
    /// Scene-change similarity threshold (0.0-1.0). Consecutive sample
    /// frames whose histogram similarity drops below this are a cut.
    pub scene_threshold: f32,
    /// Frames per second sampled for scene detection.
    pub scene_sample_fps: f64,
    /// Width the scene-detection samples are downscaled to.
    pub scene_downscale_width: u32,
    /// Detected scene count above which the video collapses to one scene.
    pub max_scenes: usize,
    /// Heat-map weight for face rectangles.
    pub face_weight: f32,
    /// Heat-map weight ceiling for the saliency map.
    pub saliency_weight: f32,
    /// Number of horizontal search steps for the crop window selector.
    pub search_steps: u32,
    /// Minimum detectable face size in pixels.
    pub min_face_size: u32,
    /// Face classifier score threshold.
    pub face_score_threshold: f64,
}

impl Default for CropAnalysisConfig {
    fn default() -> Self {
        Self {
            scene_threshold: 0.6,
            scene_sample_fps: 1.0,
            scene_downscale_width: 320,
            max_scenes: DEFAULT_MAX_SCENES,
            face_weight: DEFAULT_FACE_WEIGHT,
            saliency_weight: DEFAULT_SALIENCY_WEIGHT,
            search_steps: 10,
            min_face_size: 40,
            face_score_threshold: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fusion_weights() {
        let config = CropAnalysisConfig::default();
        assert!((config.face_weight - 0.6).abs() < 1e-6);
        assert!((config.saliency_weight - 0.4).abs() < 1e-6);
        assert_eq!(config.max_scenes, 20);
        assert_eq!(config.search_steps, 10);
    }
}
