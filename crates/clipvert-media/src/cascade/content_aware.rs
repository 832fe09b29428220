//! Content-aware crop strategy.
//!
//! Segments the video into scenes, samples one frame per scene, scores
//! each sample for faces and saliency, fuses the signals into a heat map,
//! and transcodes with the crop window that encloses the most heat.
//! When the face model is unavailable the stage degrades to saliency-only
//! analysis instead of failing.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use clipvert_models::CropAnalysisConfig;

use crate::analysis::{
    aggregate_heat_map, detect_scenes, sample_scene_midpoints, saliency_map, select_crop_window,
    FaceLocator, FrameSignals, SampleFrame,
};
use crate::clip::staging_path;
use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::publish_atomic;
use crate::probe::probe_video;

use super::{CropStrategy, StageContext};

/// Strategy driven by local scene, face, and saliency analysis.
pub struct ContentAwareCrop {
    config: CropAnalysisConfig,
    face_model: Option<PathBuf>,
}

impl ContentAwareCrop {
    pub fn new(config: CropAnalysisConfig, face_model: Option<PathBuf>) -> Self {
        Self { config, face_model }
    }
}

/// Score sampled frames for faces and saliency.
///
/// Runs on a blocking thread: the face classifier holds mutable scratch
/// state and is not `Send`, so it lives and dies inside this pass.
fn score_frames(
    frames: Vec<SampleFrame>,
    face_model: Option<PathBuf>,
    config: &CropAnalysisConfig,
) -> Vec<FrameSignals> {
    let mut locator = match &face_model {
        Some(path) => match FaceLocator::from_model_file(path, config) {
            Ok(locator) => Some(locator),
            Err(e) => {
                warn!("face detection disabled: {}", e);
                None
            }
        },
        None => None,
    };

    frames
        .into_iter()
        .map(|frame| {
            let luma = frame.image.to_luma8();
            let faces = locator
                .as_mut()
                .map(|l| l.locate(&luma))
                .unwrap_or_default();
            FrameSignals {
                faces,
                saliency: saliency_map(&luma),
            }
        })
        .collect()
}

#[async_trait]
impl CropStrategy for ContentAwareCrop {
    fn name(&self) -> &'static str {
        "content-aware"
    }

    async fn attempt(&self, ctx: &StageContext<'_>) -> MediaResult<()> {
        let request = ctx.request;
        let info = probe_video(&request.input).await?;
        debug!(
            width = info.width,
            height = info.height,
            fps = info.fps,
            frames = info.total_frames,
            "probed source for content analysis"
        );

        let scenes = detect_scenes(&request.input, &info, &self.config, ctx.workdir).await?;
        info!(scenes = scenes.len(), "scene segmentation complete");

        let frames = sample_scene_midpoints(&request.input, &scenes, ctx.workdir).await?;

        let face_model = self.face_model.clone();
        let config = self.config.clone();
        let signals = tokio::task::spawn_blocking(move || score_frames(frames, face_model, &config))
            .await
            .map_err(|e| MediaError::Internal(e.to_string()))?;

        let heat = aggregate_heat_map(
            &signals,
            info.width,
            info.height,
            self.config.face_weight,
            self.config.saliency_weight,
        )?;
        let window = select_crop_window(&heat, &request.aspect, self.config.search_steps)?;
        info!(
            x = window.x,
            width = window.width,
            height = window.height,
            "content-aware crop window selected"
        );

        let filter = format!(
            "crop={}:{}:{}:0,scale=1080:1920:flags=lanczos",
            window.width, window.height, window.x
        );
        let staging = staging_path(&request.output);
        let cmd = FfmpegCommand::new(&request.input, &staging)
            .video_filter(filter)
            .encoding(&request.encoding)
            .strip_metadata();

        if let Err(e) = FfmpegRunner::new().run(&cmd).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e);
        }
        publish_atomic(&staging, &request.output).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    #[test]
    fn test_score_frames_without_face_model() {
        // Without a model, frames still contribute saliency signals.
        let frames = vec![SampleFrame {
            interval: None,
            image: DynamicImage::new_luma8(32, 32),
        }];
        let signals = score_frames(frames, None, &CropAnalysisConfig::default());
        assert_eq!(signals.len(), 1);
        assert!(signals[0].faces.is_empty());
        assert!(signals[0].saliency.is_some());
    }

    #[test]
    fn test_score_frames_with_missing_model_degrades() {
        let frames = vec![SampleFrame {
            interval: None,
            image: DynamicImage::new_luma8(32, 32),
        }];
        let signals = score_frames(
            frames,
            Some(PathBuf::from("/nonexistent/model.bin")),
            &CropAnalysisConfig::default(),
        );
        assert_eq!(signals.len(), 1);
        assert!(signals[0].faces.is_empty());
    }
}
