//! Heuristic positional crop strategy.
//!
//! No content analysis: the crop window keeps full height and sits at the
//! golden-ratio point of the horizontal slack. The alternative alignments
//! are computed and logged for diagnostics, but the golden-left position
//! is always the one encoded, so this stage only fails when the transcode
//! itself does.

use async_trait::async_trait;
use tracing::{debug, info};

use clipvert_models::{AspectRatio, CropWindow, GOLDEN_RATIO};

use crate::clip::staging_path;
use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::fs_utils::publish_atomic;
use crate::probe::probe_video;

use super::{CropStrategy, StageContext};

/// Golden-ratio positional strategy.
#[derive(Default)]
pub struct HeuristicCrop;

impl HeuristicCrop {
    pub fn new() -> Self {
        Self
    }
}

/// Candidate horizontal alignments over the slack left by a full-height
/// target window. Widths stay fractional; ffmpeg's crop filter evaluates
/// the expressions itself.
pub fn candidate_positions(width: u32, height: u32, aspect: &AspectRatio) -> Vec<(&'static str, f64)> {
    let target_width = (height as f64 * aspect.ratio()).min(width as f64);
    let slack = width as f64 - target_width;
    vec![
        ("center", slack / 2.0),
        ("golden-left", slack * GOLDEN_RATIO),
        ("golden-right", slack * (1.0 - GOLDEN_RATIO)),
        ("left", 0.0),
        ("right", slack),
    ]
}

/// The window this strategy always encodes: full height, golden-left.
pub fn golden_left_window(width: u32, height: u32, aspect: &AspectRatio) -> CropWindow {
    let target_width = (height as f64 * aspect.ratio()).min(width as f64);
    let x = (width as f64 - target_width) * GOLDEN_RATIO;
    CropWindow::new(x, 0.0, target_width, height as f64)
}

#[async_trait]
impl CropStrategy for HeuristicCrop {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn attempt(&self, ctx: &StageContext<'_>) -> MediaResult<()> {
        let request = ctx.request;
        let info = probe_video(&request.input).await?;

        for (desc, x) in candidate_positions(info.width, info.height, &request.aspect) {
            debug!(position = desc, x = x, "candidate crop alignment");
        }

        let window = golden_left_window(info.width, info.height, &request.aspect);
        info!(
            x = window.x,
            width = window.width,
            height = window.height,
            "encoding golden-left crop"
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
