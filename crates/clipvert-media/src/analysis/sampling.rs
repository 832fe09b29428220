//! Frame sampling.
//!
//! Extracts representative still frames from a video, either one per scene
//! interval (its temporal midpoint) or at a fixed rate. Frames are decoded
//! at exact integer frame indices; an individual frame that fails to decode
//! is skipped, and only a fully empty pass is an error.

use std::path::Path;

use image::DynamicImage;
use tracing::{debug, warn};

use clipvert_models::SceneInterval;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// A decoded sample frame, ephemeral to one analysis pass.
pub struct SampleFrame {
    /// The scene interval this frame represents, when sampled per scene.
    pub interval: Option<SceneInterval>,
    /// Decoded pixels at source resolution (or the requested downscale).
    pub image: DynamicImage,
}

/// Decode the frame at an exact integer frame index.
pub async fn extract_frame(
    video: impl AsRef<Path>,
    frame_index: u64,
    out: impl AsRef<Path>,
) -> MediaResult<DynamicImage> {
    let video = video.as_ref();
    let out = out.as_ref();

    // select=eq(n,N) decodes up to the exact frame rather than trusting
    // keyframe seeks.
    let cmd = FfmpegCommand::new(video, out)
        .video_filter(format!("select=eq(n\\,{})", frame_index))
        .output_arg("-vsync")
        .output_arg("0")
        .frames(1)
        .no_audio();
    FfmpegRunner::new()
        .run(&cmd)
        .await
        .map_err(|e| MediaError::decode(format!("frame {}: {}", frame_index, e)))?;

    image::open(out).map_err(|e| MediaError::decode(format!("frame {}: {}", frame_index, e)))
}

/// Extract one sample frame per scene interval, at its temporal midpoint.
///
/// Individual decode failures are skipped; if nothing decodes, the pass
/// fails with `NoFramesAvailable`.
pub async fn sample_scene_midpoints(
    video: impl AsRef<Path>,
    scenes: &[SceneInterval],
    workdir: &Path,
) -> MediaResult<Vec<SampleFrame>> {
    let video = video.as_ref();
    let mut frames = Vec::with_capacity(scenes.len());

    for (i, scene) in scenes.iter().enumerate() {
        let frame_index = scene.midpoint_frame();
        let out = workdir.join(format!("scene_{:03}.png", i));
        match extract_frame(video, frame_index, &out).await {
            Ok(image) => {
                debug!(scene = i, frame = frame_index, "sampled scene midpoint");
                frames.push(SampleFrame {
                    interval: Some(*scene),
                    image,
                });
            }
            Err(e) => {
                warn!(scene = i, frame = frame_index, "sample failed: {}", e);
            }
        }
    }

    if frames.is_empty() {
        return Err(MediaError::NoFramesAvailable);
    }
    Ok(frames)
}

/// Extract sample frames at a fixed rate, optionally downscaled.
///
/// One ffmpeg pass writes the ticks to `workdir`; frames that fail to load
/// back are skipped. Decode failure of the whole pass is a `DecodeError`;
/// an empty result is `NoFramesAvailable`.
pub async fn sample_at_rate(
    video: impl AsRef<Path>,
    rate_fps: f64,
    downscale_width: Option<u32>,
    workdir: &Path,
) -> MediaResult<Vec<SampleFrame>> {
    let video = video.as_ref();
    let pattern = workdir.join("tick_%05d.png");

    let mut filter = format!("fps={}", rate_fps);
    if let Some(width) = downscale_width {
        filter.push_str(&format!(",scale={}:-2", width));
    }

    let cmd = FfmpegCommand::new(video, &pattern)
        .video_filter(filter)
        .no_audio();
    FfmpegRunner::new()
        .run(&cmd)
        .await
        .map_err(|e| MediaError::decode(format!("rate sampling: {}", e)))?;

    let mut paths: Vec<_> = std::fs::read_dir(workdir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().starts_with("tick_"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut frames = Vec::with_capacity(paths.len());
    for path in paths {
        match image::open(&path) {
            Ok(image) => frames.push(SampleFrame {
                interval: None,
                image,
            }),
            Err(e) => warn!("skipping unreadable sample {}: {}", path.display(), e),
        }
    }

    if frames.is_empty() {
        return Err(MediaError::NoFramesAvailable);
    }
    debug!(count = frames.len(), rate = rate_fps, "sampled at rate");
    Ok(frames)
}
