//! Remote intelligent-resize strategy.
//!
//! Asks the resize service for time-addressed crop segments, transcodes
//! each segment with its own crop window, then concatenates the pieces
//! losslessly. The per-segment crops arrive in normalized coordinates, so
//! the ffmpeg expressions scale them by the input dimensions.

use async_trait::async_trait;
use tracing::{debug, warn};

use clipvert_models::CropSegment;
use clipvert_resize_client::ResizeClient;

use crate::clip::staging_path;
use crate::command::{run_raw_ffmpeg, FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::publish_atomic;

use super::{CropStrategy, StageContext};

/// Strategy backed by the remote resize service.
pub struct RemoteResizeCrop {
    client: ResizeClient,
}

impl RemoteResizeCrop {
    pub fn new(client: ResizeClient) -> Self {
        Self { client }
    }

    /// Filter chain for one segment's normalized crop.
    fn segment_filter(segment: &CropSegment) -> String {
        format!(
            "crop=iw*{}:ih*{}:iw*{}:ih*{},scale=-2:1920:flags=lanczos",
            segment.crop.width, segment.crop.height, segment.crop.x, segment.crop.y
        )
    }
}

#[async_trait]
impl CropStrategy for RemoteResizeCrop {
    fn name(&self) -> &'static str {
        "remote-resize"
    }

    async fn attempt(&self, ctx: &StageContext<'_>) -> MediaResult<()> {
        let request = ctx.request;

        let segments = self
            .client
            .request_crops(&request.input, &request.aspect)
            .await
            .map_err(|e| MediaError::RemoteResize(e.to_string()))?;
        if segments.is_empty() {
            return Err(MediaError::RemoteResize(
                "service returned no usable segments".to_string(),
            ));
        }

        // Transcode each segment with its own crop window. A segment that
        // fails to transcode is dropped rather than failing the stage.
        let mut segment_files = Vec::with_capacity(segments.len());
        for (i, segment) in segments.iter().enumerate() {
            let segment_file = ctx.workdir.join(format!("segment_{:03}.mp4", i));
            let cmd = FfmpegCommand::new(&request.input, &segment_file)
                .seek(segment.start_time)
                .duration(segment.duration())
                .video_filter(Self::segment_filter(segment))
                .encoding(&request.encoding);

            match FfmpegRunner::new().run(&cmd).await {
                Ok(()) => {
                    debug!(
                        segment = i,
                        start = segment.start_time,
                        end = segment.end_time,
                        "transcoded resize segment"
                    );
                    segment_files.push(segment_file);
                }
                Err(e) => warn!(segment = i, "segment transcode failed: {}", e),
            }
        }
        if segment_files.is_empty() {
            return Err(MediaError::RemoteResize(
                "no segments survived transcoding".to_string(),
            ));
        }

        // Lossless concat of the already-encoded segments.
        let concat_list = ctx.workdir.join("concat.txt");
        let mut listing = String::new();
        for file in &segment_files {
            listing.push_str(&format!("file '{}'\n", file.display()));
        }
        tokio::fs::write(&concat_list, listing).await?;

        let staging = staging_path(&request.output);
        let args: Vec<String> = [
            "-y",
            "-v",
            "error",
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
            &concat_list.to_string_lossy(),
            "-c",
            "copy",
            &staging.to_string_lossy(),
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        if let Err(e) = run_raw_ffmpeg(&args).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e);
        }
        publish_atomic(&staging, &request.output).await
    }
}
