//! Sequential per-clip pipeline.
//!
//! For each candidate: duration filter, landscape extract, SRT, and the
//! optional portrait cascade. One clip's failure never aborts the run; the
//! landscape cut stays on disk as the fallback artifact when its portrait
//! conversion fails.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use clipvert_media::cascade::{CascadeCapabilities, CropCascade, StageRequest};
use clipvert_media::subtitle::{build_subtitle_blocks, write_srt, DEFAULT_WORDS_PER_LINE};
use clipvert_media::extract_clip;
use clipvert_models::{AspectRatio, ClipCandidate, CropAnalysisConfig, EncodingConfig};
use clipvert_resize_client::ResizeClient;

/// Everything one run needs.
pub struct PipelineConfig {
    pub video: PathBuf,
    pub output_dir: PathBuf,
    pub min_duration: f64,
    pub max_duration: f64,
    pub resize: bool,
    pub encoding: EncodingConfig,
    pub analysis: CropAnalysisConfig,
    pub resize_client: Option<ResizeClient>,
    pub face_model: Option<PathBuf>,
}

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub found: usize,
    pub extracted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub vertical_ok: usize,
    pub vertical_failed: usize,
}

/// Load clip candidates from the clip finder's JSON handover file.
pub async fn load_clips(path: impl AsRef<Path>) -> anyhow::Result<Vec<ClipCandidate>> {
    let raw = tokio::fs::read(path.as_ref()).await?;
    let clips: Vec<ClipCandidate> = serde_json::from_slice(&raw)?;
    Ok(clips)
}

/// Base filename for clip `index` (1-based), e.g. `clip_3_42s_to_61s`.
pub fn clip_basename(index: usize, start_time: f64, end_time: f64) -> String {
    format!(
        "clip_{}_{}s_to_{}s",
        index, start_time as i64, end_time as i64
    )
}

/// Duration-filter verdict; `Some` carries the reason to skip.
pub fn skip_reason(duration: f64, min: f64, max: f64) -> Option<&'static str> {
    if duration < min {
        Some("too short")
    } else if duration > max {
        Some("too long")
    } else {
        None
    }
}

/// Run the whole pipeline over the candidate list.
pub async fn run_pipeline(
    config: &PipelineConfig,
    clips: &[ClipCandidate],
) -> anyhow::Result<RunSummary> {
    let mut summary = RunSummary {
        found: clips.len(),
        ..RunSummary::default()
    };

    tokio::fs::create_dir_all(&config.output_dir).await?;
    let vertical_dir = config.output_dir.join("vertical");
    if config.resize {
        tokio::fs::create_dir_all(&vertical_dir).await?;
    }

    let cascade = CropCascade::standard(CascadeCapabilities {
        resize_client: config.resize_client.clone(),
        face_model: config.face_model.clone(),
        config: config.analysis.clone(),
    });

    for (i, clip) in clips.iter().enumerate() {
        let index = i + 1;
        let duration = clip.duration();

        if let Some(reason) = skip_reason(duration, config.min_duration, config.max_duration) {
            info!(clip = index, duration, "skipping clip ({})", reason);
            summary.skipped += 1;
            continue;
        }

        let basename = clip_basename(index, clip.start_time, clip.end_time);
        let clip_path = config.output_dir.join(format!("{}.mp4", basename));
        info!(
            clip = index,
            total = clips.len(),
            start = clip.start_time,
            end = clip.end_time,
            "extracting clip"
        );

        if let Err(e) = extract_clip(
            &config.video,
            &clip_path,
            clip.start_time,
            clip.end_time,
            &config.encoding,
        )
        .await
        {
            warn!(clip = index, "extraction failed: {}", e);
            summary.failed += 1;
            continue;
        }
        summary.extracted += 1;

        let blocks = build_subtitle_blocks(
            &clip.words,
            clip.start_time,
            clip.end_time,
            DEFAULT_WORDS_PER_LINE,
        );
        let srt_path = config.output_dir.join(format!("{}.srt", basename));
        match write_srt(&srt_path, &blocks).await {
            Ok(true) => info!(clip = index, "wrote {}", srt_path.display()),
            Ok(false) => {}
            Err(e) => warn!(clip = index, "subtitle write failed: {}", e),
        }

        if config.resize {
            let request = StageRequest {
                input: clip_path.clone(),
                output: vertical_dir.join(format!("vertical_{}.mp4", basename)),
                encoding: config.encoding.clone(),
                aspect: AspectRatio::portrait(),
            };
            match cascade.run(&request).await {
                Ok(strategy) => {
                    info!(clip = index, strategy, "portrait conversion succeeded");
                    summary.vertical_ok += 1;
                }
                Err(e) => {
                    // The landscape cut stays on disk as the usable artifact.
                    warn!(clip = index, "portrait conversion failed: {}", e);
                    summary.vertical_failed += 1;
                }
            }
        }
    }

    Ok(summary)
}
