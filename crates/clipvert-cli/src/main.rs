//! Clip extraction and portrait conversion binary.

mod pipeline;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clipvert_models::{CropAnalysisConfig, EncodingConfig};
use clipvert_resize_client::ResizeClient;

use pipeline::{load_clips, run_pipeline, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "clipvert", version, about = "Extract high-quality clips from a video and convert them to 9:16 portrait")]
struct Cli {
    /// Input video file
    #[arg(long, default_value = "video.mp4")]
    video: PathBuf,

    /// JSON file of clip candidates produced by the clip finder
    #[arg(long)]
    clips: PathBuf,

    /// Output directory for extracted clips
    #[arg(long, default_value = "clips")]
    output_dir: PathBuf,

    /// Minimum clip duration in seconds
    #[arg(long, default_value_t = 3.0)]
    min_duration: f64,

    /// Maximum clip duration in seconds
    #[arg(long, default_value_t = 100.0)]
    max_duration: f64,

    /// Also produce 9:16 portrait versions of each clip
    #[arg(long)]
    resize: bool,

    /// Base URL of the intelligent-resize service
    #[arg(long, env = "CLIPVERT_RESIZE_URL")]
    resize_url: Option<String>,

    /// Auth token for the intelligent-resize service
    #[arg(long, env = "CLIPVERT_RESIZE_TOKEN", hide_env_values = true)]
    resize_token: Option<String>,

    /// Path to the face classifier model file
    #[arg(long, env = "CLIPVERT_FACE_MODEL")]
    face_model: Option<PathBuf>,

    /// Scene-change similarity threshold (0.0-1.0)
    #[arg(long, default_value_t = 0.6)]
    scene_threshold: f32,

    /// Heat-map weight for detected faces
    #[arg(long, default_value_t = 0.6)]
    face_weight: f32,

    /// Heat-map weight ceiling for saliency
    #[arg(long, default_value_t = 0.4)]
    saliency_weight: f32,

    /// Horizontal search steps for the crop window selector
    #[arg(long, default_value_t = 10)]
    search_steps: u32,
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("clipvert=info,warn"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    anyhow::ensure!(
        cli.video.exists(),
        "video file not found: {}",
        cli.video.display()
    );
    clipvert_media::check_ffmpeg().context("ffmpeg is required")?;
    clipvert_media::check_ffprobe().context("ffprobe is required")?;

    let clips = load_clips(&cli.clips)
        .await
        .with_context(|| format!("loading clip candidates from {}", cli.clips.display()))?;
    info!(count = clips.len(), "loaded clip candidates");

    let resize_client = match (&cli.resize_url, &cli.resize_token) {
        (Some(url), Some(token)) => Some(ResizeClient::new(url.clone(), token.clone())),
        _ => {
            if cli.resize {
                info!("resize service not configured, the remote resize stage is skipped");
            }
            None
        }
    };

    let analysis = CropAnalysisConfig {
        scene_threshold: cli.scene_threshold,
        face_weight: cli.face_weight,
        saliency_weight: cli.saliency_weight,
        search_steps: cli.search_steps,
        ..CropAnalysisConfig::default()
    };

    let config = PipelineConfig {
        video: cli.video,
        output_dir: cli.output_dir,
        min_duration: cli.min_duration,
        max_duration: cli.max_duration,
        resize: cli.resize,
        encoding: EncodingConfig::default(),
        analysis,
        resize_client,
        face_model: cli.face_model,
    };

    let summary = run_pipeline(&config, &clips).await?;
    info!(
        found = summary.found,
        extracted = summary.extracted,
        skipped = summary.skipped,
        failed = summary.failed,
        vertical_ok = summary.vertical_ok,
        vertical_failed = summary.vertical_failed,
        "run complete"
    );

    if summary.extracted == 0 {
        anyhow::bail!("no clips were successfully extracted");
    }
    Ok(())
}
