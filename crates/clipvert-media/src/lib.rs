//! Media processing for clipvert.
//!
//! FFmpeg/FFprobe plumbing plus everything the portrait conversion needs:
//! clip extraction, SRT subtitle generation, content analysis, and the
//! multi-strategy crop cascade. All transcodes publish atomically so a
//! crashed run never leaves a half-written output in place.

pub mod analysis;
pub mod cascade;
pub mod clip;
pub mod command;
pub mod error;
pub mod fs_utils;
pub mod probe;
pub mod subtitle;

pub use cascade::{
    CascadeCapabilities, ContentAwareCrop, CropCascade, CropStrategy, HeuristicCrop,
    RemoteResizeCrop, RuleOfThirdsCrop, StageContext, StageRequest,
};
pub use clip::extract_clip;
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use probe::{probe_video, VideoInfo};
pub use subtitle::{build_subtitle_blocks, format_srt, write_srt, SubtitleBlock};
