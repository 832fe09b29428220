//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media processing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("transcode failed: {message}")]
    TranscodeFailure {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    ProbeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("failed to decode: {0}")]
    DecodeError(String),

    #[error("no sample frames could be decoded")]
    NoFramesAvailable,

    #[error("heat map aggregation received no contributing frames")]
    InsufficientSignal,

    #[error("invalid crop geometry: {0}")]
    InvalidCropGeometry(String),

    #[error("face detector unavailable: {0}")]
    FaceModelUnavailable(String),

    #[error("remote resize failed: {0}")]
    RemoteResize(String),

    #[error("all crop strategies exhausted for {0}")]
    AllStrategiesExhausted(PathBuf),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("invalid video file: {0}")]
    InvalidVideo(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create a transcode failure error.
    pub fn transcode_failure(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::TranscodeFailure {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::DecodeError(message.into())
    }

    /// Create an invalid-crop-geometry error.
    pub fn invalid_crop(message: impl Into<String>) -> Self {
        Self::InvalidCropGeometry(message.into())
    }
}
