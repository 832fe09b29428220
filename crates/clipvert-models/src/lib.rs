//! Shared data models for clipvert.
//!
//! This crate provides Serde-serializable types for:
//! - Aspect ratios and crop geometry
//! - Scene intervals produced by the scene segmenter
//! - Crop segments returned by the intelligent-resize service
//! - Transcript words and clip candidates handed over by the clip finder
//! - Encoding and crop-analysis configuration

pub mod aspect;
pub mod config;
pub mod crop;
pub mod encoding;
pub mod scene;
pub mod transcript;

// Re-export common types
pub use aspect::AspectRatio;
pub use config::{CropAnalysisConfig, GOLDEN_RATIO};
pub use crop::{CropSegment, CropWindow, DetectionInfo, NormalizedRect};
pub use encoding::EncodingConfig;
pub use scene::{normalize_scenes, scenes_from_cuts, SceneInterval};
pub use transcript::{ClipCandidate, TranscriptWord};
