//! Content analysis for crop placement.
//!
//! Pipeline, leaf to root: scene segmentation and frame sampling feed
//! saliency scoring and face location; those signals are fused into one
//! heat map per video; the selector slides a portrait window over the heat
//! map and picks the position with the most enclosed importance.

pub mod faces;
pub mod heatmap;
pub mod saliency;
pub mod sampling;
pub mod scene;
pub mod selector;

pub use faces::{FaceLocator, FaceRegion};
pub use heatmap::{aggregate_heat_map, FrameSignals, HeatMap, IntegralImage};
pub use saliency::saliency_map;
pub use sampling::{sample_at_rate, sample_scene_midpoints, SampleFrame};
pub use scene::detect_scenes;
pub use selector::{portrait_target_dims, select_crop_window};
