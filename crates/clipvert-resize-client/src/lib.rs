//! Client for the external intelligent-resize service.
//!
//! The service analyzes a video (speaker diarization plus face tracking on
//! its side) and returns an ordered list of time-addressed crop segments in
//! normalized coordinates. It requires a caller-supplied auth credential;
//! without one the caller should not construct this client at all.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use clipvert_models::{AspectRatio, CropSegment, DetectionInfo, NormalizedRect};

/// Result type for resize-service calls.
pub type ResizeResult<T> = Result<T, ResizeError>;

/// Errors from the intelligent-resize service.
#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("resize service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid response from resize service: {0}")]
    InvalidResponse(String),
}

/// Request body sent to the resize endpoint.
#[derive(Debug, Serialize)]
struct ResizeRequest<'a> {
    video_path: &'a str,
    aspect_ratio: [u32; 2],
}

/// One segment as reported on the wire. All crop fields are optional; the
/// service omits them for stretches where it found nothing to track.
#[derive(Debug, Clone, Deserialize)]
pub struct WireSegment {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    #[serde(default)]
    pub detection_info: Option<WireDetectionInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireDetectionInfo {
    pub num_faces: Option<u32>,
    pub roi_confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ResizeResponse {
    segments: Vec<WireSegment>,
}

/// Convert wire segments into validated crop segments.
///
/// Segments with missing or out-of-range crop fields are dropped, not
/// treated as fatal; the caller decides what to do when too few survive.
pub fn validate_segments(wire: Vec<WireSegment>) -> Vec<CropSegment> {
    let total = wire.len();
    let segments: Vec<CropSegment> = wire
        .into_iter()
        .enumerate()
        .filter_map(|(i, seg)| {
            let (start_time, end_time) = match (seg.start_time, seg.end_time) {
                (Some(s), Some(e)) => (s, e),
                _ => {
                    warn!(segment = i + 1, "segment missing time range, skipping");
                    return None;
                }
            };
            let crop = match (seg.x, seg.y, seg.width, seg.height) {
                (Some(x), Some(y), Some(w), Some(h)) => NormalizedRect::new(x, y, w, h),
                _ => {
                    warn!(segment = i + 1, "segment missing crop fields, skipping");
                    return None;
                }
            };
            let candidate = CropSegment {
                start_time,
                end_time,
                crop,
                detection_info: seg.detection_info.and_then(|d| {
                    Some(DetectionInfo {
                        num_faces: d.num_faces?,
                        roi_confidence: d.roi_confidence?,
                    })
                }),
            };
            if !candidate.is_usable() {
                warn!(segment = i + 1, "segment crop out of range, skipping");
                return None;
            }
            Some(candidate)
        })
        .collect();

    debug!(
        usable = segments.len(),
        skipped = total - segments.len(),
        "validated resize segments"
    );
    segments
}

/// HTTP client for the intelligent-resize service.
#[derive(Debug, Clone)]
pub struct ResizeClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl ResizeClient {
    /// Create a new client for the given service URL and credential.
    pub fn new(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token: auth_token.into(),
        }
    }

    /// Request crop segments for a video at the given target aspect ratio.
    ///
    /// Returns only segments that survived validation; an empty list is a
    /// valid (if useless) answer that the caller treats as stage failure.
    pub async fn request_crops(
        &self,
        video_path: impl AsRef<Path>,
        aspect: &AspectRatio,
    ) -> ResizeResult<Vec<CropSegment>> {
        let video_path = video_path.as_ref();
        let url = format!("{}/v1/resize", self.base_url);

        debug!(url = %url, video = %video_path.display(), "requesting crop segments");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.auth_token)
            .json(&ResizeRequest {
                video_path: &video_path.to_string_lossy(),
                aspect_ratio: [aspect.width, aspect.height],
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResizeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ResizeResponse = response
            .json()
            .await
            .map_err(|e| ResizeError::InvalidResponse(e.to_string()))?;

        Ok(validate_segments(parsed.segments))
    }
}
