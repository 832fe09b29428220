//! Crop geometry: pixel-space crop windows and the time-addressed crop
//! segments returned by the intelligent-resize service.

use serde::{Deserialize, Serialize};

use crate::aspect::AspectRatio;

/// Relative tolerance when checking that a window matches a target aspect.
/// Rounding a fractional target width to whole pixels shifts the ratio by
/// well under 1%.
pub const ASPECT_TOLERANCE: f64 = 0.01;

/// A crop window in source-pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropWindow {
    /// X coordinate of the top-left corner (pixels).
    pub x: f64,
    /// Y coordinate of the top-left corner (pixels).
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl CropWindow {
    /// Create a new crop window.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check that the window lies fully inside a frame of the given size.
    ///
    /// A half-pixel slack absorbs float rounding from fractional targets.
    pub fn fits_frame(&self, frame_width: u32, frame_height: u32) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width > 0.0
            && self.height > 0.0
            && self.x + self.width <= frame_width as f64 + 0.5
            && self.y + self.height <= frame_height as f64 + 0.5
    }

    /// Check that the window's aspect matches the target within tolerance.
    pub fn matches_aspect(&self, aspect: &AspectRatio) -> bool {
        if self.height <= 0.0 {
            return false;
        }
        let actual = self.width / self.height;
        let target = aspect.ratio();
        (actual - target).abs() / target <= ASPECT_TOLERANCE
    }
}

/// A normalized rectangle (0.0 to 1.0) relative to the frame.
///
/// The intelligent-resize service reports crops in these units so the same
/// answer applies regardless of the resolution the caller transcodes at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedRect {
    /// Create a new normalized rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if the rectangle is valid (within 0.0-1.0 range).
    pub fn is_valid(&self) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width > 0.0
            && self.height > 0.0
            && self.x + self.width <= 1.001 // small epsilon for float precision
            && self.y + self.height <= 1.001
    }
}

/// Detection diagnostics attached to a crop segment by the resize service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionInfo {
    /// Number of faces found in the segment.
    pub num_faces: u32,
    /// Confidence in the chosen region of interest (0.0-1.0).
    pub roi_confidence: f64,
}

/// One time-addressed crop decision from the intelligent-resize service.
///
/// Segments are ordered by start time and do not overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropSegment {
    /// Segment start in seconds.
    pub start_time: f64,
    /// Segment end in seconds.
    pub end_time: f64,
    /// Crop region in normalized frame coordinates.
    pub crop: NormalizedRect,
    /// Optional detection diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_info: Option<DetectionInfo>,
}

impl CropSegment {
    /// Segment duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// A segment is usable when its time range is forward and its crop valid.
    pub fn is_usable(&self) -> bool {
        self.start_time >= 0.0 && self.end_time > self.start_time && self.crop.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_fits_frame() {
        let w = CropWindow::new(100.0, 0.0, 608.0, 1080.0);
        assert!(w.fits_frame(1920, 1080));
        assert!(!w.fits_frame(640, 480));

        let overflow = CropWindow::new(1400.0, 0.0, 608.0, 1080.0);
        assert!(!overflow.fits_frame(1920, 1080));
    }

    #[test]
    fn test_window_aspect_tolerance() {
        // 608x1080 is the rounded 9:16 window for a 1080p frame.
        let w = CropWindow::new(0.0, 0.0, 608.0, 1080.0);
        assert!(w.matches_aspect(&AspectRatio::portrait()));

        let square = CropWindow::new(0.0, 0.0, 1080.0, 1080.0);
        assert!(!square.matches_aspect(&AspectRatio::portrait()));
    }

    #[test]
    fn test_normalized_rect_validity() {
        assert!(NormalizedRect::new(0.2, 0.0, 0.5, 1.0).is_valid());
        assert!(!NormalizedRect::new(0.6, 0.0, 0.5, 1.0).is_valid());
        assert!(!NormalizedRect::new(0.0, 0.0, 0.0, 1.0).is_valid());
        assert!(!NormalizedRect::new(-0.1, 0.0, 0.5, 1.0).is_valid());
    }

    #[test]
    fn test_segment_usability() {
        let ok = CropSegment {
            start_time: 0.0,
            end_time: 4.5,
            crop: NormalizedRect::new(0.25, 0.0, 0.5, 1.0),
            detection_info: None,
        };
        assert!(ok.is_usable());
        assert!((ok.duration() - 4.5).abs() < 1e-9);

        let backwards = CropSegment {
            end_time: 0.0,
            start_time: 4.5,
            ..ok.clone()
        };
        assert!(!backwards.is_usable());
    }

    #[test]
    fn test_segment_json_roundtrip_without_detection_info() {
        let json = r#"{"start_time":0.0,"end_time":2.0,"crop":{"x":0.1,"y":0.0,"width":0.5,"height":1.0}}"#;
        let seg: CropSegment = serde_json::from_str(json).unwrap();
        assert!(seg.detection_info.is_none());
        assert!(seg.is_usable());
    }
}
