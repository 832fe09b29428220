//! Heat map aggregation.
//!
//! Fuses per-frame face rectangles and saliency maps into one spatial
//! importance map for the whole video. Face rectangles are painted filled
//! at a constant weight; the saliency map is min-max normalized per frame
//! and scaled into `[0, w_sal]` before being added. The sum is divided by
//! the number of contributing frames so every sample frame carries equal
//! influence regardless of its scene's duration.

use ndarray::Array2;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

use super::faces::FaceRegion;

/// Dense per-pixel importance map at source-frame resolution.
///
/// Mutable only while the aggregator builds it; the selector reads it.
#[derive(Debug, Clone)]
pub struct HeatMap {
    /// Row-major values, shape `(height, width)`.
    data: Array2<f32>,
}

impl HeatMap {
    /// Create an all-zero heat map.
    pub fn zeros(width: u32, height: u32) -> Self {
        Self {
            data: Array2::zeros((height as usize, width as usize)),
        }
    }

    /// Map width in pixels.
    pub fn width(&self) -> u32 {
        self.data.ncols() as u32
    }

    /// Map height in pixels.
    pub fn height(&self) -> u32 {
        self.data.nrows() as u32
    }

    /// Value at a pixel position.
    pub fn value_at(&self, x: u32, y: u32) -> f32 {
        self.data[(y as usize, x as usize)]
    }

    /// Largest value in the map.
    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }

    /// Paint a filled rectangle at the given weight, clamped to bounds.
    ///
    /// Painting saturates at `weight`, so overlapping rectangles in one
    /// frame contribute the weight once rather than stacking.
    pub fn paint_rect(&mut self, region: &FaceRegion, weight: f32) {
        let x0 = region.x.min(self.width()) as usize;
        let y0 = region.y.min(self.height()) as usize;
        let x1 = (region.x.saturating_add(region.width)).min(self.width()) as usize;
        let y1 = (region.y.saturating_add(region.height)).min(self.height()) as usize;

        for y in y0..y1 {
            for x in x0..x1 {
                self.data[(y, x)] = self.data[(y, x)].max(weight);
            }
        }
    }

    /// Add a saliency map scaled into `[0, ceiling]` after per-frame
    /// min-max normalization. A flat map contributes nothing.
    pub fn add_normalized(&mut self, map: &Array2<f32>, ceiling: f32) {
        if map.dim() != self.data.dim() {
            warn!(
                "saliency map {:?} does not match heat map {:?}, skipping",
                map.dim(),
                self.data.dim()
            );
            return;
        }
        let min = map.iter().copied().fold(f32::INFINITY, f32::min);
        let max = map.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        if !(max > min) {
            return;
        }
        let scale = ceiling / (max - min);
        self.data.zip_mut_with(map, |h, &v| *h += (v - min) * scale);
    }

    /// Elementwise add another map of the same dimensions.
    fn accumulate(&mut self, other: &HeatMap) {
        self.data.zip_mut_with(&other.data, |a, &b| *a += b);
    }

    /// Divide every value by `n`.
    fn divide(&mut self, n: f32) {
        self.data.mapv_inplace(|v| v / n);
    }

    /// Precompute the summed-area table for O(1) window sums.
    pub fn integral(&self) -> IntegralImage {
        let (rows, cols) = self.data.dim();
        let mut sums = Array2::<f64>::zeros((rows + 1, cols + 1));
        for y in 0..rows {
            let mut row_sum = 0.0f64;
            for x in 0..cols {
                row_sum += self.data[(y, x)] as f64;
                sums[(y + 1, x + 1)] = sums[(y, x + 1)] + row_sum;
            }
        }
        IntegralImage { sums }
    }
}

/// Summed-area table over a heat map.
#[derive(Debug, Clone)]
pub struct IntegralImage {
    /// Shape `(height + 1, width + 1)`; `sums[(y, x)]` is the sum over
    /// the rectangle `[0, y) x [0, x)`.
    sums: Array2<f64>,
}

impl IntegralImage {
    /// Sum of heat values strictly inside the window.
    pub fn window_sum(&self, x: u32, y: u32, width: u32, height: u32) -> f64 {
        let (x0, y0) = (x as usize, y as usize);
        let x1 = (x0 + width as usize).min(self.sums.ncols() - 1);
        let y1 = (y0 + height as usize).min(self.sums.nrows() - 1);
        self.sums[(y1, x1)] - self.sums[(y0, x1)] - self.sums[(y1, x0)] + self.sums[(y0, x0)]
    }
}

/// Per-frame signals feeding the aggregator.
#[derive(Debug, Clone, Default)]
pub struct FrameSignals {
    /// Detected face rectangles.
    pub faces: Vec<FaceRegion>,
    /// Saliency map at frame resolution, when the scorer produced one.
    pub saliency: Option<Array2<f32>>,
}

/// Fuse per-frame signals into one heat map.
///
/// Fails with `InsufficientSignal` when no frames contributed at all; a
/// frame with no faces and no saliency still counts as a (zero)
/// contribution, keeping the normalization honest.
pub fn aggregate_heat_map(
    frames: &[FrameSignals],
    width: u32,
    height: u32,
    face_weight: f32,
    saliency_weight: f32,
) -> MediaResult<HeatMap> {
    if frames.is_empty() {
        return Err(MediaError::InsufficientSignal);
    }
    if width == 0 || height == 0 {
        return Err(MediaError::InvalidVideo(
            "zero-sized frame for heat map".to_string(),
        ));
    }

    let mut heat = HeatMap::zeros(width, height);
    for signals in frames {
        let mut frame_map = HeatMap::zeros(width, height);
        for face in &signals.faces {
            frame_map.paint_rect(face, face_weight);
        }
        if let Some(saliency) = &signals.saliency {
            frame_map.add_normalized(saliency, saliency_weight);
        }
        heat.accumulate(&frame_map);
    }
    heat.divide(frames.len() as f32);

    debug!(
        frames = frames.len(),
        peak = heat.max_value(),
        "aggregated heat map"
    );
    Ok(heat)
}
