//! Crop window selection.
//!
//! Slides a target-aspect window horizontally across the aggregated heat
//! map and picks the position with the highest total heat. The window
//! keeps the full source height whenever the source is wide enough, so
//! the slide is one-dimensional; ties resolve to the leftmost position.

use tracing::debug;

use clipvert_models::{AspectRatio, CropWindow};

use crate::error::{MediaError, MediaResult};

use super::heatmap::HeatMap;

/// Target crop dimensions for a source frame, preserving height when the
/// source is wide enough and width otherwise.
pub fn portrait_target_dims(width: u32, height: u32, aspect: &AspectRatio) -> (u32, u32) {
    let ratio = aspect.ratio();
    let target_width = (height as f64 * ratio).round() as u32;
    if target_width <= width {
        (target_width, height)
    } else {
        let target_height = (width as f64 / ratio).round() as u32;
        (width, target_height)
    }
}

/// Pick the crop window maximizing total heat.
///
/// The slide step is a tenth of the slack by default (`search_steps`
/// positions), with the rightmost position always evaluated so the full
/// range is covered. Comparison is strictly greater, which makes the
/// leftmost best window win ties.
pub fn select_crop_window(
    heat: &HeatMap,
    aspect: &AspectRatio,
    search_steps: u32,
) -> MediaResult<CropWindow> {
    let (width, height) = (heat.width(), heat.height());
    if width == 0 || height == 0 {
        return Err(MediaError::invalid_crop("empty heat map"));
    }

    let (target_width, target_height) = portrait_target_dims(width, height, aspect);
    let slack = width - target_width;
    let step = (slack / search_steps.max(1)).max(1);

    let integral = heat.integral();
    let mut best_x = 0u32;
    let mut best_sum = f64::NEG_INFINITY;

    let mut x = 0u32;
    loop {
        let sum = integral.window_sum(x, 0, target_width, target_height);
        if sum > best_sum {
            best_sum = sum;
            best_x = x;
        }
        if x >= slack {
            break;
        }
        x = (x + step).min(slack);
    }

    let window = CropWindow {
        x: best_x as f64,
        y: 0.0,
        width: target_width as f64,
        height: target_height as f64,
    };
    if !window.fits_frame(width, height) {
        return Err(MediaError::invalid_crop(format!(
            "window {}x{}+{}+0 exceeds frame {}x{}",
            target_width, target_height, best_x, width, height
        )));
    }
    if !window.matches_aspect(aspect) {
        return Err(MediaError::invalid_crop(format!(
            "window {}x{} misses aspect {}:{}",
            target_width, target_height, aspect.width, aspect.height
        )));
    }

    debug!(x = best_x, sum = best_sum, "selected crop window");
    Ok(window)
}
