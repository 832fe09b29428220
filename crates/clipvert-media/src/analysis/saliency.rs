//! Static saliency estimation for a single frame.
//!
//! Approximates a fine-grained static saliency model with the gradient
//! magnitude of the luminance channel: edges and texture contrast are what
//! drag the eye in a still frame. The result is min-max normalized into
//! `[0, 1]` at frame resolution.

use image::GrayImage;
use imageproc::gradients::sobel_gradients;
use ndarray::Array2;

/// Compute a per-pixel saliency map in `[0, 1]` for a luminance frame.
///
/// Returns `None` when the frame is too small to carry gradients; callers
/// treat that as an all-zero contribution rather than a batch failure.
pub fn saliency_map(luma: &GrayImage) -> Option<Array2<f32>> {
    let (width, height) = luma.dimensions();
    if width < 3 || height < 3 {
        return None;
    }

    let gradients = sobel_gradients(luma);
    let mut map = Array2::<f32>::zeros((height as usize, width as usize));
    for (x, y, pixel) in gradients.enumerate_pixels() {
        map[(y as usize, x as usize)] = pixel.0[0] as f32;
    }

    let max = map.iter().copied().fold(0.0f32, f32::max);
    if max > 0.0 {
        map.mapv_inplace(|v| v / max);
    }
    Some(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_tiny_frame_yields_none() {
        let luma = GrayImage::new(2, 2);
        assert!(saliency_map(&luma).is_none());
    }

    #[test]
    fn test_flat_frame_is_all_zero() {
        let luma = GrayImage::from_pixel(16, 16, Luma([128u8]));
        let map = saliency_map(&luma).unwrap();
        assert!(map.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_edge_is_salient_and_normalized() {
        // Left half black, right half white: the vertical edge dominates.
        let luma = GrayImage::from_fn(16, 16, |x, _| {
            if x < 8 {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        });
        let map = saliency_map(&luma).unwrap();

        let peak = map.iter().copied().fold(0.0f32, f32::max);
        assert!((peak - 1.0).abs() < 1e-6);

        // The edge column is strictly more salient than the flat interior.
        assert!(map[(8, 8)] > map[(8, 2)]);
        assert!(map.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}
