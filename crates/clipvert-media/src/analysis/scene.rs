//! Scene segmentation.
//!
//! Divides the frame timeline into scene-homogeneous intervals by running
//! a luminance-histogram content detector over downscaled fixed-rate
//! samples. A cut is declared where the histogram similarity of
//! consecutive samples drops below the threshold. Degenerate results
//! (zero detected scenes, or more than the cap) collapse to a single
//! interval spanning the whole video.

use std::path::Path;

use image::GrayImage;
use tracing::{debug, info};

use clipvert_models::{normalize_scenes, scenes_from_cuts, CropAnalysisConfig, SceneInterval};

use crate::error::{MediaError, MediaResult};
use crate::probe::VideoInfo;

use super::sampling::sample_at_rate;

/// Histogram bins for frame comparison.
const HISTOGRAM_BINS: usize = 64;

/// Detect scene intervals covering `[0, total_frames)`.
pub async fn detect_scenes(
    video: impl AsRef<Path>,
    info: &VideoInfo,
    config: &CropAnalysisConfig,
    workdir: &Path,
) -> MediaResult<Vec<SceneInterval>> {
    let video = video.as_ref();

    if info.total_frames == 0 {
        return Err(MediaError::decode(format!(
            "no frames in {}",
            video.display()
        )));
    }

    let sample_dir = workdir.join("scene_samples");
    tokio::fs::create_dir_all(&sample_dir).await?;

    let samples = sample_at_rate(
        video,
        config.scene_sample_fps,
        Some(config.scene_downscale_width),
        &sample_dir,
    )
    .await
    .map_err(|e| match e {
        MediaError::NoFramesAvailable => {
            MediaError::decode(format!("no scene samples from {}", video.display()))
        }
        other => other,
    })?;

    let histograms: Vec<Vec<f32>> = samples
        .iter()
        .map(|s| luma_histogram(&s.image.to_luma8()))
        .collect();

    let cut_samples = detect_cut_samples(&histograms, config.scene_threshold);
    let cuts: Vec<u64> = cut_samples
        .iter()
        .map(|&i| sample_to_frame(i, info.fps, config.scene_sample_fps))
        .collect();

    let detected = scenes_from_cuts(&cuts, info.total_frames);
    debug!(
        samples = samples.len(),
        cuts = cuts.len(),
        scenes = detected.len(),
        "scene detection pass"
    );

    let scenes = normalize_scenes(detected, info.total_frames, config.max_scenes);
    if scenes.len() == 1 && !cuts.is_empty() {
        info!("scene list collapsed to a single interval");
    }
    Ok(scenes)
}

/// Indices of samples that open a new scene.
///
/// Sample `i` is a cut when its histogram's similarity to sample `i - 1`
/// falls below `threshold`.
pub fn detect_cut_samples(histograms: &[Vec<f32>], threshold: f32) -> Vec<usize> {
    histograms
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| histogram_intersection(&pair[0], &pair[1]) < threshold as f64)
        .map(|(i, _)| i + 1)
        .collect()
}

/// Map a sample index to a source frame index.
pub fn sample_to_frame(sample_index: usize, source_fps: f64, sample_fps: f64) -> u64 {
    if sample_fps <= 0.0 {
        return 0;
    }
    (sample_index as f64 * source_fps / sample_fps).round() as u64
}

/// Normalized luminance histogram (sums to 1 for a non-empty image).
pub fn luma_histogram(luma: &GrayImage) -> Vec<f32> {
    let mut bins = vec![0.0f32; HISTOGRAM_BINS];
    let pixels = luma.as_raw();
    if pixels.is_empty() {
        return bins;
    }
    let scale = HISTOGRAM_BINS as f32 / 256.0;
    for &p in pixels {
        bins[(p as f32 * scale) as usize] += 1.0;
    }
    let total = pixels.len() as f32;
    for bin in &mut bins {
        *bin /= total;
    }
    bins
}

/// Histogram intersection similarity in `[0, 1]`; 1 means identical.
pub fn histogram_intersection(h1: &[f32], h2: &[f32]) -> f64 {
    if h1.len() != h2.len() || h1.is_empty() {
        return 0.0;
    }

    let mut intersection = 0.0f64;
    let mut sum1 = 0.0f64;
    let mut sum2 = 0.0f64;
    for (a, b) in h1.iter().zip(h2.iter()) {
        intersection += (*a as f64).min(*b as f64);
        sum1 += *a as f64;
        sum2 += *b as f64;
    }

    let denominator = sum1.min(sum2);
    if denominator > 0.0 {
        intersection / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_histogram_intersection_identical() {
        let h = vec![0.25, 0.25, 0.25, 0.25];
        assert!((histogram_intersection(&h, &h) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_histogram_intersection_disjoint() {
        let h1 = vec![1.0, 0.0, 0.0, 0.0];
        let h2 = vec![0.0, 0.0, 0.0, 1.0];
        assert!(histogram_intersection(&h1, &h2) < 0.01);
    }

    #[test]
    fn test_luma_histogram_normalized() {
        let dark = GrayImage::from_pixel(8, 8, Luma([10u8]));
        let hist = luma_histogram(&dark);
        assert!((hist.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!((hist[2] - 1.0).abs() < 1e-5); // 10 * 64 / 256 = 2
    }

    #[test]
    fn test_detect_cut_samples_flags_content_change() {
        let dark = luma_histogram(&GrayImage::from_pixel(8, 8, Luma([10u8])));
        let bright = luma_histogram(&GrayImage::from_pixel(8, 8, Luma([240u8])));

        let hists = vec![dark.clone(), dark.clone(), bright.clone(), bright];
        let cuts = detect_cut_samples(&hists, 0.6);
        assert_eq!(cuts, vec![2]);
    }

    #[test]
    fn test_detect_cut_samples_stable_content() {
        let dark = luma_histogram(&GrayImage::from_pixel(8, 8, Luma([10u8])));
        let hists = vec![dark.clone(), dark.clone(), dark];
        assert!(detect_cut_samples(&hists, 0.6).is_empty());
    }

    #[test]
    fn test_sample_to_frame() {
        // 1 fps sampling of a 30 fps source: sample 2 is frame 60.
        assert_eq!(sample_to_frame(2, 30.0, 1.0), 60);
        assert_eq!(sample_to_frame(3, 29.97, 1.0), 90);
    }
}
