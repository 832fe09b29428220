//! Scene intervals produced by the scene segmenter.

use serde::{Deserialize, Serialize};

/// Default cap on detected scenes before collapsing to a single interval.
///
/// Noisy detections past this point cost more per-scene analysis than the
/// extra samples are worth.
pub const DEFAULT_MAX_SCENES: usize = 20;

/// A half-open frame interval `[start_frame, end_frame)` of visually
/// homogeneous content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneInterval {
    pub start_frame: u64,
    pub end_frame: u64,
}

impl SceneInterval {
    /// Create a new scene interval.
    pub fn new(start_frame: u64, end_frame: u64) -> Self {
        Self {
            start_frame,
            end_frame,
        }
    }

    /// Number of frames in the interval.
    pub fn len(&self) -> u64 {
        self.end_frame.saturating_sub(self.start_frame)
    }

    /// True when the interval contains no frames.
    pub fn is_empty(&self) -> bool {
        self.end_frame <= self.start_frame
    }

    /// The temporal midpoint frame index, sampled by the frame sampler.
    pub fn midpoint_frame(&self) -> u64 {
        (self.start_frame + self.end_frame) / 2
    }
}

/// Build contiguous scene intervals from detected cut frame indices.
///
/// Cut indices outside `(0, total_frames)` are ignored; duplicates are
/// collapsed. The result always covers `[0, total_frames)` exactly.
pub fn scenes_from_cuts(cuts: &[u64], total_frames: u64) -> Vec<SceneInterval> {
    if total_frames == 0 {
        return Vec::new();
    }

    let mut boundaries: Vec<u64> = cuts
        .iter()
        .copied()
        .filter(|&c| c > 0 && c < total_frames)
        .collect();
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut scenes = Vec::with_capacity(boundaries.len() + 1);
    let mut start = 0;
    for cut in boundaries {
        scenes.push(SceneInterval::new(start, cut));
        start = cut;
    }
    scenes.push(SceneInterval::new(start, total_frames));
    scenes
}

/// Apply the scene-count collapse rule.
///
/// Zero detected scenes means there is nothing to sample per scene; more
/// than `max_scenes` means the detector fragmented a noisy video. Both
/// degrade to one interval spanning the whole frame range.
pub fn normalize_scenes(
    scenes: Vec<SceneInterval>,
    total_frames: u64,
    max_scenes: usize,
) -> Vec<SceneInterval> {
    let usable: Vec<SceneInterval> = scenes.into_iter().filter(|s| !s.is_empty()).collect();

    if usable.is_empty() || usable.len() > max_scenes {
        return vec![SceneInterval::new(0, total_frames)];
    }
    usable
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenes_from_cuts_contiguous() {
        let scenes = scenes_from_cuts(&[120, 48, 300], 360);
        assert_eq!(
            scenes,
            vec![
                SceneInterval::new(0, 48),
                SceneInterval::new(48, 120),
                SceneInterval::new(120, 300),
                SceneInterval::new(300, 360),
            ]
        );
        // Half-open and contiguous: each end is the next start.
        for pair in scenes.windows(2) {
            assert_eq!(pair[0].end_frame, pair[1].start_frame);
        }
    }

    #[test]
    fn test_scenes_from_cuts_ignores_out_of_range() {
        let scenes = scenes_from_cuts(&[0, 500, 100], 360);
        assert_eq!(
            scenes,
            vec![SceneInterval::new(0, 100), SceneInterval::new(100, 360)]
        );
    }

    #[test]
    fn test_no_cuts_yields_single_scene() {
        assert_eq!(scenes_from_cuts(&[], 360), vec![SceneInterval::new(0, 360)]);
    }

    #[test]
    fn test_normalize_collapses_empty() {
        let scenes = normalize_scenes(Vec::new(), 360, DEFAULT_MAX_SCENES);
        assert_eq!(scenes, vec![SceneInterval::new(0, 360)]);
    }

    #[test]
    fn test_normalize_collapses_over_cap() {
        let fragmented: Vec<SceneInterval> = (0..30)
            .map(|i| SceneInterval::new(i * 10, (i + 1) * 10))
            .collect();
        let scenes = normalize_scenes(fragmented, 300, DEFAULT_MAX_SCENES);
        assert_eq!(scenes, vec![SceneInterval::new(0, 300)]);
    }

    #[test]
    fn test_normalize_keeps_reasonable_counts() {
        let scenes = vec![SceneInterval::new(0, 100), SceneInterval::new(100, 300)];
        assert_eq!(
            normalize_scenes(scenes.clone(), 300, DEFAULT_MAX_SCENES),
            scenes
        );
    }

    #[test]
    fn test_midpoint_frame() {
        assert_eq!(SceneInterval::new(0, 100).midpoint_frame(), 50);
        assert_eq!(SceneInterval::new(48, 120).midpoint_frame(), 84);
    }
}
