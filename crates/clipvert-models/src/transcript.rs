//! Transcript words and clip candidates.
//!
//! Transcription and clip-boundary selection happen in an external
//! collaborator; its output reaches us as a JSON list of [`ClipCandidate`]
//! values with word-level timing.

use serde::{Deserialize, Serialize};

/// A single transcribed word with absolute source-video timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    pub text: String,
    /// Word start in seconds from the start of the source video.
    pub start_time: f64,
    /// Word end in seconds from the start of the source video.
    pub end_time: f64,
}

/// A candidate clip range selected by the external clip finder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipCandidate {
    /// Clip start in seconds.
    pub start_time: f64,
    /// Clip end in seconds.
    pub end_time: f64,
    /// Words overlapping the clip range, used for subtitle generation.
    #[serde(default)]
    pub words: Vec<TranscriptWord>,
}

impl ClipCandidate {
    /// Clip duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}
