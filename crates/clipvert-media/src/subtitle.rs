//! SRT subtitle generation for extracted clips.
//!
//! Takes the word timings supplied by the external transcript collaborator,
//! groups them into short blocks, and writes a plain SRT file next to the
//! clip. Formatting only; styling is out of scope.

use std::path::Path;
use tracing::debug;

use clipvert_models::TranscriptWord;

use crate::error::MediaResult;

/// Words per subtitle line.
pub const DEFAULT_WORDS_PER_LINE: usize = 4;

/// One subtitle block with times relative to the clip start.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleBlock {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Group transcript words overlapping `[clip_start, clip_end]` into blocks
/// of `words_per_line`, shifting times to be clip-relative (clamped at 0).
pub fn build_subtitle_blocks(
    words: &[TranscriptWord],
    clip_start: f64,
    clip_end: f64,
    words_per_line: usize,
) -> Vec<SubtitleBlock> {
    let words_per_line = words_per_line.max(1);

    let in_range: Vec<&TranscriptWord> = words
        .iter()
        .filter(|w| {
            (clip_start <= w.start_time && w.start_time <= clip_end)
                || (clip_start <= w.end_time && w.end_time <= clip_end)
                || (w.start_time <= clip_start && w.end_time >= clip_end)
        })
        .collect();

    let mut blocks = Vec::new();
    for chunk in in_range.chunks(words_per_line) {
        let first = match chunk.first() {
            Some(w) => w,
            None => continue,
        };
        let last = chunk.last().unwrap_or(first);
        let text = chunk
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        blocks.push(SubtitleBlock {
            start: (first.start_time - clip_start).max(0.0),
            end: (last.end_time - clip_start).max(0.0),
            text,
        });
    }
    blocks
}

/// Render subtitle blocks as SRT text.
pub fn format_srt(blocks: &[SubtitleBlock]) -> String {
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_srt_timestamp(block.start),
            format_srt_timestamp(block.end),
            block.text
        ));
    }
    out
}

/// Write an SRT file for the given blocks. Zero blocks writes nothing and
/// reports it, since an empty subtitle file helps nobody.
pub async fn write_srt(path: impl AsRef<Path>, blocks: &[SubtitleBlock]) -> MediaResult<bool> {
    let path = path.as_ref();
    if blocks.is_empty() {
        debug!("no words in clip range, skipping {}", path.display());
        return Ok(false);
    }
    tokio::fs::write(path, format_srt(blocks)).await?;
    Ok(true)
}

/// Format seconds as `HH:MM:SS,mmm`.
///
/// Rounds to whole milliseconds up front; deriving the fields from one
/// integer keeps values stored just below their decimal (3723.004 is
/// 3723.003999...) from truncating to the wrong millisecond.
fn format_srt_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: f64, end: f64) -> TranscriptWord {
        TranscriptWord {
            text: text.to_string(),
            start_time: start,
            end_time: end,
        }
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(format_srt_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_srt_timestamp(61.25), "00:01:01,250");
        assert_eq!(format_srt_timestamp(3723.004), "01:02:03,004");
    }

    #[test]
    fn test_timestamp_rounds_milliseconds() {
        // Values stored just under their decimal must not truncate down,
        // and sub-millisecond remainders carry into the seconds field.
        assert_eq!(format_srt_timestamp(0.999), "00:00:00,999");
        assert_eq!(format_srt_timestamp(1.9999), "00:00:02,000");
        assert_eq!(format_srt_timestamp(59.9996), "00:01:00,000");
    }

    #[test]
    fn test_blocks_group_by_word_count() {
        let words: Vec<TranscriptWord> = (0..6)
            .map(|i| word("w", 10.0 + i as f64, 10.5 + i as f64))
            .collect();
        let blocks = build_subtitle_blocks(&words, 10.0, 20.0, 4);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "w w w w");
        assert_eq!(blocks[1].text, "w w");
    }

    #[test]
    fn test_blocks_are_clip_relative_and_clamped() {
        // A word straddling the clip start gets clamped to 0.
        let words = vec![word("hello", 9.5, 10.4), word("there", 10.5, 11.0)];
        let blocks = build_subtitle_blocks(&words, 10.0, 20.0, 4);
        assert_eq!(blocks.len(), 1);
        assert!((blocks[0].start - 0.0).abs() < 1e-9);
        assert!((blocks[0].end - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_words_outside_range_excluded() {
        let words = vec![word("early", 1.0, 2.0), word("inside", 11.0, 12.0)];
        let blocks = build_subtitle_blocks(&words, 10.0, 20.0, 4);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "inside");
    }

    #[test]
    fn test_format_srt_layout() {
        let blocks = vec![SubtitleBlock {
            start: 0.0,
            end: 1.5,
            text: "hello there".to_string(),
        }];
        let srt = format_srt(&blocks);
        assert_eq!(srt, "1\n00:00:00,000 --> 00:00:01,500\nhello there\n\n");
    }

    #[tokio::test]
    async fn test_write_srt_skips_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("clip.srt");
        let written = write_srt(&path, &[]).await.unwrap();
        assert!(!written);
        assert!(!path.exists());
    }
}
