//! Landscape clip extraction.
//!
//! Cuts the selected time range out of the source video with the
//! high-quality profile. This landscape cut is also the fallback artifact
//! when the portrait cropping cascade later fails.

use std::path::Path;
use tracing::info;

use clipvert_models::EncodingConfig;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::fs_utils::publish_atomic;

/// Extract a clip from a video file, publishing the output atomically.
pub async fn extract_clip(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    start_time: f64,
    end_time: f64,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();
    let duration = end_time - start_time;

    info!(
        "Extracting clip: {} -> {} ({:.2}s to {:.2}s, {:.2}s)",
        input.display(),
        output.display(),
        start_time,
        end_time,
        duration
    );

    let staging = staging_path(output);
    let cmd = FfmpegCommand::new(input, &staging)
        .seek(start_time)
        .duration(duration)
        .encoding(encoding)
        .strip_metadata();

    let result = FfmpegRunner::new().run(&cmd).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(&staging).await;
        return result;
    }

    publish_atomic(&staging, output).await
}

/// Staging name next to the final output so the publish rename stays on one
/// filesystem.
pub(crate) fn staging_path(output: &Path) -> std::path::PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output.mp4".to_string());
    name.insert_str(0, ".partial-");
    output.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_staging_path_stays_in_directory() {
        let out = PathBuf::from("/clips/vertical/clip_1.mp4");
        let staging = staging_path(&out);
        assert_eq!(staging.parent(), out.parent());
        assert_eq!(
            staging.file_name().unwrap().to_string_lossy(),
            ".partial-clip_1.mp4"
        );
    }
}
