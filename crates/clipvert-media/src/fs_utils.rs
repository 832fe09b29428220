//! Filesystem utilities for atomic output publishing.
//!
//! Final clip files must never exist half-written at their published path;
//! encoders write to a staging name and the rename here publishes the
//! finished file, falling back to copy-and-rename across filesystems.

use std::path::Path;
use tokio::fs;

use crate::error::{MediaError, MediaResult};

/// Publish `src` at `dst` atomically.
///
/// Attempts a rename first; on EXDEV (cross-device link) copies to a temp
/// name beside `dst` and renames on the destination filesystem, so `dst`
/// only ever appears complete.
pub async fn publish_atomic(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> MediaResult<()> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    if let Some(parent) = dst.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    match fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_error(&e) => {
            tracing::debug!(
                "cross-device publish, copying: {} -> {}",
                src.display(),
                dst.display()
            );
            copy_then_rename(src, dst).await
        }
        Err(e) => Err(MediaError::from(e)),
    }
}

/// Check if an IO error is EXDEV (cross-device link).
fn is_cross_device_error(e: &std::io::Error) -> bool {
    // EXDEV is error code 18 on Linux/macOS
    e.raw_os_error() == Some(18)
}

async fn copy_then_rename(src: &Path, dst: &Path) -> MediaResult<()> {
    let tmp_dst = dst.with_extension("publish.tmp");

    fs::copy(src, &tmp_dst).await?;

    if let Err(e) = fs::rename(&tmp_dst, dst).await {
        let _ = fs::remove_file(&tmp_dst).await;
        return Err(MediaError::from(e));
    }

    if let Err(e) = fs::remove_file(src).await {
        tracing::warn!(
            "failed to remove staging file after publish: {}: {}",
            src.display(),
            e
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_publish_same_filesystem() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("staging.mp4");
        let dst = dir.path().join("final.mp4");

        fs::write(&src, b"encoded").await.unwrap();
        publish_atomic(&src, &dst).await.unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dst).await.unwrap(), b"encoded");
    }

    #[tokio::test]
    async fn test_publish_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("staging.mp4");
        let dst = dir.path().join("vertical").join("final.mp4");

        fs::write(&src, b"encoded").await.unwrap();
        publish_atomic(&src, &dst).await.unwrap();

        assert!(dst.exists());
    }

    #[tokio::test]
    async fn test_publish_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("staging.mp4");
        let dst = dir.path().join("final.mp4");

        fs::write(&src, b"new").await.unwrap();
        fs::write(&dst, b"old").await.unwrap();
        publish_atomic(&src, &dst).await.unwrap();

        assert_eq!(fs::read(&dst).await.unwrap(), b"new");
    }

    #[test]
    fn test_is_cross_device_error() {
        assert!(is_cross_device_error(&std::io::Error::from_raw_os_error(
            18
        )));
        assert!(!is_cross_device_error(&std::io::Error::from_raw_os_error(
            2
        )));
    }
}
