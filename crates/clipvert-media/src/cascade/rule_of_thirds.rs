//! Rule-of-thirds fallback strategy.
//!
//! Last resort: a fixed filter chain that scales to portrait height and
//! center-crops with a top bias. Needs no probe and no analysis, so it
//! only fails when ffmpeg itself does.

use async_trait::async_trait;

use crate::clip::staging_path;
use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::fs_utils::publish_atomic;

use super::{CropStrategy, StageContext};

/// Scale to 1920 tall, crop a centered 9:16 window anchored to the top.
pub const RULE_OF_THIRDS_FILTER: &str = "scale=-2:1920,crop=ih*(9/16):ih:iw/2-ih*(9/16)/2:0";

/// Fixed-filter fallback strategy.
#[derive(Default)]
pub struct RuleOfThirdsCrop;

impl RuleOfThirdsCrop {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CropStrategy for RuleOfThirdsCrop {
    fn name(&self) -> &'static str {
        "rule-of-thirds"
    }

    async fn attempt(&self, ctx: &StageContext<'_>) -> MediaResult<()> {
        let request = ctx.request;

        let staging = staging_path(&request.output);
        let cmd = FfmpegCommand::new(&request.input, &staging)
            .video_filter(RULE_OF_THIRDS_FILTER)
            .encoding(&request.encoding)
            .strip_metadata();

        if let Err(e) = FfmpegRunner::new().run(&cmd).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e);
        }
        publish_atomic(&staging, &request.output).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_is_resolution_independent() {
        // The chain references only ih/iw, never absolute pixel sizes.
        assert!(!RULE_OF_THIRDS_FILTER.contains("1080"));
        assert!(RULE_OF_THIRDS_FILTER.contains("ih*(9/16)"));
    }
}
