//! Portrait crop cascade.
//!
//! Orders the available crop strategies from most to least content-aware
//! and runs them until one publishes an output. A strategy failure is
//! logged and the next strategy tried; only when every strategy has
//! failed does the cascade itself fail.

pub mod content_aware;
pub mod heuristic;
pub mod remote;
pub mod rule_of_thirds;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};

use clipvert_models::{AspectRatio, CropAnalysisConfig, EncodingConfig};
use clipvert_resize_client::ResizeClient;

use crate::error::{MediaError, MediaResult};

pub use content_aware::ContentAwareCrop;
pub use heuristic::HeuristicCrop;
pub use remote::RemoteResizeCrop;
pub use rule_of_thirds::RuleOfThirdsCrop;

/// One portrait conversion request.
#[derive(Debug, Clone)]
pub struct StageRequest {
    /// Source video (typically an already-extracted landscape clip).
    pub input: PathBuf,
    /// Final output path; strategies publish here atomically.
    pub output: PathBuf,
    /// Encoding profile applied by every transcoding strategy.
    pub encoding: EncodingConfig,
    /// Target aspect.
    pub aspect: AspectRatio,
}

/// Per-run context handed to each strategy attempt.
pub struct StageContext<'a> {
    /// The conversion request.
    pub request: &'a StageRequest,
    /// Scratch directory, removed when the cascade run ends.
    pub workdir: &'a Path,
}

/// A single crop strategy in the cascade.
#[async_trait]
pub trait CropStrategy: Send + Sync {
    /// Stable strategy name for logs and run summaries.
    fn name(&self) -> &'static str;

    /// Try to produce the portrait output. On success the output file
    /// exists at `ctx.request.output`.
    async fn attempt(&self, ctx: &StageContext<'_>) -> MediaResult<()>;
}

/// Optional capabilities that decide which strategies join the cascade.
#[derive(Default)]
pub struct CascadeCapabilities {
    /// Client for the remote intelligent-resize service, when configured.
    pub resize_client: Option<ResizeClient>,
    /// Path to the face classifier model, when available.
    pub face_model: Option<PathBuf>,
    /// Analysis tunables shared by the local strategies.
    pub config: CropAnalysisConfig,
}

/// Ordered strategy chain.
pub struct CropCascade {
    strategies: Vec<Box<dyn CropStrategy>>,
}

impl CropCascade {
    /// Build the standard chain from the available capabilities.
    ///
    /// Remote resize joins only when a client is configured; the
    /// content-aware stage always joins and degrades internally when the
    /// face model is absent. The heuristic and rule-of-thirds stages are
    /// unconditional.
    pub fn standard(capabilities: CascadeCapabilities) -> Self {
        let mut strategies: Vec<Box<dyn CropStrategy>> = Vec::with_capacity(4);
        if let Some(client) = capabilities.resize_client {
            strategies.push(Box::new(RemoteResizeCrop::new(client)));
        }
        strategies.push(Box::new(ContentAwareCrop::new(
            capabilities.config.clone(),
            capabilities.face_model,
        )));
        strategies.push(Box::new(HeuristicCrop::new()));
        strategies.push(Box::new(RuleOfThirdsCrop::new()));
        Self { strategies }
    }

    /// Build a cascade from an explicit strategy list.
    pub fn with_strategies(strategies: Vec<Box<dyn CropStrategy>>) -> Self {
        Self { strategies }
    }

    /// Run the cascade, returning the name of the winning strategy.
    pub async fn run(&self, request: &StageRequest) -> MediaResult<&'static str> {
        if !request.input.exists() {
            return Err(MediaError::FileNotFound(request.input.clone()));
        }

        // One scratch directory per run; dropped (and removed) on every
        // exit path.
        let workdir = tempfile::tempdir()?;
        let ctx = StageContext {
            request,
            workdir: workdir.path(),
        };

        for strategy in &self.strategies {
            info!(strategy = strategy.name(), "attempting portrait crop");
            match strategy.attempt(&ctx).await {
                Ok(()) => {
                    info!(
                        strategy = strategy.name(),
                        output = %request.output.display(),
                        "portrait crop succeeded"
                    );
                    return Ok(strategy.name());
                }
                Err(e) => {
                    warn!(strategy = strategy.name(), "strategy failed: {}", e);
                }
            }
        }

        Err(MediaError::AllStrategiesExhausted(request.input.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    struct FixedStrategy {
        name: &'static str,
        succeed: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CropStrategy for FixedStrategy {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn attempt(&self, ctx: &StageContext<'_>) -> MediaResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                tokio::fs::write(&ctx.request.output, b"video").await?;
                Ok(())
            } else {
                Err(MediaError::InsufficientSignal)
            }
        }
    }

    fn request_in(dir: &TempDir) -> StageRequest {
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"src").unwrap();
        StageRequest {
            input,
            output: dir.path().join("out.mp4"),
            encoding: EncodingConfig::default(),
            aspect: AspectRatio::portrait(),
        }
    }

    #[tokio::test]
    async fn test_first_success_stops_the_chain() {
        let dir = TempDir::new().unwrap();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let cascade = CropCascade::with_strategies(vec![
            Box::new(FixedStrategy {
                name: "alpha",
                succeed: true,
                calls: first.clone(),
            }),
            Box::new(FixedStrategy {
                name: "beta",
                succeed: true,
                calls: second.clone(),
            }),
        ]);

        let winner = cascade.run(&request_in(&dir)).await.unwrap();
        assert_eq!(winner, "alpha");
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_falls_through_to_next() {
        let dir = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));

        let cascade = CropCascade::with_strategies(vec![
            Box::new(FixedStrategy {
                name: "alpha",
                succeed: false,
                calls: calls.clone(),
            }),
            Box::new(FixedStrategy {
                name: "beta",
                succeed: true,
                calls: calls.clone(),
            }),
        ]);

        let winner = cascade.run(&request_in(&dir)).await.unwrap();
        assert_eq!(winner, "beta");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_all_failures_exhaust_the_cascade() {
        let dir = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));

        let cascade = CropCascade::with_strategies(vec![
            Box::new(FixedStrategy {
                name: "alpha",
                succeed: false,
                calls: calls.clone(),
            }),
            Box::new(FixedStrategy {
                name: "beta",
                succeed: false,
                calls: calls.clone(),
            }),
        ]);

        let request = request_in(&dir);
        let err = cascade.run(&request).await.unwrap_err();
        assert!(matches!(err, MediaError::AllStrategiesExhausted(p) if p == request.input));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!request.output.exists());
    }

    #[tokio::test]
    async fn test_missing_input_fails_before_any_strategy() {
        let dir = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));

        let cascade = CropCascade::with_strategies(vec![Box::new(FixedStrategy {
            name: "alpha",
            succeed: true,
            calls: calls.clone(),
        })]);

        let request = StageRequest {
            input: dir.path().join("absent.mp4"),
            output: dir.path().join("out.mp4"),
            encoding: EncodingConfig::default(),
            aspect: AspectRatio::portrait(),
        };
        let err = cascade.run(&request).await.unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_standard_chain_without_remote_client() {
        let cascade = CropCascade::standard(CascadeCapabilities::default());
        let names: Vec<_> = cascade.strategies.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["content-aware", "heuristic", "rule-of-thirds"]);
    }
}
