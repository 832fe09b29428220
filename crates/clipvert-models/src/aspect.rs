//! Target aspect ratios.

use serde::{Deserialize, Serialize};

/// A target aspect ratio expressed as a width:height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Create a new aspect ratio.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Portrait 9:16, the short-form default.
    pub fn portrait() -> Self {
        Self::new(9, 16)
    }

    /// Width divided by height.
    pub fn ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::portrait()
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portrait_ratio() {
        let aspect = AspectRatio::portrait();
        assert!((aspect.ratio() - 9.0 / 16.0).abs() < 1e-9);
        assert_eq!(aspect.to_string(), "9:16");
    }
}
