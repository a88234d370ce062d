//! Error types for chain configuration.

use thiserror::Error;

/// Rejected chain configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
  #[error("quality must be a positive finite number, got {0}")]
  InvalidQuality(f32),

  #[error("hang amount must be a positive finite number, got {0}")]
  InvalidHangAmount(f64),

  #[error("chain scale must be a positive finite number, got {0}")]
  InvalidChainScale(f32),

  #[error("uv rect for {side} is degenerate: [{x0}, {x1}] x [{y0}, {y1}]")]
  DegenerateUvRect {
    side: &'static str,
    x0: f32,
    x1: f32,
    y0: f32,
    y1: f32,
  },
}
