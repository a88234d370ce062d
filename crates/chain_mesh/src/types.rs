//! Core data types for chain meshes.

use glam::{Vec2, Vec3};

use crate::constants::{
  DEFAULT_CHAIN_SCALE, DEFAULT_HANG_AMOUNT, DEFAULT_QUALITY, DEFAULT_SIDE_A, DEFAULT_SIDE_B,
  TEXTURE_TEXELS,
};
use crate::error::ConfigError;

/// Texture rectangle of one chain face, in texels of a 16×16 texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvRect {
  pub x0: f32,
  pub x1: f32,
  pub y0: f32,
  pub y1: f32,
}

impl UvRect {
  pub const fn new(x0: f32, x1: f32, y0: f32, y1: f32) -> Self {
    Self { x0, x1, y0, y1 }
  }

  /// Width in texels.
  #[inline]
  pub fn width(&self) -> f32 {
    self.x1 - self.x0
  }

  /// Normalized `u` of the left edge.
  #[inline]
  pub fn u0(&self) -> f32 {
    self.x0 / TEXTURE_TEXELS
  }

  /// Normalized `u` of the right edge.
  #[inline]
  pub fn u1(&self) -> f32 {
    self.x1 / TEXTURE_TEXELS
  }

  /// World-space chain width for this face.
  /// chain_width = width / 16 * chain_scale
  #[inline]
  pub fn chain_width(&self, chain_scale: f32) -> f32 {
    self.width() / TEXTURE_TEXELS * chain_scale
  }

  fn validate(&self, side: &'static str) -> Result<(), ConfigError> {
    let finite = [self.x0, self.x1, self.y0, self.y1].iter().all(|v| v.is_finite());
    if !finite || self.x1 <= self.x0 || self.y1 <= self.y0 {
      return Err(ConfigError::DegenerateUvRect {
        side,
        x0: self.x0,
        x1: self.x1,
        y0: self.y0,
        y1: self.y1,
      });
    }
    Ok(())
  }
}

/// Configuration consumed by the mesh builder.
///
/// Read-only from the builder's point of view. Changing any value requires
/// the owning cache to be purged, which [`crate::ModelCache::reconfigure`]
/// does.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainConfig {
  /// Segment density: the desired segment length is `1 / quality`.
  pub quality: f32,

  /// Catenary hang constant.
  pub hang_amount: f64,

  /// Scale applied to the chain width and texture length.
  pub chain_scale: f32,

  /// UV rectangle of the +45° face.
  pub side_a: UvRect,

  /// UV rectangle of the -45° face.
  pub side_b: UvRect,
}

impl Default for ChainConfig {
  fn default() -> Self {
    Self {
      quality: DEFAULT_QUALITY,
      hang_amount: DEFAULT_HANG_AMOUNT,
      chain_scale: DEFAULT_CHAIN_SCALE,
      side_a: DEFAULT_SIDE_A,
      side_b: DEFAULT_SIDE_B,
    }
  }
}

impl ChainConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_quality(mut self, quality: f32) -> Self {
    self.quality = quality;
    self
  }

  pub fn with_hang_amount(mut self, hang_amount: f64) -> Self {
    self.hang_amount = hang_amount;
    self
  }

  pub fn with_chain_scale(mut self, chain_scale: f32) -> Self {
    self.chain_scale = chain_scale;
    self
  }

  pub fn with_sides(mut self, side_a: UvRect, side_b: UvRect) -> Self {
    self.side_a = side_a;
    self.side_b = side_b;
    self
  }

  /// Desired arc length of one segment.
  #[inline]
  pub fn segment_length(&self) -> f32 {
    1.0 / self.quality
  }

  /// Check that every value is usable by the builder.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if !(self.quality.is_finite() && self.quality > 0.0) {
      return Err(ConfigError::InvalidQuality(self.quality));
    }
    if !(self.hang_amount.is_finite() && self.hang_amount > 0.0) {
      return Err(ConfigError::InvalidHangAmount(self.hang_amount));
    }
    if !(self.chain_scale.is_finite() && self.chain_scale > 0.0) {
      return Err(ConfigError::InvalidChainScale(self.chain_scale));
    }
    self.side_a.validate("side_a")?;
    self.side_b.validate("side_b")?;
    Ok(())
  }
}

/// One mesh vertex: position in the local chain frame plus texture coords.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QuadVertex {
  pub position: Vec3,
  pub uv: Vec2,
}

impl QuadVertex {
  #[inline]
  pub fn new(position: Vec3, uv: Vec2) -> Self {
    Self { position, uv }
  }
}

/// Four vertices in emission order: v00, v01, v11, v10.
///
/// `0x` vertices sit on the earlier cross-section, `1x` on the later one;
/// `x0` is the low-`u` side of the face, `x1` the high-`u` side.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Quad {
  pub vertices: [QuadVertex; 4],
}

impl Quad {
  /// Earlier cross-section edge (v00 → v01).
  #[inline]
  pub fn lower_edge(&self) -> (Vec3, Vec3) {
    (self.vertices[0].position, self.vertices[1].position)
  }

  /// Later cross-section edge (v10 → v11).
  #[inline]
  pub fn upper_edge(&self) -> (Vec3, Vec3) {
    (self.vertices[3].position, self.vertices[2].position)
  }

  /// Midpoint of the earlier cross-section, which lies on the curve.
  #[inline]
  pub fn lower_center(&self) -> Vec3 {
    let (a, b) = self.lower_edge();
    (a + b) * 0.5
  }

  /// Midpoint of the later cross-section, which lies on the curve.
  #[inline]
  pub fn upper_center(&self) -> Vec3 {
    let (a, b) = self.upper_edge();
    (a + b) * 0.5
  }
}

/// Contiguous run of quads forming one face of the chain.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FaceSpan {
  /// Index of the first quad of this face.
  pub first_quad: usize,
  /// Number of quads (segments) in this face.
  pub quad_count: usize,
  /// Texture-space length of the face (final `v`).
  pub arc_length: f32,
}

impl FaceSpan {
  #[inline]
  pub fn range(&self) -> std::ops::Range<usize> {
    self.first_quad..self.first_quad + self.quad_count
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
