//! ChainMeshBuilder - converts a displacement vector into a baked chain mesh.
//!
//! # Algorithm Overview
//!
//! The model is always generated in the local chain frame: the chain runs
//! along +X, sags along Y, and only its width extends into Z. This reduces the
//! curve walk to 2D.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PHASE 1: Classification                      │
//! │  NaN horizontal sentinel / zero span  → vertical path           │
//! │  zero length                          → empty model             │
//! │  other non-finite input               → rejected (empty)        │
//! │  everything else                      → curve path              │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PHASE 2: Curve Walk (per face)               │
//! │  x₀ = 0                                                         │
//! │  repeat (≤ MAX_SEGMENTS):                                       │
//! │    Δx = s / √(1 + k²)          k = local slope                  │
//! │    x₁ = min(x₀ + Δx, distance_xz)                               │
//! │    edge(x₁) = normal(x₁) rotated ±45° about (p₁ − p₀)           │
//! │    emit quad [edge(x₀), edge(x₁)]                               │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        OUTPUT                                   │
//! │  ChainModel: face A (+45°) quads, then face B (−45°) quads      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The curve is sampled at `x · distance / distance_xz` with span `distance`
//! rather than at `x` with span `distance_xz`. Steep chains hang a little
//! deeper this way, which matches the look players expect.
//!
//! The step size uses the geometric slope (curve slope times that same
//! stretch), not the raw curve slope, so segments on steep chains keep an arc
//! length close to `1 / quality`.

use glam::{Quat, Vec2, Vec3};
use rayon::prelude::*;

use crate::bake_key::horizontal_distance;
use crate::constants::{FACE_ANGLES, MAX_SEGMENTS, VERTICAL_EPSILON};
use crate::curve::{estimate_delta_x, HangCurve};
use crate::error::ConfigError;
use crate::model::{ChainModel, ModelBuilder};
use crate::types::{ChainConfig, QuadVertex, UvRect};

/// How a displacement will be meshed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChainShape {
  /// Regular hanging chain.
  Curved { horizontal: f32, drop_y: f32 },
  /// Straight chain along Y.
  Vertical { drop_y: f32 },
  /// Both anchors coincide.
  Empty,
  /// Non-finite input outside the vertical sentinel.
  Invalid,
}

impl ChainShape {
  /// Classify a displacement.
  ///
  /// Both horizontal components NaN is the explicit vertical-chain signal.
  /// Any other NaN or infinity is rejected.
  pub fn classify(displacement: Vec3) -> Self {
    let drop_y = displacement.y;

    if displacement.x.is_nan() && displacement.z.is_nan() {
      return match drop_y {
        y if !y.is_finite() => ChainShape::Invalid,
        y if y.abs() < VERTICAL_EPSILON => ChainShape::Empty,
        y => ChainShape::Vertical { drop_y: y },
      };
    }

    if !displacement.is_finite() {
      return ChainShape::Invalid;
    }

    let horizontal = horizontal_distance(displacement);
    if horizontal < VERTICAL_EPSILON {
      if drop_y.abs() < VERTICAL_EPSILON {
        ChainShape::Empty
      } else {
        ChainShape::Vertical { drop_y }
      }
    } else {
      ChainShape::Curved { horizontal, drop_y }
    }
  }
}

/// Builds chain models for a fixed configuration.
#[derive(Clone, Debug)]
pub struct ChainMeshBuilder {
  config: ChainConfig,
}

impl ChainMeshBuilder {
  /// Create a builder, rejecting unusable configuration.
  pub fn new(config: ChainConfig) -> Result<Self, ConfigError> {
    config.validate()?;
    Ok(Self { config })
  }

  pub fn config(&self) -> &ChainConfig {
    &self.config
  }

  /// Build the model for `displacement` (end minus start).
  ///
  /// Never fails. Rejected input yields an empty model; runaway walks are
  /// truncated at [`MAX_SEGMENTS`] per face.
  #[tracing::instrument(level = "trace", skip(self))]
  pub fn build(&self, displacement: Vec3) -> ChainModel {
    let sides = [self.config.side_a, self.config.side_b];

    match ChainShape::classify(displacement) {
      ChainShape::Curved { horizontal, drop_y } => {
        let mut out = ChainModel::builder(self.quad_capacity(horizontal.hypot(drop_y)));
        for (angle, uv) in FACE_ANGLES.into_iter().zip(sides) {
          self.build_face(&mut out, horizontal, drop_y, angle, uv);
        }
        out.build()
      }
      ChainShape::Vertical { drop_y } => {
        let mut out = ChainModel::builder(self.quad_capacity(drop_y.abs()));
        for (angle, uv) in FACE_ANGLES.into_iter().zip(sides) {
          self.build_face_vertical(&mut out, drop_y, angle, uv);
        }
        out.build()
      }
      ChainShape::Empty => ChainModel::empty(),
      ChainShape::Invalid => {
        tracing::warn!(?displacement, "rejecting non-finite chain displacement");
        ChainModel::empty()
      }
    }
  }

  /// Build many models in parallel. Output order matches input order.
  pub fn build_batch(&self, displacements: &[Vec3]) -> Vec<ChainModel> {
    if displacements.is_empty() {
      return Vec::new();
    }

    displacements.par_iter().map(|&d| self.build(d)).collect()
  }

  /// Quads for both faces of a chain of roughly `length`.
  fn quad_capacity(&self, length: f32) -> usize {
    // Clamp in float space; huge spans would saturate the cast.
    let segments = (length * self.config.quality).ceil().min(MAX_SEGMENTS as f32) as usize;
    2 * segments.saturating_add(1).min(MAX_SEGMENTS)
  }

  /// Walk the hang curve from the origin to `(horizontal, drop_y)` emitting
  /// one face rotated `angle_deg` about the chain axis.
  fn build_face(
    &self,
    out: &mut ModelBuilder,
    horizontal: f32,
    drop_y: f32,
    angle_deg: f32,
    uv: UvRect,
  ) {
    let segment_length = self.config.segment_length();
    let chain_scale = self.config.chain_scale;
    let distance = horizontal.hypot(drop_y);
    let stretch = distance as f64 / horizontal as f64;
    let curve = HangCurve::new(distance as f64, drop_y as f64, self.config.hang_amount);

    let section = CrossSection {
      width: uv.chain_width(chain_scale),
      lift: horizontal / distance,
      angle: angle_deg.to_radians(),
    };
    let (u0, u1) = (uv.u0(), uv.u1());

    // Curve point and parametric slope at horizontal position x.
    let sample = |x: f32| -> (Vec3, f32) {
      let t = x as f64 * stretch;
      (Vec3::new(x, curve.height(t) as f32, 0.0), curve.slope(t) as f32)
    };
    // Next horizontal position, clamped to the far anchor.
    let advance = |x: f32, gradient: f32| -> (f32, bool) {
      let next = x + estimate_delta_x(segment_length, gradient * stretch as f32);
      if next >= horizontal {
        (horizontal, true)
      } else {
        (next, false)
      }
    };

    out.begin_face();

    let (mut point0, gradient0) = sample(0.0);
    let (mut x, mut last) = advance(0.0, gradient0);
    let (mut point1, mut gradient1) = sample(x);
    let mut edge = section.edge(point0, gradient0, point1 - point0);
    let mut v0 = 0.0;

    for _ in 0..MAX_SEGMENTS {
      // Extremely long spans sag past f32 range; keep what is representable.
      if !(point0.is_finite() && point1.is_finite() && gradient1.is_finite()) {
        tracing::debug!(x, horizontal, drop_y, "chain curve left f32 range, truncating face");
        break;
      }

      let next_edge = section.edge(point1, gradient1, point1 - point0);
      let v1 = v0 + point0.distance(point1) / chain_scale;

      out.quad(
        QuadVertex::new(edge.0, Vec2::new(u0, v0)),
        QuadVertex::new(edge.1, Vec2::new(u1, v0)),
        QuadVertex::new(next_edge.1, Vec2::new(u1, v1)),
        QuadVertex::new(next_edge.0, Vec2::new(u0, v1)),
      );

      if last {
        break;
      }

      edge = next_edge;
      v0 = v1;
      point0 = point1;
      (x, last) = advance(x, gradient1);
      (point1, gradient1) = sample(x);
    }

    out.end_face();
  }

  /// Straight chain along Y. The curve math is undefined without a
  /// horizontal span.
  fn build_face_vertical(&self, out: &mut ModelBuilder, drop_y: f32, angle_deg: f32, uv: UvRect) {
    let segment_length = self.config.segment_length();
    let chain_scale = self.config.chain_scale;
    let angle = angle_deg.to_radians();
    let normal = Vec3::new(angle.cos(), 0.0, angle.sin()) * uv.chain_width(chain_scale);
    let lo = -normal * 0.5;
    let hi = lo + normal;
    let (u0, u1) = (uv.u0(), uv.u1());

    let direction = drop_y.signum();
    let total = drop_y.abs();

    out.begin_face();

    let mut travelled = 0.0f32;
    let mut v0 = 0.0;

    for _ in 0..MAX_SEGMENTS {
      let last = travelled + segment_length >= total;
      let length = if last {
        total - travelled
      } else {
        segment_length
      };

      let y0 = Vec3::Y * (travelled * direction);
      let y1 = if last {
        Vec3::Y * drop_y
      } else {
        Vec3::Y * ((travelled + length) * direction)
      };
      let v1 = v0 + length / chain_scale;

      out.quad(
        QuadVertex::new(lo + y0, Vec2::new(u0, v0)),
        QuadVertex::new(hi + y0, Vec2::new(u1, v0)),
        QuadVertex::new(hi + y1, Vec2::new(u1, v1)),
        QuadVertex::new(lo + y1, Vec2::new(u0, v1)),
      );

      if last {
        break;
      }

      travelled += length;
      v0 = v1;
    }

    out.end_face();
  }
}

/// Cross-section geometry shared by every edge of one face.
struct CrossSection {
  /// Chain width in world units.
  width: f32,
  /// Y component of the unnormalized curve normal (distance_xz / distance).
  lift: f32,
  /// Face rotation about the chain axis, radians.
  angle: f32,
}

impl CrossSection {
  /// Edge `(low, high)` centred on `point`.
  ///
  /// The normal `(-gradient, lift, 0)` is perpendicular to the stretched
  /// curve tangent in the XY plane; rotating it about the segment axis tilts
  /// the face out of that plane.
  #[inline]
  fn edge(&self, point: Vec3, gradient: f32, axis: Vec3) -> (Vec3, Vec3) {
    let axis = axis.try_normalize().unwrap_or(Vec3::X);
    let normal = Vec3::new(-gradient, self.lift, 0.0).normalize_or(Vec3::Y);
    let normal = Quat::from_axis_angle(axis, self.angle) * normal * self.width;
    let low = point - normal * 0.5;
    (low, low + normal)
  }
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
