//! Hang curve (catenary) evaluation.
//!
//! The curve connects `(0, 0)` to `(distance, drop_y)` in a 2D frame and has
//! the shape of a chain hanging under its own weight:
//!
//! ```text
//! p1        = a · asinh( (h / 2a) / sinh(d / 2a) )
//! height(x) = a · cosh((2x + 2p1 − d) / 2a) − a · cosh((2p1 − d) / 2a)
//! slope(x)  = sinh((2x + 2p1 − d) / 2a)
//! ```
//!
//! `a` is the hang constant, `d` the span, `h` the drop. The offset `p1`
//! shifts the lowest point so that `height(d) = h`; the constant term makes
//! `height(0) = 0`.
//!
//! All math runs in f64. `distance` must be non-zero: vertical chains take
//! the builder's straight path instead.

/// Precomputed catenary for one span/drop pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HangCurve {
  distance: f64,
  drop_y: f64,
  hang: f64,
  p1: f64,
}

impl HangCurve {
  pub fn new(distance: f64, drop_y: f64, hang: f64) -> Self {
    let two_a = 2.0 * hang;
    let p1 = hang * ((drop_y / two_a) / (distance / two_a).sinh()).asinh();
    Self {
      distance,
      drop_y,
      hang,
      p1,
    }
  }

  #[inline]
  pub fn distance(&self) -> f64 {
    self.distance
  }

  #[inline]
  pub fn drop_y(&self) -> f64 {
    self.drop_y
  }

  /// Vertical offset at horizontal position `x`.
  #[inline]
  pub fn height(&self, x: f64) -> f64 {
    let two_a = 2.0 * self.hang;
    let base = self.hang * ((2.0 * self.p1 - self.distance) / two_a).cosh();
    self.hang * ((2.0 * x + 2.0 * self.p1 - self.distance) / two_a).cosh() - base
  }

  /// Derivative of [`height`](Self::height) at `x`.
  #[inline]
  pub fn slope(&self, x: f64) -> f64 {
    ((2.0 * x + 2.0 * self.p1 - self.distance) / (2.0 * self.hang)).sinh()
  }
}

/// Vertical offset at `x` of the curve from `(0, 0)` to `(distance, drop_y)`.
#[inline]
pub fn height(x: f64, distance: f64, drop_y: f64, hang: f64) -> f64 {
  HangCurve::new(distance, drop_y, hang).height(x)
}

/// Slope at `x` of the curve from `(0, 0)` to `(distance, drop_y)`.
#[inline]
pub fn slope(x: f64, distance: f64, drop_y: f64, hang: f64) -> f64 {
  HangCurve::new(distance, drop_y, hang).slope(x)
}

/// Horizontal step that yields a segment of length `s` at slope `k`.
///
/// First-order arc-length estimate along the tangent `T = (1, k)`:
/// Δx = s · T.x / |T| = s / √(1 + k²)
#[inline]
pub fn estimate_delta_x(s: f32, k: f32) -> f32 {
  s / (1.0 + k * k).sqrt()
}

#[cfg(test)]
#[path = "curve_test.rs"]
mod curve_test;
