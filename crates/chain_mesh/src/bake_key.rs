//! BakeKey - geometric fingerprint identifying a cached chain model.
//!
//! A chain model only depends on the vertical drop and the horizontal
//! distance between its anchors. Direction and translation are applied by the
//! placement transform, so chains that differ only in heading share a model.

use glam::{DVec3, Vec3};

/// Cache key for a chain model.
///
/// Stores the exact f32 bit patterns of the drop and horizontal distance, so
/// two keys compare equal only when the builder would see identical inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BakeKey {
  drop_bits: u32,
  horizontal_bits: u32,
}

impl BakeKey {
  /// Shared key of every rejected displacement. No accepted displacement
  /// has a NaN drop, so it cannot collide with a real chain.
  pub const REJECTED: Self = Self {
    drop_bits: CANONICAL_NAN_BITS,
    horizontal_bits: CANONICAL_NAN_BITS,
  };

  /// Key for a displacement vector (end minus start).
  ///
  /// The vertical-chain sentinel (both horizontal components NaN, finite
  /// drop) maps to a NaN horizontal distance and therefore to its own key.
  /// Any other non-finite displacement maps to [`BakeKey::REJECTED`].
  pub fn from_displacement(displacement: Vec3) -> Self {
    if is_rejected_displacement(displacement) {
      return Self::REJECTED;
    }
    Self::from_parts(displacement.y, horizontal_distance(displacement))
  }

  /// Key for a chain between two world-space anchors.
  ///
  /// The difference is taken in f64 and reduced to the same f32 displacement
  /// that [`displacement_between`] hands to the builder.
  pub fn between(src: DVec3, dst: DVec3) -> Self {
    Self::from_displacement(displacement_between(src, dst))
  }

  /// Key from an explicit drop and horizontal distance.
  ///
  /// A NaN drop can only come from rejected input and yields
  /// [`BakeKey::REJECTED`].
  pub fn from_parts(drop_y: f32, horizontal: f32) -> Self {
    if drop_y.is_nan() {
      return Self::REJECTED;
    }
    Self {
      drop_bits: canonical_bits(drop_y),
      horizontal_bits: canonical_bits(horizontal),
    }
  }

  /// Whether this key stands for rejected input (always an empty model).
  #[inline]
  pub fn is_rejected(&self) -> bool {
    self.drop_y().is_nan()
  }

  /// Vertical drop this key was built from.
  #[inline]
  pub fn drop_y(&self) -> f32 {
    f32::from_bits(self.drop_bits)
  }

  /// Horizontal distance this key was built from.
  #[inline]
  pub fn horizontal(&self) -> f32 {
    f32::from_bits(self.horizontal_bits)
  }

  /// Canonical displacement for this key, lying in the local +X direction.
  ///
  /// Building from this vector yields the same model as any displacement
  /// that produced the key.
  pub fn canonical_displacement(&self) -> Vec3 {
    let horizontal = self.horizontal();
    if horizontal.is_nan() {
      Vec3::new(f32::NAN, self.drop_y(), f32::NAN)
    } else {
      Vec3::new(horizontal, self.drop_y(), 0.0)
    }
  }
}

/// Displacement from `src` to `dst` in the builder's precision.
#[inline]
pub fn displacement_between(src: DVec3, dst: DVec3) -> Vec3 {
  (dst - src).as_vec3()
}

/// Horizontal distance of a displacement. Shared by keys and the builder so
/// both see the same value.
#[inline]
pub fn horizontal_distance(displacement: Vec3) -> f32 {
  displacement.x.hypot(displacement.z)
}

const CANONICAL_NAN_BITS: u32 = 0x7fc0_0000;

/// Non-finite and not the vertical sentinel. Mirrors `ChainShape::Invalid`.
#[inline]
fn is_rejected_displacement(displacement: Vec3) -> bool {
  let sentinel = displacement.x.is_nan() && displacement.z.is_nan() && displacement.y.is_finite();
  !(displacement.is_finite() || sentinel)
}

/// Bits with `-0.0` folded into `0.0` and every NaN into the canonical NaN.
#[inline]
fn canonical_bits(value: f32) -> u32 {
  if value.is_nan() {
    CANONICAL_NAN_BITS
  } else if value == 0.0 {
    0.0f32.to_bits()
  } else {
    value.to_bits()
  }
}

#[cfg(test)]
#[path = "bake_key_test.rs"]
mod bake_key_test;
