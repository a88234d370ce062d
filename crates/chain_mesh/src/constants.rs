//! Chain geometry constants.
//!
//! # Local Chain Frame
//!
//! ```text
//!         +Y (drop)
//!          │        end = (distance_xz, drop_y, 0)
//!          │      ╱
//!          │   ╭─╯
//!          │ ╭─╯
//!          ●─╯─────────── +X (horizontal span)
//!        start
//!
//!  +Z carries only the chain width (cross-section rotated ±45°).
//! ```
//!
//! Models are always built in this frame. The horizontal direction of a chain
//! is applied at render time by the placement transform.
//!
//! # Texture Space
//!
//! UV rectangles are given in texels of a 16×16 chain texture. `u` is fixed
//! per face, `v` grows with arc length divided by the chain scale.

use crate::types::UvRect;

/// Hard cap on segments per face. Bounds build time for extreme or
/// numerically pathological displacements.
pub const MAX_SEGMENTS: usize = 2048;

/// Texels per texture side used to normalize UV rectangles.
pub const TEXTURE_TEXELS: f32 = 16.0;

/// Default segment density (segments per block of arc length).
pub const DEFAULT_QUALITY: f32 = 4.0;

/// Default catenary hang constant. Larger values give flatter chains.
pub const DEFAULT_HANG_AMOUNT: f64 = 32.0;

/// Default chain scale. Widens the chain without distorting UVs.
pub const DEFAULT_CHAIN_SCALE: f32 = 1.0;

/// Face angles around the chain axis, in degrees.
pub const FACE_ANGLES: [f32; 2] = [45.0, -45.0];

/// UV rectangle of the first face.
pub const DEFAULT_SIDE_A: UvRect = UvRect::new(0.0, 3.0, 0.0, 16.0);

/// UV rectangle of the second face.
pub const DEFAULT_SIDE_B: UvRect = UvRect::new(3.0, 6.0, 0.0, 16.0);

/// Horizontal spans shorter than this are built as vertical chains.
pub const VERTICAL_EPSILON: f32 = 1e-6;

/// Cache size above which a leak is suspected.
pub const DEFAULT_LEAK_THRESHOLD: usize = 10_000;

/// Initial cache capacity.
pub const INITIAL_CACHE_CAPACITY: usize = 256;

/// Maximum block/sky light level.
pub const MAX_LIGHT: u8 = 15;

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
