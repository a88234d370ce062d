//! ChainModel - immutable baked chain mesh and its vertex sink interface.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ ChainModel                                                       │
//! │                                                                  │
//! │  quads:  [ face A: q0 q1 … qn ][ face B: q0 q1 … qn ]            │
//! │  faces:  FaceSpan { first_quad, quad_count, arc_length } × 2     │
//! │                                                                  │
//! │  render(sink, transform, light0, light1)                         │
//! │    for each face, for each quad, for v in [v00, v01, v11, v10]:  │
//! │      t     = v.uv.y / face.arc_length                            │
//! │      light = lerp(light0, light1, t)                             │
//! │      sink.vertex(transform · v.position, v.uv, light, WHITE)     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use glam::{Affine3A, Vec2, Vec3};
use smallvec::SmallVec;

use crate::constants::MAX_LIGHT;
use crate::types::{FaceSpan, Quad, QuadVertex};

/// Vertex color emitted for every chain vertex.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

// =============================================================================
// Lighting
// =============================================================================

/// Block and sky light level at one chain anchor, each `0..=15`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LightLevel {
  pub block: u8,
  pub sky: u8,
}

impl LightLevel {
  /// Fully lit.
  pub const FULL: Self = Self {
    block: MAX_LIGHT,
    sky: MAX_LIGHT,
  };

  /// Create a light level, clamping both channels to `0..=15`.
  pub fn new(block: u8, sky: u8) -> Self {
    Self {
      block: block.min(MAX_LIGHT),
      sky: sky.min(MAX_LIGHT),
    }
  }

  /// Interpolate each channel independently, truncating toward zero.
  #[inline]
  pub fn lerp(self, other: Self, t: f32) -> Self {
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
    Self {
      block: channel(self.block, other.block),
      sky: channel(self.sky, other.sky),
    }
  }

  /// Packed light-map coordinates: block in bits 4..8, sky in bits 20..24.
  #[inline]
  pub fn pack(self) -> u32 {
    (self.block as u32) << 4 | (self.sky as u32) << 20
  }
}

// =============================================================================
// Sink
// =============================================================================

/// One vertex handed to the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinkVertex {
  /// Position after the render transform.
  pub position: Vec3,
  pub uv: Vec2,
  /// Packed light (see [`LightLevel::pack`]).
  pub light: u32,
  pub color: [u8; 4],
}

/// Host-provided destination for emitted vertices.
///
/// Vertices arrive four per quad in the order v00, v01, v11, v10.
pub trait VertexSink {
  fn vertex(&mut self, vertex: SinkVertex);
}

/// Recording sink, mostly for export and tests.
impl VertexSink for Vec<SinkVertex> {
  #[inline]
  fn vertex(&mut self, vertex: SinkVertex) {
    self.push(vertex);
  }
}

/// Anything that can emit itself into a vertex sink.
pub trait Renderable {
  /// Emit all vertices into `sink`, lighting interpolated from `light0` at
  /// the chain start to `light1` at the chain end.
  fn render(
    &self,
    sink: &mut dyn VertexSink,
    transform: &Affine3A,
    light0: LightLevel,
    light1: LightLevel,
  );
}

// =============================================================================
// ChainModel
// =============================================================================

/// Immutable baked chain mesh in the local chain frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChainModel {
  quads: Vec<Quad>,
  faces: SmallVec<[FaceSpan; 2]>,
}

impl ChainModel {
  /// Model with no geometry.
  pub fn empty() -> Self {
    Self::default()
  }

  /// Start assembling a model with room for `quad_capacity` quads.
  pub fn builder(quad_capacity: usize) -> ModelBuilder {
    ModelBuilder {
      quads: Vec::with_capacity(quad_capacity),
      faces: SmallVec::new(),
      open_face: None,
    }
  }

  /// All quads, faces back to back.
  #[inline]
  pub fn quads(&self) -> &[Quad] {
    &self.quads
  }

  #[inline]
  pub fn faces(&self) -> &[FaceSpan] {
    &self.faces
  }

  /// Quads of one face.
  pub fn face_quads(&self, face: usize) -> &[Quad] {
    self
      .faces
      .get(face)
      .map(|span| &self.quads[span.range()])
      .unwrap_or(&[])
  }

  #[inline]
  pub fn quad_count(&self) -> usize {
    self.quads.len()
  }

  #[inline]
  pub fn vertex_count(&self) -> usize {
    self.quads.len() * 4
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.quads.is_empty()
  }

  /// Local-space bounds, `None` for an empty model.
  pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
    let mut positions = self.quads.iter().flat_map(|q| q.vertices.iter().map(|v| v.position));
    let first = positions.next()?;
    Some(positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
  }
}

impl Renderable for ChainModel {
  fn render(
    &self,
    sink: &mut dyn VertexSink,
    transform: &Affine3A,
    light0: LightLevel,
    light1: LightLevel,
  ) {
    for face in &self.faces {
      let arc_length = face.arc_length;

      for quad in &self.quads[face.range()] {
        for vertex in &quad.vertices {
          // Division keeps t exactly 1 at the far end.
          let t = if arc_length > 0.0 {
            (vertex.uv.y / arc_length).clamp(0.0, 1.0)
          } else {
            0.0
          };
          sink.vertex(SinkVertex {
            position: transform.transform_point3(vertex.position),
            uv: vertex.uv,
            light: light0.lerp(light1, t).pack(),
            color: WHITE,
          });
        }
      }
    }
  }
}

// =============================================================================
// ModelBuilder
// =============================================================================

/// Accumulates quads face by face, then freezes into a [`ChainModel`].
pub struct ModelBuilder {
  quads: Vec<Quad>,
  faces: SmallVec<[FaceSpan; 2]>,
  open_face: Option<usize>,
}

impl ModelBuilder {
  /// Begin a new face. Closes the previous one if still open.
  pub fn begin_face(&mut self) {
    self.end_face();
    self.open_face = Some(self.quads.len());
  }

  /// Append a quad to the open face. Starts a face implicitly if needed.
  pub fn quad(&mut self, v00: QuadVertex, v01: QuadVertex, v11: QuadVertex, v10: QuadVertex) {
    if self.open_face.is_none() {
      self.open_face = Some(self.quads.len());
    }
    self.quads.push(Quad {
      vertices: [v00, v01, v11, v10],
    });
  }

  /// Close the open face, recording its span.
  pub fn end_face(&mut self) {
    if let Some(first_quad) = self.open_face.take() {
      let quad_count = self.quads.len() - first_quad;
      let arc_length = self.quads[first_quad..]
        .last()
        .map(|q| q.vertices[2].uv.y)
        .unwrap_or(0.0);
      self.faces.push(FaceSpan {
        first_quad,
        quad_count,
        arc_length,
      });
    }
  }

  pub fn build(mut self) -> ChainModel {
    self.end_face();
    self.quads.shrink_to_fit();
    ChainModel {
      quads: self.quads,
      faces: self.faces,
    }
  }
}

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;
