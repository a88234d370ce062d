use super::*;

use crate::cache::CacheDiagnostics;
use crate::model::SinkVertex;

fn renderer() -> ChainRenderer {
  ChainRenderer::with_cache(
    ModelCache::new(ChainConfig::default())
      .unwrap()
      .with_diagnostics(CacheDiagnostics::DISABLED),
  )
}

fn midpoint(a: &SinkVertex, b: &SinkVertex) -> Vec3 {
  (a.position + b.position) * 0.5
}

// =========================================================================
// Placement
// =========================================================================

#[test]
fn test_chain_transform_heading() {
  let start = Vec3::new(1.0, 2.0, 3.0);
  let cases = [
    (Vec3::new(4.0, 0.0, 3.0), Vec3::X),
    (Vec3::new(1.0, 0.0, 7.0), Vec3::Z),
    (Vec3::new(-5.0, 9.0, 3.0), Vec3::NEG_X),
    (Vec3::new(4.0, -1.0, 6.0), Vec3::new(1.0, 0.0, 1.0).normalize()),
  ];

  for (end, expected) in cases {
    let transform = chain_transform(start, end);
    let heading = transform.transform_vector3(Vec3::X);
    assert!(
      (heading - expected).length() < 1e-5,
      "heading toward {:?} was {:?}, expected {:?}",
      end,
      heading,
      expected
    );
    assert!((transform.transform_point3(Vec3::ZERO) - start).length() < 1e-6);
  }
}

#[test]
fn test_chain_transform_vertical_has_no_rotation() {
  let start = Vec3::new(5.0, 10.0, 5.0);
  let transform = chain_transform(start, Vec3::new(5.0, 2.0, 5.0));

  assert_eq!(transform.transform_vector3(Vec3::X), Vec3::X);
  assert_eq!(transform.transform_point3(Vec3::ZERO), start);
}

// =========================================================================
// Rendering
// =========================================================================

#[test]
fn test_render_between_reaches_both_anchors() {
  let renderer = renderer();
  let start = DVec3::new(10.5, 64.0, -3.25);
  let end = DVec3::new(13.5, 62.0, 0.75);
  let mut sink: Vec<SinkVertex> = Vec::new();

  let model = renderer.render_between(&mut sink, start, end, LightLevel::FULL, LightLevel::FULL);

  assert_eq!(sink.len(), model.vertex_count());
  for face in model.faces() {
    let first = face.first_quad * 4;
    let last = (face.first_quad + face.quad_count) * 4 - 4;

    let head = midpoint(&sink[first], &sink[first + 1]);
    let tail = midpoint(&sink[last + 2], &sink[last + 3]);
    assert!((head - start.as_vec3()).length() < 1e-4, "head {:?}", head);
    assert!((tail - end.as_vec3()).length() < 1e-3, "tail {:?}", tail);
  }
}

#[test]
fn test_render_baked_reuses_model() {
  let renderer = renderer();
  let displacement = Vec3::new(3.0, -2.0, 0.0);
  let key = BakeKey::from_displacement(displacement);
  let mut sink: Vec<SinkVertex> = Vec::new();

  let a = renderer.render_baked(
    &mut sink,
    &Affine3A::IDENTITY,
    &key,
    displacement,
    LightLevel::FULL,
    LightLevel::FULL,
  );
  let b = renderer.render_baked(
    &mut sink,
    &Affine3A::from_translation(Vec3::Y),
    &key,
    displacement,
    LightLevel::FULL,
    LightLevel::FULL,
  );

  assert!(Arc::ptr_eq(&a, &b));
  assert_eq!(renderer.cache().builds(), 1);
  assert_eq!(sink.len(), 2 * a.vertex_count());
}

#[test]
fn test_transient_render_bypasses_cache() {
  let renderer = renderer();
  let displacement = Vec3::new(2.0, 1.0, -1.0);
  let key = BakeKey::from_displacement(displacement);

  let mut transient: Vec<SinkVertex> = Vec::new();
  renderer.render(
    &mut transient,
    &Affine3A::IDENTITY,
    displacement,
    LightLevel::FULL,
    LightLevel::FULL,
  );
  assert_eq!(renderer.cache().builds(), 0);
  assert!(renderer.cache().is_empty());

  let mut baked: Vec<SinkVertex> = Vec::new();
  renderer.render_baked(
    &mut baked,
    &Affine3A::IDENTITY,
    &key,
    displacement,
    LightLevel::FULL,
    LightLevel::FULL,
  );
  assert_eq!(transient, baked);
}

#[test]
fn test_light_runs_from_start_to_end() {
  let renderer = renderer();
  let dark = LightLevel::new(2, 5);
  let bright = LightLevel::new(15, 15);
  let mut sink: Vec<SinkVertex> = Vec::new();

  let model = renderer.render_between(
    &mut sink,
    DVec3::ZERO,
    DVec3::new(6.0, -1.0, 0.0),
    dark,
    bright,
  );

  for face in model.faces() {
    let first = face.first_quad * 4;
    let last = (face.first_quad + face.quad_count) * 4 - 1;
    assert_eq!(sink[first].light, dark.pack());
    assert_eq!(sink[last].light, bright.pack());
  }
}

#[test]
fn test_vertical_render_stays_on_anchor_column() {
  let renderer = renderer();
  let start = DVec3::new(4.0, 20.0, 4.0);
  let mut sink: Vec<SinkVertex> = Vec::new();

  renderer.render_between(
    &mut sink,
    start,
    DVec3::new(4.0, 15.0, 4.0),
    LightLevel::FULL,
    LightLevel::FULL,
  );

  assert!(!sink.is_empty());
  for pair in sink.chunks(2) {
    let centre = midpoint(&pair[0], &pair[1]);
    assert!((centre.x - 4.0).abs() < 1e-5 && (centre.z - 4.0).abs() < 1e-5);
  }
}

#[test]
fn test_reconfigure_through_renderer() {
  let renderer = renderer();
  let displacement = Vec3::new(4.0, 0.0, 0.0);
  let key = BakeKey::from_displacement(displacement);
  let mut sink: Vec<SinkVertex> = Vec::new();

  renderer.render_baked(
    &mut sink,
    &Affine3A::IDENTITY,
    &key,
    displacement,
    LightLevel::FULL,
    LightLevel::FULL,
  );
  renderer
    .reconfigure(ChainConfig::default().with_chain_scale(2.0))
    .unwrap();
  assert!(renderer.cache().is_empty());

  assert!(renderer
    .reconfigure(ChainConfig::default().with_hang_amount(0.0))
    .is_err());
  assert_eq!(renderer.cache().config().chain_scale, 2.0);

  renderer.purge();
  assert!(renderer.cache().is_empty());
}
