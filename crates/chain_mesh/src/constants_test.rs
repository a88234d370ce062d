use super::*;

#[test]
fn test_default_sides_are_adjacent() {
  assert_eq!(DEFAULT_SIDE_A.x1, DEFAULT_SIDE_B.x0, "side B should start where side A ends");
  assert_eq!(DEFAULT_SIDE_A.width(), DEFAULT_SIDE_B.width());
}

#[test]
fn test_default_sides_fit_texture() {
  for side in [DEFAULT_SIDE_A, DEFAULT_SIDE_B] {
    assert!(side.x0 >= 0.0 && side.x1 <= TEXTURE_TEXELS);
    assert!(side.y0 >= 0.0 && side.y1 <= TEXTURE_TEXELS);
  }
}

#[test]
fn test_face_angles_are_symmetric() {
  assert_eq!(FACE_ANGLES[0], -FACE_ANGLES[1]);
}
