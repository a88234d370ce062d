use std::collections::HashSet;

use super::*;

#[test]
fn test_direction_does_not_matter() {
  let east = BakeKey::from_displacement(Vec3::new(3.0, -2.0, 0.0));
  let south = BakeKey::from_displacement(Vec3::new(0.0, -2.0, 3.0));
  let west = BakeKey::from_displacement(Vec3::new(-3.0, -2.0, 0.0));

  assert_eq!(east, south);
  assert_eq!(east, west);
}

#[test]
fn test_drop_and_distance_matter() {
  let base = BakeKey::from_displacement(Vec3::new(3.0, -2.0, 0.0));
  let deeper = BakeKey::from_displacement(Vec3::new(3.0, -3.0, 0.0));
  let rising = BakeKey::from_displacement(Vec3::new(3.0, 2.0, 0.0));
  let longer = BakeKey::from_displacement(Vec3::new(4.0, -2.0, 0.0));

  let keys: HashSet<BakeKey> = [base, deeper, rising, longer].into_iter().collect();
  assert_eq!(keys.len(), 4, "all four chains should have distinct keys");
}

#[test]
fn test_negative_zero_folds() {
  let a = BakeKey::from_parts(0.0, 2.0);
  let b = BakeKey::from_parts(-0.0, 2.0);
  assert_eq!(a, b);
}

#[test]
fn test_vertical_sentinel_key() {
  let a = BakeKey::from_displacement(Vec3::new(f32::NAN, -5.0, f32::NAN));
  let b = BakeKey::from_displacement(Vec3::new(-f32::NAN, -5.0, f32::NAN));

  assert_eq!(a, b, "every NaN should fold into one key");
  assert!(a.horizontal().is_nan());
  assert_eq!(a.drop_y(), -5.0);

  let canonical = a.canonical_displacement();
  assert!(canonical.x.is_nan() && canonical.z.is_nan());
  assert_eq!(canonical.y, -5.0);
}

#[test]
fn test_between_matches_displacement() {
  let src = DVec3::new(100.5, 64.0, -20.25);
  let dst = DVec3::new(103.5, 62.0, -20.25);

  let key = BakeKey::between(src, dst);
  let displacement = displacement_between(src, dst);

  assert_eq!(displacement, Vec3::new(3.0, -2.0, 0.0));
  assert_eq!(key, BakeKey::from_displacement(displacement));
  assert_eq!(key.drop_y(), -2.0, "drop is end minus start");
}

#[test]
fn test_canonical_displacement_round_trips_key() {
  let key = BakeKey::from_displacement(Vec3::new(1.5, 4.0, -2.0));
  let canonical = key.canonical_displacement();

  assert_eq!(canonical.z, 0.0);
  assert_eq!(BakeKey::from_displacement(canonical), key);
}

#[test]
fn test_single_nan_component_does_not_share_sentinel_key() {
  let sentinel = BakeKey::from_displacement(Vec3::new(f32::NAN, -5.0, f32::NAN));
  let half_nan = BakeKey::from_displacement(Vec3::new(f32::NAN, -5.0, 0.0));

  assert_ne!(half_nan, sentinel);
  assert_eq!(half_nan, BakeKey::REJECTED);
  assert!(!sentinel.is_rejected());
}

#[test]
fn test_non_finite_displacements_are_rejected() {
  let rejected = [
    Vec3::new(0.0, -5.0, f32::NAN),
    Vec3::new(f32::INFINITY, 0.0, 0.0),
    Vec3::new(1.0, f32::NAN, 1.0),
    Vec3::new(f32::NAN, f32::NAN, f32::NAN),
    Vec3::new(f32::NAN, f32::INFINITY, f32::NAN),
  ];
  for displacement in rejected {
    let key = BakeKey::from_displacement(displacement);
    assert_eq!(key, BakeKey::REJECTED, "{:?} should be rejected", displacement);
    assert!(key.is_rejected());
  }

  assert_eq!(BakeKey::from_parts(f32::NAN, 3.0), BakeKey::REJECTED);
  assert!(!BakeKey::from_displacement(Vec3::new(3.0, -2.0, 0.0)).is_rejected());
}
