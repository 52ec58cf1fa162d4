use seam_geom::{Aabb, Vec3};

#[test]
fn normalize_zero_is_zero() {
    assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
}

#[test]
fn length_of_3_4_0() {
    assert_eq!(Vec3::new(3.0, 4.0, 0.0).length(), 5.0);
}

#[test]
fn aabb_center_and_contains() {
    let b = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(16.0, 16.0, 16.0));
    assert_eq!(b.center(), Vec3::new(8.0, 8.0, 8.0));
    assert!(b.contains(Vec3::new(16.0, 0.0, 8.0)));
    assert!(!b.contains(Vec3::new(16.1, 0.0, 8.0)));
}

#[test]
fn neg_and_sub() {
    let a = Vec3::new(1.0, -2.0, 3.0);
    assert_eq!(-a, Vec3::new(-1.0, 2.0, -3.0));
    assert_eq!(a - a, Vec3::ZERO);
}

#[test]
fn cross_of_axes() {
    let x = Vec3::new(1.0, 0.0, 0.0);
    let y = Vec3::new(0.0, 1.0, 0.0);
    assert_eq!(x.cross(y), Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(y.cross(x), Vec3::new(0.0, 0.0, -1.0));
}
