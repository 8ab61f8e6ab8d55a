//! Vectors, rotations and heading helpers in the orbital-plane frame.
//!
//! x points at the fixed reference direction in the orbital plane and z along
//! the orbital normal. All rotations are active and right-handed
//! (counter-clockwise when viewed from the tip of the axis).

use std::f64::consts::TAU;

use nalgebra::{Rotation3, Unit};

pub type Vector3 = nalgebra::Vector3<f64>;
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Rotation by `angle` [rad] about the x axis.
pub fn rotation_x(angle: f64) -> Matrix3 {
    rotation_about(Vector3::x_axis(), angle)
}

/// Rotation by `angle` [rad] about the y axis.
pub fn rotation_y(angle: f64) -> Matrix3 {
    rotation_about(Vector3::y_axis(), angle)
}

/// Rotation by `angle` [rad] about the z axis.
pub fn rotation_z(angle: f64) -> Matrix3 {
    rotation_about(Vector3::z_axis(), angle)
}

fn rotation_about(axis: Unit<Vector3>, angle: f64) -> Matrix3 {
    Rotation3::from_axis_angle(&axis, angle).into_inner()
}

/// Direction of `v`. A zero vector stays zero.
pub fn direction(v: &Vector3) -> Vector3 {
    v.try_normalize(0.0).unwrap_or(*v)
}

/// Component of `v` perpendicular to the unit vector `normal`.
pub fn reject_from(v: &Vector3, normal: &Vector3) -> Vector3 {
    v - normal * v.dot(normal)
}

/// Counter-clockwise angle [rad, 0..2pi) that rotates `a` onto `b` about `axis`.
///
/// `axis` must be parallel or anti-parallel to `a x b`; the sign of the
/// determinant `axis . (a x b)` selects the sense of rotation.
pub fn rotation_angle(a: &Vector3, b: &Vector3, axis: &Vector3) -> f64 {
    let normal = a.cross(b);
    debug_assert!(
        normal.norm() <= 1e-12 * a.norm() * b.norm()
            || (direction(axis).dot(&direction(&normal)).abs() - 1.0).abs() < 1e-6,
        "rotation axis is not normal to both vectors"
    );
    let det = direction(axis).dot(&normal);
    (det.atan2(a.dot(b)) + TAU) % TAU
}

/// `degrees` folded into [0, 360).
pub fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Smallest absolute separation [deg] between two headings.
pub fn heading_difference(a: f64, b: f64) -> f64 {
    let d = wrap_degrees(a - b);
    d.min(360.0 - d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector3, b: Vector3) -> bool {
        (a - b).norm() < 1e-12
    }

    #[test]
    fn rotation_angle_quadrants() {
        let (x, y, z) = (Vector3::x(), Vector3::y(), Vector3::z());
        let deg = |r: f64| r.to_degrees();
        assert!((deg(rotation_angle(&x, &y, &z)) - 90.0).abs() < 1e-9);
        assert!((deg(rotation_angle(&y, &x, &z)) - 270.0).abs() < 1e-9);
        assert!((deg(rotation_angle(&y, &x, &-z)) - 90.0).abs() < 1e-9);
        assert_eq!(rotation_angle(&x, &(x * 2.0), &z), 0.0);
    }

    #[test]
    fn rotation_angle_is_in_range() {
        for i in 0..36 {
            let t = (i as f64 * 10.0 + 0.5).to_radians();
            let b = Vector3::new(t.cos(), t.sin(), 0.0);
            let angle = rotation_angle(&Vector3::x(), &b, &Vector3::z());
            assert!((0.0..TAU).contains(&angle));
            assert!((angle - t).abs() < 1e-9);
        }
    }

    #[test]
    fn elementary_rotations_are_counter_clockwise() {
        let q = std::f64::consts::FRAC_PI_2;
        assert!(close(rotation_z(q) * Vector3::x(), Vector3::y()));
        assert!(close(rotation_x(q) * Vector3::y(), Vector3::z()));
        assert!(close(rotation_y(q) * Vector3::z(), Vector3::x()));
    }

    #[test]
    fn transpose_inverts_rotation() {
        let r = rotation_x(0.3) * rotation_z(1.1) * rotation_y(-0.7);
        let v = Vector3::new(0.2, -1.5, 3.0);
        assert!(close(r.transpose() * (r * v), v));
        assert!((r.transpose() * r - Matrix3::identity()).norm() < 1e-12);
    }

    #[test]
    fn heading_helpers() {
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(720.5), 0.5);
        assert_eq!(wrap_degrees(-1e-20), 0.0);
        assert!((heading_difference(359.0, 0.2) - 1.2).abs() < 1e-12);
        assert!((heading_difference(10.0, 350.0) - 20.0).abs() < 1e-12);
        assert_eq!(heading_difference(289.0, 289.0), 0.0);
    }

    #[test]
    fn direction_and_rejection() {
        assert!((direction(&Vector3::new(0.0, 0.0, -7.0)).z + 1.0).abs() < 1e-15);
        assert_eq!(direction(&Vector3::zeros()), Vector3::zeros());
        let r = reject_from(&Vector3::new(1.0, 2.0, 3.0), &Vector3::z());
        assert_eq!(r, Vector3::new(1.0, 2.0, 0.0));
    }
}
