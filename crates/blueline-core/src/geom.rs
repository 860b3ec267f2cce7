//! Vector helpers shared by the shape derivation rules.

use kurbo::Vec2;

/// Unsigned angle between two vectors, in radians within [0, pi].
///
/// The result carries no orientation sign; callers that need a direction
/// resolve it separately (see the sector sweep rule in `shapes::geometry`).
pub fn angle_between(a: Vec2, b: Vec2) -> f64 {
    let ratio = a.dot(b) / (a.hypot() * b.hypot());
    ratio.clamp(-1.0, 1.0).acos()
}

/// Rotate a vector by `angle` radians.
///
/// Positive angles rotate toward positive Y, which reads as clockwise on a
/// screen whose Y axis grows downward.
pub fn rotate(v: Vec2, angle: f64) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_angle_between_perpendicular() {
        let angle = angle_between(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0));
        assert!((angle - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_angle_between_parallel() {
        let angle = angle_between(Vec2::new(3.0, 0.0), Vec2::new(7.0, 0.0));
        assert!(angle.abs() < 1e-12);
    }

    #[test]
    fn test_angle_between_opposite() {
        let angle = angle_between(Vec2::new(1.0, 0.0), Vec2::new(-2.0, 0.0));
        assert!((angle - PI).abs() < 1e-12);
    }

    #[test]
    fn test_angle_is_unsigned() {
        let above = angle_between(Vec2::new(1.0, -1.0), Vec2::new(1.0, 0.0));
        let below = angle_between(Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0));
        assert!((above - below).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let rotated = rotate(Vec2::new(1.0, 0.0), FRAC_PI_2);
        assert!(rotated.x.abs() < 1e-12);
        assert!((rotated.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_preserves_length() {
        let v = Vec2::new(3.0, 4.0);
        let rotated = rotate(v, 1.234);
        assert!((rotated.hypot() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_by_zero_is_identity() {
        let v = Vec2::new(-2.5, 0.75);
        let rotated = rotate(v, 0.0);
        assert!((rotated.x - v.x).abs() < f64::EPSILON);
        assert!((rotated.y - v.y).abs() < f64::EPSILON);
    }
}
