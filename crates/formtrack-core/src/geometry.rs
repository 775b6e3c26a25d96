//! Joint angle calculation using dot product.
//!
//! Points are `(x, y)` pairs in normalized image coordinates, `y` downward.

use crate::domain::{Joint, Skeleton};

/// Added to the magnitude product so coincident points never divide by zero.
const EPSILON: f64 = 1e-8;

/// Angle at `b` between rays `b→a` and `b→c`, in degrees (0–180).
///
/// Uses cos(θ) = (v1 · v2) / (|v1| × |v2| + ε). Degenerate input (a point
/// coinciding with the vertex) yields a zero dot product and therefore 90°.
pub fn vertex_angle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let v1 = (a.0 - b.0, a.1 - b.1);
    let v2 = (c.0 - b.0, c.1 - b.1);

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();

    let cos_angle = (dot / (mag1 * mag2 + EPSILON)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Angle between segment `top→bottom` and the vertical axis, in degrees (0–90).
///
/// 0° is perfectly upright; a horizontal segment gives 90°.
pub fn angle_from_vertical(top: (f64, f64), bottom: (f64, f64)) -> f64 {
    let dx = bottom.0 - top.0;
    let dy = bottom.1 - top.1;
    dx.abs().atan2(dy.abs()).to_degrees()
}

pub fn midpoint(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

/// Midpoint of two joints of a skeleton.
pub fn joint_midpoint(skeleton: &Skeleton, a: Joint, b: Joint) -> (f64, f64) {
    midpoint(skeleton.xy(a), skeleton.xy(b))
}

/// Hip-knee-ankle angle for one leg.
pub fn knee_angle(skeleton: &Skeleton, hip: Joint, knee: Joint, ankle: Joint) -> f64 {
    vertex_angle(skeleton.xy(hip), skeleton.xy(knee), skeleton.xy(ankle))
}

/// Mean of the left and right hip-knee-ankle angles.
pub fn avg_knee_angle(skeleton: &Skeleton) -> f64 {
    let left = knee_angle(skeleton, Joint::LeftHip, Joint::LeftKnee, Joint::LeftAnkle);
    let right = knee_angle(skeleton, Joint::RightHip, Joint::RightKnee, Joint::RightAnkle);
    (left + right) / 2.0
}

/// Shoulder-hip-knee angle taken through the left/right midpoints.
pub fn hip_angle(skeleton: &Skeleton) -> f64 {
    vertex_angle(
        joint_midpoint(skeleton, Joint::LeftShoulder, Joint::RightShoulder),
        joint_midpoint(skeleton, Joint::LeftHip, Joint::RightHip),
        joint_midpoint(skeleton, Joint::LeftKnee, Joint::RightKnee),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_line() {
        let angle = vertex_angle((0.0, 0.0), (0.5, 0.0), (1.0, 0.0));
        assert!((angle - 180.0).abs() < 0.1);
    }

    #[test]
    fn test_right_angle() {
        let angle = vertex_angle((0.0, 0.0), (0.5, 0.0), (0.5, 0.5));
        assert!((angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_folded_back() {
        let angle = vertex_angle((1.0, 0.0), (0.5, 0.0), (1.0, 0.0));
        assert!(angle < 0.1);
    }

    #[test]
    fn test_coincident_points_do_not_fault() {
        let angle = vertex_angle((0.5, 0.5), (0.5, 0.5), (0.5, 0.5));
        assert!(angle.is_finite());
        assert!((angle - 90.0).abs() < 1e-9);

        let angle = vertex_angle((0.2, 0.3), (0.2, 0.3), (0.9, 0.9));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_segment() {
        assert!(angle_from_vertical((0.5, 0.2), (0.5, 0.6)).abs() < 1e-9);
        // Direction does not matter.
        assert!(angle_from_vertical((0.5, 0.6), (0.5, 0.2)).abs() < 1e-9);
    }

    #[test]
    fn test_diagonal_and_horizontal_segments() {
        let diag = angle_from_vertical((0.4, 0.4), (0.6, 0.6));
        assert!((diag - 45.0).abs() < 1e-9);

        let flat = angle_from_vertical((0.2, 0.5), (0.8, 0.5));
        assert!((flat - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_from_vertical_degenerate_segment() {
        let angle = angle_from_vertical((0.5, 0.5), (0.5, 0.5));
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn test_midpoint() {
        let (x, y) = midpoint((0.2, 0.4), (0.6, 0.8));
        assert!((x - 0.4).abs() < 1e-12);
        assert!((y - 0.6).abs() < 1e-12);
    }
}
