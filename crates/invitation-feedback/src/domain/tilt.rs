//! Card tilt geometry.

/// Largest rotation on either axis, in degrees.
pub const MAX_TILT_DEG: f64 = 10.0;

/// Rotation for a pointer at (`x`, `y`), both fractions of the card's width
/// and height measured from its top-left corner. Out-of-range or non-finite
/// coordinates are clamped to the card.
///
/// Returns `(rotate_x, rotate_y)` in degrees: the card leans toward the
/// pointer, flat when the pointer is at its center.
#[must_use]
pub fn tilt_angles(x: f64, y: f64) -> (f64, f64) {
    let clamp = |v: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.5 };
    let (x, y) = (clamp(x), clamp(y));
    let rotate_x = (0.5 - y) * 2.0 * MAX_TILT_DEG;
    let rotate_y = (x - 0.5) * 2.0 * MAX_TILT_DEG;
    (rotate_x, rotate_y)
}

/// CSS transform for the given angles.
#[must_use]
pub fn tilt_transform(rotate_x: f64, rotate_y: f64) -> String {
    format!("perspective(1000px) rotateX({rotate_x:.1}deg) rotateY({rotate_y:.1}deg)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_flat() {
        let (rx, ry) = tilt_angles(0.5, 0.5);
        assert!(rx.abs() < f64::EPSILON);
        assert!(ry.abs() < f64::EPSILON);
    }

    #[test]
    fn test_corners_reach_max_tilt() {
        let (rx, ry) = tilt_angles(1.0, 0.0);
        assert!((rx - MAX_TILT_DEG).abs() < 1e-9);
        assert!((ry - MAX_TILT_DEG).abs() < 1e-9);

        let (rx, ry) = tilt_angles(0.0, 1.0);
        assert!((rx + MAX_TILT_DEG).abs() < 1e-9);
        assert!((ry + MAX_TILT_DEG).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let (rx, ry) = tilt_angles(7.0, -3.0);
        assert!((rx - MAX_TILT_DEG).abs() < 1e-9);
        assert!((ry - MAX_TILT_DEG).abs() < 1e-9);

        let (rx, ry) = tilt_angles(f64::NAN, f64::INFINITY);
        assert!(rx.abs() < f64::EPSILON);
        assert!(ry.abs() < f64::EPSILON);
    }

    #[test]
    fn test_transform_format() {
        assert_eq!(
            tilt_transform(2.5, -10.0),
            "perspective(1000px) rotateX(2.5deg) rotateY(-10.0deg)"
        );
    }
}
