//! # Angle Utilities
//!
//! Small numeric helpers shared by the outline and path solvers: wrapping
//! longitudes, folding latitudes that overshoot a pole, and recovering an
//! angle in the correct quadrant from a (sine, cosine) pair that may have
//! drifted slightly off the unit circle.
//!
//! All angles here are in degrees unless a function name says otherwise.

use std::f64::consts::PI;

/// Modulo where negative values wrap to the positive range `[0, modulus)`
///
/// # Examples
///
/// ```rust
/// use eclipse_path::coordinates::angle::modulo_positive;
///
/// assert_eq!(modulo_positive(-90.0, 360.0), 270.0);
/// assert_eq!(modulo_positive(450.0, 360.0), 90.0);
/// ```
pub fn modulo_positive(value: f64, modulus: f64) -> f64 {
    value.rem_euclid(modulus)
}

/// Wraps a longitude into the half-open interval (-180°, 180°]
///
/// # Examples
///
/// ```rust
/// use eclipse_path::coordinates::angle::normalize_longitude;
///
/// assert_eq!(normalize_longitude(190.0), -170.0);
/// assert_eq!(normalize_longitude(-180.0), 180.0);
/// assert_eq!(normalize_longitude(-45.0), -45.0);
/// ```
pub fn normalize_longitude(long: f64) -> f64 {
    let wrapped = modulo_positive(long, 360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Folds a latitude that overshot a pole back into [-90°, 90°]
///
/// Values within range are returned unchanged. A value of 95° becomes -85°,
/// matching the half-turn ambiguity of `atan`-based latitude recovery.
pub fn fold_latitude(lat: f64) -> f64 {
    if lat > 90.0 {
        lat - 180.0
    } else if lat < -90.0 {
        lat + 180.0
    } else {
        lat
    }
}

/// Wraps a latitude into [-90°, 90°) by reducing modulo 180°
///
/// Used for Newton iterates, which may wander several half-turns away.
pub fn wrap_latitude(lat: f64) -> f64 {
    modulo_positive(lat + 90.0, 180.0) - 90.0
}

/// Recovers an angle in radians from its sine and cosine
///
/// The inputs are clamped to [-1, 1] before the inverse functions are
/// applied, so values that are a rounding error outside the unit circle do
/// not produce NaN. The result lies in (-π, π].
///
/// # Examples
///
/// ```rust
/// use eclipse_path::coordinates::angle::solve_quadrant;
/// use std::f64::consts::PI;
///
/// let angle = solve_quadrant((3.0 * PI / 4.0).sin(), (3.0 * PI / 4.0).cos());
/// assert!((angle - 3.0 * PI / 4.0).abs() < 1e-12);
/// ```
pub fn solve_quadrant(sin: f64, cos: f64) -> f64 {
    let sin = sin.clamp(-1.0, 1.0);
    let cos = cos.clamp(-1.0, 1.0);

    if cos >= 0.0 {
        // Quadrants I and IV
        sin.asin()
    } else if sin >= 0.0 {
        // Quadrant II
        cos.acos()
    } else {
        // Quadrant III
        -cos.acos()
    }
}

/// Angular span between two bearings in degrees, positive and at most 360°
pub fn span_degrees(start: f64, end: f64) -> f64 {
    let span = end - start;
    if span > 360.0 {
        360.0
    } else {
        span
    }
}

/// Converts a bearing given in radians into degrees in [0°, 360°)
pub fn bearing_degrees(radians: f64) -> f64 {
    modulo_positive(radians * 180.0 / PI, 360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(180.0, 180.0)]
    #[case(-180.0, 180.0)]
    #[case(181.0, -179.0)]
    #[case(-181.0, 179.0)]
    #[case(540.0, 180.0)]
    #[case(-725.5, -5.5)]
    fn test_normalize_longitude(#[case] input: f64, #[case] expected: f64) {
        assert_relative_eq!(normalize_longitude(input), expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(45.0, 45.0)]
    #[case(90.0, 90.0)]
    #[case(95.0, -85.0)]
    #[case(-100.0, 80.0)]
    fn test_fold_latitude(#[case] input: f64, #[case] expected: f64) {
        assert_relative_eq!(fold_latitude(input), expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(10.0, 10.0)]
    #[case(100.0, -80.0)]
    #[case(-95.0, 85.0)]
    #[case(370.0, 10.0)]
    fn test_wrap_latitude(#[case] input: f64, #[case] expected: f64) {
        assert_relative_eq!(wrap_latitude(input), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_quadrant_matches_atan2() {
        for i in 0..72 {
            // Avoid the ±π seam where atan2 and the quadrant solver pick different signs
            let angle = -PI + 0.01 + i as f64 * (2.0 * PI - 0.02) / 71.0;
            let solved = solve_quadrant(angle.sin(), angle.cos());
            assert_relative_eq!(solved, angle.sin().atan2(angle.cos()), epsilon = 1e-7);
        }
    }

    #[test]
    fn test_solve_quadrant_tolerates_rounding() {
        // Slightly outside the unit circle must not produce NaN
        let angle = solve_quadrant(1.000_000_000_1, 0.0);
        assert_relative_eq!(angle, PI / 2.0, epsilon = 1e-12);

        let angle = solve_quadrant(0.0, -1.000_000_000_1);
        assert_relative_eq!(angle, PI, epsilon = 1e-12);
    }

    #[test]
    fn test_bearing_and_span() {
        assert_relative_eq!(bearing_degrees(-PI / 2.0), 270.0, epsilon = 1e-12);
        assert_eq!(span_degrees(10.0, 50.0), 40.0);
        assert_eq!(span_degrees(0.0, 400.0), 360.0);
    }
}
