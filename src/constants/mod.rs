//! Constants module for eclipse geometry calculations

use std::f64::consts::PI;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// Seconds in an hour
pub const HOUR_S: f64 = 3_600.0;

// Earth constants
/// Earth's equatorial radius in meters
pub const EARTH_RADIUS: f64 = 6_378_137.0;
/// Square of the Earth's eccentricity, e² = 1 - b²/a²
///
/// This is the value conventionally paired with published Besselian element
/// tables, slightly larger than the WGS-84 figure of 0.00669438.
pub const E_SQUARED: f64 = 0.006_722_67;
/// sqrt(1 - e²), the polar to equatorial axis ratio
pub const SQRT_ONE_MINUS_E_SQUARED: f64 = 0.996_632_996_644_201;

// Rotation
/// Ratio of the sidereal to the synodic rotation rate
pub const SIDEREAL_TO_SYNODIC: f64 = 1.002_738;
/// Degrees of Earth rotation per second of mean solar time
pub const DEGREES_PER_SECOND: f64 = 360.0 / DAY_S;
/// Degrees of hour angle per second of ΔT (≈ 0.00417807)
pub const HOUR_ANGLE_RATE: f64 = SIDEREAL_TO_SYNODIC * DEGREES_PER_SECOND;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_ratio_matches_eccentricity() {
        assert!((SQRT_ONE_MINUS_E_SQUARED - (1.0 - E_SQUARED).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_hour_angle_rate() {
        assert!((HOUR_ANGLE_RATE - 0.004_178_07).abs() < 1e-8);
    }
}
