//! # Fundamental Plane Coordinates
//!
//! The Besselian fundamental plane passes through the Earth's center and is
//! perpendicular to the shadow axis. Positions are expressed in a
//! right-handed Cartesian frame measured in Earth equatorial radii:
//!
//! - **X**: along the fundamental plane, toward the east
//! - **Y**: along the fundamental plane, toward the north
//! - **Z**: along the shadow axis, toward the Moon
//!
//! An observer lies inside a shadow when its distance from the shadow axis,
//! measured in this frame, is smaller than the shadow radius at its `z`.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{DEG2RAD, EARTH_RADIUS, HOUR_ANGLE_RATE, SQRT_ONE_MINUS_E_SQUARED};
use crate::elements::BesselianElements;

/// Point in the fundamental plane frame, in Earth equatorial radii
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundamentalPlaneCoordinates {
    /// Eastward component
    pub x: f64,
    /// Northward component
    pub y: f64,
    /// Component along the shadow axis
    pub z: f64,
}

impl FundamentalPlaneCoordinates {
    /// Creates a new point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Distance from the Earth's center
    pub fn magnitude(&self) -> f64 {
        self.to_vector3().norm()
    }

    /// Distance from the shadow axis, measured parallel to the fundamental plane
    pub fn distance_from_axis(&self, elements: &BesselianElements) -> f64 {
        (self.x - elements.x).hypot(self.y - elements.y)
    }

    /// Converts to nalgebra Vector3 for linear algebra operations
    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Creates from nalgebra Vector3
    pub fn from_vector3(vec: Vector3<f64>) -> Self {
        Self {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
    }
}

/// Geocentric terms ρ·sin φ' and ρ·cos φ' for a geodetic latitude and height
///
/// `lat` is in degrees and `height` in meters above the reference ellipsoid.
/// Returns `(rho_sin_phi, rho_cos_phi)` in Earth equatorial radii.
pub fn geocentric_terms(lat: f64, height: f64) -> (f64, f64) {
    let phi = lat * DEG2RAD;
    // Parametric (reduced) latitude
    let u1 = (SQRT_ONE_MINUS_E_SQUARED * phi.tan()).atan();
    let h = height / EARTH_RADIUS;

    let rho_sin_phi = SQRT_ONE_MINUS_E_SQUARED * u1.sin() + h * phi.sin();
    let rho_cos_phi = u1.cos() + h * phi.cos();
    (rho_sin_phi, rho_cos_phi)
}

/// Local hour angle of the shadow axis at a longitude, in degrees
///
/// `long` is positive east. The ΔT term converts the ephemeris hour angle μ
/// to the Earth's actual rotation.
pub fn hour_angle(elements: &BesselianElements, long: f64) -> f64 {
    elements.mu + long - HOUR_ANGLE_RATE * elements.delta_t
}

/// Converts an observer's geodetic position into fundamental plane coordinates
///
/// # Arguments
///
/// * `elements` - Besselian elements at the instant of interest
/// * `lat` - Geodetic latitude in degrees
/// * `long` - Longitude in degrees, positive east
/// * `height` - Height above the reference ellipsoid in meters (0 for sea level)
///
/// # Examples
///
/// ```rust
/// use eclipse_path::coordinates::fundamental::observer_to_fundamental_plane;
/// use eclipse_path::BesselianTable;
/// use eclipse_path::polynomial::Polynomial;
///
/// let table = BesselianTable {
///     date: String::new(),
///     x: Polynomial::new(vec![0.0]),
///     y: Polynomial::new(vec![0.0]),
///     d: Polynomial::new(vec![0.0]),
///     mu: Polynomial::new(vec![0.0]),
///     l1: Polynomial::new(vec![0.5]),
///     l2: Polynomial::new(vec![0.0]),
///     tan_f1: 0.0,
///     tan_f2: 0.0,
///     t0: 0.0,
///     t_range: [-1.0, 1.0],
///     delta_t: 0.0,
/// };
/// let elements = table.elements_at(0.0);
///
/// // With d = 0 and H = 0, a point on the equator faces straight along the axis
/// let p = observer_to_fundamental_plane(&elements, 0.0, 0.0, 0.0);
/// assert!(p.x.abs() < 1e-12);
/// assert!(p.y.abs() < 1e-12);
/// assert!((p.z - 1.0).abs() < 1e-12);
/// ```
pub fn observer_to_fundamental_plane(
    elements: &BesselianElements,
    lat: f64,
    long: f64,
    height: f64,
) -> FundamentalPlaneCoordinates {
    let h = hour_angle(elements, long) * DEG2RAD;
    let d = elements.d * DEG2RAD;
    let (rho_sin_phi, rho_cos_phi) = geocentric_terms(lat, height);

    FundamentalPlaneCoordinates {
        x: rho_cos_phi * h.sin(),
        y: rho_sin_phi * d.cos() - rho_cos_phi * h.cos() * d.sin(),
        z: rho_sin_phi * d.sin() + rho_cos_phi * h.cos() * d.cos(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::tests::table_2024;
    use approx::assert_relative_eq;

    #[test]
    fn test_observer_at_sea_level_is_on_ellipsoid() {
        let elements = table_2024().elements_at(18.0);

        for lat in [-60.0, -10.0, 0.0, 25.0, 80.0] {
            for long in [-150.0, -90.0, 0.0, 45.0] {
                let p = observer_to_fundamental_plane(&elements, lat, long, 0.0);
                let r = p.magnitude();
                // Between polar and equatorial radius
                assert!(r <= 1.0 + 1e-12, "radius {} too large", r);
                assert!(r >= SQRT_ONE_MINUS_E_SQUARED - 1e-12, "radius {} too small", r);
            }
        }
    }

    #[test]
    fn test_equator_point_has_unit_radius() {
        let elements = table_2024().elements_at(18.0);
        let p = observer_to_fundamental_plane(&elements, 0.0, -100.0, 0.0);
        assert_relative_eq!(p.magnitude(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_height_increases_radius() {
        let elements = table_2024().elements_at(18.0);
        let sea = observer_to_fundamental_plane(&elements, 40.0, -100.0, 0.0);
        let peak = observer_to_fundamental_plane(&elements, 40.0, -100.0, 4_000.0);

        let gain = (peak.magnitude() - sea.magnitude()) * EARTH_RADIUS;
        assert_relative_eq!(gain, 4_000.0, epsilon = 1.0);
    }

    #[test]
    fn test_vector_conversion() {
        let p = FundamentalPlaneCoordinates::new(0.3, -0.4, 0.866);
        let v = p.to_vector3();
        assert_eq!(FundamentalPlaneCoordinates::from_vector3(v), p);
        assert_relative_eq!(p.magnitude(), v.norm());
    }
}
