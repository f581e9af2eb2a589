//! Begin and end of the central eclipse
//!
//! The umbral axis first touches the Earth at sunrise and leaves it at
//! sunset. Those instants are where the axis distance from the Earth's
//! center, measured on the flattened disk, equals one. Between them the
//! axis moves almost uniformly, so a linear model of its motion gives the
//! roots of a quadratic, refined once by repeating the estimate from the
//! elements at the first-pass roots.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEG2RAD, E_SQUARED, EARTH_RADIUS, HOUR_ANGLE_RATE, RAD2DEG, SQRT_ONE_MINUS_E_SQUARED,
};
use crate::coordinates::angle::{normalize_longitude, solve_quadrant};
use crate::elements::BesselianTable;

/// Offsets from `t0`, in hours, of the two roots of the axis-contact equation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartEndEstimate {
    pub tau1: f64,
    pub tau2: f64,
}

/// Conditions on the central line at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EclipseCircumstances {
    /// Instant, TT hours
    pub t: f64,
    /// Geodetic latitude of the axis sub-point, degrees
    pub lat: f64,
    /// Longitude of the axis sub-point, degrees, positive east
    pub lon: f64,
    /// Duration of the central phase on the center line, seconds
    pub duration: f64,
    /// Altitude of the Sun above the horizon, degrees
    pub sun_altitude: f64,
    /// Width of the umbral path, kilometers
    pub path_width: f64,
    /// Ratio of the apparent diameters of Moon and Sun
    pub diameter_ratio: f64,
}

impl EclipseCircumstances {
    /// True when the Moon covers the Sun completely at this instant
    pub fn is_total(&self) -> bool {
        self.diameter_ratio >= 1.0
    }
}

/// Scale factor 1/ρ₁ that turns the flattened Earth disk into a unit circle
fn flattening_scale(declination: f64) -> f64 {
    let cos_d = (declination * DEG2RAD).cos();
    1.0 / (1.0 - E_SQUARED * cos_d * cos_d).sqrt()
}

/// Solves for the times at which the axis crosses the limb of the Earth
///
/// `position` and `velocity` are the axis coordinates (x, y) and their rates
/// (x', y') at the reference time; `declination` sets the disk flattening.
/// The returned offsets are relative to that reference time. When the axis
/// misses the Earth both offsets are NaN.
pub fn start_end_estimate(
    declination: f64,
    position: Vector2<f64>,
    velocity: Vector2<f64>,
) -> StartEndEstimate {
    let omega = flattening_scale(declination);
    let p = Vector2::new(position.x, omega * position.y);
    let v = Vector2::new(velocity.x, omega * velocity.y);
    let n = v.norm();

    // Perpendicular distance from the center to the (straight) track
    let s = (v.x * p.y - p.x * v.y) / n;
    let tau = -p.dot(&v) / (n * n);
    let delta = (1.0 - s * s).sqrt() / n;

    StartEndEstimate {
        tau1: tau - delta,
        tau2: tau + delta,
    }
}

fn estimate_from_table(table: &BesselianTable, tau: f64) -> StartEndEstimate {
    let elements = table.elements_at_offset(tau);
    let (x_rate, y_rate) = table.axis_velocity(tau);
    start_end_estimate(
        elements.d,
        Vector2::new(elements.x, elements.y),
        Vector2::new(x_rate, y_rate),
    )
}

/// Refined begin and end offsets of the central eclipse, hours from `t0`
pub fn start_end_times(table: &BesselianTable) -> StartEndEstimate {
    let first = estimate_from_table(table, 0.0);
    let begin = first.tau1 + estimate_from_table(table, first.tau1).tau1;
    let end = first.tau2 + estimate_from_table(table, first.tau2).tau2;

    StartEndEstimate {
        tau1: begin,
        tau2: end,
    }
}

/// Computes the circumstances on the center line at `tau` hours from `t0`
///
/// The axis is assumed to meet the Earth; off the disk the sub-point is
/// placed on the limb, which is exactly where begin and end lie.
pub fn eclipse_circumstances(table: &BesselianTable, tau: f64) -> EclipseCircumstances {
    let el = table.elements_at_offset(tau);
    let (x_rate, y_rate) = table.axis_velocity(tau);

    let (sin_d, cos_d) = (el.d * DEG2RAD).sin_cos();
    let omega = flattening_scale(el.d);
    let p = table.mu_rate(tau) * DEG2RAD;

    // Axis velocity relative to the rotating Earth
    let b = y_rate - p * el.x * sin_d;
    let c = x_rate + p * el.y * sin_d;

    let y1 = omega * el.y;
    let b1 = omega * sin_d;
    let b2 = SQRT_ONE_MINUS_E_SQUARED * omega * cos_d;
    let big_b = (1.0 - el.x * el.x - y1 * y1).max(0.0).sqrt();

    let phi1 = (big_b * b1 + y1 * b2).asin();
    let cos_phi1 = phi1.cos();
    let hour_angle =
        solve_quadrant(el.x / cos_phi1, (big_b * b2 - y1 * b1) / cos_phi1) * RAD2DEG;

    let phi = (phi1.tan() / SQRT_ONE_MINUS_E_SQUARED).atan();
    let lon = -(el.mu - hour_angle - HOUR_ANGLE_RATE * el.delta_t);

    let l1_prime = el.l1 - big_b * el.tan_f1;
    let l2_prime = el.l2 - big_b * el.tan_f2;

    let a = c - p * big_b * cos_d;
    let speed = a.hypot(b);
    let duration = 7200.0 * l2_prime / speed;

    let sin_h = sin_d * phi.sin() + cos_d * phi.cos() * (hour_angle * DEG2RAD).cos();
    let sun_altitude = sin_h.clamp(-1.0, 1.0).asin() * RAD2DEG;

    let along = (el.x * a + el.y * b) / speed;
    let k = (big_b * big_b + along * along).sqrt();
    let path_width = 2.0 * EARTH_RADIUS / 1000.0 * l2_prime.abs() / k;

    EclipseCircumstances {
        t: el.time(),
        lat: phi * RAD2DEG,
        lon: normalize_longitude(lon),
        duration: duration.abs(),
        sun_altitude,
        path_width,
        diameter_ratio: (l1_prime - l2_prime) / (l1_prime + l2_prime),
    }
}

/// Circumstances at the first and last contact of the axis with the Earth
pub fn compute_start_end_circumstances(
    table: &BesselianTable,
) -> (EclipseCircumstances, EclipseCircumstances) {
    let times = start_end_times(table);
    (
        eclipse_circumstances(table, times.tau1),
        eclipse_circumstances(table, times.tau2),
    )
}
