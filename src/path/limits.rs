//! Northern and southern limits of the shadow path
//!
//! At a fixed longitude the limit of the path is the latitude at which the
//! shadow edge grazes the ground at the moment of closest approach. Both the
//! latitude and that moment are unknown, so they are found together by a
//! two-variable Newton iteration: the time correction moves the observer to
//! the instant of closest approach and the latitude correction moves it
//! onto the shadow edge.

use log::debug;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::config::{is_valid_step, PathConfig};
use crate::constants::{DEG2RAD, HOUR_ANGLE_RATE, RAD2DEG, SQRT_ONE_MINUS_E_SQUARED};
use crate::coordinates::angle::{normalize_longitude, wrap_latitude};
use crate::elements::{BesselianTable, ShadowType};

/// Which edge of the path to trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitDirection {
    North,
    South,
}

impl LimitDirection {
    fn sign(&self) -> f64 {
        match self {
            LimitDirection::North => 1.0,
            LimitDirection::South => -1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LimitDirection::North => "north",
            LimitDirection::South => "south",
        }
    }
}

/// One resolved point of a limit line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathLimitPoint {
    /// Instant of greatest eclipse at this point, TT hours
    pub t: f64,
    /// Geodetic latitude, degrees
    pub lat: f64,
    /// Longitude, degrees, positive east
    pub lon: f64,
}

impl PathLimitPoint {
    /// `[longitude, latitude]`
    pub fn to_long_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// A limit line sampled at regular longitude steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathLimitLine {
    /// Resolved points, ordered by longitude along the path
    pub points: Vec<PathLimitPoint>,
    /// Longitudes at which neither seed converged
    pub unresolved: usize,
    /// Distinct solutions reached only from the near-polar seed
    pub polar_branch: Vec<PathLimitPoint>,
}

impl PathLimitLine {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// First, middle and last points, the samples used for the path bounds
    pub fn key_points(&self) -> Option<[PathLimitPoint; 3]> {
        let first = *self.points.first()?;
        let last = *self.points.last()?;
        let middle = self.points[self.points.len() / 2];
        Some([first, middle, last])
    }

    /// The line as `[longitude, latitude]` vertices
    pub fn to_long_lat(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(PathLimitPoint::to_long_lat).collect()
    }
}

/// Solves for the path limit at one longitude
///
/// # Arguments
///
/// * `table` - Besselian elements of the eclipse
/// * `lon` - Longitude in degrees, positive east
/// * `direction` - Which limit to trace
/// * `shadow` - Umbra for the path of totality, penumbra for the partial zone
/// * `seed_lat` - Starting latitude of the iteration in degrees
/// * `config` - Iteration cap, tolerance and speed threshold
///
/// Returns `None` when the iteration fails to converge, produces a
/// non-finite value, or the shadow is not moving relative to the ground.
pub fn path_limit_at_longitude(
    table: &BesselianTable,
    lon: f64,
    direction: LimitDirection,
    shadow: ShadowType,
    seed_lat: f64,
    config: &PathConfig,
) -> Option<PathLimitPoint> {
    let mut tau = 0.0;
    let mut phi = seed_lat;
    let mut dt = f64::INFINITY;
    let mut dphi = f64::INFINITY;
    let mut iterations = 0;

    // Written so that a NaN step never counts as converged
    let converged =
        |dt: f64, dphi: f64| dt.abs() <= config.tolerance && dphi.abs() <= config.tolerance;

    while !converged(dt, dphi) && iterations < config.max_iterations {
        let el = table.elements_at_offset(tau);
        let (x_rate, y_rate) = table.axis_velocity(tau);
        let mu_rate = table.mu_rate(tau);
        let d_rate = table.d_rate(tau);

        let h = (el.mu + lon - HOUR_ANGLE_RATE * el.delta_t) * DEG2RAD;
        let (sin_h, cos_h) = h.sin_cos();
        let (sin_d, cos_d) = (el.d * DEG2RAD).sin_cos();

        // Observer on the ellipsoid at sea level
        let u1 = (SQRT_ONE_MINUS_E_SQUARED * (phi * DEG2RAD).tan()).atan();
        let rho_sin = SQRT_ONE_MINUS_E_SQUARED * u1.sin();
        let rho_cos = u1.cos();

        let xi = rho_cos * sin_h;
        let eta = rho_sin * cos_d - rho_cos * cos_h * sin_d;
        let zeta = rho_sin * sin_d + rho_cos * cos_h * cos_d;

        let xi_rate = (mu_rate * rho_cos * cos_h) * DEG2RAD;
        let eta_rate = (mu_rate * xi * sin_d - zeta * d_rate) * DEG2RAD;

        let l1_prime = el.l1 - zeta * el.tan_f1;
        let l2_prime = el.l2 - zeta * el.tan_f2;

        // Observer relative to the axis, and its rate of change
        let offset = Vector2::new(el.x - xi, el.y - eta);
        let velocity = Vector2::new(x_rate - xi_rate, y_rate - eta_rate);
        let n = velocity.norm();
        if n.is_nan() || n < config.min_relative_speed {
            debug!(
                "No relative shadow motion at lon = {:.2} (n = {:e}), giving up",
                lon, n
            );
            return None;
        }

        let w = (offset.y * velocity.x - offset.x * velocity.y) / n;
        let q = (velocity.y * sin_h * rho_sin
            + velocity.x * (cos_h * sin_d * rho_sin + cos_d * rho_cos))
            / (n * RAD2DEG);
        let edge = match shadow {
            ShadowType::Umbra => -l2_prime,
            ShadowType::Penumbra => l1_prime,
        };

        dt = -offset.dot(&velocity) / (n * n);
        dphi = (w + direction.sign() * edge.abs()) / q;

        tau += dt;
        phi += dphi;
        iterations += 1;
    }

    if !converged(dt, dphi) || !tau.is_finite() || !phi.is_finite() {
        debug!(
            "{} {} limit at lon = {:.2} from seed {:.1} did not converge after {} iterations",
            direction.name(),
            shadow.name(),
            lon,
            seed_lat,
            iterations
        );
        return None;
    }

    Some(PathLimitPoint {
        t: table.t0 + tau,
        lat: wrap_latitude(phi),
        lon: normalize_longitude(lon),
    })
}

/// Picks the solution kept for a longitude from the two seeded attempts
///
/// Returns the primary point and, when both seeds converged to latitudes at
/// least `tolerance` degrees apart, the distinct polar solution.
fn select_seed_solution(
    equatorial: Option<PathLimitPoint>,
    polar: Option<PathLimitPoint>,
    tolerance: f64,
) -> (Option<PathLimitPoint>, Option<PathLimitPoint>) {
    match (equatorial, polar) {
        (Some(eq), Some(pole)) if (eq.lat - pole.lat).abs() >= tolerance => (Some(eq), Some(pole)),
        (Some(eq), _) => (Some(eq), None),
        (None, pole) => (pole, None),
    }
}

/// Traces one limit line between the begin and end longitudes of the path
///
/// Longitudes are sampled eastward from `begin_lon` in steps of
/// `config.longitude_step_deg`, continuing through ±180° when `end_lon` lies
/// numerically west of `begin_lon`. Each longitude is solved from an
/// equatorial seed and from a near-polar seed on the side of the shadow
/// axis; the equatorial solution is preferred and the polar one is kept in
/// [`PathLimitLine::polar_branch`] only when it converges elsewhere.
pub fn compute_path_limit_line(
    table: &BesselianTable,
    begin_lon: f64,
    end_lon: f64,
    direction: LimitDirection,
    shadow: ShadowType,
    config: &PathConfig,
) -> PathLimitLine {
    let mut line = PathLimitLine::default();
    if !begin_lon.is_finite() || !end_lon.is_finite() {
        return line;
    }
    if !is_valid_step(config.longitude_step_deg) {
        debug!(
            "Longitude step {} cannot advance the sweep, no {} {} limit traced",
            config.longitude_step_deg,
            direction.name(),
            shadow.name()
        );
        return line;
    }

    let end_lon = if end_lon < begin_lon {
        end_lon + 360.0
    } else {
        end_lon
    };
    let step = config.longitude_step_deg;
    let count = ((end_lon - begin_lon) / step).ceil() as usize;
    let polar_seed = config.polar_seed_lat_deg * table.y.coefficient(0).signum();

    for i in 0..count {
        let lon = begin_lon + i as f64 * step;
        if lon >= end_lon {
            break;
        }

        let equatorial = path_limit_at_longitude(table, lon, direction, shadow, 0.0, config);
        let polar = path_limit_at_longitude(table, lon, direction, shadow, polar_seed, config);

        match select_seed_solution(equatorial, polar, config.duplicate_lat_tolerance_deg) {
            (Some(point), branch) => {
                line.points.push(point);
                line.polar_branch.extend(branch);
            }
            (None, _) => line.unresolved += 1,
        }
    }

    if line.unresolved > 0 {
        debug!(
            "{} {} limit: {} of {} longitudes unresolved",
            direction.name(),
            shadow.name(),
            line.unresolved,
            line.unresolved + line.points.len()
        );
    }

    line
}
