//! Shadow outlines at a single instant
//!
//! The umbra and penumbra are circles on the fundamental plane centered on
//! the shadow axis. Their outline on the ground is found by walking around
//! that circle in steps of the boundary angle Q (measured from the
//! fundamental plane's y axis) and projecting every point onto the
//! ellipsoid. The cone widens or narrows with distance from the fundamental
//! plane, so each point needs a short fixed-point iteration on the radius.
//!
//! Only part of the circle may fall on the sunlit hemisphere. The valid arc
//! is computed in closed form and its endpoints are nudged inward when
//! rounding pushes them just off the Earth.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{is_valid_step, OutlineConfig};
use crate::constants::{DEG2RAD, E_SQUARED, HOUR_ANGLE_RATE, RAD2DEG, SQRT_ONE_MINUS_E_SQUARED};
use crate::coordinates::angle::{bearing_degrees, fold_latitude, normalize_longitude, span_degrees};
use crate::coordinates::GeographicCoordinate;
use crate::elements::{BesselianElements, BesselianTable, ShadowType};

/// Closed ring of `[longitude, latitude]` vertices in degrees
pub type ShadowOutlineCurve = Vec<[f64; 2]>;

/// Range of boundary angles Q, in degrees, whose points lie on the sunlit side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    pub start: f64,
    pub end: f64,
}

impl AngleRange {
    /// The full circle, used when the whole outline is visible
    pub const FULL: AngleRange = AngleRange {
        start: 0.0,
        end: 360.0,
    };

    /// Width of the range in degrees, at most a full turn
    pub fn span(&self) -> f64 {
        span_degrees(self.start, self.end)
    }

    /// True when the range covers the whole circle
    pub fn is_full_circle(&self) -> bool {
        self.span() >= 360.0
    }
}

/// Declination-dependent factors of the auxiliary sphere
///
/// Scaling the fundamental plane's y axis by 1/ρ₁ turns the Earth's
/// ellipsoid into a unit sphere, on which intersections with the shadow
/// cone are easy to compute. d₁ is the declination in that scaled frame.
#[derive(Debug, Clone, Copy)]
struct AuxiliaryFrame {
    rho1: f64,
    rho2: f64,
    sin_d1: f64,
    cos_d1: f64,
    sin_d1_d2: f64,
    cos_d1_d2: f64,
}

impl AuxiliaryFrame {
    fn new(declination: f64) -> Self {
        let sin_d = (declination * DEG2RAD).sin();
        let cos_d = (declination * DEG2RAD).cos();
        let rho1 = (1.0 - E_SQUARED * cos_d * cos_d).sqrt();
        let rho2 = (1.0 - E_SQUARED * sin_d * sin_d).sqrt();

        AuxiliaryFrame {
            rho1,
            rho2,
            sin_d1: sin_d / rho1,
            cos_d1: SQRT_ONE_MINUS_E_SQUARED * cos_d / rho1,
            sin_d1_d2: E_SQUARED * sin_d * cos_d / (rho1 * rho2),
            cos_d1_d2: SQRT_ONE_MINUS_E_SQUARED / (rho1 * rho2),
        }
    }

    /// Ground position of the shadow boundary at angle `q` degrees
    fn boundary_point(
        &self,
        elements: &BesselianElements,
        q: f64,
        shadow: ShadowType,
        iterations: usize,
    ) -> GeographicCoordinate {
        let (sin_q, cos_q) = (q * DEG2RAD).sin_cos();
        let l = shadow.radius(elements);
        let tan_f = shadow.cone_tangent(elements);

        // The radius shrinks (or grows) by ζ·tan f at the point's height
        // above the fundamental plane, which in turn depends on the radius.
        let mut radius = l;
        let mut xi = f64::NAN;
        let mut eta1 = f64::NAN;
        let mut zeta1 = f64::NAN;
        for _ in 0..iterations {
            xi = elements.x - radius * sin_q;
            eta1 = (elements.y - radius * cos_q) / self.rho1;
            zeta1 = (1.0 - xi * xi - eta1 * eta1).sqrt();

            let zeta = self.rho2 * (zeta1 * self.cos_d1_d2 - eta1 * self.sin_d1_d2);
            radius = l - zeta * tan_f;
        }

        self.to_geographic(elements, xi, eta1, zeta1)
    }

    /// Inverse transform from the auxiliary sphere to geodetic coordinates
    fn to_geographic(
        &self,
        elements: &BesselianElements,
        xi: f64,
        eta1: f64,
        zeta1: f64,
    ) -> GeographicCoordinate {
        let cos_phi1_sin_theta = xi;
        let cos_phi1_cos_theta = zeta1 * self.cos_d1 - eta1 * self.sin_d1;
        let theta = cos_phi1_sin_theta.atan2(cos_phi1_cos_theta) * RAD2DEG;

        // Westward longitude of the point
        let lambda = elements.mu - HOUR_ANGLE_RATE * elements.delta_t - theta;

        let phi1 = (eta1 * self.cos_d1 + zeta1 * self.sin_d1).asin();
        let phi = (phi1.tan() / SQRT_ONE_MINUS_E_SQUARED).atan() * RAD2DEG;

        GeographicCoordinate {
            lat: fold_latitude(phi),
            long: normalize_longitude(-lambda),
        }
    }
}

/// Computes the ground position of a shadow boundary point
///
/// `q` is the boundary angle in degrees, measured from the fundamental
/// plane's y axis. Points off the sunlit hemisphere come back as NaN.
pub fn shadow_outline_point(
    elements: &BesselianElements,
    q: f64,
    shadow: ShadowType,
    iterations: usize,
) -> GeographicCoordinate {
    AuxiliaryFrame::new(elements.d).boundary_point(elements, q, shadow, iterations)
}

/// Computes the range of boundary angles that fall on the sunlit hemisphere
///
/// With the axis at distance `m` and bearing `M` from the Earth's center, a
/// boundary point at angle Q lies on the Earth's disk when its distance from
/// the center is below one, which by the law of cosines holds for
/// `|Q - M| <= QM` where `cos QM = (m² + l² - 1) / (2ml)`. A negative radius
/// (the umbra of a total eclipse) places the point on the opposite side of
/// the axis, so the same arc is centered on `M + 180°` instead.
///
/// The returned range is shrunk by `margin` degrees at each end. When `QM` is
/// undefined the circle is either fully on or fully off the disk and the
/// full circle is returned.
pub fn shadow_outline_angle_range(
    elements: &BesselianElements,
    shadow: ShadowType,
    margin: f64,
) -> AngleRange {
    let l = shadow.radius(elements);
    let m = elements.axis_distance();
    let mut bearing = elements.x.atan2(elements.y);
    if l < 0.0 {
        bearing += std::f64::consts::PI;
    }
    let l = l.abs();

    let cos_qm = (m * m + l * l - 1.0) / (2.0 * m * l);
    let qm = cos_qm.acos();

    let end = bearing_degrees(qm + bearing);
    let start = bearing_degrees(bearing - qm);
    if !start.is_finite() || !end.is_finite() {
        return AngleRange::FULL;
    }

    let start = start + margin;
    let end = if end < start { end + 360.0 } else { end };
    AngleRange {
        start,
        end: end - margin,
    }
}

/// Searches inward from a range endpoint for the first finite boundary point
///
/// `direction` is +1 for the start of the range and -1 for the end. Returns
/// the angle actually used and the point found there; when no finite point
/// exists within `salvage_max_deg` the last (NaN) attempt is returned so the
/// caller can drop it.
fn salvage_endpoint(
    frame: &AuxiliaryFrame,
    elements: &BesselianElements,
    angle: f64,
    direction: f64,
    shadow: ShadowType,
    config: &OutlineConfig,
) -> (f64, GeographicCoordinate) {
    let steps = (config.salvage_max_deg / config.salvage_step_deg).round() as usize;

    for k in 0..=steps {
        let q = angle + direction * k as f64 * config.salvage_step_deg;
        let point = frame.boundary_point(elements, q, shadow, config.boundary_iterations);
        if point.is_finite() {
            if k > 0 {
                debug!(
                    "{} outline endpoint moved from Q = {:.3} to Q = {:.3}",
                    shadow.name(),
                    angle,
                    q
                );
            }
            return (q, point);
        }
    }

    let q = angle + direction * config.salvage_max_deg;
    (
        q,
        frame.boundary_point(elements, q, shadow, config.boundary_iterations),
    )
}

/// Generates the outline polygon of the umbra or penumbra
///
/// The result is an ordered ring of geodetic points. When only part of the
/// circle is visible the ring is closed by repeating its first point; a full
/// circle is already closed because Q = 0° and Q = 360° coincide. Points that
/// could not be placed on the Earth are dropped, so an instant without a
/// visible shadow yields an empty (or nearly empty) outline, as does a
/// configuration whose angle steps cannot advance the sweep.
pub fn shadow_outline_path(
    elements: &BesselianElements,
    shadow: ShadowType,
    config: &OutlineConfig,
) -> Vec<GeographicCoordinate> {
    if !is_valid_step(config.angle_step_deg)
        || !is_valid_step(config.salvage_step_deg)
        || !config.salvage_max_deg.is_finite()
    {
        debug!(
            "Unusable {} outline steps (angle {}, salvage {} up to {}), no outline traced",
            shadow.name(),
            config.angle_step_deg,
            config.salvage_step_deg,
            config.salvage_max_deg
        );
        return Vec::new();
    }

    let frame = AuxiliaryFrame::new(elements.d);
    let base = shadow_outline_angle_range(elements, shadow, config.range_margin_deg);

    let (start, p_start) = salvage_endpoint(&frame, elements, base.start, 1.0, shadow, config);
    let (end, p_end) = salvage_endpoint(&frame, elements, base.end, -1.0, shadow, config);
    let range = AngleRange { start, end };

    let mut points = vec![p_start];

    // Interior angles only; the endpoints were placed above
    let step = config.angle_step_deg;
    let count = if range.span() > 0.0 {
        (range.span() / step).floor() as usize
    } else {
        0
    };
    points.extend(
        (1..=count)
            .map(|i| start + i as f64 * step)
            .filter(|&q| q < end)
            .map(|q| frame.boundary_point(elements, q, shadow, config.boundary_iterations)),
    );
    points.push(p_end);

    let before = points.len();
    points.retain(GeographicCoordinate::is_finite);
    if points.len() < before {
        debug!(
            "Dropped {} off-Earth {} outline points at t = {:.4}",
            before - points.len(),
            shadow.name(),
            elements.time()
        );
    }

    if !range.is_full_circle() {
        if let Some(&first) = points.first() {
            points.push(first);
        }
    }

    points
}

/// The shadow outlines visible at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalEclipseFeatures {
    /// Elements the outlines were computed from
    pub elements: BesselianElements,
    /// Umbral outline as `[longitude, latitude]` vertices
    pub umbra_outline: ShadowOutlineCurve,
    /// Penumbral outline as `[longitude, latitude]` vertices
    pub penumbra_outline: ShadowOutlineCurve,
}

impl LocalEclipseFeatures {
    /// The outline of the requested shadow
    pub fn outline(&self, shadow: ShadowType) -> &ShadowOutlineCurve {
        match shadow {
            ShadowType::Umbra => &self.umbra_outline,
            ShadowType::Penumbra => &self.penumbra_outline,
        }
    }
}

/// Converts solver output into `[longitude, latitude]` vertices
pub fn to_long_lat(points: &[GeographicCoordinate]) -> ShadowOutlineCurve {
    points.iter().map(GeographicCoordinate::to_long_lat).collect()
}

/// Computes the umbral and penumbral outlines at time `t` (TT hours)
pub fn compute_local_eclipse_features(
    table: &BesselianTable,
    t: f64,
    config: &OutlineConfig,
) -> LocalEclipseFeatures {
    let elements = table.elements_at(t);

    LocalEclipseFeatures {
        elements,
        umbra_outline: to_long_lat(&shadow_outline_path(&elements, ShadowType::Umbra, config)),
        penumbra_outline: to_long_lat(&shadow_outline_path(
            &elements,
            ShadowType::Penumbra,
            config,
        )),
    }
}
