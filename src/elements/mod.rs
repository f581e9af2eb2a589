//! Besselian element tables and their instantaneous evaluation
//!
//! A [`BesselianTable`] is the published description of one eclipse: a
//! polynomial for each element plus a handful of constants. Sampling the
//! table at a time yields [`BesselianElements`], the snapshot that every
//! solver in this crate consumes.
//!
//! Times are expressed in hours of Terrestrial Time on the event date. The
//! polynomials themselves are in powers of `t - t0`.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::polynomial::Polynomial;
use crate::{EclipseError, Result};

/// Polynomial coefficients and constants describing one eclipse
///
/// Field names serialize in the camelCase form used by published JSON
/// element tables:
///
/// ```json
/// {
///   "date": "2024-04-08",
///   "x": [-0.318157, 0.5117105, 0.0000326, -0.0000085],
///   "y": [0.219747, 0.2709586, -0.0000594, -0.0000047],
///   "d": [7.5862, 0.014844, -0.000002],
///   "l1": [0.535813, 0.0000618, -0.0000128],
///   "l2": [-0.010274, 0.0000615, -0.0000127],
///   "mu": [89.59122, 15.004084],
///   "tanF1": 0.0046683,
///   "tanF2": 0.004645,
///   "t0": 18,
///   "tRange": [15.0, 21.0],
///   "deltaT": 70.6
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BesselianTable {
    /// Event date, `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    /// Shadow axis x coordinate (Earth radii)
    pub x: Polynomial,
    /// Shadow axis y coordinate (Earth radii)
    pub y: Polynomial,
    /// Declination of the shadow axis (degrees)
    pub d: Polynomial,
    /// Hour angle of the shadow axis (degrees)
    pub mu: Polynomial,
    /// Penumbral radius on the fundamental plane (Earth radii)
    pub l1: Polynomial,
    /// Umbral radius on the fundamental plane (Earth radii), negative for totality
    pub l2: Polynomial,
    /// Tangent of the penumbral cone half-angle
    pub tan_f1: f64,
    /// Tangent of the umbral cone half-angle
    pub tan_f2: f64,
    /// Reference time of the polynomials (TT hours)
    pub t0: f64,
    /// Interval of validity of the polynomials (TT hours)
    pub t_range: [f64; 2],
    /// TT - UT in seconds
    pub delta_t: f64,
}

impl BesselianTable {
    /// Parse and validate a table from its JSON form
    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: BesselianTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Load and validate a table from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(&path)?;
        Self::from_json_str(&contents)
    }

    /// Check the structural invariants of the table
    ///
    /// The solvers never call this; they accept whatever numbers they are
    /// given and let NaN propagate. Loaders call it so that malformed input
    /// is rejected before it reaches them.
    pub fn validate(&self) -> Result<()> {
        let series = [
            ("x", &self.x),
            ("y", &self.y),
            ("d", &self.d),
            ("mu", &self.mu),
            ("l1", &self.l1),
            ("l2", &self.l2),
        ];

        for (name, poly) in series {
            if poly.is_empty() {
                return Err(EclipseError::InvalidTable(format!(
                    "coefficient series '{}' is empty",
                    name
                )));
            }
            if poly.coefficients().iter().any(|c| !c.is_finite()) {
                return Err(EclipseError::InvalidTable(format!(
                    "coefficient series '{}' contains a non-finite value",
                    name
                )));
            }
        }

        let scalars = [
            ("tanF1", self.tan_f1),
            ("tanF2", self.tan_f2),
            ("t0", self.t0),
            ("deltaT", self.delta_t),
            ("tRange[0]", self.t_range[0]),
            ("tRange[1]", self.t_range[1]),
        ];
        if let Some((name, _)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(EclipseError::InvalidTable(format!(
                "'{}' is not a finite number",
                name
            )));
        }

        if self.t_range[0] > self.t_range[1] {
            return Err(EclipseError::InvalidTable(format!(
                "tRange [{}, {}] is reversed",
                self.t_range[0], self.t_range[1]
            )));
        }
        if self.t0 < self.t_range[0] || self.t0 > self.t_range[1] {
            return Err(EclipseError::InvalidTable(format!(
                "t0 = {} lies outside tRange [{}, {}]",
                self.t0, self.t_range[0], self.t_range[1]
            )));
        }

        Ok(())
    }

    /// True when `t` (TT hours) lies inside the table's range of validity
    pub fn contains_time(&self, t: f64) -> bool {
        t >= self.t_range[0] && t <= self.t_range[1]
    }

    /// Sample the elements at time `t` (TT hours)
    ///
    /// Sampling outside `tRange` is allowed but logged, since the
    /// polynomials lose accuracy quickly away from their fitted interval.
    pub fn elements_at(&self, t: f64) -> BesselianElements {
        if !self.contains_time(t) {
            warn!(
                "Sampling Besselian elements at t = {} outside valid range [{}, {}]; results will not be accurate",
                t, self.t_range[0], self.t_range[1]
            );
        }
        self.elements_at_offset(t - self.t0)
    }

    /// Sample the elements at `tau` hours from `t0`, without range checks
    pub fn elements_at_offset(&self, tau: f64) -> BesselianElements {
        BesselianElements {
            t: tau,
            x: self.x.evaluate(tau),
            y: self.y.evaluate(tau),
            d: self.d.evaluate(tau),
            mu: self.mu.evaluate(tau),
            l1: self.l1.evaluate(tau),
            l2: self.l2.evaluate(tau),
            tan_f1: self.tan_f1,
            tan_f2: self.tan_f2,
            t0: self.t0,
            t_range: self.t_range,
            delta_t: self.delta_t,
        }
    }

    /// Velocity (x', y') of the shadow axis at `tau`, Earth radii per hour
    pub fn axis_velocity(&self, tau: f64) -> (f64, f64) {
        (self.x.derivative(tau), self.y.derivative(tau))
    }

    /// Rate of change of μ at `tau`, degrees per hour
    pub fn mu_rate(&self, tau: f64) -> f64 {
        self.mu.derivative(tau)
    }

    /// Rate of change of d at `tau`, degrees per hour
    pub fn d_rate(&self, tau: f64) -> f64 {
        self.d.derivative(tau)
    }
}

/// Instantaneous Besselian elements
///
/// All polynomial quantities are evaluated at `t`, which is measured in hours
/// from `t0`. The table constants are copied along for convenience.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BesselianElements {
    /// Sample time, hours from `t0`
    pub t: f64,
    pub x: f64,
    pub y: f64,
    /// Declination, degrees
    pub d: f64,
    /// Hour angle, degrees
    pub mu: f64,
    pub l1: f64,
    pub l2: f64,
    pub tan_f1: f64,
    pub tan_f2: f64,
    pub t0: f64,
    pub t_range: [f64; 2],
    pub delta_t: f64,
}

impl BesselianElements {
    /// Absolute sample time, TT hours
    pub fn time(&self) -> f64 {
        self.t0 + self.t
    }

    /// Distance of the shadow axis from the Earth's center on the fundamental plane
    pub fn axis_distance(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Which of the two shadow cones to trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowType {
    /// Inner cone, total (or annular) eclipse
    Umbra,
    /// Outer cone, partial eclipse
    Penumbra,
}

impl ShadowType {
    /// Radius of this shadow's cone on the fundamental plane
    pub fn radius(&self, elements: &BesselianElements) -> f64 {
        match self {
            ShadowType::Umbra => elements.l2,
            ShadowType::Penumbra => elements.l1,
        }
    }

    /// Tangent of this shadow cone's half-angle
    pub fn cone_tangent(&self, elements: &BesselianElements) -> f64 {
        match self {
            ShadowType::Umbra => elements.tan_f2,
            ShadowType::Penumbra => elements.tan_f1,
        }
    }

    /// Get the shadow's name as a string
    pub fn name(&self) -> &'static str {
        match self {
            ShadowType::Umbra => "umbra",
            ShadowType::Penumbra => "penumbra",
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    pub(crate) const ECLIPSE_2024_04_08: &str = r#"{
        "date": "2024-04-08",
        "x": [-0.318157, 0.5117105, 0.0000326, -0.0000085],
        "y": [0.219747, 0.2709586, -0.0000594, -0.0000047],
        "d": [7.5862, 0.014844, -0.000002],
        "l1": [0.535813, 0.0000618, -0.0000128],
        "l2": [-0.010274, 0.0000615, -0.0000127],
        "mu": [89.59122, 15.004084],
        "tanF1": 0.0046683,
        "tanF2": 0.004645,
        "t0": 18,
        "tRange": [15.0, 21.0],
        "deltaT": 70.6
    }"#;

    pub(crate) fn table_2024() -> BesselianTable {
        BesselianTable::from_json_str(ECLIPSE_2024_04_08).unwrap()
    }

    #[test]
    fn test_parse_reference_table() {
        let table = table_2024();
        assert_eq!(table.date, "2024-04-08");
        assert_eq!(table.x.degree(), 3);
        assert_eq!(table.mu.degree(), 1);
        assert_eq!(table.tan_f1, 0.0046683);
        assert_eq!(table.t0, 18.0);
        assert_eq!(table.t_range, [15.0, 21.0]);
        assert_eq!(table.delta_t, 70.6);
    }

    #[test]
    fn test_elements_at_reference_time() {
        let table = table_2024();
        let elements = table.elements_at(18.0);

        // At t0 every element equals its constant coefficient
        assert_eq!(elements.t, 0.0);
        assert_eq!(elements.x, -0.318157);
        assert_eq!(elements.y, 0.219747);
        assert_eq!(elements.d, 7.5862);
        assert_eq!(elements.mu, 89.59122);
        assert_eq!(elements.l1, 0.535813);
        assert_eq!(elements.l2, -0.010274);
        assert_eq!(elements.time(), 18.0);
        assert_eq!(elements.tan_f2, table.tan_f2);
    }

    #[test]
    fn test_elements_one_hour_later() {
        let table = table_2024();
        let elements = table.elements_at(19.0);

        assert_relative_eq!(elements.x, -0.318157 + 0.5117105 + 0.0000326 - 0.0000085, epsilon = 1e-12);
        assert_relative_eq!(elements.mu, 89.59122 + 15.004084, epsilon = 1e-12);
        assert_relative_eq!(elements.time(), 19.0);
    }

    #[test]
    fn test_out_of_range_time_still_computes() {
        let table = table_2024();
        assert!(!table.contains_time(23.0));

        let elements = table.elements_at(23.0);
        assert!(elements.x.is_finite());
        assert_eq!(elements.t, 5.0);
    }

    #[test]
    fn test_rates() {
        let table = table_2024();
        let (xp, yp) = table.axis_velocity(0.0);
        assert_eq!(xp, 0.5117105);
        assert_eq!(yp, 0.2709586);
        assert_eq!(table.mu_rate(0.0), 15.004084);
        assert_eq!(table.d_rate(0.0), 0.014844);
    }

    #[test]
    fn test_shadow_type_selection() {
        let elements = table_2024().elements_at(18.0);
        assert_eq!(ShadowType::Umbra.radius(&elements), elements.l2);
        assert_eq!(ShadowType::Penumbra.radius(&elements), elements.l1);
        assert_eq!(ShadowType::Umbra.cone_tangent(&elements), elements.tan_f2);
        assert_eq!(ShadowType::Penumbra.cone_tangent(&elements), elements.tan_f1);
        assert_eq!(ShadowType::Penumbra.name(), "penumbra");
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let json = ECLIPSE_2024_04_08.replace("\"tanF2\": 0.004645,", "");
        let result = BesselianTable::from_json_str(&json);
        assert!(matches!(result, Err(EclipseError::Json(_))));
    }

    #[test]
    fn test_validation_rejects_empty_series() {
        let mut table = table_2024();
        table.l2 = Polynomial::default();
        match table.validate() {
            Err(EclipseError::InvalidTable(msg)) => assert!(msg.contains("l2")),
            other => panic!("expected InvalidTable, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_rejects_t0_outside_range() {
        let mut table = table_2024();
        table.t0 = 22.0;
        assert!(matches!(table.validate(), Err(EclipseError::InvalidTable(_))));

        let mut table = table_2024();
        table.t_range = [21.0, 15.0];
        assert!(matches!(table.validate(), Err(EclipseError::InvalidTable(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ECLIPSE_2024_04_08.as_bytes()).unwrap();

        let table = BesselianTable::from_file(file.path()).unwrap();
        assert_eq!(table, table_2024());

        let missing = BesselianTable::from_file("/nonexistent/table.json");
        assert!(matches!(missing, Err(EclipseError::Io(_))));
    }
}
