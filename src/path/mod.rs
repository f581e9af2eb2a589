//! Global features of an eclipse
//!
//! Everything here describes the eclipse as a whole rather than one
//! instant: when the central phase begins and ends, where the northern and
//! southern limits of totality run, and a box that frames the path.

pub mod circumstances;
pub mod limits;

use serde::{Deserialize, Serialize};

pub use circumstances::{
    compute_start_end_circumstances, eclipse_circumstances, start_end_estimate, start_end_times,
    EclipseCircumstances, StartEndEstimate,
};
pub use limits::{
    compute_path_limit_line, path_limit_at_longitude, LimitDirection, PathLimitLine,
    PathLimitPoint,
};

use crate::config::PathConfig;
use crate::elements::{BesselianTable, ShadowType};

/// Bounding box and center of the path of totality
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathBounds {
    /// `[[min_lon, min_lat], [max_lon, max_lat]]`
    pub limits: [[f64; 2]; 2],
    /// `[lon, lat]` halfway between the middle points of the two limit lines
    pub center: [f64; 2],
}

/// Begin/end timing, limit lines and framing of a central eclipse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalEclipseFeatures {
    /// First contact of the umbral axis with the Earth, TT hours
    pub begin_time: f64,
    /// Last contact of the umbral axis with the Earth, TT hours
    pub end_time: f64,
    pub begin: EclipseCircumstances,
    pub end: EclipseCircumstances,
    pub umbra_limit_north: PathLimitLine,
    pub umbra_limit_south: PathLimitLine,
    /// Absent when either limit line has no resolved point
    pub bounds: Option<PathBounds>,
}

/// Frames the path using the first, middle and last point of each limit line
///
/// Sampling only six points keeps the box cheap to compute; it may clip the
/// outermost bulge of a strongly curved path.
pub fn path_bounds(north: &PathLimitLine, south: &PathLimitLine) -> Option<PathBounds> {
    let north_points = north.key_points()?;
    let south_points = south.key_points()?;

    let mut min = [f64::INFINITY; 2];
    let mut max = [f64::NEG_INFINITY; 2];
    for p in north_points.iter().chain(south_points.iter()) {
        min = [min[0].min(p.lon), min[1].min(p.lat)];
        max = [max[0].max(p.lon), max[1].max(p.lat)];
    }

    let (north_middle, south_middle) = (north_points[1], south_points[1]);
    Some(PathBounds {
        limits: [min, max],
        center: [
            (north_middle.lon + south_middle.lon) / 2.0,
            (north_middle.lat + south_middle.lat) / 2.0,
        ],
    })
}

/// Computes the global features of the eclipse described by `table`
pub fn compute_global_eclipse_features(
    table: &BesselianTable,
    config: &PathConfig,
) -> GlobalEclipseFeatures {
    let (begin, end) = compute_start_end_circumstances(table);

    let trace = |direction| {
        compute_path_limit_line(table, begin.lon, end.lon, direction, ShadowType::Umbra, config)
    };
    let umbra_limit_north = trace(LimitDirection::North);
    let umbra_limit_south = trace(LimitDirection::South);
    let bounds = path_bounds(&umbra_limit_north, &umbra_limit_south);

    GlobalEclipseFeatures {
        begin_time: begin.t,
        end_time: end.t,
        begin,
        end,
        umbra_limit_north,
        umbra_limit_south,
        bounds,
    }
}
