//! Eclipse path: solar eclipse shadow geometry from Besselian elements
//!
//! This crate computes where the Moon's shadow falls on the Earth during a
//! solar eclipse. Starting from a published table of Besselian elements it
//! provides:
//!
//! - the umbral and penumbral outlines at any instant ([`compute_local_eclipse_features`])
//! - the begin/end circumstances and the northern/southern limits of the
//!   path of totality ([`compute_global_eclipse_features`])
//! - the position of an observer in the fundamental plane
//!   ([`observer_to_fundamental_plane_coordinates`])
//!
//! ```rust,no_run
//! use eclipse_path::{compute_global_eclipse_features, BesselianTable};
//!
//! let table = BesselianTable::from_file("2024-04-08.json").unwrap();
//! let features = compute_global_eclipse_features(&table);
//! println!("Totality from {:.3} to {:.3} TT", features.begin_time, features.end_time);
//! ```

use thiserror::Error;

pub mod config;
pub mod constants;
pub mod coordinates;
pub mod elements;
pub mod geojson;
pub mod outline;
pub mod path;
pub mod pathtable;
pub mod polynomial;
pub mod time;

// Re-export commonly used types
pub use config::{OutlineConfig, PathConfig, SolverConfig};
pub use coordinates::{FundamentalPlaneCoordinates, GeographicCoordinate};
pub use elements::{BesselianElements, BesselianTable, ShadowType};
pub use outline::{LocalEclipseFeatures, ShadowOutlineCurve};
pub use path::{
    EclipseCircumstances, GlobalEclipseFeatures, LimitDirection, PathBounds, PathLimitLine,
    PathLimitPoint,
};
pub use polynomial::Polynomial;

/// Main error type for the eclipse-path library
#[derive(Debug, Error)]
pub enum EclipseError {
    #[error("Invalid Besselian table: {0}")]
    InvalidTable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Time error: {0}")]
    Time(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for eclipse-path operations
pub type Result<T> = std::result::Result<T, EclipseError>;

/// Computes the umbral and penumbral outlines at time `t` (TT hours)
///
/// Times outside the table's range are sampled anyway, with a warning.
pub fn compute_local_eclipse_features(table: &BesselianTable, t: f64) -> LocalEclipseFeatures {
    compute_local_eclipse_features_with_config(table, t, &SolverConfig::default())
}

/// [`compute_local_eclipse_features`] with explicit solver settings
pub fn compute_local_eclipse_features_with_config(
    table: &BesselianTable,
    t: f64,
    config: &SolverConfig,
) -> LocalEclipseFeatures {
    outline::compute_local_eclipse_features(table, t, &config.outline)
}

/// Computes begin/end timing, limit lines and bounds of the path of totality
pub fn compute_global_eclipse_features(table: &BesselianTable) -> GlobalEclipseFeatures {
    compute_global_eclipse_features_with_config(table, &SolverConfig::default())
}

/// [`compute_global_eclipse_features`] with explicit solver settings
pub fn compute_global_eclipse_features_with_config(
    table: &BesselianTable,
    config: &SolverConfig,
) -> GlobalEclipseFeatures {
    path::compute_global_eclipse_features(table, &config.path)
}

/// Converts an observer's position to fundamental plane coordinates
///
/// # Arguments
///
/// * `elements` - Besselian elements at the instant of interest
/// * `lat` - Geodetic latitude in degrees
/// * `long` - Longitude in degrees, positive east
/// * `height` - Height above sea level in meters
pub fn observer_to_fundamental_plane_coordinates(
    elements: &BesselianElements,
    lat: f64,
    long: f64,
    height: f64,
) -> FundamentalPlaneCoordinates {
    coordinates::observer_to_fundamental_plane(elements, lat, long, height)
}
