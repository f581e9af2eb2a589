//! Coordinate systems used by the eclipse solvers
//!
//! - [`geographic`]: geodetic latitude/longitude on the reference ellipsoid
//! - [`fundamental`]: the Besselian fundamental plane frame
//! - [`angle`]: wrapping and quadrant helpers shared by both solvers

pub mod angle;
pub mod fundamental;
pub mod geographic;

pub use fundamental::{observer_to_fundamental_plane, FundamentalPlaneCoordinates};
pub use geographic::GeographicCoordinate;
