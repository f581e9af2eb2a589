//! Parser for published eclipse path tables
//!
//! Eclipse bulletins list the path of totality as a fixed-layout text table,
//! one line per time step:
//!
//! ```text
//!  Limits  39 27.3N 086 26.2W  38 34.3N 085 26.6W  38 45.2N 085 59.5W  1.056  45 204  197  04m27.2s
//!  17:00   29 10.3N 101 29.2W  27 48.7N 100 46.6W  28 29.6N 101 08.1W  1.056  67 148  198  04m21.4s
//! ```
//!
//! Each row holds the northern limit, southern limit and center line as
//! `DD MM.MN|S DDD MM.ME|W` pairs (or `-` when the point is off the Earth),
//! the Moon/Sun diameter ratio, the Sun's altitude and azimuth, the path
//! width and the central duration. Rows not starting with a time or the
//! word `Limits` are headers and are skipped.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::coordinates::GeographicCoordinate;
use crate::{EclipseError, Result};

/// One row of a path table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathTableRecord {
    /// `HH:MM` universal time, or `Limits`
    pub time_stamp: String,
    pub limit_north: Option<GeographicCoordinate>,
    pub limit_south: Option<GeographicCoordinate>,
    pub limit_center: Option<GeographicCoordinate>,
    pub diameter_ratio: Option<f64>,
    /// Central duration, seconds
    pub duration: Option<f64>,
}

impl PathTableRecord {
    /// True when all three coordinates are present
    pub fn is_complete(&self) -> bool {
        self.limit_north.is_some() && self.limit_south.is_some() && self.limit_center.is_some()
    }
}

/// Parsed path table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathTable {
    pub records: Vec<PathTableRecord>,
}

impl PathTable {
    /// Parse a table from its text form
    pub fn parse(text: &str) -> Result<Self> {
        let parser = PathTableParser::new()?;
        Ok(PathTable {
            records: text.lines().filter_map(|l| parser.parse_line(l)).collect(),
        })
    }

    /// Load and parse a table from a text file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Rows with all three coordinates present
    pub fn complete_records(&self) -> impl Iterator<Item = &PathTableRecord> {
        self.records.iter().filter(|r| r.is_complete())
    }

    /// Center line as `[longitude, latitude]` vertices
    pub fn center_line(&self) -> Vec<[f64; 2]> {
        self.complete_records()
            .filter_map(|r| r.limit_center.map(|c| c.to_long_lat()))
            .collect()
    }

    /// Outline of the path: the southern limit followed by the northern limit reversed
    ///
    /// The ring is closed by repeating its first vertex.
    pub fn limits_polygon(&self) -> Vec<[f64; 2]> {
        let south = self
            .complete_records()
            .filter_map(|r| r.limit_south.map(|c| c.to_long_lat()));
        let north: Vec<[f64; 2]> = self
            .complete_records()
            .filter_map(|r| r.limit_north.map(|c| c.to_long_lat()))
            .collect();
        let mut ring: Vec<[f64; 2]> = south.chain(north.into_iter().rev()).collect();
        if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
            if first != last {
                ring.push(first);
            }
        }
        ring
    }
}

/// Compiled patterns for reading table rows
///
/// Fields are matched left to right, each search resuming where the
/// previous match ended.
pub struct PathTableParser {
    time_stamp: Regex,
    latitude: Regex,
    longitude: Regex,
    ratio: Regex,
    skip: Regex,
    duration: Regex,
}

impl PathTableParser {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| EclipseError::Parse(format!("failed to compile pattern: {}", e)))
        };

        Ok(PathTableParser {
            time_stamp: compile(r"^\s*(\d+:\d+|Limits)")?,
            latitude: compile(r"(-)|(\d+) (\d+\.\d+)([NS])")?,
            longitude: compile(r"(-)|(\d+) (\d+\.\d+)([EW])")?,
            ratio: compile(r"\d+\.\d+")?,
            // Sun altitude, azimuth (or '-') and path width
            skip: compile(r"\d+\s+(?:\d+|-)\s+\d+")?,
            duration: compile(r"\d+m\d+\.\d+s")?,
        })
    }

    /// Parse one row, or `None` for header and blank lines
    pub fn parse_line(&self, line: &str) -> Option<PathTableRecord> {
        let caps = self.time_stamp.captures(line)?;
        let time_stamp = caps[1].to_string();
        let mut index = caps.get(0).map_or(0, |m| m.end());

        let mut coordinates = [None; 3];
        for coordinate in coordinates.iter_mut() {
            let (value, next) = self.parse_coordinate(line, index);
            *coordinate = value;
            index = next;
        }

        let diameter_ratio = self.ratio.find_at(line, index).and_then(|m| {
            index = m.end();
            m.as_str().parse::<f64>().ok()
        });
        if let Some(m) = self.skip.find_at(line, index) {
            index = m.end();
        }
        let duration = self
            .duration
            .find_at(line, index)
            .and_then(|m| parse_duration(m.as_str()).ok());

        let [limit_north, limit_south, limit_center] = coordinates;
        Some(PathTableRecord {
            time_stamp,
            limit_north,
            limit_south,
            limit_center,
            diameter_ratio,
            duration,
        })
    }

    /// Read a latitude/longitude pair starting at `index`
    ///
    /// Returns the coordinate, if both halves were given, and the index just
    /// past whatever was consumed.
    fn parse_coordinate(&self, line: &str, index: usize) -> (Option<GeographicCoordinate>, usize) {
        let mut index = index;

        let lat = self.latitude.captures_at(line, index).and_then(|caps| {
            index = caps.get(0).map_or(index, |m| m.end());
            sexagesimal(&caps, 'S')
        });
        let long = self.longitude.captures_at(line, index).and_then(|caps| {
            index = caps.get(0).map_or(index, |m| m.end());
            sexagesimal(&caps, 'W')
        });

        let coordinate = match (lat, long) {
            (Some(lat), Some(long)) => Some(GeographicCoordinate::new(lat, long)),
            _ => None,
        };
        (coordinate, index)
    }
}

/// Converts degree/minute/hemisphere captures into signed degrees
///
/// `negative` is the hemisphere letter that flips the sign. A bare `-`
/// placeholder yields `None`.
fn sexagesimal(caps: &regex::Captures, negative: char) -> Option<f64> {
    if caps.get(1).is_some() {
        return None;
    }
    let degrees: f64 = caps.get(2)?.as_str().parse().ok()?;
    let minutes: f64 = caps.get(3)?.as_str().parse().ok()?;
    let hemisphere = caps.get(4)?.as_str();

    let value = degrees + minutes / 60.0;
    if hemisphere.starts_with(negative) {
        Some(-value)
    } else {
        Some(value)
    }
}

/// Parses a duration written as `NmSS.Ss` into seconds
///
/// # Examples
///
/// ```rust
/// use eclipse_path::pathtable::parse_duration;
///
/// assert_eq!(parse_duration("04m21.5s").unwrap(), 261.5);
/// ```
pub fn parse_duration(text: &str) -> Result<f64> {
    let malformed = || EclipseError::Parse(format!("malformed duration '{}'", text));

    let (minutes, rest) = text.trim().split_once('m').ok_or_else(malformed)?;
    let seconds = rest.strip_suffix('s').ok_or_else(malformed)?;
    let minutes: f64 = minutes.parse().map_err(|_| malformed())?;
    let seconds: f64 = seconds.parse().map_err(|_| malformed())?;
    Ok(minutes * 60.0 + seconds)
}
