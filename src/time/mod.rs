//! Time handling for Besselian element tables
//!
//! Tables express time as hours of Terrestrial Time (TT) on the event date.
//! Clocks and maps need Universal Time, which differs from TT by ΔT seconds.
//! This module converts between the two and between bare hour values and
//! `chrono` instants.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::constants::HOUR_S;
use crate::{EclipseError, Result};

/// Parses the `YYYY-MM-DD` date of an element table
pub fn parse_event_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| EclipseError::Time(format!("invalid event date '{}': {}", date, e)))
}

/// Converts TT hours into seconds of the UTC day
///
/// # Arguments
///
/// * `t` - Terrestrial Time in hours since midnight of the event date
/// * `delta_t` - TT - UT in seconds
///
/// # Examples
///
/// ```rust
/// use eclipse_path::time::to_universal_seconds;
///
/// assert_eq!(to_universal_seconds(18.0, 70.6), 64_729.4);
/// ```
pub fn to_universal_seconds(t: f64, delta_t: f64) -> f64 {
    t * HOUR_S - delta_t
}

/// Converts TT hours on the event date into a UTC instant
///
/// The instant is rounded to the nearest millisecond. Times past 24 h or
/// before 0 h roll over into the neighbouring days.
pub fn tt_hours_to_utc(date: &str, t: f64, delta_t: f64) -> Result<DateTime<Utc>> {
    let day = parse_event_date(date)?;
    let seconds = to_universal_seconds(t, delta_t);
    if !seconds.is_finite() {
        return Err(EclipseError::Time(format!(
            "cannot convert non-finite time {} to UTC",
            t
        )));
    }

    let offset = Duration::try_milliseconds((seconds * 1000.0).round() as i64)
        .ok_or_else(|| EclipseError::Time(format!("time offset {} s out of range", seconds)))?;
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| EclipseError::Time(format!("no midnight on {}", day)))?;

    Ok(DateTime::<Utc>::from_naive_utc_and_offset(midnight, Utc) + offset)
}

/// Converts a UTC instant into TT hours relative to the event date
pub fn utc_to_tt_hours(date: &str, instant: DateTime<Utc>, delta_t: f64) -> Result<f64> {
    let day = parse_event_date(date)?;
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| EclipseError::Time(format!("no midnight on {}", day)))?;
    let midnight = DateTime::<Utc>::from_naive_utc_and_offset(midnight, Utc);

    let elapsed = instant.signed_duration_since(midnight);
    let seconds = elapsed.num_milliseconds() as f64 / 1000.0;
    Ok((seconds + delta_t) / HOUR_S)
}

/// Formats an hour value as `HH:MM:SS.s`
pub fn format_hours(t: f64) -> String {
    if !t.is_finite() {
        return "--:--:--".to_string();
    }
    let total = (t * HOUR_S * 10.0).round() / 10.0;
    let sign = if total < 0.0 { "-" } else { "" };
    let total = total.abs();
    let hours = (total / HOUR_S).floor();
    let minutes = ((total - hours * HOUR_S) / 60.0).floor();
    let seconds = total - hours * HOUR_S - minutes * 60.0;
    format!(
        "{}{:02}:{:02}:{:04.1}",
        sign, hours as u64, minutes as u64, seconds
    )
}

/// Formats a duration in seconds the way eclipse tables print it, `NmSS.Ss`
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "-".to_string();
    }
    let total = (seconds.abs() * 10.0).round() / 10.0;
    let minutes = (total / 60.0).floor();
    format!("{}m{:04.1}s", minutes as u64, total - minutes * 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_parse_event_date() {
        let date = parse_event_date("2024-04-08").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 4, 8));

        assert!(matches!(parse_event_date("2024-13-01"), Err(EclipseError::Time(_))));
        assert!(matches!(parse_event_date("April 8"), Err(EclipseError::Time(_))));
    }

    #[test]
    fn test_tt_to_utc() {
        let utc = tt_hours_to_utc("2024-04-08", 18.0, 70.6).unwrap();
        assert_eq!(utc.hour(), 17);
        assert_eq!(utc.minute(), 58);
        assert_eq!(utc.second(), 49);
        assert_eq!(utc.timestamp_subsec_millis(), 400);
    }

    #[test]
    fn test_tt_to_utc_rolls_over_midnight() {
        let utc = tt_hours_to_utc("2024-04-08", 24.5, 0.0).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2024, 4, 9, 0, 30, 0).unwrap());

        let utc = tt_hours_to_utc("2024-04-08", 0.0, 70.0).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2024, 4, 7, 23, 58, 50).unwrap());
    }

    #[test]
    fn test_utc_to_tt_round_trip() {
        let instant = Utc.with_ymd_and_hms(2024, 4, 8, 18, 17, 16).unwrap();
        let t = utc_to_tt_hours("2024-04-08", instant, 69.2).unwrap();
        assert_relative_eq!(t, (18.0 * 3600.0 + 17.0 * 60.0 + 16.0 + 69.2) / 3600.0, epsilon = 1e-12);

        let back = tt_hours_to_utc("2024-04-08", t, 69.2).unwrap();
        assert_eq!(back, instant);
    }

    #[test]
    fn test_non_finite_time_rejected() {
        let result = tt_hours_to_utc("2024-04-08", f64::NAN, 70.0);
        assert!(matches!(result, Err(EclipseError::Time(_))));
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(18.0), "18:00:00.0");
        assert_eq!(format_hours(16.686), "16:41:09.6");
        assert_eq!(format_hours(f64::NAN), "--:--:--");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(126.27), "2m06.3s");
        assert_eq!(format_duration(59.96), "1m00.0s");
        assert_eq!(format_duration(f64::INFINITY), "-");
    }
}
