//! Longitude-based time zone estimate. Not a political time-zone database.

use serde::Serialize;

use crate::error::{Result, SolarError};

/// Whole-hour offset of a meridian from UTC, 15 degrees per hour, ties to even.
pub fn solar_hour_offset(longitude: f64) -> i32 {
    (longitude / 15.0).round_ties_even() as i32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeZone {
    pub utc_offset_hours: i32,
    pub label: String,
}

impl TimeZone {
    /// Offset in days, for shifting Julian dates.
    pub fn offset_days(&self) -> f64 {
        self.utc_offset_hours as f64 / 24.0
    }
}

/// Offset and `UTC±H` label for `longitude` [deg].
pub fn resolve_time_zone(longitude: f64) -> Result<TimeZone> {
    if !longitude.is_finite() {
        return Err(SolarError::InvalidLocation {
            latitude: 0.0,
            longitude,
        });
    }
    let utc_offset_hours = solar_hour_offset(longitude);
    let label = match utc_offset_hours {
        0 => "UTC".to_string(),
        h => format!("UTC{h:+}"),
    };
    Ok(TimeZone {
        utc_offset_hours,
        label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn san_diego_is_utc_minus_eight() {
        let tz = resolve_time_zone(-117.2124).unwrap();
        assert_eq!(tz.utc_offset_hours, -8);
        assert_eq!(tz.label, "UTC-8");
        assert!((tz.offset_days() + 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn labels() {
        assert_eq!(resolve_time_zone(0.0).unwrap().label, "UTC");
        assert_eq!(resolve_time_zone(5.0).unwrap().label, "UTC");
        assert_eq!(resolve_time_zone(151.21).unwrap().label, "UTC+10");
        assert_eq!(resolve_time_zone(-180.0).unwrap().label, "UTC-12");
        assert!(resolve_time_zone(f64::INFINITY).is_err());
    }

    #[test]
    fn half_hour_meridians_round_to_even() {
        assert_eq!(solar_hour_offset(97.5), 6);
        assert_eq!(solar_hour_offset(112.5), 8);
        assert_eq!(solar_hour_offset(-7.5), 0);
    }
}
