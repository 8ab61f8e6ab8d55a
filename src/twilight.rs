//! Sunrise/sunset: the instant the Sun's upper limb meets the horizon.
//!
//! One day is searched as Sample -> Interpolate -> Bracket -> RootFind. The
//! half-day window runs from local midnight to local noon for sunrise and from
//! local noon to the following midnight for sunset. No refraction is applied.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::calendar::{CivilDate, JulianDate};
use crate::error::{Result, SolarError};
use crate::model::{check_location, AstronomicalModel};
use crate::numeric::{find_root, CubicSpline};
use crate::timezone::solar_hour_offset;
use crate::vector::wrap_degrees;

// ---------- Constants ----------
const ROOT_TOLERANCE_DAYS: f64 = 1e-9; // ~0.1 ms
const HALF_DAY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TwilightKind {
    Sunrise,
    Sunset,
}

impl TwilightKind {
    pub fn from_rise(rise: bool) -> Self {
        if rise { TwilightKind::Sunrise } else { TwilightKind::Sunset }
    }
}

/// A located horizon crossing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TwilightEvent {
    pub kind: TwilightKind,
    pub jd: JulianDate,
    /// Interpolated upper-limb altitude at `jd`, ~0.
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

/// Find the sunrise or sunset on the local calendar day `date`.
///
/// `sample_count` positions are evaluated across the half-day window and fitted
/// with cubic splines. Returns `NoCrossing` when the upper limb stays on one
/// side of the horizon for the whole window (polar day or night).
pub fn find_crossing(
    model: &AstronomicalModel,
    date: &CivilDate,
    latitude: f64,
    longitude: f64,
    kind: TwilightKind,
    sample_count: usize,
) -> Result<TwilightEvent> {
    if sample_count < CubicSpline::MIN_POINTS {
        return Err(SolarError::InvalidSampleCount { count: sample_count });
    }
    check_location(latitude, longitude)?;

    let utc_noon = CivilDate::noon(date.year, date.month, date.day)?.to_julian_date()?;
    let local_noon = utc_noon - solar_hour_offset(longitude) as f64 / 24.0;
    let start = match kind {
        TwilightKind::Sunrise => local_noon - HALF_DAY,
        TwilightKind::Sunset => local_noon,
    };

    // Sample (times are days after `start`)
    let step = HALF_DAY / (sample_count - 1) as f64;
    let offsets: Vec<f64> = (0..sample_count).map(|i| i as f64 * step).collect();
    let mut altitudes = Vec::with_capacity(sample_count);
    let mut azimuths = Vec::with_capacity(sample_count);
    for &dt in &offsets {
        let position = model.sun_location(start + dt, latitude, longitude)?;
        altitudes.push(position.upper_limb_altitude());
        azimuths.push(position.azimuth_deg);
    }
    unwrap_degrees(&mut azimuths);

    // Interpolate
    let altitude = CubicSpline::new(offsets.clone(), altitudes)?;
    let azimuth = CubicSpline::new(offsets, azimuths)?;

    // Bracket + RootFind
    let (lo, hi) = altitude.domain();
    let Some(root) = find_root(|t| altitude.evaluate(t), lo, hi, ROOT_TOLERANCE_DAYS)? else {
        debug!("[find_crossing] no {:?} on {} at lat {:.4}", kind, date.date_string(), latitude);
        return Err(SolarError::NoCrossing {
            date: date.date_string(),
        });
    };

    let event = TwilightEvent {
        kind,
        jd: start + root,
        altitude_deg: altitude.evaluate(root),
        azimuth_deg: wrap_degrees(azimuth.evaluate(root)),
    };
    debug!(
        "[find_crossing] {:?} on {}: {}, azi {:.3}",
        kind,
        date.date_string(),
        event.jd,
        event.azimuth_deg
    );
    Ok(event)
}

/// Remove 360-degree jumps so consecutive samples differ by at most 180.
fn unwrap_degrees(values: &mut [f64]) {
    for i in 1..values.len() {
        let step = (values[i] - values[i - 1] + 180.0).rem_euclid(360.0) - 180.0;
        values[i] = values[i - 1] + step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::format_timestamp;
    use crate::timezone::resolve_time_zone;

    const LAT: f64 = 32.8595;
    const LON: f64 = -117.2124;

    /// Minutes past local midnight of the event, using the longitude time zone.
    fn local_minutes(event: &TwilightEvent, longitude: f64) -> f64 {
        let tz = resolve_time_zone(longitude).unwrap();
        let local = (event.jd + tz.offset_days()).to_civil().unwrap();
        local.seconds_of_day() / 60.0
    }

    fn sunset(date: &str, lat: f64, lon: f64, samples: usize) -> Result<TwilightEvent> {
        let model = AstronomicalModel::new().unwrap();
        let date = CivilDate::parse(date).unwrap();
        find_crossing(&model, &date, lat, lon, TwilightKind::Sunset, samples)
    }

    #[test]
    fn san_diego_sunset_new_year_2020() {
        let event = sunset("2020-01-01", LAT, LON, 100).unwrap();
        // published 16:53 includes refraction, which this model leaves out
        let minutes = local_minutes(&event, LON);
        assert!((minutes - (16.0 * 60.0 + 53.0)).abs() < 5.0, "minutes={minutes}");
        assert!(event.altitude_deg.abs() < 1e-6);
        assert!((event.azimuth_deg - 242.5).abs() < 0.5, "azi={}", event.azimuth_deg);
    }

    #[test]
    fn san_diego_sunset_august_2024() {
        let event = sunset("2024-08-09", LAT, LON, 30).unwrap();
        let minutes = local_minutes(&event, LON);
        assert!((minutes - (18.0 * 60.0 + 39.0)).abs() < 5.0, "minutes={minutes}");
        assert!((event.azimuth_deg - 288.7).abs() < 0.5, "azi={}", event.azimuth_deg);
        let tz = resolve_time_zone(LON).unwrap();
        let local = format_timestamp(event.jd + tz.offset_days()).unwrap();
        assert!(local.starts_with("2024-08-09 18:3"), "{local}");
    }

    #[test]
    fn sample_density_barely_moves_the_answer() {
        let coarse = sunset("2020-03-20", LAT, LON, 30).unwrap();
        let fine = sunset("2020-03-20", LAT, LON, 100).unwrap();
        assert!((coarse.jd - fine.jd).abs() * 86_400.0 < 1.0);
        assert!((coarse.azimuth_deg - fine.azimuth_deg).abs() < 0.01);
    }

    #[test]
    fn san_diego_sunrise_is_in_the_northeast_in_june() {
        let model = AstronomicalModel::new().unwrap();
        let date = CivilDate::parse("2020-06-21").unwrap();
        let event = find_crossing(&model, &date, LAT, LON, TwilightKind::Sunrise, 100).unwrap();
        let minutes = local_minutes(&event, LON);
        // 05:41 PDT is 04:41 standard time
        assert!((minutes - (4.0 * 60.0 + 41.0)).abs() < 5.0, "minutes={minutes}");
        assert!(event.azimuth_deg > 55.0 && event.azimuth_deg < 65.0);
        assert_eq!(event.kind, TwilightKind::Sunrise);
    }

    #[test]
    fn southern_hemisphere_summer_sunset() {
        let event = sunset("2020-01-01", -33.87, 151.21, 100).unwrap();
        // Sydney: 20:09 AEDT, i.e. 19:09 at UTC+10
        let minutes = local_minutes(&event, 151.21);
        assert!((minutes - (19.0 * 60.0 + 9.0)).abs() < 6.0, "minutes={minutes}");
        assert!(event.azimuth_deg > 235.0 && event.azimuth_deg < 250.0);
    }

    #[test]
    fn polar_night_has_no_crossing() {
        let err = sunset("2020-12-21", 70.0, 20.0, 100).unwrap_err();
        assert_eq!(
            err,
            SolarError::NoCrossing {
                date: "2020-12-21".to_string()
            }
        );

        let model = AstronomicalModel::new().unwrap();
        let date = CivilDate::parse("2020-12-21").unwrap();
        let rise = find_crossing(&model, &date, 70.0, 20.0, TwilightKind::Sunrise, 100);
        assert!(matches!(rise, Err(SolarError::NoCrossing { .. })));
    }

    #[test]
    fn midnight_sun_has_no_crossing() {
        let err = sunset("2020-06-21", 75.0, 20.0, 50).unwrap_err();
        assert!(matches!(err, SolarError::NoCrossing { .. }));
    }

    #[test]
    fn rejects_too_few_samples() {
        let err = sunset("2020-01-01", LAT, LON, 3).unwrap_err();
        assert_eq!(err, SolarError::InvalidSampleCount { count: 3 });
    }

    #[test]
    fn unwrap_removes_jumps() {
        let mut values = [350.0, 355.0, 359.5, 2.0, 7.0];
        unwrap_degrees(&mut values);
        assert_eq!(values, [350.0, 355.0, 359.5, 362.0, 367.0]);

        let mut back = [5.0, 1.0, 358.0];
        unwrap_degrees(&mut back);
        assert_eq!(back, [5.0, 1.0, -2.0]);
    }
}
