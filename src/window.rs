//! Scan a date range for sunrises/sunsets along a chosen compass heading.

use std::fmt;

use log::{debug, info};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::calendar::{
    days_since_year_start, format_timestamp, month_day_from_day_of_year, next_day_of_year,
    CivilDate,
};
use crate::error::{Result, SolarError};
use crate::model::{check_location, AstronomicalModel};
use crate::timezone::{resolve_time_zone, TimeZone};
use crate::twilight::{find_crossing, TwilightEvent, TwilightKind};
use crate::vector::heading_difference;

// ---------- Configuration ----------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search sunrises instead of sunsets.
    pub rise: bool,
    /// Accepted |heading - azimuth| [deg].
    pub tolerance_deg: f64,
    /// Samples across each half-day window.
    pub sample_count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            rise: false,
            tolerance_deg: 0.5,
            sample_count: 100,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance_deg.is_finite() || self.tolerance_deg <= 0.0 {
            return Err(SolarError::InvalidTolerance {
                tolerance: self.tolerance_deg,
            });
        }
        if self.sample_count < 4 {
            return Err(SolarError::InvalidSampleCount {
                count: self.sample_count,
            });
        }
        Ok(())
    }

    pub fn kind(&self) -> TwilightKind {
        TwilightKind::from_rise(self.rise)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

// ---------- Output model ----------

/// One qualifying sunrise/sunset, stamped in the observer's estimated local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationEvent {
    pub local_time: String, // YYYY-MM-DD HH:MM:SS.S
    pub tz_label: String,
    pub jd_utc: f64,
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

impl ObservationEvent {
    fn new(event: &TwilightEvent, tz: &TimeZone) -> Result<Self> {
        Ok(Self {
            local_time: format_timestamp(event.jd + tz.offset_days())?,
            tz_label: tz.label.clone(),
            jd_utc: event.jd.value(),
            altitude_deg: event.altitude_deg,
            azimuth_deg: event.azimuth_deg,
        })
    }
}

impl fmt::Display for ObservationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}; Alt. = {}, Azi. = {}",
            self.local_time,
            self.tz_label,
            format_significant(self.altitude_deg, 4),
            format_significant(self.azimuth_deg, 4)
        )
    }
}

// ---------- Search ----------

/// Every day in `[begin, end]` whose sunrise/sunset azimuth lies within
/// `config.tolerance_deg` of `heading_deg`, in date order.
///
/// Days without a crossing are skipped; any other failure aborts the scan.
pub fn find_window(
    model: &AstronomicalModel,
    heading_deg: f64,
    begin: &CivilDate,
    end: &CivilDate,
    observer: &Observer,
    config: &SearchConfig,
) -> Result<Vec<ObservationEvent>> {
    config.validate()?;
    check_location(observer.latitude_deg, observer.longitude_deg)?;
    let tz = resolve_time_zone(observer.longitude_deg)?;

    let days = days_in_range(begin, end)?;
    info!(
        "[find_window] scanning {} days from {} to {} for heading {:.2}",
        days.len(),
        begin.date_string(),
        end.date_string(),
        heading_deg
    );

    let crossing = |day: &CivilDate| -> Result<Option<TwilightEvent>> {
        match find_crossing(
            model,
            day,
            observer.latitude_deg,
            observer.longitude_deg,
            config.kind(),
            config.sample_count,
        ) {
            Ok(event) => Ok(Some(event)),
            Err(SolarError::NoCrossing { date }) => {
                debug!("[find_window] skipping {date}: no crossing");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    };

    #[cfg(feature = "parallel")]
    let outcomes: Vec<Result<Option<TwilightEvent>>> = days.par_iter().map(crossing).collect();
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<Result<Option<TwilightEvent>>> = days.iter().map(crossing).collect();

    let mut window = Vec::new();
    for outcome in outcomes {
        let Some(event) = outcome? else { continue };
        if heading_difference(event.azimuth_deg, heading_deg) < config.tolerance_deg {
            window.push(ObservationEvent::new(&event, &tz)?);
        }
    }

    info!("[find_window] found {} events", window.len());
    Ok(window)
}

/// Calendar days from `begin` to `end` inclusive, each pinned at noon.
fn days_in_range(begin: &CivilDate, end: &CivilDate) -> Result<Vec<CivilDate>> {
    begin.validate()?;
    end.validate()?;

    let last = (end.year, days_since_year_start(end.year, end.month, end.day)?);
    let mut year = begin.year;
    let mut day_of_year = days_since_year_start(begin.year, begin.month, begin.day)?;

    let mut days = Vec::new();
    while (year, day_of_year) <= last {
        let (month, day) = month_day_from_day_of_year(year, day_of_year)?;
        days.push(CivilDate::noon(year, month, day)?);
        (year, day_of_year) = next_day_of_year(year, day_of_year);
    }
    Ok(days)
}

/// C's `%.Ng`: `digits` significant digits, trailing zeros dropped, exponent
/// form below 1e-4 or from 10^digits up.
fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    // the exponent is taken after rounding, so 9.9996 counts as 1e1
    let sci = format!("{:.*e}", digits.saturating_sub(1), value);
    let Some((mantissa, exponent)) = sci.split_once('e') else { return format!("{value}") };
    let Ok(exponent) = exponent.parse::<i32>() else { return format!("{value}") };

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", strip_trailing_zeros(mantissa), sign, exponent.abs());
    }
    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    strip_trailing_zeros(&format!("{value:.decimals$}")).to_string()
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
