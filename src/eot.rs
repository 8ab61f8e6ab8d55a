//! Equation of time and the subsolar longitude derived from it.

use crate::calendar::{days_since_year_start, CivilDate};
use crate::error::Result;

/// Apparent minus mean solar time [min] on day `day_of_year` (0 = Jan 1).
///
/// Two-harmonic fit around a linear day angle referenced to 2000.
pub fn equation_of_time(year: i32, day_of_year: u32) -> f64 {
    let d = 6.240_040_77 + 0.017_201_97 * (365.25 * (year - 2000) as f64 + day_of_year as f64);
    -7.659 * d.sin() + 9.863 * (2.0 * d + 3.5932).sin()
}

/// Longitude [deg] of the point where the Sun is overhead at `at` (UTC).
pub fn subsolar_longitude(at: &CivilDate) -> Result<f64> {
    at.validate()?;
    let utc_hours = at.seconds_of_day() / 3600.0;
    let eot = equation_of_time(at.year, days_since_year_start(at.year, at.month, at.day)?);
    Ok(-15.0 * (utc_hours - 12.0 + eot / 60.0))
}
