//! Proleptic Gregorian calendar <-> Julian date.
//!
//! Day counting is anchored on the first Gregorian day, 1582-10-15, whose
//! noon is JD 2299161.0. Everything before it is rejected.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SolarError};

// ---------- Constants ----------
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// 1582-10-15 12:00:00 UTC.
pub const GREGORIAN_EPOCH_JD: f64 = 2_299_161.0;
/// 1582-10-15 00:00:00 UTC, the earliest representable instant.
pub const GREGORIAN_MIDNIGHT_JD: f64 = 2_299_160.5;

const EPOCH_YEAR: i32 = 1582;
const EPOCH_DAY_OF_YEAR: i64 = 287; // days_since_year_start(1582, 10, 15)
const MEAN_GREGORIAN_YEAR: f64 = 365.0 + 1.0 / 4.0 - 3.0 / 400.0; // [d]
const TENTHS_PER_DAY: f64 = SECONDS_PER_DAY * 10.0;

const MONTH_LENGTHS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

// ---------- Julian date ----------

/// A point on the continuous Julian day scale (UTC).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JulianDate(f64);

impl JulianDate {
    pub const fn new(days: f64) -> Self {
        Self(days)
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    /// Decompose into a civil date and time of day.
    pub fn to_civil(self) -> Result<CivilDate> {
        from_julian_date(self)
    }
}

impl Add<f64> for JulianDate {
    type Output = JulianDate;

    fn add(self, days: f64) -> JulianDate {
        JulianDate(self.0 + days)
    }
}

impl Sub<f64> for JulianDate {
    type Output = JulianDate;

    fn sub(self, days: f64) -> JulianDate {
        JulianDate(self.0 - days)
    }
}

impl Sub for JulianDate {
    type Output = f64;

    fn sub(self, other: JulianDate) -> f64 {
        self.0 - other.0
    }
}

impl fmt::Display for JulianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JD {:.6}", self.0)
    }
}

// ---------- Civil date ----------

/// Calendar date and UTC time of day, valid from 1582-10-15 onward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CivilDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl CivilDate {
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: f64,
    ) -> Result<Self> {
        let date = Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        };
        date.validate()?;
        Ok(date)
    }

    /// A calendar day, pinned at 12:00:00 UTC.
    pub fn noon(year: i32, month: u32, day: u32) -> Result<Self> {
        Self::new(year, month, day, 12, 0, 0.0)
    }

    /// Parse `YYYY-MM-DD` (noon UTC) or `YYYY-MM-DD HH:MM:SS.S`.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        let parse_err = || SolarError::ParseDate { input: input.to_string() };

        if s.contains(' ') {
            let dt = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                .map_err(|_| parse_err())?;
            Self::try_from(dt)
        } else {
            let d = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| parse_err())?;
            Self::noon(d.year(), d.month(), d.day())
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason| {
            Err(SolarError::InvalidDate {
                year: self.year,
                month: self.month,
                day: self.day,
                reason,
            })
        };

        if !(1..=12).contains(&self.month) {
            return invalid("month out of range");
        }
        if self.day < 1 || self.day > month_lengths(self.year)[self.month as usize - 1] {
            return invalid("day out of range for month");
        }
        if (self.year, self.month, self.day) < (EPOCH_YEAR, 10, 15) {
            return invalid("before the Gregorian epoch 1582-10-15");
        }
        if self.hour > 23 || self.minute > 59 || !(0.0..60.0).contains(&self.second) {
            return invalid("time of day out of range");
        }
        Ok(())
    }

    pub fn seconds_of_day(&self) -> f64 {
        self.hour as f64 * 3600.0 + self.minute as f64 * 60.0 + self.second
    }

    /// `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    pub fn to_julian_date(&self) -> Result<JulianDate> {
        to_julian_date(self)
    }

    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        let whole = self.second.floor();
        let nanos = ((self.second - whole) * 1e9).round().min(999_999_999.0) as u32;
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
            .and_hms_nano_opt(self.hour, self.minute, whole as u32, nanos)
    }
}

impl TryFrom<NaiveDateTime> for CivilDate {
    type Error = SolarError;

    fn try_from(dt: NaiveDateTime) -> Result<Self> {
        let second = dt.second() as f64 + dt.nanosecond() as f64 / 1e9;
        Self::new(dt.year(), dt.month(), dt.day(), dt.hour(), dt.minute(), second)
    }
}

impl FromStr for CivilDate {
    type Err = SolarError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CivilDate {
    /// Same layout as [`format_timestamp`]; a carry out of 23:59:59.95 rolls the date.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let per_day = TENTHS_PER_DAY as i64;
        let tenths = ((self.seconds_of_day() * 10.0).round() as i64).max(0);
        let mut date = *self;
        if tenths >= per_day {
            if let Ok(day_of_year) = days_since_year_start(self.year, self.month, self.day) {
                let (year, day_of_year) = next_day_of_year(self.year, day_of_year);
                if let Ok((month, day)) = month_day_from_day_of_year(year, day_of_year) {
                    (date.year, date.month, date.day) = (year, month, day);
                }
            }
        }
        write!(f, "{} {}", date.date_string(), clock_string(tenths % per_day))
    }
}

// ---------- Day counting ----------

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn month_lengths(year: i32) -> [u32; 12] {
    let mut months = MONTH_LENGTHS;
    if is_leap_year(year) {
        months[1] += 1;
    }
    months
}

pub fn year_length(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Days elapsed since January 1 of `year`: 0..=364, or 365 on Dec 31 of a leap year.
pub fn days_since_year_start(year: i32, month: u32, day: u32) -> Result<u32> {
    let months = month_lengths(year);
    if !(1..=12).contains(&month) || day < 1 || day > months[month as usize - 1] {
        return Err(SolarError::InvalidDate {
            year,
            month,
            day,
            reason: "month or day out of range",
        });
    }
    Ok(months[..month as usize - 1].iter().sum::<u32>() + day - 1)
}

/// Inverse of [`days_since_year_start`]; returns `(month, day)`.
pub fn month_day_from_day_of_year(year: i32, day_of_year: u32) -> Result<(u32, u32)> {
    if day_of_year >= year_length(year) {
        return Err(SolarError::InvalidDayOfYear { year, day: day_of_year });
    }

    let mut remaining = day_of_year;
    let mut month = 1;
    for len in month_lengths(year) {
        if remaining < len {
            break;
        }
        remaining -= len;
        month += 1;
    }
    Ok((month, remaining + 1))
}

/// Step one day forward in `(year, day_of_year)` form, rolling over at year end.
pub fn next_day_of_year(year: i32, day_of_year: u32) -> (i32, u32) {
    if day_of_year + 1 >= year_length(year) {
        (year + 1, 0)
    } else {
        (year, day_of_year + 1)
    }
}

/// Number of Gregorian leap years in `[start, end)`.
///
/// Julian leap years (every 4th) minus the centuries that are not divisible
/// by 400, counted in closed form.
pub fn leap_day_count(start: i32, end: i32) -> Result<i64> {
    if end < start {
        return Err(SolarError::InvalidYearRange { start, end });
    }
    let multiples = |k: i64| (end as i64 - 1).div_euclid(k) - (start as i64 - 1).div_euclid(k);
    let julian_leap = multiples(4);
    let skipped = multiples(100) - multiples(400);
    Ok(julian_leap - skipped)
}

// ---------- Conversions ----------

pub fn to_julian_date(date: &CivilDate) -> Result<JulianDate> {
    date.validate()?;

    let day_of_year = days_since_year_start(date.year, date.month, date.day)? as i64;
    let full_years = (date.year - EPOCH_YEAR) as i64;
    let leap_days = leap_day_count(EPOCH_YEAR, date.year)?;

    let days = full_years * 365 + leap_days + day_of_year - EPOCH_DAY_OF_YEAR;
    let noon = GREGORIAN_EPOCH_JD + days as f64;
    Ok(JulianDate(noon - 0.5 + date.seconds_of_day() / SECONDS_PER_DAY))
}

pub fn from_julian_date(jd: JulianDate) -> Result<CivilDate> {
    let raw = jd.value();
    if !raw.is_finite() || raw < GREGORIAN_MIDNIGHT_JD {
        return Err(SolarError::JulianDateOutOfRange { jd: raw });
    }

    let since = raw - GREGORIAN_MIDNIGHT_JD;
    let day_fraction = since.rem_euclid(1.0);
    // days since January 1, 1582 (Gregorian)
    let days = (since - day_fraction).round() as i64 + EPOCH_DAY_OF_YEAR;

    // The mean-year estimate can land one year off either way near a year boundary.
    let full_years = (days as f64 / MEAN_GREGORIAN_YEAR).floor() as i64;
    let mut year = EPOCH_YEAR + full_years as i32;
    let mut day_of_year = days - full_years * 365 - leap_day_count(EPOCH_YEAR, year)?;
    if day_of_year < 0 {
        year -= 1;
        day_of_year += year_length(year) as i64;
    }
    let guessed_len = year_length(year) as i64;
    if day_of_year >= guessed_len {
        year += 1;
        day_of_year -= guessed_len;
    }

    let day_of_year =
        u32::try_from(day_of_year).map_err(|_| SolarError::JulianDateOutOfRange { jd: raw })?;
    let (month, day) = month_day_from_day_of_year(year, day_of_year)?;

    let ut = day_fraction * SECONDS_PER_DAY;
    Ok(CivilDate {
        year,
        month,
        day,
        hour: (ut / 3600.0).floor() as u32,
        minute: ((ut % 3600.0) / 60.0).floor() as u32,
        second: ut % 60.0,
    })
}

/// `YYYY-MM-DD HH:MM:SS.S`, rounded to the nearest tenth of a second.
pub fn format_timestamp(jd: JulianDate) -> Result<String> {
    let raw = jd.value();
    if !raw.is_finite() || raw < GREGORIAN_MIDNIGHT_JD {
        return Err(SolarError::JulianDateOutOfRange { jd: raw });
    }

    // Work in whole tenths so a carry reaches the date as well.
    let tenths = ((raw - GREGORIAN_MIDNIGHT_JD) * TENTHS_PER_DAY).round() as i64;
    let per_day = TENTHS_PER_DAY as i64;
    let midnight = JulianDate(GREGORIAN_MIDNIGHT_JD + tenths.div_euclid(per_day) as f64);
    let date = from_julian_date(midnight)?;

    Ok(format!("{} {}", date.date_string(), clock_string(tenths.rem_euclid(per_day))))
}

/// `HH:MM:SS.S` for a count of tenths of a second since midnight.
fn clock_string(of_day: i64) -> String {
    let hour = of_day / 36_000;
    let minute = (of_day % 36_000) / 600;
    let tenth_seconds = of_day % 600;
    format!("{:02}:{:02}:{:02}.{}", hour, minute, tenth_seconds / 10, tenth_seconds % 10)
}
