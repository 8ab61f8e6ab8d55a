//! Error types for the sunheading crate.

/// Error type for all fallible operations in the sunheading crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolarError {
    /// Civil date before 1582-10-15, or a field out of range for its year.
    #[error("invalid date {year:04}-{month:02}-{day:02}: {reason}")]
    InvalidDate {
        year: i32,
        month: u32,
        day: u32,
        reason: &'static str,
    },

    /// Leap-day counting needs `start <= end`.
    #[error("year range [{start}, {end}) is reversed")]
    InvalidYearRange { start: i32, end: i32 },

    /// Day-of-year index past the end of the given year.
    #[error("day {day} is out of range for year {year}")]
    InvalidDayOfYear { year: i32, day: u32 },

    /// Julian date before the first day of the Gregorian calendar.
    #[error("julian date {jd} precedes 1582-10-15 00:00:00")]
    JulianDateOutOfRange { jd: f64 },

    /// Input string is not `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS.S`.
    #[error("cannot parse '{input}' as a calendar date")]
    ParseDate { input: String },

    /// The Sun's upper limb never meets the horizon in the sampled window.
    #[error("no horizon crossing on {date}")]
    NoCrossing { date: String },

    /// An iterative solver hit its iteration cap.
    #[error("{solver} did not converge within {iterations} iterations")]
    NonConvergence {
        solver: &'static str,
        iterations: usize,
    },

    /// Latitude outside [-90, 90] or a non-finite coordinate.
    #[error("invalid location lat={latitude}, lon={longitude}")]
    InvalidLocation { latitude: f64, longitude: f64 },

    /// Azimuth has no meaning at the geographic poles.
    #[error("azimuth is undefined at latitude {latitude}")]
    UndefinedAzimuth { latitude: f64 },

    /// Cubic interpolation needs at least four samples.
    #[error("sample count must be >= 4, got {count}")]
    InvalidSampleCount { count: usize },

    /// Heading tolerance must be finite and positive.
    #[error("tolerance must be finite and positive, got {tolerance}")]
    InvalidTolerance { tolerance: f64 },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SolarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_date() {
        let e = SolarError::InvalidDate {
            year: 1582,
            month: 10,
            day: 4,
            reason: "before the Gregorian epoch",
        };
        assert_eq!(
            e.to_string(),
            "invalid date 1582-10-04: before the Gregorian epoch"
        );
    }

    #[test]
    fn error_no_crossing() {
        let e = SolarError::NoCrossing {
            date: "2020-12-21".to_string(),
        };
        assert_eq!(e.to_string(), "no horizon crossing on 2020-12-21");
    }

    #[test]
    fn error_non_convergence() {
        let e = SolarError::NonConvergence {
            solver: "kepler",
            iterations: 50,
        };
        assert_eq!(e.to_string(), "kepler did not converge within 50 iterations");
    }

    #[test]
    fn error_invalid_sample_count() {
        let e = SolarError::InvalidSampleCount { count: 2 };
        assert_eq!(e.to_string(), "sample count must be >= 4, got 2");
    }
}
