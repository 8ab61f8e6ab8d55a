//! Orientation of the spinning Earth in the orbital-plane frame.
//!
//! The equatorial frame used here has z along the rotation axis and x through
//! the subsolar point at the reference March equinox; one matrix carries it
//! back to the orbital-plane frame.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::calendar::{CivilDate, JulianDate, SECONDS_PER_DAY};
use crate::error::Result;
use crate::orbit::OrbitalElements;
use crate::vector::{rotation_angle, rotation_x, rotation_y, rotation_z, Matrix3, Vector3};

// ---------- Constants ----------
const SYNODIC_DAY: f64 = 1.0; // [d]

/// Reference quantities for Earth's axis and spin. Precession is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarthOrientationParameters {
    /// Obliquity relative to the orbital plane.
    pub axial_tilt_deg: f64,
    pub equinox: JulianDate,
    /// Longitude of the subsolar point at `equinox`.
    pub subsolar_longitude_deg: f64,
    pub sidereal_day_s: f64,
}

impl EarthOrientationParameters {
    /// March 2020 equinox (03:49 UTC) and the following Greenwich solar noon (12:07 UTC).
    pub fn reference() -> Result<Self> {
        let equinox = CivilDate::new(2020, 3, 20, 3, 49, 0.0)?.to_julian_date()?;
        let solar_noon = CivilDate::new(2020, 3, 20, 12, 7, 0.0)?.to_julian_date()?;
        Ok(Self {
            axial_tilt_deg: 23.439_281_1,
            equinox,
            subsolar_longitude_deg: (solar_noon - equinox) / SYNODIC_DAY * 360.0,
            sidereal_day_s: 86_164.090_5,
        })
    }

    /// Sidereal spin rate [rad/s].
    pub fn rotation_rate(&self) -> f64 {
        TAU / self.sidereal_day_s
    }
}

/// Earth's axis and the rotation that places an observer's zenith.
#[derive(Debug, Clone, Copy)]
pub struct EarthOrientation {
    params: EarthOrientationParameters,
    to_orbital: Matrix3,
    axis: Vector3,
}

impl EarthOrientation {
    pub fn new(params: EarthOrientationParameters, orbit: &OrbitalElements) -> Result<Self> {
        // At the equinox the Sun direction lies in both the orbital and equatorial planes.
        let subsolar = orbit.sun_vector(params.equinox)?.normalize();
        let to_reference = rotation_angle(&subsolar, &Vector3::x(), &Vector3::z());

        // orbital -> (spin subsolar onto x) -> (tilt about x) -> equatorial
        let to_equatorial =
            rotation_x(params.axial_tilt_deg.to_radians()) * rotation_z(to_reference);
        let to_orbital = to_equatorial.transpose();

        Ok(Self {
            params,
            to_orbital,
            axis: to_orbital * Vector3::z(),
        })
    }

    pub fn params(&self) -> &EarthOrientationParameters {
        &self.params
    }

    /// Unit rotation axis (north), constant for the life of the model.
    pub fn rotation_axis(&self) -> Vector3 {
        self.axis
    }

    /// Sidereal rotation [rad] accumulated between the equinox and `jd`.
    pub fn rotation_since_equinox(&self, jd: JulianDate) -> f64 {
        (jd - self.params.equinox) * SECONDS_PER_DAY * self.params.rotation_rate()
    }

    /// Unit vector straight up from (`latitude`, `longitude`) [deg] at `jd`.
    pub fn zenith(&self, jd: JulianDate, latitude: f64, longitude: f64) -> Vector3 {
        let lat = latitude.to_radians();
        let spin = (longitude - self.params.subsolar_longitude_deg).to_radians()
            + self.rotation_since_equinox(jd);

        // raise x toward the pole by the latitude, then turn about the axis
        let equatorial = rotation_z(spin) * rotation_y(-lat) * Vector3::x();
        self.to_orbital * equatorial
    }
}
