//! Earth's orbit: Kepler's equation and the geocentric Sun vector.

use serde::{Deserialize, Serialize};

use crate::calendar::JulianDate;
use crate::error::{Result, SolarError};
use crate::vector::Vector3;

// ---------- Constants ----------
/// Fractional change in the eccentric anomaly at which iteration stops.
pub const KEPLER_TOLERANCE: f64 = 0.002;
const KEPLER_MAX_ITERATIONS: usize = 50;

const SUN_RADIUS_M: f64 = 6.957e8; // IAU nominal

/// Keplerian elements of Earth's orbit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    pub eccentricity: f64,
    pub semi_major_axis_m: f64,
    /// Carried with the element set; the frame's x axis already points at periapsis.
    pub arg_periapsis_deg: f64,
    pub epoch: JulianDate,
    pub mean_anomaly_at_epoch_deg: f64,
    /// Sidereal year [d].
    pub orbital_period_days: f64,
}

impl OrbitalElements {
    /// J2000 (2000-01-01 12:00 TT) element set.
    pub const EARTH_J2000: OrbitalElements = OrbitalElements {
        eccentricity: 0.016_708_6,
        semi_major_axis_m: 1.495_980_23e11,
        arg_periapsis_deg: 114.207_83,
        epoch: JulianDate::new(2_451_545.0),
        mean_anomaly_at_epoch_deg: 358.617,
        orbital_period_days: 365.256_363_004,
    };

    /// Mean anomaly at `jd` [deg, 0..360).
    pub fn mean_anomaly(&self, jd: JulianDate) -> f64 {
        let since_epoch = jd - self.epoch;
        let mean_motion = 360.0 / self.orbital_period_days;
        (self.mean_anomaly_at_epoch_deg + mean_motion * since_epoch).rem_euclid(360.0)
    }

    /// Vector from Earth's centre to the Sun [m], orbital-plane frame, z = 0.
    pub fn sun_vector(&self, jd: JulianDate) -> Result<Vector3> {
        let e = self.eccentricity;
        let ecc = solve_kepler(e, self.mean_anomaly(jd), KEPLER_TOLERANCE)?.to_radians();

        let half = ecc / 2.0;
        // true anomaly
        let nu = 2.0 * ((1.0 + e).sqrt() * half.sin()).atan2((1.0 - e).sqrt() * half.cos());
        let r = self.semi_major_axis_m * (1.0 - e * ecc.cos());

        // heliocentric Earth is (r cos nu, r sin nu, 0); flip to look back at the Sun
        Ok(Vector3::new(-r * nu.cos(), -r * nu.sin(), 0.0))
    }
}

/// Eccentric anomaly [deg] for mean anomaly `mean_anomaly_deg`.
///
/// Newton iteration from `E0 = M + e sin M` (with `e` in degrees), stopping
/// once `|dE / E| <= tolerance`.
pub fn solve_kepler(eccentricity: f64, mean_anomaly_deg: f64, tolerance: f64) -> Result<f64> {
    let e_deg = eccentricity.to_degrees();
    let m = mean_anomaly_deg;
    let mut ecc = m + e_deg * m.to_radians().sin();

    for _ in 0..KEPLER_MAX_ITERATIONS {
        let dm = m - (ecc - e_deg * ecc.to_radians().sin());
        let de = dm / (1.0 - eccentricity * ecc.to_radians().cos());
        ecc += de;
        if de.abs() <= tolerance * ecc.abs() {
            return Ok(ecc);
        }
    }
    Err(SolarError::NonConvergence {
        solver: "kepler",
        iterations: KEPLER_MAX_ITERATIONS,
    })
}

/// Apparent angular radius [deg] of the Sun seen from `distance_m`.
pub fn sun_angular_radius(distance_m: f64) -> f64 {
    (SUN_RADIUS_M / distance_m).atan().to_degrees()
}
