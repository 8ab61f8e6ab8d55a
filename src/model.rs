//! The assembled Sun/Earth model and the altitude/azimuth query.

use log::debug;
use serde::Serialize;

use crate::calendar::JulianDate;
use crate::earth::{EarthOrientation, EarthOrientationParameters};
use crate::error::{Result, SolarError};
use crate::orbit::{sun_angular_radius, OrbitalElements};
use crate::vector::{direction, reject_from, rotation_angle, wrap_degrees, Vector3};

// ---------- Constants ----------
pub const EARTH_RADIUS_M: f64 = 6.371e6; // spherical Earth

/// Apparent position of the Sun for one observer and instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarPosition {
    /// Geometric altitude of the disk centre, -90..=90.
    pub altitude_deg: f64,
    /// Clockwise from geographic north, 0..360.
    pub azimuth_deg: f64,
    /// Apparent angular radius of the disk.
    pub angular_radius_deg: f64,
}

impl SolarPosition {
    /// Altitude of the top edge of the disk.
    pub fn upper_limb_altitude(&self) -> f64 {
        self.altitude_deg + self.angular_radius_deg
    }
}

/// Immutable model context: orbit plus Earth orientation, built once.
#[derive(Debug, Clone, Copy)]
pub struct AstronomicalModel {
    orbit: OrbitalElements,
    earth: EarthOrientation,
}

impl AstronomicalModel {
    /// J2000 orbit with the March 2020 equinox reference.
    pub fn new() -> Result<Self> {
        Self::with_parameters(
            OrbitalElements::EARTH_J2000,
            EarthOrientationParameters::reference()?,
        )
    }

    pub fn with_parameters(
        orbit: OrbitalElements,
        params: EarthOrientationParameters,
    ) -> Result<Self> {
        let earth = EarthOrientation::new(params, &orbit)?;
        debug!(
            "[AstronomicalModel] equinox: {}, subsolar lon: {:.4}, axis: {:?}",
            params.equinox,
            params.subsolar_longitude_deg,
            earth.rotation_axis()
        );
        Ok(Self { orbit, earth })
    }

    pub fn orbit(&self) -> &OrbitalElements {
        &self.orbit
    }

    pub fn earth(&self) -> &EarthOrientation {
        &self.earth
    }

    pub fn sun_vector(&self, jd: JulianDate) -> Result<Vector3> {
        self.orbit.sun_vector(jd)
    }

    pub fn rotation_axis(&self) -> Vector3 {
        self.earth.rotation_axis()
    }

    pub fn zenith(&self, jd: JulianDate, latitude: f64, longitude: f64) -> Vector3 {
        self.earth.zenith(jd, latitude, longitude)
    }

    /// Altitude and azimuth of the Sun seen from the surface at (`latitude`, `longitude`).
    pub fn sun_location(
        &self,
        jd: JulianDate,
        latitude: f64,
        longitude: f64,
    ) -> Result<SolarPosition> {
        check_location(latitude, longitude)?;

        let zenith = self.zenith(jd, latitude, longitude);
        let geocentric = self.sun_vector(jd)?;
        // move the observer from Earth's centre to the surface
        let sun = (geocentric - zenith * EARTH_RADIUS_M).normalize();

        let altitude_deg = 90.0 - sun.dot(&zenith).clamp(-1.0, 1.0).acos().to_degrees();

        let east = self.rotation_axis().cross(&zenith);
        if east.norm() < 1e-9 {
            return Err(SolarError::UndefinedAzimuth { latitude });
        }
        let east = east.normalize();
        let north = zenith.cross(&east).normalize();
        let horizontal = direction(&reject_from(&sun, &zenith));
        let azimuth_deg = wrap_degrees(rotation_angle(&horizontal, &north, &zenith).to_degrees());

        Ok(SolarPosition {
            altitude_deg,
            azimuth_deg,
            angular_radius_deg: sun_angular_radius(geocentric.norm()),
        })
    }
}

pub fn check_location(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() || !longitude.is_finite() || latitude.abs() > 90.0 {
        return Err(SolarError::InvalidLocation { latitude, longitude });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CivilDate;
    use crate::vector::heading_difference;

    const LAT: f64 = 32.8595;
    const LON: f64 = -117.2124;

    fn check(model: &AstronomicalModel, jd: JulianDate, lat: f64, expected: (f64, f64)) {
        let p = model.sun_location(jd, lat, LON).unwrap();
        assert!((p.altitude_deg - expected.0).abs() < 0.1, "lat={lat} alt={}", p.altitude_deg);
        assert!(
            heading_difference(p.azimuth_deg, expected.1) < 1.0,
            "lat={lat} azi={}",
            p.azimuth_deg
        );
    }

    #[test]
    fn san_diego_noon_matches_planetarium() {
        let model = AstronomicalModel::new().unwrap();
        // solar noon at San Diego, 2024-12-17
        let jd = CivilDate::parse("2024-12-17 19:45:19.0").unwrap().to_julian_date().unwrap();

        check(&model, jd, LAT, (33.774_861, 180.000_75));
        check(&model, jd + 0.5, LAT, (-80.542_19, 359.661_42));
        check(&model, jd, 0.0, (66.617_78, 180.001_56));
        check(&model, jd + 0.5, 0.0, (-66.599_47, 180.140_08));
        check(&model, jd, -LAT, (80.531_33, 359.996_25));
        check(&model, jd + 0.5, -LAT, (-33.741_08, 180.066_92));
    }

    #[test]
    fn position_ranges_hold_over_a_day() {
        let model = AstronomicalModel::new().unwrap();
        let start = CivilDate::noon(2023, 6, 1).unwrap().to_julian_date().unwrap();
        for i in 0..96 {
            let p = model.sun_location(start + i as f64 / 96.0, 51.48, -0.0015).unwrap();
            assert!((-90.0..=90.0).contains(&p.altitude_deg));
            assert!((0.0..360.0).contains(&p.azimuth_deg));
            assert!((p.angular_radius_deg - 0.2625).abs() < 0.01);
        }
    }

    #[test]
    fn morning_sun_is_east_and_evening_sun_is_west() {
        let model = AstronomicalModel::new().unwrap();
        // 09:00 and 15:00 local mean time at Greenwich
        let morning = CivilDate::new(2022, 9, 23, 9, 0, 0.0).unwrap().to_julian_date().unwrap();
        let evening = morning + 0.25;
        let am = model.sun_location(morning, 51.48, 0.0).unwrap();
        let pm = model.sun_location(evening, 51.48, 0.0).unwrap();
        assert!(am.azimuth_deg > 90.0 && am.azimuth_deg < 180.0, "am={am:?}");
        assert!(pm.azimuth_deg > 180.0 && pm.azimuth_deg < 270.0, "pm={pm:?}");
    }

    #[test]
    fn upper_limb_adds_radius() {
        let p = SolarPosition {
            altitude_deg: -0.25,
            azimuth_deg: 250.0,
            angular_radius_deg: 0.27,
        };
        assert!((p.upper_limb_altitude() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_locations() {
        let model = AstronomicalModel::new().unwrap();
        let jd = JulianDate::new(2_460_000.0);
        assert!(matches!(
            model.sun_location(jd, 91.0, 0.0),
            Err(SolarError::InvalidLocation { .. })
        ));
        assert!(matches!(
            model.sun_location(jd, 10.0, f64::NAN),
            Err(SolarError::InvalidLocation { .. })
        ));
        assert!(matches!(
            model.sun_location(jd, 90.0, 0.0),
            Err(SolarError::UndefinedAzimuth { .. })
        ));
    }
}
