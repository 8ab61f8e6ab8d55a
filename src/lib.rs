//! Sunrise/sunset headings from a simplified heliocentric model.
//!
//! The Earth follows a Keplerian orbit around a fixed Sun and spins about a
//! tilted axis anchored to a reference equinox. From that model the crate finds
//! each day's sunrise or sunset by sampling the Sun's altitude, fitting a cubic
//! spline and root-finding the horizon crossing, then scans date ranges for the
//! days on which the Sun rises or sets along a chosen compass heading.
//!
//! The library is also built as a `cdylib`; see [`ffi`] for the C ABI.

pub mod calendar;
pub mod earth;
pub mod eot;
pub mod error;
pub mod ffi;
pub mod logging;
pub mod model;
pub mod numeric;
pub mod orbit;
pub mod timezone;
pub mod twilight;
pub mod vector;
pub mod window;

pub use calendar::{format_timestamp, CivilDate, JulianDate};
pub use error::{Result, SolarError};
pub use model::{AstronomicalModel, SolarPosition};
pub use timezone::{resolve_time_zone, TimeZone};
pub use twilight::{find_crossing, TwilightEvent, TwilightKind};
pub use window::{find_window, ObservationEvent, Observer, SearchConfig};
