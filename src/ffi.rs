//! C ABI. Every call returns an owned JSON string that the host must hand back
//! to [`free_json`]. Failures are logged and yield `"[]"` or `"{}"`.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use log::{debug, error, info, warn};
use serde::Serialize;

use crate::calendar::{CivilDate, JulianDate};
use crate::logging::init_logger;
use crate::model::AstronomicalModel;
use crate::window::{find_window, Observer, SearchConfig};

const EMPTY_ARRAY: &str = "[]";
const EMPTY_OBJECT: &str = "{}";

#[no_mangle]
pub extern "C" fn free_json(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    unsafe {
        let _ = CString::from_raw(ptr);
    }
}

/// Sunrises (`rise != 0`) or sunsets between `begin` and `end` (inclusive,
/// `"YYYY-MM-DD"`) whose azimuth is within `tolerance` degrees of `heading`.
///
/// `begin` and `end` must be null or valid NUL-terminated strings.
#[no_mangle]
pub extern "C" fn sunheading_find_window(
    heading: f64,
    begin: *const c_char,
    end: *const c_char,
    lat: f64,
    lon: f64,
    rise: u8,
    tolerance: f64,
    sample_count: u32,
) -> *mut c_char {
    init_logger();
    info!("[sunheading_find_window] Starting search");
    debug!("  heading: {}, lat: {}, lon: {}", heading, lat, lon);
    debug!("  rise: {}, tolerance: {}, sample_count: {}", rise, tolerance, sample_count);

    let (Some(begin), Some(end)) = (read_c_str(begin), read_c_str(end)) else {
        warn!("[sunheading_find_window] null date argument");
        return into_json_ptr(EMPTY_ARRAY.to_string(), EMPTY_ARRAY);
    };
    let (begin, end) = match (CivilDate::parse(&begin), CivilDate::parse(&end)) {
        (Ok(b), Ok(e)) => (b, e),
        (Err(e), _) | (_, Err(e)) => {
            warn!("[sunheading_find_window] {}", e);
            return into_json_ptr(EMPTY_ARRAY.to_string(), EMPTY_ARRAY);
        }
    };

    let config = SearchConfig {
        rise: rise != 0,
        tolerance_deg: tolerance,
        sample_count: sample_count as usize,
    };
    let observer = Observer {
        latitude_deg: lat,
        longitude_deg: lon,
    };

    let events = AstronomicalModel::new()
        .and_then(|model| find_window(&model, heading, &begin, &end, &observer, &config));
    match events {
        Ok(events) => {
            info!("[sunheading_find_window] {} events", events.len());
            to_json(&events, EMPTY_ARRAY)
        }
        Err(e) => {
            error!("[sunheading_find_window] search failed: {}", e);
            into_json_ptr(EMPTY_ARRAY.to_string(), EMPTY_ARRAY)
        }
    }
}

/// Altitude, azimuth and angular radius of the Sun at Julian date `jd` (UTC).
#[no_mangle]
pub extern "C" fn sunheading_sun_location(jd: f64, lat: f64, lon: f64) -> *mut c_char {
    init_logger();
    debug!("[sunheading_sun_location] jd: {}, lat: {}, lon: {}", jd, lat, lon);

    let position = AstronomicalModel::new()
        .and_then(|model| model.sun_location(JulianDate::new(jd), lat, lon));
    match position {
        Ok(position) => to_json(&position, EMPTY_OBJECT),
        Err(e) => {
            error!("[sunheading_sun_location] {}", e);
            into_json_ptr(EMPTY_OBJECT.to_string(), EMPTY_OBJECT)
        }
    }
}

// ---------- Helpers ----------

fn read_c_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

fn to_json<T: Serialize>(value: &T, fallback: &'static str) -> *mut c_char {
    let json = serde_json::to_string(value).unwrap_or_else(|e| {
        error!("[to_json] serialization failed: {}", e);
        fallback.to_string()
    });
    into_json_ptr(json, fallback)
}

fn into_json_ptr(json: String, fallback: &'static str) -> *mut c_char {
    CString::new(json)
        .or_else(|_| CString::new(fallback))
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}
