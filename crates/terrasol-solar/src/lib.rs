//! Astronomical sun position for the Terrasol pipeline.
//!
//! Pure solar geometry: timestamp + observer location in, azimuth/altitude
//! out, plus the derived light direction vector and the shadow-opacity
//! presentation heuristic. No I/O, no shared state.

mod light;
mod position;

pub use light::{light_direction, shadow_opacity_from_altitude};
pub use position::{SunPosition, compute_sun_position, is_daylight, solar_noon_utc};
