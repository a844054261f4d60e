//! Derived lighting quantities: the directional-light vector and the
//! shadow-opacity presentation heuristic.

use glam::DVec3;

use crate::position::SunPosition;

/// Convert a sun position into a unit direction vector pointing from the
/// origin toward the sun, in the anchored local frame (Y-up, +X east,
/// +Z north; azimuth clockwise from north).
///
/// The renderer negates this to get the light's travel direction.
pub fn light_direction(sun: SunPosition) -> DVec3 {
    let (alt, az) = (sun.altitude_rad, sun.azimuth_rad);
    DVec3::new(
        alt.cos() * az.sin(),
        alt.sin(),
        alt.cos() * az.cos(),
    )
}

/// Shadow opacity for the rendered shadow pass, by altitude band.
///
/// A tunable presentation parameter, not a radiometric quantity: night keeps
/// shadows off pure black, dawn/dusk darkens slightly, daytime is lightest.
/// - altitude ≤ 0: 0.8
/// - altitude < 15°: 0.7
/// - otherwise: 0.6
pub fn shadow_opacity_from_altitude(altitude_rad: f64) -> f32 {
    const DAWN_DUSK_LIMIT: f64 = 15.0 * std::f64::consts::PI / 180.0;
    if altitude_rad <= 0.0 {
        0.8
    } else if altitude_rad < DAWN_DUSK_LIMIT {
        0.7
    } else {
        0.6
    }
}
