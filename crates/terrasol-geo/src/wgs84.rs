//! WGS84 ellipsoid math and the local anchoring transform.
//!
//! The tile model ships in earth-centered coordinates; anchoring rotates and
//! translates it so a chosen lat/lon sits at the local origin with the
//! ellipsoid normal along +Y. The local frame is +X east, +Y up, +Z north,
//! matching the azimuth-from-north convention of the sun model.

use glam::{DMat3, DMat4, DVec3};

use crate::geopoint::GeoPoint;

/// WGS84 semi-major axis in meters.
pub const WGS84_SEMI_MAJOR: f64 = 6_378_137.0;

/// WGS84 first eccentricity squared.
pub const WGS84_E_SQ: f64 = 6.694_379_990_14e-3;

/// Convert a geodetic position (plus height above the ellipsoid, meters) to
/// earth-centered earth-fixed coordinates.
pub fn geodetic_to_ecef(point: &GeoPoint, height: f64) -> DVec3 {
    let lat = point.latitude_rad();
    let lon = point.longitude_rad();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    // Prime vertical radius of curvature.
    let n = WGS84_SEMI_MAJOR / (1.0 - WGS84_E_SQ * sin_lat * sin_lat).sqrt();

    DVec3::new(
        (n + height) * cos_lat * cos_lon,
        (n + height) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_E_SQ) + height) * sin_lat,
    )
}

/// East/north/up unit vectors at a geodetic point, expressed in ECEF.
pub fn enu_frame(point: &GeoPoint) -> (DVec3, DVec3, DVec3) {
    let lat = point.latitude_rad();
    let lon = point.longitude_rad();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    let east = DVec3::new(-sin_lon, cos_lon, 0.0);
    let north = DVec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
    let up = DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);
    (east, north, up)
}

/// Build the root transform that maps ECEF into the local anchored frame:
/// the anchor point lands at the origin, east along +X, the ellipsoid normal
/// along +Y, north along +Z.
///
/// Pure function of the anchor, so re-anchoring at the same point is
/// bit-identical (no accumulated drift).
pub fn local_anchor_transform(anchor: &GeoPoint) -> DMat4 {
    let (east, north, up) = enu_frame(anchor);

    // Rows east/up/north project an ECEF offset onto the local axes.
    let rotation = DMat3::from_cols(east, up, north).transpose();
    let anchor_ecef = geodetic_to_ecef(anchor, 0.0);
    let translation = -(rotation * anchor_ecef);

    let mut transform = DMat4::from_mat3(rotation);
    transform.w_axis = translation.extend(1.0);
    transform
}
