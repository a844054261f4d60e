//! Sun azimuth/altitude from a UTC instant and an observer location.
//!
//! Uses the low-precision formulas from the Astronomical Almanac: Julian Day,
//! mean solar longitude and anomaly, a two-term equation-of-center correction,
//! right ascension and declination via the mean obliquity, and local sidereal
//! time for the hour angle. Accurate to a fraction of a degree over the
//! current century, which is far below the rasterization noise of the shadow
//! sampler downstream.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use std::f64::consts::{PI, TAU};

/// Sun direction in horizontal coordinates.
///
/// Azimuth is measured clockwise from local north (0 = north, π/2 = east,
/// π = south), altitude is the angle above the horizon. Derived per instant,
/// never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunPosition {
    /// Azimuth in radians, `[0, 2π)`.
    pub azimuth_rad: f64,
    /// Altitude in radians, `[-π/2, π/2]`.
    pub altitude_rad: f64,
}

/// Days per Julian century epoch offset: JD of J2000.0 noon.
const JD_J2000: f64 = 2_451_545.0;

/// Unix epoch expressed as a Julian Day.
const JD_UNIX_EPOCH: f64 = 2_440_587.5;

/// Compute the sun's horizontal position for an observer.
///
/// Pure and deterministic. Latitude/longitude are in WGS84 degrees; angles
/// outside the nominal ranges wrap rather than error (range validation is the
/// caller's concern at the input boundary).
pub fn compute_sun_position(
    timestamp_utc: DateTime<Utc>,
    latitude_deg: f64,
    longitude_deg: f64,
) -> SunPosition {
    let jd = julian_day(timestamp_utc);
    let d = jd - JD_J2000;
    let sun = ecliptic_state(d);

    // Greenwich mean sidereal time, then local sidereal time and hour angle.
    let gmst_deg = wrap_degrees(280.460_618_37 + 360.985_647_366_29 * d);
    let local_sidereal = (gmst_deg + longitude_deg).to_radians();
    let hour_angle = wrap_radians_signed(local_sidereal - sun.right_ascension);

    let lat = latitude_deg.to_radians();
    let altitude = (lat.sin() * sun.declination.sin()
        + lat.cos() * sun.declination.cos() * hour_angle.cos())
    .asin();

    // atan2 form measures from south, westward positive; shift by π so the
    // result is clockwise from north.
    let azimuth_from_south = f64::atan2(
        hour_angle.sin(),
        hour_angle.cos() * lat.sin() - sun.declination.tan() * lat.cos(),
    );
    let azimuth = wrap_radians(azimuth_from_south + PI);

    SunPosition {
        azimuth_rad: azimuth,
        altitude_rad: altitude,
    }
}

/// Whether the sun is above the horizon.
pub fn is_daylight(sun: SunPosition) -> bool {
    sun.altitude_rad > 0.0
}

/// The UTC instant of local solar noon on `date` at a longitude.
///
/// Mean noon (12:00 UTC shifted four minutes per degree of longitude)
/// corrected by the equation of time. Accurate to well under a minute, far
/// inside the sweep's slot quantization.
pub fn solar_noon_utc(date: NaiveDate, longitude_deg: f64) -> DateTime<Utc> {
    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let mean_noon_minutes = 12.0 * 60.0 - longitude_deg * 4.0;

    let d = julian_day(midnight) + mean_noon_minutes / (24.0 * 60.0) - JD_J2000;
    let noon_minutes = mean_noon_minutes - equation_of_time_minutes(d);
    midnight + chrono::Duration::seconds((noon_minutes * 60.0).round() as i64)
}

/// Solar ecliptic quantities shared by the position and equation-of-time
/// calculations.
struct EclipticState {
    mean_longitude_deg: f64,
    right_ascension: f64,
    declination: f64,
}

fn ecliptic_state(d: f64) -> EclipticState {
    // Mean solar longitude and mean anomaly, degrees.
    let mean_longitude_deg = wrap_degrees(280.460 + 0.985_647_4 * d);
    let mean_anomaly = wrap_degrees(357.528 + 0.985_600_3 * d).to_radians();

    // Two-term equation of center gives the ecliptic longitude.
    let ecliptic_longitude = (mean_longitude_deg
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin())
    .to_radians();

    // Mean obliquity of the ecliptic.
    let obliquity = (23.439 - 0.000_000_4 * d).to_radians();

    let right_ascension = f64::atan2(
        obliquity.cos() * ecliptic_longitude.sin(),
        ecliptic_longitude.cos(),
    );
    let declination = (obliquity.sin() * ecliptic_longitude.sin()).asin();

    EclipticState {
        mean_longitude_deg,
        right_ascension,
        declination,
    }
}

/// Apparent minus mean solar time, in minutes (four per degree of the
/// mean-longitude/right-ascension gap).
fn equation_of_time_minutes(d: f64) -> f64 {
    let sun = ecliptic_state(d);
    let delta =
        wrap_radians_signed(sun.mean_longitude_deg.to_radians() - sun.right_ascension);
    delta.to_degrees() * 4.0
}

/// Convert a UTC instant to a Julian Day, including the day fraction.
fn julian_day(timestamp: DateTime<Utc>) -> f64 {
    timestamp.timestamp_millis() as f64 / 86_400_000.0 + JD_UNIX_EPOCH
}

/// Wrap an angle in degrees into `[0, 360)`.
fn wrap_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Wrap an angle in radians into `[0, 2π)`.
fn wrap_radians(radians: f64) -> f64 {
    radians.rem_euclid(TAU)
}

/// Wrap an angle in radians into `[-π, π)`.
fn wrap_radians_signed(radians: f64) -> f64 {
    (radians + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    /// At the equator on the March equinox, noon UTC is within minutes of
    /// solar noon at longitude 0, so the altitude there must beat every other
    /// daytime hour.
    #[test]
    fn test_equinox_noon_is_daily_maximum_at_equator() {
        let noon = compute_sun_position(utc(2024, 3, 20, 12, 0), 0.0, 0.0);
        assert!(
            noon.altitude_rad > 80.0_f64.to_radians(),
            "equinox noon at (0,0) should be near zenith, got {}°",
            noon.altitude_rad.to_degrees()
        );

        for hour in [6, 8, 10, 14, 16, 18] {
            let other = compute_sun_position(utc(2024, 3, 20, hour, 0), 0.0, 0.0);
            assert!(
                noon.altitude_rad > other.altitude_rad,
                "noon altitude should exceed {hour}:00 altitude"
            );
        }
    }

    /// At a northern latitude near solar noon the sun sits due south:
    /// azimuth close to 180 degrees.
    #[test]
    fn test_noon_sun_is_due_south_in_the_north() {
        // London, March equinox, 12:00 UTC (solar noon ~12:07 UTC).
        let sun = compute_sun_position(utc(2024, 3, 20, 12, 0), 51.5074, -0.1278);
        let az_deg = sun.azimuth_rad.to_degrees();
        assert!(
            (az_deg - 180.0).abs() < 5.0,
            "noon azimuth should be near 180°, got {az_deg}°"
        );
        // Altitude at equinox ≈ 90° − latitude.
        let alt_deg = sun.altitude_rad.to_degrees();
        assert!(
            (alt_deg - 38.5).abs() < 2.0,
            "equinox noon altitude should be ≈ 90° − lat, got {alt_deg}°"
        );
    }

    /// Morning sun rises in the east: azimuth well below 180 degrees.
    #[test]
    fn test_morning_sun_is_east_of_south() {
        let sun = compute_sun_position(utc(2024, 3, 20, 7, 0), 51.5074, -0.1278);
        let az_deg = sun.azimuth_rad.to_degrees();
        assert!(
            (60.0..150.0).contains(&az_deg),
            "morning azimuth should be in the eastern half, got {az_deg}°"
        );
    }

    /// Past midnight at a mid latitude the sun is below the horizon.
    #[test]
    fn test_sun_below_horizon_at_night() {
        let sun = compute_sun_position(utc(2024, 6, 21, 0, 30), 51.5074, -0.1278);
        assert!(
            sun.altitude_rad < 0.0,
            "midnight sun should be below horizon, got {}°",
            sun.altitude_rad.to_degrees()
        );
    }

    /// Summer solstice noon is higher than winter solstice noon.
    #[test]
    fn test_seasonal_altitude_difference() {
        let summer = compute_sun_position(utc(2024, 6, 21, 12, 0), 51.5074, -0.1278);
        let winter = compute_sun_position(utc(2024, 12, 21, 12, 0), 51.5074, -0.1278);
        let delta = (summer.altitude_rad - winter.altitude_rad).to_degrees();
        // Difference is twice the obliquity, ~46.9°.
        assert!(
            (delta - 46.9).abs() < 2.0,
            "solstice altitude spread should be ~46.9°, got {delta}°"
        );
    }

    /// The same instant always yields the same position (pure function).
    #[test]
    fn test_deterministic() {
        let t = utc(2025, 8, 1, 15, 45);
        let a = compute_sun_position(t, 48.2, 16.37);
        let b = compute_sun_position(t, 48.2, 16.37);
        assert_eq!(a, b);
    }

    /// Outputs always land in their documented ranges, even for wrapped
    /// inputs.
    #[test]
    fn test_output_ranges() {
        for &(lat, lon) in &[(0.0, 0.0), (89.9, 179.9), (-89.9, -179.9), (200.0, 500.0)] {
            let sun = compute_sun_position(utc(2024, 1, 1, 3, 17), lat, lon);
            assert!((0.0..TAU).contains(&sun.azimuth_rad));
            assert!(sun.altitude_rad.abs() <= PI / 2.0 + 1e-12);
        }
    }

    #[test]
    fn test_is_daylight_follows_the_horizon() {
        let noon = compute_sun_position(utc(2024, 6, 21, 12, 0), 51.5074, -0.1278);
        assert!(is_daylight(noon));

        let midnight = compute_sun_position(utc(2024, 6, 21, 0, 30), 51.5074, -0.1278);
        assert!(!is_daylight(midnight));
    }

    /// Solar noon at longitude 0 tracks the equation of time: early November
    /// runs ~16 minutes fast, mid February ~14 minutes slow.
    #[test]
    fn test_solar_noon_tracks_equation_of_time() {
        let november = solar_noon_utc(NaiveDate::from_ymd_opt(2024, 11, 3).unwrap(), 0.0);
        let minutes = november.time().hour() * 60 + november.time().minute();
        assert!(
            (11 * 60 + 40..11 * 60 + 48).contains(&minutes),
            "November solar noon should be ~11:44 UTC, got {november}"
        );

        let february = solar_noon_utc(NaiveDate::from_ymd_opt(2024, 2, 11).unwrap(), 0.0);
        let minutes = february.time().hour() * 60 + february.time().minute();
        assert!(
            (12 * 60 + 10..12 * 60 + 18).contains(&minutes),
            "February solar noon should be ~12:14 UTC, got {february}"
        );
    }

    /// Each 15° of eastern longitude shifts solar noon an hour earlier.
    #[test]
    fn test_solar_noon_shifts_with_longitude() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let greenwich = solar_noon_utc(date, 0.0);
        let east = solar_noon_utc(date, 15.0);
        let delta = (greenwich - east).num_seconds();
        assert!(
            (delta - 3600).abs() < 30,
            "15°E should be ~3600 s earlier, got {delta} s"
        );
    }

    /// The computed solar noon is the daily altitude maximum to within the
    /// flatness of the curve around the peak.
    #[test]
    fn test_solar_noon_is_altitude_peak() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        let noon = solar_noon_utc(date, 16.3738);
        let at = |t: DateTime<Utc>| compute_sun_position(t, 48.2082, 16.3738).altitude_rad;

        let peak = at(noon);
        assert!(peak > at(noon - chrono::Duration::minutes(40)));
        assert!(peak > at(noon + chrono::Duration::minutes(40)));
    }

    #[test]
    fn test_julian_day_epochs() {
        // Unix epoch.
        let jd = julian_day(utc(1970, 1, 1, 0, 0));
        assert!((jd - 2_440_587.5).abs() < 1e-9);
        // J2000.0 = 2000-01-01 12:00 UTC (ignoring the 64s TT offset).
        let jd = julian_day(utc(2000, 1, 1, 12, 0));
        assert!((jd - 2_451_545.0).abs() < 1e-9);
    }
}
