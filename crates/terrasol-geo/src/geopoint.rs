//! Validated WGS84 coordinates.

use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// A WGS84 location in degrees.
///
/// Construction validates the ranges; a `GeoPoint` in hand is always valid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    latitude_deg: f64,
    longitude_deg: f64,
}

impl GeoPoint {
    /// Create a validated point. Latitude must be in [-90, 90], longitude in
    /// [-180, 180].
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&latitude_deg) || !latitude_deg.is_finite() {
            return Err(GeoError::InvalidLatitude(latitude_deg));
        }
        if !(-180.0..=180.0).contains(&longitude_deg) || !longitude_deg.is_finite() {
            return Err(GeoError::InvalidLongitude(longitude_deg));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
        })
    }

    /// Latitude in degrees.
    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    /// Longitude in degrees.
    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }

    /// Latitude in radians.
    pub fn latitude_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    /// Longitude in radians.
    pub fn longitude_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }
}
