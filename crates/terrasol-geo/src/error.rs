//! Geodetic and camera placement error types.

/// Errors from coordinate validation and camera placement.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// Latitude outside [-90, 90] degrees.
    #[error("latitude {0} out of range [-90, 90]")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] degrees.
    #[error("longitude {0} out of range [-180, 180]")]
    InvalidLongitude(f64),

    /// A saved camera preset that cannot produce a valid view.
    #[error("malformed camera preset: {0}")]
    MalformedPreset(&'static str),

    /// Placement requested before the scene rig was initialized. The request
    /// is dropped, not queued; the caller retries once readiness is signaled.
    #[error("scene rig not initialized; placement dropped")]
    RenderNotReady,
}
