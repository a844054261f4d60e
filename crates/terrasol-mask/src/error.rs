//! Mask evaluation error types.

/// Errors from vision-mask validation and shadow sampling.
#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    /// A polygon needs at least three points; fewer is invalid input, not
    /// "0% in sun".
    #[error("vision mask has {found} points, need at least 3")]
    TooFewPoints { found: usize },

    /// The polygon rasterized to zero covered pixels (collinear points or a
    /// mask entirely outside the buffer).
    #[error("vision mask covers no pixels at {width}x{height}")]
    DegeneratePolygon { width: u32, height: u32 },

    /// The shadow buffer has a zero dimension.
    #[error("shadow buffer has empty dimensions {width}x{height}")]
    EmptyBuffer { width: u32, height: u32 },
}
