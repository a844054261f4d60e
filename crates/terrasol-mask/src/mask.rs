//! Operator-drawn area polygons.

use serde::{Deserialize, Serialize};

use crate::error::MaskError;

/// The viewport size vision masks are authored against, in pixels. Sampling
/// at a different resolution rescales mask points proportionally.
pub const REFERENCE_VIEWPORT: (u32, u32) = (800, 600);

/// An operator-drawn polygon scoping which pixels belong to an outdoor area.
///
/// Points are ordered screen-space pixel coordinates; the polygon is
/// implicitly closed from the last point back to the first. Immutable once
/// saved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisionMask {
    area_id: String,
    points: Vec<[f32; 2]>,
    /// Viewport the points were authored against.
    viewport: (u32, u32),
}

impl VisionMask {
    /// Create a mask authored against [`REFERENCE_VIEWPORT`].
    ///
    /// Fails with [`MaskError::TooFewPoints`] for fewer than three points.
    pub fn new(area_id: impl Into<String>, points: Vec<[f32; 2]>) -> Result<Self, MaskError> {
        Self::with_viewport(area_id, points, REFERENCE_VIEWPORT)
    }

    /// Create a mask authored against an explicit viewport size.
    pub fn with_viewport(
        area_id: impl Into<String>,
        points: Vec<[f32; 2]>,
        viewport: (u32, u32),
    ) -> Result<Self, MaskError> {
        if points.len() < 3 {
            return Err(MaskError::TooFewPoints {
                found: points.len(),
            });
        }
        Ok(Self {
            area_id: area_id.into(),
            points,
            viewport,
        })
    }

    /// The area this mask belongs to.
    pub fn area_id(&self) -> &str {
        &self.area_id
    }

    /// The ordered polygon points.
    pub fn points(&self) -> &[[f32; 2]] {
        &self.points
    }

    /// The viewport the points were authored against.
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }
}
