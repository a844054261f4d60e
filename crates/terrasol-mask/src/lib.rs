//! Shadow-mask evaluation: how much of an operator-drawn polygon is sunlit.
//!
//! The occluding geometry (building massing from the streamed tiles) has no
//! accessible closed-form representation, so occlusion is sampled from the
//! rendered shadow buffer instead of computed analytically: rasterize the
//! polygon into a pixel coverage mask and count lit vs. shadowed pixels.

mod buffer;
mod error;
mod evaluator;
mod mask;

pub use buffer::ShadowBuffer;
pub use error::MaskError;
pub use evaluator::percent_in_sun;
pub use mask::{REFERENCE_VIEWPORT, VisionMask};
