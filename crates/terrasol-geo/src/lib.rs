//! Geodetic anchoring and camera placement for the Terrasol scene.
//!
//! Converts WGS84 coordinates into the tile model's local Y-up frame and
//! places the render camera there, either from a saved preset or from a
//! heading/altitude default view.

mod camera;
mod error;
mod geopoint;
mod placer;
mod wgs84;

pub use camera::{CameraPose, CameraPreset, ClipPlanes, OrbitControls};
pub use error::GeoError;
pub use geopoint::GeoPoint;
pub use placer::{AreaLocation, GeodeticCameraPlacer, Placement, DEFAULT_VIEW_ALTITUDE};
pub use wgs84::{enu_frame, geodetic_to_ecef, local_anchor_transform};
