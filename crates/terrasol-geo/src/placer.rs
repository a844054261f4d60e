//! Geodetic camera placement.
//!
//! Re-anchors the tile model's root transform so a venue location maps to the
//! local origin, then derives a camera pose there: either a saved preset
//! replayed verbatim, or a heading-rotated default view. The placer owns the
//! camera/controls state; the session applies the returned refinement boost
//! to the tile cache (no closure-captured renderer handles).

use glam::{DMat4, DVec3};
use tracing::{debug, warn};

use crate::camera::{CameraPose, CameraPreset, ClipPlanes, OrbitControls};
use crate::error::GeoError;
use crate::geopoint::GeoPoint;
use crate::wgs84::local_anchor_transform;

/// Default camera altitude above the anchor, in local units.
pub const DEFAULT_VIEW_ALTITUDE: f64 = 200.0;

/// Error target requested while the post-placement refinement pass runs.
const REFINEMENT_BOOST_TARGET: f64 = 1.0;

/// A venue location plus the default framing parameters.
#[derive(Clone, Copy, Debug)]
pub struct AreaLocation {
    /// Anchor point; maps to the local origin.
    pub geo: GeoPoint,
    /// View heading, radians clockwise from north.
    pub heading_rad: f64,
    /// Camera altitude in local units.
    pub altitude: f64,
}

impl AreaLocation {
    /// Location with default heading (north) and altitude.
    pub fn new(geo: GeoPoint) -> Self {
        Self {
            geo,
            heading_rad: 0.0,
            altitude: DEFAULT_VIEW_ALTITUDE,
        }
    }
}

/// The outcome of a placement, applied by the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// The new camera pose.
    pub pose: CameraPose,
    /// Reset clip planes.
    pub clip: ClipPlanes,
    /// Tightened screen-space error target for the fast refinement pass; the
    /// cache releases it back to steady state once the visible set loads.
    pub refinement_error_target: f64,
}

/// The camera rig: pose plus orbit controls. Present only once the scene is
/// initialized; placement requests before that are dropped.
#[derive(Clone, Copy, Debug)]
struct CameraRig {
    pose: CameraPose,
    controls: OrbitControls,
    clip: ClipPlanes,
}

/// Places the camera for a geodetic location and owns the resulting pose.
pub struct GeodeticCameraPlacer {
    rig: Option<CameraRig>,
    root_transform: DMat4,
    anchor: Option<GeoPoint>,
}

impl GeodeticCameraPlacer {
    /// Create a placer with no initialized scene. Placement requests fail
    /// with [`GeoError::RenderNotReady`] until [`initialize_scene`] runs.
    ///
    /// [`initialize_scene`]: Self::initialize_scene
    pub fn new() -> Self {
        Self {
            rig: None,
            root_transform: DMat4::IDENTITY,
            anchor: None,
        }
    }

    /// Signal that the render scene exists and the camera may be driven.
    pub fn initialize_scene(&mut self) {
        if self.rig.is_none() {
            self.rig = Some(CameraRig {
                pose: CameraPose {
                    position: DVec3::new(0.0, DEFAULT_VIEW_ALTITUDE, DEFAULT_VIEW_ALTITUDE),
                    target: DVec3::ZERO,
                    up: DVec3::Y,
                },
                controls: OrbitControls::default(),
                clip: ClipPlanes::default(),
            });
        }
    }

    /// Whether the scene rig is ready to accept placements.
    pub fn is_ready(&self) -> bool {
        self.rig.is_some()
    }

    /// Place the camera for `location`.
    ///
    /// Re-anchors the root transform at the location, applies `preset`
    /// verbatim when given (saved views), otherwise derives the default
    /// heading-rotated view. Resets clip planes and re-normalizes up to +Y,
    /// since re-anchoring invalidates the previous up vector.
    pub fn place_camera(
        &mut self,
        location: &AreaLocation,
        preset: Option<&CameraPreset>,
    ) -> Result<Placement, GeoError> {
        let Some(rig) = self.rig.as_mut() else {
            warn!("camera placement requested before scene init; dropping");
            return Err(GeoError::RenderNotReady);
        };

        self.root_transform = local_anchor_transform(&location.geo);
        self.anchor = Some(location.geo);

        let pose = match preset {
            Some(preset) => {
                preset.validate()?;
                CameraPose {
                    position: preset.position,
                    target: preset.target,
                    up: DVec3::Y,
                }
            }
            None => {
                let (sin_h, cos_h) = location.heading_rad.sin_cos();
                CameraPose {
                    // Heading-rotated offset at the configured altitude,
                    // looking back at the origin.
                    position: DVec3::new(
                        location.altitude * sin_h,
                        location.altitude,
                        location.altitude * cos_h,
                    ),
                    target: DVec3::ZERO,
                    up: DVec3::Y,
                }
            }
        };

        rig.pose = pose;
        rig.clip = ClipPlanes::default();
        rig.controls.target = pose.target;
        rig.controls.min_distance = OrbitControls::default().min_distance;
        rig.controls.max_distance = OrbitControls::default().max_distance;

        debug!(
            lat = location.geo.latitude_deg(),
            lon = location.geo.longitude_deg(),
            preset = preset.is_some(),
            "camera placed"
        );

        Ok(Placement {
            pose,
            clip: rig.clip,
            refinement_error_target: REFINEMENT_BOOST_TARGET,
        })
    }

    /// The current camera pose, if the scene is initialized.
    pub fn pose(&self) -> Option<&CameraPose> {
        self.rig.as_ref().map(|rig| &rig.pose)
    }

    /// The current orbit-control state, if the scene is initialized.
    pub fn controls(&self) -> Option<&OrbitControls> {
        self.rig.as_ref().map(|rig| &rig.controls)
    }

    /// The root transform mapping ECEF tile coordinates into the local frame.
    pub fn root_transform(&self) -> DMat4 {
        self.root_transform
    }

    /// The currently anchored location.
    pub fn anchor(&self) -> Option<GeoPoint> {
        self.anchor
    }
}

impl Default for GeodeticCameraPlacer {
    fn default() -> Self {
        Self::new()
    }
}
