//! Camera pose, saved presets, and orbit-control state.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// A camera pose in the anchored local frame.
///
/// Owned by the active render session and recomputed whenever the anchor
/// changes; never persisted directly (saved views go through [`CameraPreset`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// Eye position.
    pub position: DVec3,
    /// Look-at target.
    pub target: DVec3,
    /// Up vector, re-normalized to +Y after every placement.
    pub up: DVec3,
}

impl CameraPose {
    /// Unit view direction from eye to target.
    pub fn forward(&self) -> DVec3 {
        (self.target - self.position).normalize()
    }
}

/// A saved view captured at authoring time and replayed verbatim in local
/// space. This is the only way camera framing is reproduced across sessions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraPreset {
    pub position: DVec3,
    pub target: DVec3,
}

impl CameraPreset {
    /// Reject presets that cannot produce a valid view.
    pub fn validate(&self) -> Result<(), GeoError> {
        let finite = |v: DVec3| v.x.is_finite() && v.y.is_finite() && v.z.is_finite();
        if !finite(self.position) || !finite(self.target) {
            return Err(GeoError::MalformedPreset("non-finite coordinates"));
        }
        if (self.target - self.position).length_squared() < 1e-12 {
            return Err(GeoError::MalformedPreset("position equals target"));
        }
        Ok(())
    }
}

/// Orbit-control state mutated on placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitControls {
    /// Orbit pivot, kept at the camera target.
    pub target: DVec3,
    /// Minimum zoom distance.
    pub min_distance: f64,
    /// Maximum zoom distance.
    pub max_distance: f64,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: DVec3::ZERO,
            min_distance: 10.0,
            max_distance: 4000.0,
        }
    }
}

/// Near/far clip planes, reset on every placement because re-anchoring
/// changes the scene scale the previous planes were tuned for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipPlanes {
    pub near: f64,
    pub far: f64,
}

impl Default for ClipPlanes {
    fn default() -> Self {
        Self {
            near: 1.0,
            far: 5000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_validation() {
        let good = CameraPreset {
            position: DVec3::new(0.0, 200.0, 200.0),
            target: DVec3::ZERO,
        };
        assert!(good.validate().is_ok());

        let degenerate = CameraPreset {
            position: DVec3::ONE,
            target: DVec3::ONE,
        };
        assert!(matches!(
            degenerate.validate(),
            Err(GeoError::MalformedPreset(_))
        ));

        let broken = CameraPreset {
            position: DVec3::new(f64::NAN, 0.0, 0.0),
            target: DVec3::ZERO,
        };
        assert!(matches!(
            broken.validate(),
            Err(GeoError::MalformedPreset(_))
        ));
    }

    #[test]
    fn test_forward_is_unit() {
        let pose = CameraPose {
            position: DVec3::new(0.0, 200.0, 200.0),
            target: DVec3::ZERO,
            up: DVec3::Y,
        };
        assert!((pose.forward().length() - 1.0).abs() < 1e-12);
    }
}
