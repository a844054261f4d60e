//! View frustum culling in the anchored local frame.
//!
//! Planes are extracted from the view-projection matrix with the
//! Gribb/Hartmann method and tested against tile AABBs using the
//! p-vertex/n-vertex classification.

use glam::{DMat4, DVec3, DVec4};
use terrasol_geo::CameraPose;

/// Result of testing an AABB against the frustum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intersection {
    /// The box is entirely inside the frustum.
    Inside,
    /// The box is entirely outside the frustum.
    Outside,
    /// The box straddles one or more frustum planes.
    Intersecting,
}

/// A view frustum as six inward-pointing planes `(nx, ny, nz, d)` with
/// `n·p + d >= 0` meaning inside.
#[derive(Clone, Debug)]
pub struct Frustum {
    planes: [DVec4; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix with depth in
    /// `[0, 1]` (as produced by `DMat4::perspective_rh`).
    pub fn from_view_projection(vp: &DMat4) -> Self {
        let r0 = vp.row(0);
        let r1 = vp.row(1);
        let r2 = vp.row(2);
        let r3 = vp.row(3);

        let planes = [
            normalize_plane(r3 + r0), // left
            normalize_plane(r3 - r0), // right
            normalize_plane(r3 + r1), // bottom
            normalize_plane(r3 - r1), // top
            normalize_plane(r2),      // near (depth >= 0)
            normalize_plane(r3 - r2), // far
        ];
        Self { planes }
    }

    /// Build the frustum for a camera pose and projection parameters.
    pub fn from_camera(
        pose: &CameraPose,
        viewport: (u32, u32),
        fov_y_rad: f64,
        near: f64,
        far: f64,
    ) -> Self {
        let aspect = viewport.0 as f64 / viewport.1 as f64;
        let view = DMat4::look_at_rh(pose.position, pose.target, pose.up);
        let proj = DMat4::perspective_rh(fov_y_rad, aspect, near, far);
        Self::from_view_projection(&(proj * view))
    }

    /// Test whether a point is inside all six planes.
    pub fn contains_point(&self, point: DVec3) -> bool {
        let p = point.extend(1.0);
        self.planes.iter().all(|plane| plane.dot(p) >= 0.0)
    }

    /// Classify an AABB against the frustum.
    ///
    /// For each plane, the vertex furthest along the plane normal (p-vertex)
    /// and the opposite corner (n-vertex) decide containment:
    /// - p-vertex outside: the box is fully outside.
    /// - n-vertex outside: the box straddles the plane.
    pub fn intersects_aabb(&self, min: DVec3, max: DVec3) -> Intersection {
        let mut all_inside = true;

        for plane in &self.planes {
            let p_vertex = DVec3::new(
                if plane.x >= 0.0 { max.x } else { min.x },
                if plane.y >= 0.0 { max.y } else { min.y },
                if plane.z >= 0.0 { max.z } else { min.z },
            );
            if plane.dot(p_vertex.extend(1.0)) < 0.0 {
                return Intersection::Outside;
            }

            let n_vertex = DVec3::new(
                if plane.x >= 0.0 { min.x } else { max.x },
                if plane.y >= 0.0 { min.y } else { max.y },
                if plane.z >= 0.0 { min.z } else { max.z },
            );
            if plane.dot(n_vertex.extend(1.0)) < 0.0 {
                all_inside = false;
            }
        }

        if all_inside {
            Intersection::Inside
        } else {
            Intersection::Intersecting
        }
    }
}

fn normalize_plane(plane: DVec4) -> DVec4 {
    let len = DVec3::new(plane.x, plane.y, plane.z).length();
    if len > 0.0 { plane / len } else { plane }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frustum() -> Frustum {
        // Camera at origin looking down -Z, 90° FOV, square viewport.
        let pose = CameraPose {
            position: DVec3::ZERO,
            target: DVec3::new(0.0, 0.0, -10.0),
            up: DVec3::Y,
        };
        Frustum::from_camera(&pose, (512, 512), std::f64::consts::FRAC_PI_2, 1.0, 1000.0)
    }

    #[test]
    fn test_point_inside_frustum() {
        let frustum = test_frustum();
        assert!(frustum.contains_point(DVec3::new(0.0, 0.0, -500.0)));
    }

    #[test]
    fn test_point_behind_camera() {
        let frustum = test_frustum();
        assert!(!frustum.contains_point(DVec3::new(0.0, 0.0, 10.0)));
    }

    #[test]
    fn test_point_outside_side_planes() {
        let frustum = test_frustum();
        // At z = -10 with 90° FOV the half-width is 10.
        assert!(frustum.contains_point(DVec3::new(9.0, 0.0, -10.0)));
        assert!(!frustum.contains_point(DVec3::new(12.0, 0.0, -10.0)));
        assert!(!frustum.contains_point(DVec3::new(0.0, 12.0, -10.0)));
    }

    #[test]
    fn test_point_beyond_far_plane() {
        let frustum = test_frustum();
        assert!(!frustum.contains_point(DVec3::new(0.0, 0.0, -2000.0)));
    }

    #[test]
    fn test_aabb_fully_inside() {
        let frustum = test_frustum();
        let result = frustum.intersects_aabb(
            DVec3::new(-1.0, -1.0, -60.0),
            DVec3::new(1.0, 1.0, -40.0),
        );
        assert_eq!(result, Intersection::Inside);
    }

    #[test]
    fn test_aabb_fully_outside() {
        let frustum = test_frustum();
        let result = frustum.intersects_aabb(
            DVec3::new(-1.0, -1.0, 10.0),
            DVec3::new(1.0, 1.0, 20.0),
        );
        assert_eq!(result, Intersection::Outside);
    }

    #[test]
    fn test_aabb_straddling_near_plane() {
        let frustum = test_frustum();
        let result = frustum.intersects_aabb(
            DVec3::new(-1.0, -1.0, -2.0),
            DVec3::new(1.0, 1.0, 0.5),
        );
        assert_eq!(result, Intersection::Intersecting);
    }

    #[test]
    fn test_offset_camera() {
        let pose = CameraPose {
            position: DVec3::new(0.0, 200.0, 200.0),
            target: DVec3::ZERO,
            up: DVec3::Y,
        };
        let frustum = Frustum::from_camera(&pose, (800, 600), 1.0, 1.0, 5000.0);
        // The look-at target is inside; a point far behind the camera is not.
        assert!(frustum.contains_point(DVec3::ZERO));
        assert!(!frustum.contains_point(DVec3::new(0.0, 400.0, 400.0)));
    }
}
