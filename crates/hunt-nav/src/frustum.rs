//! View-frustum math for "seen by the viewer" perception.
//!
//! Planes are extracted from the camera's view-projection matrix with the
//! Gribb/Hartmann method.  Every plane normal points into the visible
//! volume, so a point is inside when its signed distance to all six planes
//! is non-negative.

use glam::{Mat4, Vec4};

use hunt_core::{Aabb, Vec3};

// ── ViewerCamera ──────────────────────────────────────────────────────────────

/// A perspective camera looking at the scene, usually the target's own view.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewerCamera {
    pub position:    Vec3,
    /// Unit look direction.
    pub forward:     Vec3,
    pub up:          Vec3,
    /// Vertical field of view in radians.
    pub fov_y:       f32,
    pub aspect:      f32,
    pub near:        f32,
    pub far:         f32,
}

impl ViewerCamera {
    /// Camera at `position` looking along `forward` with a 60° vertical FOV.
    pub fn looking(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: forward.normalize_or_zero(),
            up:      Vec3::Y,
            fov_y:   60_f32.to_radians(),
            aspect:  16.0 / 9.0,
            near:    0.3,
            far:     200.0,
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        let proj = Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far);
        let view = Mat4::look_to_rh(self.position, self.forward, self.up);
        proj * view
    }

    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(&self.view_projection())
    }

    /// `true` if `point` lies in the half-space ahead of the camera.
    #[inline]
    pub fn is_in_front(&self, point: Vec3) -> bool {
        (point - self.position).dot(self.forward) > 0.0
    }
}

// ── Plane ─────────────────────────────────────────────────────────────────────

/// Plane `normal · p + distance = 0` with a unit normal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    pub normal:   Vec3,
    pub distance: f32,
}

impl Plane {
    /// Build from raw coefficients, normalizing.  A degenerate normal yields
    /// a plane that accepts everything.
    fn from_coefficients(v: Vec4) -> Self {
        let normal = v.truncate();
        let len = normal.length();
        if len > 1e-10 {
            Self { normal: normal / len, distance: v.w / len }
        } else {
            Self { normal: Vec3::Y, distance: f32::INFINITY }
        }
    }

    /// Signed distance; positive on the side the normal points to.
    #[inline]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

// ── Frustum ───────────────────────────────────────────────────────────────────

/// Six inward-facing planes: left, right, bottom, top, near, far.
#[derive(Clone, Debug)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract planes from a GL-convention (`-1..1` depth) view-projection.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let (r0, r1, r2, r3) = (vp.row(0), vp.row(1), vp.row(2), vp.row(3));
        Self {
            planes: [
                Plane::from_coefficients(r3 + r0),
                Plane::from_coefficients(r3 - r0),
                Plane::from_coefficients(r3 + r1),
                Plane::from_coefficients(r3 - r1),
                Plane::from_coefficients(r3 + r2),
                Plane::from_coefficients(r3 - r2),
            ],
        }
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|p| p.distance_to_point(point) >= 0.0)
    }

    /// Conservative box test: `false` only when the box lies entirely
    /// behind one plane.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes.iter().all(|plane| {
            // Corner furthest along the normal (p-vertex).
            let p = Vec3::new(
                if plane.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            plane.distance_to_point(p) >= 0.0
        })
    }
}
