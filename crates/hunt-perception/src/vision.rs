//! Direct vision: range gate, optional view cone, then a line-of-sight ray.

use hunt_core::{Aabb, LayerMask, SimTime, Vec3};
use hunt_nav::{SpatialQuery, ViewerCamera};

use crate::PerceptionEvent;

/// Eye-to-eye distance at which the target counts as visible without a ray.
const CONTACT_DISTANCE: f32 = 1e-3;

/// Half extent of the box used for the target in the view-cone test.
const TARGET_HALF_EXTENT: f32 = 0.25;

/// An agent's eyes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisionSensor {
    /// Maximum eye-to-eye distance at which the target can be seen.
    pub range:         f32,
    /// Eye height above the feet, applied to both agent and target.
    pub eye_height:    f32,
    /// Layers that block sight.
    pub obstacle_mask: LayerMask,
    /// Vertical field of view in degrees.  `None` sees all around.
    pub field_of_view: Option<f32>,
}

impl Default for VisionSensor {
    fn default() -> Self {
        Self {
            range:         40.0,
            eye_height:    1.6,
            obstacle_mask: LayerMask::ALL,
            field_of_view: None,
        }
    }
}

impl VisionSensor {
    /// Look for the target standing at `target` from an agent at `position`
    /// facing `forward`.  Returns a `Sighting` when the target is visible
    /// this instant; no memory or grace period is applied.
    pub fn look(
        &self,
        position: Vec3,
        forward:  Vec3,
        target:   Vec3,
        now:      SimTime,
        spatial:  &dyn SpatialQuery,
    ) -> Option<PerceptionEvent> {
        let eye = position + Vec3::Y * self.eye_height;
        let target_eye = target + Vec3::Y * self.eye_height;
        let to_target = target_eye - eye;
        let dist = to_target.length();
        if dist > self.range {
            return None;
        }

        if dist > CONTACT_DISTANCE {
            if let Some(fov) = self.field_of_view {
                let camera = ViewerCamera {
                    fov_y: fov.to_radians(),
                    far:   self.range.max(1.0),
                    ..ViewerCamera::looking(eye, forward.try_normalize().unwrap_or(Vec3::Z))
                };
                let body = Aabb::from_center_half_extents(target_eye, Vec3::splat(TARGET_HALF_EXTENT));
                if !spatial.frustum_intersects(&camera, &body) {
                    return None;
                }
            }
            if spatial.raycast(eye, to_target / dist, dist, self.obstacle_mask).is_some() {
                return None;
            }
        }

        Some(PerceptionEvent::Sighting { position: target, time: now })
    }
}
