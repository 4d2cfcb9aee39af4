//! Spatial query service: ray casts, frustum tests, obstacle and agent overlaps.

use hunt_agent::AgentTags;
use hunt_core::{Aabb, AgentId, LayerMask, Obstacle, ObstacleId, Vec3};

use crate::ViewerCamera;

/// First obstacle struck by a ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    pub point:    Vec3,
    pub distance: f32,
    pub obstacle: ObstacleId,
}

/// Static-geometry queries.  Read-only and shared across worker threads.
pub trait SpatialQuery: Send + Sync {
    /// Nearest obstacle on `mask` hit by the ray `origin + t·direction`,
    /// `0 <= t <= max_distance`.  `direction` must be a unit vector.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> Option<RayHit>;

    /// Obstacles on `mask` whose bounds come within `radius` of `center`.
    fn obstacles_near(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<Obstacle>;

    /// `true` if `bounds` intersects the camera's view frustum.
    fn frustum_intersects(&self, camera: &ViewerCamera, bounds: &Aabb) -> bool {
        camera.frustum().intersects_aabb(bounds)
    }
}

/// Which agents an overlap query may return.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AgentFilter {
    /// Every returned agent carries all of these tags.
    pub require: AgentTags,
    /// Never returned, typically the querying agent itself.
    pub exclude: Option<AgentId>,
}

impl AgentFilter {
    pub fn tagged(require: AgentTags) -> Self {
        Self { require, exclude: None }
    }

    pub fn excluding(mut self, agent: AgentId) -> Self {
        self.exclude = Some(agent);
        self
    }

    #[inline]
    pub fn accepts(&self, agent: AgentId, tags: AgentTags) -> bool {
        self.exclude != Some(agent) && tags.contains(self.require)
    }
}

/// Sphere overlap over agents.  Implemented against a snapshot taken at tick
/// start, so results never reflect mid-tick movement.
pub trait AgentOverlap {
    /// Agents passing `filter` within `radius` of `center`, ascending by id.
    fn overlap_sphere(&self, center: Vec3, radius: f32, filter: &AgentFilter) -> Vec<AgentId>;
}
