//! Leader roaming: a flock leader strolls between random points of an area.

use log::debug;

use hunt_core::{Aabb, AgentRng, SimDuration, SimTime, Vec3};
use hunt_nav::{NavAgentState, NavMeshQuery};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoamParams {
    /// Seconds between new points, even if the last one was not reached.
    pub interval:               f32,
    /// Remaining distance below which a new point is picked early.
    pub arrive_distance:        f32,
    pub max_attempts:           u32,
    pub sample_radius:          f32,
    /// Half extent of the square roamed when no area is configured, and
    /// the reach of the last-resort probe around the leader.
    pub fallback_radius:        f32,
    pub fallback_sample_radius: f32,
}

impl Default for RoamParams {
    fn default() -> Self {
        Self {
            interval:               3.0,
            arrive_distance:        1.0,
            max_attempts:           10,
            sample_radius:          5.0,
            fallback_radius:        30.0,
            fallback_sample_radius: 10.0,
        }
    }
}

/// Per-leader roaming timer.
#[derive(Clone, Debug, Default)]
pub struct LeaderRoam {
    next_pick: Option<SimTime>,
}

impl LeaderRoam {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new roam destination when one is due: on the first call, once the
    /// leader is within `arrive_distance` of its destination, or every
    /// `interval`.  `None` while a path computation is pending or the
    /// current point is still fresh.
    pub fn update(
        &mut self,
        area:   Option<&Aabb>,
        state:  &NavAgentState,
        now:    SimTime,
        params: &RoamParams,
        nav:    &dyn NavMeshQuery,
        rng:    &mut AgentRng,
    ) -> Option<Vec3> {
        if state.path_pending {
            return None;
        }
        let due = match self.next_pick {
            None => true,
            Some(t) => now >= t || state.remaining_distance < params.arrive_distance,
        };
        if !due {
            return None;
        }
        self.next_pick = Some(now + SimDuration::from_secs_f32(params.interval));
        Some(pick_point(area, state.position, params, nav, rng))
    }
}

/// Random navigable point in `area`, falling back to a point near `origin`,
/// then to `origin` itself.
pub fn pick_point(
    area:   Option<&Aabb>,
    origin: Vec3,
    params: &RoamParams,
    nav:    &dyn NavMeshQuery,
    rng:    &mut AgentRng,
) -> Vec3 {
    let area = area
        .copied()
        .unwrap_or_else(|| Aabb::from_center_half_extents(origin, Vec3::splat(params.fallback_radius)));

    for _ in 0..params.max_attempts {
        let x = if area.max.x > area.min.x { rng.gen_range(area.min.x..area.max.x) } else { area.min.x };
        let z = if area.max.z > area.min.z { rng.gen_range(area.min.z..area.max.z) } else { area.min.z };
        if let Some(p) = nav.sample_navigable(Vec3::new(x, area.center().y, z), params.sample_radius) {
            return p;
        }
    }

    let probe = origin + rng.in_unit_sphere() * params.fallback_radius;
    if let Some(p) = nav.sample_navigable(probe, params.fallback_sample_radius) {
        return p;
    }
    debug!("no roam point found near {origin}; holding position");
    origin
}
