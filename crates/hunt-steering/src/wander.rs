//! Wander: a target that drifts around a circle projected ahead of the agent.

use hunt_core::geom::{EPSILON_SQ, flat, flat_distance};
use hunt_core::{AgentRng, SimDuration, SimTime, Vec3};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WanderParams {
    /// Distance from the agent to the circle's center along its forward.
    pub circle_distance: f32,
    pub circle_radius:   f32,
    /// Jitter added to the circle offset, per second of interval.
    pub jitter_per_sec:  f32,
    /// Seconds between target updates.
    pub interval:        f32,
    /// A target this close counts as reached and is replaced early.
    pub arrive_radius:   f32,
    /// Radius for snapping the target onto the navmesh.
    pub sample_radius:   f32,
    /// A new destination is only requested when it moved farther than this.
    pub min_reissue:     f32,
}

impl Default for WanderParams {
    fn default() -> Self {
        Self {
            circle_distance: 6.0,
            circle_radius:   3.0,
            jitter_per_sec:  1.5,
            interval:        0.35,
            arrive_radius:   0.3,
            sample_radius:   6.0,
            min_reissue:     1.0,
        }
    }
}

/// Per-agent wander memory.
#[derive(Clone, Debug, Default)]
pub struct WanderState {
    /// Offset on the circle in the agent's local frame (x right, z forward).
    offset:      Option<Vec3>,
    target:      Option<Vec3>,
    next_update: SimTime,
}

impl WanderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current wander target, if one has been picked.
    pub fn current_target(&self) -> Option<Vec3> {
        self.target
    }

    /// Advance the wander target if its interval elapsed or it was reached,
    /// and return it.
    pub fn update(
        &mut self,
        position: Vec3,
        forward:  Vec3,
        now:      SimTime,
        params:   &WanderParams,
        rng:      &mut AgentRng,
    ) -> Vec3 {
        let due = match self.target {
            None => true,
            Some(t) => now >= self.next_update || flat_distance(position, t) < params.arrive_radius,
        };
        if !due {
            return self.target.unwrap_or(position);
        }

        let radius = params.circle_radius;
        let offset = self.offset.unwrap_or_else(|| rng.on_unit_circle() * radius);
        let step = params.jitter_per_sec * params.interval;
        let jitter = Vec3::new(rng.gen_range(-1.0_f32..=1.0), 0.0, rng.gen_range(-1.0_f32..=1.0)) * step;
        let offset = (offset + jitter).try_normalize().unwrap_or(offset.normalize_or_zero()) * radius;

        let fwd = flat(forward).try_normalize().unwrap_or(Vec3::Z);
        let right = Vec3::Y.cross(fwd);
        let center = position + fwd * params.circle_distance;
        let target = center + right * offset.x + fwd * offset.z;

        self.offset = Some(offset);
        self.target = Some(target);
        self.next_update = now + SimDuration::from_secs_f32(params.interval);
        target
    }

    /// Unit ground-plane heading from `position` toward the target.
    /// `None` until a target exists or when standing on it.
    pub fn heading_from(&self, position: Vec3) -> Option<Vec3> {
        let to = flat(self.target? - position);
        (to.length_squared() > EPSILON_SQ).then(|| to.normalize())
    }
}
