//! Per-agent progress along a patrol route.

use log::debug;

use hunt_core::{AgentRng, SimDuration, Vec3};
use hunt_nav::{NavAgentState, NavMeshQuery, PathStatus};

use crate::PatrolRoute;

/// Squared displacement per tick below which the agent made no progress.
const STUCK_MOVE_SQ: f32 = 1e-3;
/// Squared speed below which the agent counts as standing still.
const STUCK_SPEED_SQ: f32 = 1e-2;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PatrolParams {
    /// Remaining distance at which a waypoint counts as reached.
    pub arrive_distance: f32,
    /// Search radius around an unreachable waypoint for an alternative.
    pub probe_radius:    f32,
    pub probe_attempts:  u32,
    /// Seconds without progress before moving on to the next waypoint.
    pub stuck_after:     f32,
}

impl Default for PatrolParams {
    fn default() -> Self {
        Self {
            arrive_distance: 1.0,
            probe_radius:    2.0,
            probe_attempts:  6,
            stuck_after:     2.0,
        }
    }
}

/// Where an agent is along its route.
#[derive(Clone, Debug)]
pub struct PatrolCursor {
    index:         usize,
    dir:           i32,
    started:       bool,
    stuck_for:     SimDuration,
    last_position: Option<Vec3>,
}

impl PatrolCursor {
    /// Start at a random waypoint heading in a random direction.
    pub fn new(route: &PatrolRoute, rng: &mut AgentRng) -> Self {
        let index = rng.gen_range(0..route.len());
        let dir = if rng.gen_bool(0.5) { 1 } else { -1 };
        Self::at(index, dir)
    }

    /// Start at `index` travelling in direction `dir` (±1).
    pub fn at(index: usize, dir: i32) -> Self {
        Self {
            index,
            dir: if dir < 0 { -1 } else { 1 },
            started: false,
            stuck_for: SimDuration::ZERO,
            last_position: None,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn direction(&self) -> i32 {
        self.dir
    }

    /// Forget progress tracking so the next update re-issues the current
    /// waypoint.  Called when the agent returns to patrolling.
    pub fn resume(&mut self) {
        self.started = false;
        self.stuck_for = SimDuration::ZERO;
        self.last_position = None;
    }

    /// Advance one tick.  Returns a destination to request, or `None` to
    /// keep the current one.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        route:          &PatrolRoute,
        state:          &NavAgentState,
        dt:             SimDuration,
        stop_tolerance: f32,
        params:         &PatrolParams,
        nav:            &dyn NavMeshQuery,
        rng:            &mut AgentRng,
    ) -> Option<Vec3> {
        if !self.started {
            self.started = true;
            self.last_position = Some(state.position);
            return self.reachable_or_skip(route, state.position, params, nav, rng);
        }

        let arrive = params.arrive_distance.max(stop_tolerance + 0.1);
        if state.arrived(arrive) {
            self.step(route);
            return self.reachable_or_skip(route, state.position, params, nav, rng);
        }

        self.track_progress(state, dt);
        let stuck = self.stuck_for > SimDuration::from_secs_f32(params.stuck_after);
        if stuck || matches!(state.path_status, PathStatus::Partial | PathStatus::Invalid) {
            debug!("patrol waypoint {} abandoned (stuck: {stuck}, path: {:?})", self.index, state.path_status);
            self.stuck_for = SimDuration::ZERO;
            self.step(route);
            return self.reachable_or_skip(route, state.position, params, nav, rng);
        }
        None
    }

    fn step(&mut self, route: &PatrolRoute) {
        (self.index, self.dir) = route.advance(self.index, self.dir);
    }

    fn track_progress(&mut self, state: &NavAgentState, dt: SimDuration) {
        let moved_sq = self
            .last_position
            .map_or(f32::INFINITY, |last| (state.position - last).length_squared());
        self.last_position = Some(state.position);
        let no_progress = moved_sq < STUCK_MOVE_SQ
            && state.velocity.length_squared() < STUCK_SPEED_SQ
            && !state.path_pending;
        self.stuck_for = if no_progress { self.stuck_for + dt } else { SimDuration::ZERO };
    }

    /// A reachable point at or near the current waypoint; failing that,
    /// skip one waypoint and try once more.
    fn reachable_or_skip(
        &mut self,
        route:  &PatrolRoute,
        from:   Vec3,
        params: &PatrolParams,
        nav:    &dyn NavMeshQuery,
        rng:    &mut AgentRng,
    ) -> Option<Vec3> {
        if let Some(p) = try_reachable(route.waypoint(self.index), from, params, nav, rng) {
            return Some(p);
        }
        debug!("patrol waypoint {} unreachable; skipping", self.index);
        self.step(route);
        try_reachable(route.waypoint(self.index), from, params, nav, rng)
    }
}

/// `target` snapped to the navmesh if a complete path leads there from
/// `from`, else the first of a few random probes around it that does.
pub fn try_reachable(
    target: Vec3,
    from:   Vec3,
    params: &PatrolParams,
    nav:    &dyn NavMeshQuery,
    rng:    &mut AgentRng,
) -> Option<Vec3> {
    let reachable = |p: Vec3| {
        nav.sample_navigable(p, params.probe_radius)
            .filter(|&hit| nav.path_is_complete(from, hit))
    };
    reachable(target).or_else(|| {
        (0..params.probe_attempts).find_map(|_| reachable(target + rng.in_unit_sphere() * params.probe_radius))
    })
}
