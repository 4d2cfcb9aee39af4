//! One investigation: the queue being worked through and its timers.

use log::debug;

use hunt_core::geom::flat_distance;
use hunt_core::{AgentId, AgentRng, SimTime, Vec3};
use hunt_nav::{NavAgentState, NavMeshQuery, PathStatus, SpatialQuery};
use hunt_search::{SearchPlanner, SearchQueue};

use crate::{AgentConfig, BehaviorFault};

/// Two points closer than this on the ground count as the same place when
/// deciding whether a rebuilt queue offers anything new.
const SAME_SPOT: f32 = 0.5;

/// What the session wants done this tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum SearchStep {
    /// Walk toward this point.
    Go(Vec3),
    /// Keep the current destination.
    Hold,
    /// Standing at a candidate for the investigate pause.
    Pause,
}

#[derive(Clone, Debug)]
pub(crate) struct SearchSession {
    /// Where the lead was when the search began.
    pub origin:     Vec3,
    pub queue:      SearchQueue,
    /// Every point of the current queue generation, visited or not.
    generation:     Vec<Vec3>,
    pub current:    Option<Vec3>,
    issued_at:      Option<SimTime>,
    pause_until:    Option<SimTime>,
    /// Earliest time to look for a point again after finding none.
    retry_at:       Option<SimTime>,
    /// `None` searches until a new lead or state change ends it.
    pub give_up_at: Option<SimTime>,
}

impl SearchSession {
    /// Plan a fresh search around `origin` for an agent standing at `searcher`.
    pub fn begin(
        origin:   Vec3,
        searcher: Vec3,
        now:      SimTime,
        config:   &AgentConfig,
        planner:  &SearchPlanner,
        nav:      &dyn NavMeshQuery,
        spatial:  &dyn SpatialQuery,
    ) -> Self {
        let queue = plan(origin, searcher, planner, nav, spatial);
        Self {
            origin,
            generation: queue.points().collect(),
            queue,
            current: None,
            issued_at: None,
            pause_until: None,
            retry_at: None,
            give_up_at: config.give_up_deadline(now),
        }
    }

    /// `true` once the give-up deadline, if any, has passed.
    #[inline]
    pub fn gave_up(&self, now: SimTime) -> bool {
        self.give_up_at.is_some_and(|t| now >= t)
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.pause_until.is_some()
    }

    /// Advance one tick.
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        agent:   AgentId,
        state:   &NavAgentState,
        lead:    Option<Vec3>,
        now:     SimTime,
        config:  &AgentConfig,
        planner: &SearchPlanner,
        nav:     &dyn NavMeshQuery,
        spatial: &dyn SpatialQuery,
        rng:     &mut AgentRng,
    ) -> SearchStep {
        if let Some(until) = self.pause_until {
            if now < until {
                return SearchStep::Pause;
            }
            self.pause_until = None;
            return self.next_point(agent, state, lead, now, config, planner, nav, spatial, rng);
        }

        if self.current.is_none() {
            if self.retry_at.is_some_and(|t| now < t) {
                return SearchStep::Hold;
            }
            return self.next_point(agent, state, lead, now, config, planner, nav, spatial, rng);
        }
        // The service has not seen a request issued this tick yet.
        if !self.issued_at.is_some_and(|t| now > t) {
            return SearchStep::Hold;
        }

        if matches!(state.path_status, PathStatus::Partial | PathStatus::Invalid) {
            debug!("{agent}: {} at {:?}; skipping", BehaviorFault::NavigationUnreachable, self.current);
            return self.next_point(agent, state, lead, now, config, planner, nav, spatial, rng);
        }
        if state.arrived(config.nav.stop_tolerance) {
            let pause = config.investigate_pause();
            if pause.is_zero() {
                return self.next_point(agent, state, lead, now, config, planner, nav, spatial, rng);
            }
            self.pause_until = Some(now + pause);
            return SearchStep::Pause;
        }
        if !state.has_path && !self.queue.is_empty() {
            return self.next_point(agent, state, lead, now, config, planner, nav, spatial, rng);
        }
        SearchStep::Hold
    }

    /// Pop the next reachable candidate.  When the queue runs dry, rebuild
    /// it once; if that offers nothing new, probe a random spot nearby.
    #[allow(clippy::too_many_arguments)]
    fn next_point(
        &mut self,
        agent:   AgentId,
        state:   &NavAgentState,
        lead:    Option<Vec3>,
        now:     SimTime,
        config:  &AgentConfig,
        planner: &SearchPlanner,
        nav:     &dyn NavMeshQuery,
        spatial: &dyn SpatialQuery,
        rng:     &mut AgentRng,
    ) -> SearchStep {
        if let Some(p) = self.pop_reachable(agent, config, nav) {
            return self.go(p, now);
        }

        let origin = lead.unwrap_or(self.origin);
        let fresh = plan(origin, state.position, planner, nav, spatial);
        let novel = fresh
            .points()
            .any(|p| !self.generation.iter().any(|&seen| flat_distance(seen, p) <= SAME_SPOT));
        if novel {
            debug!("{agent}: search queue rebuilt with {} candidates", fresh.len());
            self.generation = fresh.points().collect();
            self.queue = fresh;
            if let Some(p) = self.pop_reachable(agent, config, nav) {
                return self.go(p, now);
            }
        }

        debug!("{agent}: {}; probing locally", BehaviorFault::EmptySearchSpace);
        let probe = state.position + rng.in_unit_sphere() * config.nav.probe_radius;
        match nav
            .sample_navigable(probe, config.nav.probe_sample_radius)
            .or_else(|| nav.sample_navigable(origin, config.nav.sample_radius))
        {
            Some(p) => self.go(p, now),
            None => {
                debug!("{agent}: {} for local probe", BehaviorFault::NavigationUnreachable);
                self.current = None;
                self.retry_at = Some(now + config.repath_interval());
                SearchStep::Hold
            }
        }
    }

    fn pop_reachable(&mut self, agent: AgentId, config: &AgentConfig, nav: &dyn NavMeshQuery) -> Option<Vec3> {
        for candidate in self.queue.by_ref() {
            match nav.sample_navigable(candidate.point, config.nav.sample_radius) {
                Some(p) => return Some(p),
                None => debug!("{agent}: {} at {}", BehaviorFault::NavigationUnreachable, candidate.point),
            }
        }
        None
    }

    fn go(&mut self, point: Vec3, now: SimTime) -> SearchStep {
        self.current = Some(point);
        self.retry_at = None;
        self.issued_at = Some(now);
        SearchStep::Go(point)
    }
}

fn plan(
    origin:   Vec3,
    searcher: Vec3,
    planner:  &SearchPlanner,
    nav:      &dyn NavMeshQuery,
    spatial:  &dyn SpatialQuery,
) -> SearchQueue {
    let params = &planner.params;
    let obstacles = spatial.obstacles_near(origin, params.search_radius, params.cover_mask);
    planner.build_search_queue(origin, searcher, &obstacles, params.max_candidates, nav)
}
