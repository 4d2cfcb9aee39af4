//! `AgentBrain`: the per-agent behavior state machine.
//!
//! # Priority
//!
//! Each tick resolves perception in strictly decreasing priority:
//!
//! ```text
//! own sighting      → Chase         (a scent seen the same tick stays pending)
//! relayed sighting  → Chase         (no vision check of its own)
//! scent             → Investigate   (in Chase it only refreshes memory)
//! nothing           → the current state carries on
//! ```
//!
//! then runs the active state:
//!
//! ```text
//! Chase        sees target: repath toward it every repath_interval
//!              lost sight:  grace timer, then search from the last known position
//! Investigate  visit candidates, pause at each, rebuild or probe when dry,
//!              give up after give_up_after (0: never) without a fresh lead
//! Wander       patrol route > flock following > leader roaming > plain wander
//! Idle         no target configured; nothing to do
//! ```

use log::{debug, info, warn};

use hunt_agent::AgentTags;
use hunt_core::geom::flat_distance;
use hunt_core::{Aabb, AgentId, AgentRng, SimDuration, SimTime, Vec3};
use hunt_nav::{NavAgentState, PathStatus, SpatialQuery};
use hunt_patrol::PatrolCursor;
use hunt_perception::{FrustumWatcher, PerceptionEvent, ScentSensor, VisionSensor};
use hunt_search::{SearchPlanner, SearchQueue};
use hunt_steering::{FlockMember, FlockSteering, LeaderRoam, WanderState};

use crate::session::{SearchSession, SearchStep};
use crate::{
    AgentConfig, AgentInputs, AgentOutput, AgentWarning, AllyAlertReceiver, AllySighting,
    BehaviorFault, BehaviorResult, BehaviorState, Intent, PresentationFrame, TargetMemory,
    TargetView, TickContext, VisionMode,
};

// ── Chase bookkeeping ─────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default)]
struct ChaseState {
    /// When the target was last lost from view; `None` while visible.
    lost_at:     Option<SimTime>,
    /// Chasing a relayed position that has not been reached yet.
    relayed:     bool,
    next_repath: SimTime,
    issued_at:   Option<SimTime>,
}

// ── AgentBrain ────────────────────────────────────────────────────────────────

/// Decision state of one agent.
///
/// Owns its timers, memory, sensors, and steering state outright.  Other
/// agents are only ever seen through the snapshot in [`AgentInputs`] and
/// through relayed sightings.
#[derive(Clone, Debug)]
pub struct AgentBrain {
    id:      AgentId,
    config:  AgentConfig,
    state:   BehaviorState,
    memory:  TargetMemory,
    planner: SearchPlanner,

    vision:  VisionSensor,
    watcher: FrustumWatcher,
    scent:   ScentSensor,

    chase:         ChaseState,
    search:        Option<SearchSession>,
    pending_scent: Option<PerceptionEvent>,
    pending_alert: Option<AllySighting>,

    wander:       WanderState,
    flock:        FlockSteering,
    roam:         LeaderRoam,
    patrol:       Option<PatrolCursor>,
    cruise_speed: Option<f32>,

    warned_perception: bool,
    warned_nav:        bool,
}

impl AgentBrain {
    /// A brain for `id` starting in `Idle`.  Fails if `config` does not
    /// validate.
    pub fn new(id: AgentId, config: AgentConfig) -> BehaviorResult<Self> {
        config.validate()?;
        Ok(Self {
            id,
            state: BehaviorState::Idle,
            memory: TargetMemory::new(),
            planner: SearchPlanner::new(config.search.clone()),
            vision: config.vision.sensor(),
            watcher: FrustumWatcher::new(SimDuration::from_secs_f32(config.vision.frustum_interval)),
            scent: ScentSensor::new(config.memory.scent_reach, config.scent_memory()),
            chase: ChaseState::default(),
            search: None,
            pending_scent: None,
            pending_alert: None,
            wander: WanderState::new(),
            flock: FlockSteering::new(),
            roam: LeaderRoam::new(),
            patrol: None,
            cruise_speed: None,
            warned_perception: false,
            warned_nav: false,
            config,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn memory(&self) -> &TargetMemory {
        &self.memory
    }

    /// Remaining search candidates, or `None` outside `Investigate`.
    pub fn search_queue(&self) -> Option<&SearchQueue> {
        self.search.as_ref().map(|s| &s.queue)
    }

    /// The search point currently being walked to.
    pub fn search_target(&self) -> Option<Vec3> {
        self.search.as_ref().and_then(|s| s.current)
    }

    /// Where the current search started.
    pub fn search_origin(&self) -> Option<Vec3> {
        self.search.as_ref().map(|s| s.origin)
    }

    /// A scent lead held back by a higher-priority input this tick.
    pub fn pending_scent(&self) -> Option<&PerceptionEvent> {
        self.pending_scent.as_ref()
    }

    /// Cruising speed drawn for flock following, once drawn.
    pub fn cruise_speed(&self) -> Option<f32> {
        self.cruise_speed
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Evaluate one tick.  Reads only `ctx` and `inputs`; all effects on the
    /// world are returned as intents.
    pub fn tick(&mut self, ctx: &TickContext<'_>, inputs: &AgentInputs, rng: &mut AgentRng) -> AgentOutput {
        let now = ctx.now;
        let nav = &inputs.nav;
        let mut intents = Vec::new();

        if self.memory.expire(now) {
            debug!("{}: {}", self.id, BehaviorFault::StaleMemory);
        }

        let Some(target) = ctx.target else {
            if !self.warned_perception {
                warn!("{}: {}; staying idle", self.id, BehaviorFault::PerceptionUnavailable);
                self.warned_perception = true;
            }
            self.pending_alert = None;
            self.transition(BehaviorState::Idle, now);
            return self.output(intents);
        };

        if !nav.on_navmesh {
            if !self.warned_nav {
                let warning = AgentWarning::NavigationUnavailable(self.id);
                warn!("{warning}");
                intents.push(Intent::Warn(warning));
                self.warned_nav = true;
            }
            self.pending_alert = None;
            self.transition(BehaviorState::Wander, now);
            return AgentOutput { intents, frame: PresentationFrame::default() };
        }

        // ── Perception ────────────────────────────────────────────────────
        let (sees, sighting) = self.perceive(target, nav, now, ctx.spatial);
        let scent = self
            .scent
            .sense(&inputs.odors, now)
            .or(self.pending_scent.take())
            .filter(|s| scent_expiry(s).is_some_and(|exp| now < exp));
        let alert = self.pending_alert.take();

        // ── Priority ──────────────────────────────────────────────────────
        if sees {
            self.memory.refresh(target.position, now, now + self.config.sighting_memory());
            self.pending_scent = scent;
            if sighting.is_some() && ctx.agents.has_tag(self.id, AgentTags::ALERT_SENDER) {
                intents.push(Intent::Alert {
                    sighting: AllySighting { from: self.id, origin: nav.position, position: target.position, time: now },
                    radius:   self.config.alert.radius,
                    cooldown: self.config.alert_cooldown(),
                });
            }
            self.begin_chase(false, now);
        } else if let Some(a) = alert {
            debug!("{}: ally {} reports target at {}", self.id, a.from, a.position);
            self.memory.refresh(a.position, a.time, now + self.config.sighting_memory());
            self.pending_scent = scent;
            self.begin_chase(true, now);
        } else if let Some(PerceptionEvent::Scent { position, time, expires_at }) = scent {
            if self.state == BehaviorState::Chase {
                // A scent held back behind a sighting is no newer than it.
                if self.memory.refresh_if_newer(position, time, expires_at) {
                    debug!("{}: scent at {position} refreshes the chase lead", self.id);
                }
            } else {
                self.memory.refresh(position, time, expires_at);
                debug!("{}: picked up a scent at {position}", self.id);
                self.begin_search(position, nav.position, ctx, now);
            }
        }

        if self.state == BehaviorState::Idle {
            self.transition(BehaviorState::Wander, now);
        }

        // ── Active state ──────────────────────────────────────────────────
        match self.state {
            BehaviorState::Chase => self.run_chase(ctx, inputs, target, sees, rng, &mut intents),
            BehaviorState::Investigate => self.run_investigate(ctx, inputs, rng, &mut intents),
            BehaviorState::Wander => self.run_wander(ctx, inputs, rng, &mut intents),
            BehaviorState::Idle => {}
        }

        self.output(intents)
    }

    // ── Perception ────────────────────────────────────────────────────────

    /// Whether the target is in view now, and the sighting event if one
    /// fired.  Line of sight fires every visible tick; the viewer frustum
    /// fires on the rising edge only.
    fn perceive(
        &mut self,
        target:  &TargetView,
        nav:     &NavAgentState,
        now:     SimTime,
        spatial: &dyn SpatialQuery,
    ) -> (bool, Option<PerceptionEvent>) {
        match self.config.vision.mode {
            VisionMode::LineOfSight => {
                let seen = self.vision.look(nav.position, nav.forward, target.position, now, spatial);
                (seen.is_some(), seen)
            }
            VisionMode::ViewerFrustum => {
                let Some(camera) = target.camera else {
                    if !self.warned_perception {
                        warn!("{}: {} (target has no camera)", self.id, BehaviorFault::PerceptionUnavailable);
                        self.warned_perception = true;
                    }
                    return (false, None);
                };
                let half = self.config.vision.body_half_extents;
                let body = Aabb::from_center_half_extents(nav.position + Vec3::Y * half.y, half);
                let seen = self.watcher.observe(&camera, &body, target.position, now, spatial);
                (self.watcher.is_visible(), seen)
            }
        }
    }

    // ── Chase ─────────────────────────────────────────────────────────────

    fn begin_chase(&mut self, relayed: bool, now: SimTime) {
        if self.state != BehaviorState::Chase {
            self.transition(BehaviorState::Chase, now);
            self.chase = ChaseState { next_repath: now, ..ChaseState::default() };
        }
        self.chase.lost_at = None;
        self.chase.relayed = relayed;
        if relayed {
            self.chase.issued_at = None;
        }
    }

    fn run_chase(
        &mut self,
        ctx:     &TickContext<'_>,
        inputs:  &AgentInputs,
        target:  &TargetView,
        sees:    bool,
        rng:     &mut AgentRng,
        intents: &mut Vec<Intent>,
    ) {
        let now = ctx.now;
        let nav = &inputs.nav;
        let speed = self.config.speed.chase;

        if sees {
            if now >= self.chase.next_repath {
                self.chase.next_repath = now + self.config.repath_interval();
                self.request_throttled(ctx, nav, target.position, speed, intents);
            }
            return;
        }

        let Some(last) = self.memory.recall(now) else {
            info!("{}: lost the lead while chasing", self.id);
            self.transition(BehaviorState::Wander, now);
            return;
        };

        // A relayed chase runs to the reported spot before the grace
        // period starts.
        if self.chase.relayed {
            match self.chase.issued_at {
                None => match ctx.nav.sample_navigable(last, self.config.nav.sample_radius) {
                    Some(p) => {
                        intents.push(Intent::SetDestination { point: p, speed });
                        self.chase.issued_at = Some(now);
                        return;
                    }
                    None => debug!("{}: {} at relayed {last}", self.id, BehaviorFault::NavigationUnreachable),
                },
                Some(t) => {
                    let done = now > t
                        && (nav.arrived(self.config.nav.stop_tolerance)
                            || matches!(nav.path_status, PathStatus::Partial | PathStatus::Invalid));
                    if !done {
                        return;
                    }
                }
            }
            self.chase.relayed = false;
        }

        let lost_at = *self.chase.lost_at.get_or_insert(now);
        if now >= lost_at + self.config.lose_sight_delay() {
            self.begin_search(last, nav.position, ctx, now);
            self.run_investigate_step(ctx, nav, rng, intents);
        }
    }

    // ── Investigate ───────────────────────────────────────────────────────

    fn begin_search(&mut self, origin: Vec3, searcher: Vec3, ctx: &TickContext<'_>, now: SimTime) {
        let session = SearchSession::begin(origin, searcher, now, &self.config, &self.planner, ctx.nav, ctx.spatial);
        debug!("{}: searching around {origin} ({} candidates)", self.id, session.queue.len());
        self.search = Some(session);
        self.transition(BehaviorState::Investigate, now);
    }

    fn run_investigate(
        &mut self,
        ctx:     &TickContext<'_>,
        inputs:  &AgentInputs,
        rng:     &mut AgentRng,
        intents: &mut Vec<Intent>,
    ) {
        let now = ctx.now;
        let give_up = self.search.as_ref().is_none_or(|s| s.gave_up(now));
        if give_up {
            info!("{}: search abandoned", self.id);
            self.search = None;
            self.memory.clear();
            self.transition(BehaviorState::Wander, now);
            self.run_wander(ctx, inputs, rng, intents);
            return;
        }
        self.run_investigate_step(ctx, &inputs.nav, rng, intents);
    }

    fn run_investigate_step(
        &mut self,
        ctx:     &TickContext<'_>,
        nav:     &NavAgentState,
        rng:     &mut AgentRng,
        intents: &mut Vec<Intent>,
    ) {
        let lead = self.memory.recall(ctx.now);
        let Some(session) = self.search.as_mut() else { return };
        let step = session.step(self.id, nav, lead, ctx.now, &self.config, &self.planner, ctx.nav, ctx.spatial, rng);
        if let SearchStep::Go(point) = step {
            intents.push(Intent::SetDestination { point, speed: self.config.speed.investigate() });
        }
    }

    // ── Wander ────────────────────────────────────────────────────────────

    fn run_wander(
        &mut self,
        ctx:     &TickContext<'_>,
        inputs:  &AgentInputs,
        rng:     &mut AgentRng,
        intents: &mut Vec<Intent>,
    ) {
        let now = ctx.now;
        let nav = &inputs.nav;
        let cfg = &self.config;

        // Patrol route.
        if let Some(route) = &cfg.patrol_route {
            let cursor = self.patrol.get_or_insert_with(|| PatrolCursor::new(route, rng));
            if let Some(p) = cursor.update(route, nav, ctx.dt, cfg.nav.stop_tolerance, &cfg.patrol, ctx.nav, rng) {
                intents.push(Intent::SetDestination { point: p, speed: cfg.speed.wander });
            }
            return;
        }

        // Flock follower.
        if ctx.agents.flock_of(self.id).is_some() && !ctx.agents.is_leader(self.id) {
            let speed = *self.cruise_speed.get_or_insert_with(|| cfg.flocking.draw_cruise_speed(rng));
            let me = FlockMember { id: self.id, position: nav.position, velocity: nav.velocity, forward: nav.forward };
            let heading = self.flock.compute_desired_heading(
                &me,
                &inputs.neighbors,
                inputs.leader.as_ref(),
                &cfg.flocking,
                &cfg.wander,
                now,
                rng,
            );
            if let Some(h) = heading {
                let ahead = nav.position + h * cfg.flocking.lookahead;
                if let Some(p) = ctx.nav.sample_navigable(ahead, cfg.flocking.sample_radius) {
                    if cfg.nav.throttle.allows(nav, p) {
                        intents.push(Intent::SetDestination { point: p, speed });
                    }
                }
            }
            return;
        }

        // Flock leader.
        if ctx.agents.is_leader(self.id) {
            if let Some(p) = self.roam.update(cfg.roam_area.as_ref(), nav, now, &cfg.roam, ctx.nav, rng) {
                intents.push(Intent::SetDestination { point: p, speed: cfg.speed.wander });
            }
            return;
        }

        // Solo wander.
        let goal = self.wander.update(nav.position, nav.forward, now, &cfg.wander, rng);
        if let Some(p) = ctx.nav.sample_navigable(goal, cfg.wander.sample_radius) {
            let reissue = !nav.has_path || nav.destination.is_none_or(|d| flat_distance(d, p) > cfg.wander.min_reissue);
            if reissue {
                intents.push(Intent::SetDestination { point: p, speed: cfg.speed.wander });
            }
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    /// Snap `point` onto the navmesh and request it unless the throttle
    /// says the current destination is close enough.  Returns `true` if a
    /// request was made.
    fn request_throttled(
        &self,
        ctx:     &TickContext<'_>,
        nav:     &NavAgentState,
        point:   Vec3,
        speed:   f32,
        intents: &mut Vec<Intent>,
    ) -> bool {
        let Some(p) = ctx.nav.sample_navigable(point, self.config.nav.sample_radius) else {
            debug!("{}: {} at {point}", self.id, BehaviorFault::NavigationUnreachable);
            return false;
        };
        if !self.config.nav.throttle.allows(nav, p) {
            return false;
        }
        intents.push(Intent::SetDestination { point: p, speed });
        true
    }

    fn transition(&mut self, next: BehaviorState, now: SimTime) {
        if self.state == next {
            return;
        }
        info!("{} {} -> {} at {now}", self.id, self.state, next);
        if self.state == BehaviorState::Investigate {
            self.search = None;
        }
        if next == BehaviorState::Wander {
            if let Some(cursor) = self.patrol.as_mut() {
                cursor.resume();
            }
        }
        self.state = next;
    }

    fn output(&self, intents: Vec<Intent>) -> AgentOutput {
        let speed = match self.state {
            BehaviorState::Idle => 0.0,
            BehaviorState::Chase => self.config.speed.chase,
            BehaviorState::Investigate if self.search.as_ref().is_some_and(|s| s.is_paused()) => 0.0,
            BehaviorState::Investigate => self.config.speed.investigate(),
            BehaviorState::Wander => self.cruise_speed.unwrap_or(self.config.speed.wander),
        };
        AgentOutput { intents, frame: PresentationFrame { speed, alert: self.state.is_alert() } }
    }
}

impl AllyAlertReceiver for AgentBrain {
    /// Keep the freshest relayed sighting for the next tick.
    fn on_ally_sighting(&mut self, sighting: &AllySighting, _now: SimTime) {
        if sighting.from == self.id {
            return;
        }
        if self.pending_alert.is_none_or(|p| sighting.time >= p.time) {
            self.pending_alert = Some(*sighting);
        }
    }
}

fn scent_expiry(event: &PerceptionEvent) -> Option<SimTime> {
    match *event {
        PerceptionEvent::Scent { expires_at, .. } => Some(expires_at),
        PerceptionEvent::Sighting { .. } => None,
    }
}
