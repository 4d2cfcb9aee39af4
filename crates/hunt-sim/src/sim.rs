//! The `Sim` struct and its tick loop.

use log::debug;

use hunt_agent::{AgentRngs, AgentStore};
use hunt_behavior::{
    AgentBrain, AgentInputs, AgentOutput, AlertChannel, AllyAlertReceiver, BehaviorState, Intent,
    PresentationFrame, TargetView, TickContext,
};
use hunt_core::{AgentId, SimClock, SimConfig, SimRng, SimTime, Tick, Vec3};
use hunt_nav::{NavError, NavigationPort, SpatialQuery};
use hunt_perception::{OdorField, TrailEmitter};

use crate::snapshot::WorldSnapshot;
use crate::{SimObserver, SimResult};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<W>` owns every agent brain and drives the tick loop:
///
/// 1. **Odor trail**: expire old markers; the target may drop a new one.
/// 2. **Snapshot**: sample every agent's locomotion state from the world and
///    index positions in an R-tree.
/// 3. **Alerts**: hand sightings relayed last tick to their recipients.
/// 4. **Inputs** (sequential): odors, flockmates, and leader per agent, all
///    read from the snapshot.
/// 5. **Intent phase** (optionally parallel with the `parallel` feature):
///    [`AgentBrain::tick`] for every agent.
/// 6. **Apply phase** (sequential, ascending `AgentId` for determinism):
///    - `SetDestination` → world.
///    - `Alert`          → alert channel, delivered next tick.
///    - `Warn`           → observer.
/// 7. **Locomotion**: the world advances by one tick length.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<W: NavigationPort + SpatialQuery> {
    /// Global configuration (tick length, total ticks, seed, …).
    pub config: SimConfig,

    pub clock: SimClock,

    /// Agent roles and flock membership.
    pub agents: AgentStore,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    /// One brain per agent, indexed by `AgentId`.
    pub brains: Vec<AgentBrain>,

    /// Navigation and spatial query collaborator.
    pub world: W,

    /// Sightings waiting for delivery, plus per-sender cooldowns.
    pub alerts: AlertChannel,

    pub odors: OdorField,

    pub(crate) trail: Option<TrailEmitter>,

    pub(crate) target: Option<TargetView>,

    /// Simulation-wide RNG for effects not owned by any agent.
    pub(crate) sim_rng: SimRng,

    /// State of every agent after the last processed tick.
    pub states: Vec<BehaviorState>,

    /// Presentation frame of every agent from the last processed tick.
    pub frames: Vec<PresentationFrame>,
}

impl<W: NavigationPort + SpatialQuery> Sim<W> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Simulated time at the start of the next tick.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn brain(&self, agent: AgentId) -> &AgentBrain {
        &self.brains[agent.index()]
    }

    pub fn target(&self) -> Option<&TargetView> {
        self.target.as_ref()
    }

    /// Replace the target.  `None` leaves every agent idle.
    pub fn set_target(&mut self, target: Option<TargetView>) {
        self.target = target;
    }

    /// Move the target, keeping its camera.  Does nothing without a target.
    pub fn move_target(&mut self, position: Vec3) {
        if let Some(t) = self.target.as_mut() {
            t.position = position;
        }
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let tick = self.clock.current_tick;
        let now = self.clock.now();

        observer.on_tick_start(tick);
        self.process_tick(tick, now, observer)?;
        observer.on_tick_end(tick, &self.states);
        if self.config.output_interval_ticks > 0 && tick.0.is_multiple_of(self.config.output_interval_ticks) {
            observer.on_presentation(tick, now, &self.frames);
        }

        self.clock.advance();
        Ok(())
    }

    fn process_tick<O: SimObserver>(&mut self, tick: Tick, now: SimTime, observer: &mut O) -> SimResult<()> {
        // ── Phase 0: odor trail ───────────────────────────────────────────
        self.odors.expire(now);
        if let (Some(target), Some(trail)) = (self.target.as_ref(), self.trail.as_mut()) {
            trail.update(target.position, now, &mut self.odors, &mut self.sim_rng);
        }

        // ── Phase 1: snapshot ─────────────────────────────────────────────
        let snapshot = WorldSnapshot::capture(&self.world, &self.agents)?;

        // ── Phase 2: deliver last tick's alerts ───────────────────────────
        //
        // Sightings relayed during this tick's apply phase wait for the next
        // one, so no brain reacts to another brain's mid-tick decision.
        for agent in self.agents.agent_ids() {
            for sighting in self.alerts.take_inbox(agent) {
                self.brains[agent.index()].on_ally_sighting(&sighting, now);
            }
        }

        // ── Phase 3: pre-collect per-agent inputs (sequential) ────────────
        let inputs: Vec<AgentInputs> = self
            .agents
            .agent_ids()
            .map(|agent| {
                let config = self.brains[agent.index()].config();
                let nav = *snapshot.state(agent);
                AgentInputs {
                    nav,
                    odors:     self.odors.overlapping(nav.position, config.memory.scent_reach),
                    neighbors: snapshot.flock_neighbors(agent, config.flocking.neighbor_radius, &self.agents),
                    leader:    self.agents.leader_of(agent).map(|l| snapshot.member(l)),
                }
            })
            .collect();

        // ── Phase 4: intent phase (produce) ───────────────────────────────
        let outputs = self.compute_intents(now, &inputs);

        // ── Phase 5: apply phase (consume) ────────────────────────────────
        for (i, output) in outputs.into_iter().enumerate() {
            let agent = AgentId(i as u32);
            self.apply_intents(agent, output.intents, tick, now, &snapshot, observer)?;
            self.frames[i] = output.frame;
            self.states[i] = self.brains[i].state();
        }

        // ── Phase 6: locomotion ───────────────────────────────────────────
        self.world.advance(self.clock.dt_secs());
        Ok(())
    }

    /// Run every brain against one shared context.  With the `parallel`
    /// Cargo feature the brains run on Rayon's thread pool; the output order
    /// is `AgentId` order either way.
    fn compute_intents(&mut self, now: SimTime, inputs: &[AgentInputs]) -> Vec<AgentOutput> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let brains = &mut self.brains;
        let rngs   = &mut self.rngs.inner;
        let ctx = TickContext {
            now,
            dt:      self.clock.tick_duration,
            agents:  &self.agents,
            target:  self.target.as_ref(),
            nav:     &self.world,
            spatial: &self.world,
        };

        #[cfg(not(feature = "parallel"))]
        {
            brains
                .iter_mut()
                .zip(rngs.iter_mut())
                .zip(inputs)
                .map(|((brain, rng), input)| brain.tick(&ctx, input, rng))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            brains
                .par_iter_mut()
                .zip(rngs.par_iter_mut())
                .zip(inputs.par_iter())
                .map(|((brain, rng), input)| brain.tick(&ctx, input, rng))
                .collect()
        }
    }

    /// Apply a single agent's intents during the sequential write phase.
    fn apply_intents<O: SimObserver>(
        &mut self,
        agent:    AgentId,
        intents:  Vec<Intent>,
        tick:     Tick,
        now:      SimTime,
        snapshot: &WorldSnapshot,
        observer: &mut O,
    ) -> SimResult<()> {
        for intent in intents {
            match intent {
                // A newer request replaces the old path without notice.
                Intent::SetDestination { point, speed } => {
                    match self.world.set_destination(agent, point, speed) {
                        Ok(()) => {}
                        Err(NavError::OffNavMesh(_)) => {
                            debug!("{agent}: destination {point} dropped, agent is off the navmesh");
                        }
                        Err(e) => return Err(e.into()),
                    }
                }

                Intent::Alert { sighting, radius, cooldown } => {
                    self.alerts.notify_nearby(sighting, radius, cooldown, now, snapshot);
                }

                Intent::Warn(warning) => observer.on_agent_warning(tick, &warning),
            }
        }
        Ok(())
    }
}
