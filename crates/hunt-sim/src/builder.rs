//! Fluent builder for constructing a [`Sim`].

use hunt_agent::{AgentRngs, AgentStore};
use hunt_behavior::{AgentBrain, AgentConfig, AlertChannel, BehaviorState, TargetView};
use hunt_core::{SimConfig, SimRng};
use hunt_nav::{NavigationPort, SpatialQuery};
use hunt_perception::{TrailConfig, TrailEmitter};

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<W>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: tick length, total ticks, seed, …
/// - [`AgentStore`] + [`AgentRngs`] from [`hunt_agent::AgentStoreBuilder`]
/// - `W`: the world, implementing both collaborator traits.  Every agent in
///   the store must already be registered with it.
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                    |
/// |----------------------|--------------------------------------------|
/// | `.agent_config(c)`   | `AgentConfig::default()` for every agent   |
/// | `.agent_configs(v)`  | one config per agent, overrides the above  |
/// | `.target(t)`         | no target: every agent idles               |
/// | `.trail(c)`          | the target leaves no odor trail            |
///
/// # Example
///
/// ```rust,ignore
/// let (store, rngs) = AgentStoreBuilder::new(n, seed).tag_all(AgentTags::PACK).build()?;
/// let mut sim = SimBuilder::new(config, store, rngs, field)
///     .target(TargetView::at(start))
///     .trail(TrailConfig::default())
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<W: NavigationPort + SpatialQuery> {
    config:  SimConfig,
    agents:  AgentStore,
    rngs:    AgentRngs,
    world:   W,
    shared:  AgentConfig,
    configs: Option<Vec<AgentConfig>>,
    target:  Option<TargetView>,
    trail:   Option<TrailConfig>,
}

impl<W: NavigationPort + SpatialQuery> SimBuilder<W> {
    pub fn new(config: SimConfig, agents: AgentStore, rngs: AgentRngs, world: W) -> Self {
        Self {
            config,
            agents,
            rngs,
            world,
            shared:  AgentConfig::default(),
            configs: None,
            target:  None,
            trail:   None,
        }
    }

    /// One configuration shared by every agent.
    pub fn agent_config(mut self, config: AgentConfig) -> Self {
        self.shared = config;
        self
    }

    /// Per-agent configurations (must be length `agent_count`).
    pub fn agent_configs(mut self, configs: Vec<AgentConfig>) -> Self {
        self.configs = Some(configs);
        self
    }

    pub fn target(mut self, target: TargetView) -> Self {
        self.target = Some(target);
        self
    }

    /// Have the target drop odor markers as it moves.
    pub fn trail(mut self, trail: TrailConfig) -> Self {
        self.trail = Some(trail);
        self
    }

    /// Validate inputs, create one brain per agent, and return a ready-to-run
    /// [`Sim`].
    pub fn build(self) -> SimResult<Sim<W>> {
        let agent_count = self.agents.count;

        if self.config.tick_duration_ms == 0 {
            return Err(SimError::Config("tick_duration_ms must be positive".into()));
        }
        if self.rngs.len() != agent_count {
            return Err(SimError::AgentCountMismatch {
                expected: agent_count,
                got:      self.rngs.len(),
                what:     "agent rngs",
            });
        }

        let configs = match self.configs {
            Some(c) => {
                if c.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      c.len(),
                        what:     "agent configs",
                    });
                }
                c
            }
            None => vec![self.shared; agent_count],
        };

        // Every agent must be known to the world before the first tick.
        for agent in self.agents.agent_ids() {
            self.world.agent_state(agent)?;
        }

        let brains = self
            .agents
            .agent_ids()
            .zip(configs)
            .map(|(agent, config)| AgentBrain::new(agent, config))
            .collect::<Result<Vec<_>, _>>()?;

        let clock = self.config.make_clock();
        let mut sim_rng = SimRng::new(self.config.seed);
        let (odors, trail) = match self.trail {
            Some(t) => (t.make_field(), Some(TrailEmitter::new(t, clock.now(), &mut sim_rng))),
            None => (TrailConfig::default().make_field(), None),
        };

        Ok(Sim {
            clock,
            config: self.config,
            agents: self.agents,
            rngs: self.rngs,
            brains,
            world: self.world,
            alerts: AlertChannel::new(),
            odors,
            trail,
            target: self.target,
            sim_rng,
            states: vec![BehaviorState::Idle; agent_count],
            frames: vec![Default::default(); agent_count],
        })
    }
}
