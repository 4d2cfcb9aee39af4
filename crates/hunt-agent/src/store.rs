//! Core agent storage: `AgentStore` (registry data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! The parallel intent phase needs `&mut AgentRngs` (exclusive access to
//! each agent's RNG) and `&AgentStore` (shared read access to roles and
//! flock membership) at the same time.  Keeping RNGs in a separate struct
//! lets both borrows coexist:
//!
//! ```ignore
//! // hunt-sim tick loop (simplified):
//! let store: &AgentStore = &sim.agents;
//! let outputs = sim.brains
//!     .par_iter_mut()
//!     .zip(sim.rngs.inner.par_iter_mut())
//!     .map(|(brain, rng)| brain.tick(&ctx, inputs, rng))
//!     .collect::<Vec<_>>();
//! ```

use hunt_core::{AgentId, AgentRng, FlockId};

use crate::{AgentTags, FlockRegistry};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`AgentStore`] to enable
/// simultaneous `&mut AgentRngs` + `&AgentStore` borrows in the parallel phase.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Registry of every NPC agent, indexed by `AgentId`.
///
/// Every `Vec` field has exactly `count` elements.  Position, velocity, and
/// heading are deliberately absent: the navigation port owns them.
pub struct AgentStore {
    /// Number of agents.  Equals the length of every per-agent `Vec`.
    pub count: usize,

    /// Role flags per agent.
    pub tags: Vec<AgentTags>,

    /// Flock membership per agent.  `FlockId::INVALID` for solo agents.
    /// Leaders carry the id of the flock they lead.
    pub flock: Vec<FlockId>,

    /// Flock leaders and follower lists.
    pub flocks: FlockRegistry,
}

impl AgentStore {
    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.count
    }

    #[inline]
    pub fn has_tag(&self, agent: AgentId, tag: AgentTags) -> bool {
        self.tags.get(agent.index()).is_some_and(|t| t.contains(tag))
    }

    /// The agent's flock, if it belongs to one.
    #[inline]
    pub fn flock_of(&self, agent: AgentId) -> Option<FlockId> {
        self.flock.get(agent.index()).copied().filter(|f| f.is_valid())
    }

    /// `true` if `agent` leads a flock.
    pub fn is_leader(&self, agent: AgentId) -> bool {
        self.flock_of(agent)
            .and_then(|f| self.flocks.leader(f))
            .is_some_and(|leader| leader == agent)
    }

    /// The leader `agent` follows.  `None` for solo agents and for leaders.
    pub fn leader_of(&self, agent: AgentId) -> Option<AgentId> {
        self.flock_of(agent)
            .and_then(|f| self.flocks.leader(f))
            .filter(|&leader| leader != agent)
    }

    /// Fellow followers of `agent`'s flock, excluding `agent` and the leader.
    pub fn flockmates(&self, agent: AgentId) -> impl Iterator<Item = AgentId> + '_ {
        self.flock_of(agent)
            .map(|f| self.flocks.members(f))
            .unwrap_or(&[])
            .iter()
            .copied()
            .filter(move |&a| a != agent)
    }

    // ── Package-private constructor used by AgentStoreBuilder ─────────────

    pub(crate) fn new(count: usize, tags: Vec<AgentTags>, flock: Vec<FlockId>, flocks: FlockRegistry) -> Self {
        Self { count, tags, flock, flocks }
    }
}
