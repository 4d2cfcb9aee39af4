//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use hunt_agent::{AgentStoreBuilder, AgentTags};
//! use hunt_core::AgentId;
//!
//! let (store, rngs) = AgentStoreBuilder::new(6, /*seed=*/ 42)
//!     .tag_all(AgentTags::PACK)
//!     .flock(AgentId(0), &[AgentId(1), AgentId(2), AgentId(3)])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(store.count, 6);
//! assert_eq!(rngs.len(), 6);
//! assert_eq!(store.leader_of(AgentId(2)), Some(AgentId(0)));
//! ```

use hunt_core::{AgentId, FlockId, HuntError, HuntResult};

use crate::{AgentRngs, AgentStore, AgentTags, FlockRegistry};

/// Fluent builder for [`AgentStore`] + [`AgentRngs`].
pub struct AgentStoreBuilder {
    count:  usize,
    seed:   u64,
    tags:   Vec<AgentTags>,
    flocks: Vec<(AgentId, Vec<AgentId>)>,
    bad_id: Option<AgentId>,
}

impl AgentStoreBuilder {
    /// Create a builder for `count` agents using `seed` as the global RNG seed.
    pub fn new(count: usize, seed: u64) -> Self {
        Self {
            count,
            seed,
            tags:   vec![AgentTags::NONE; count],
            flocks: Vec::new(),
            bad_id: None,
        }
    }

    /// Give every agent the same role flags.
    pub fn tag_all(mut self, tags: AgentTags) -> Self {
        self.tags.fill(tags);
        self
    }

    /// Add role flags to one agent.
    pub fn tag(mut self, agent: AgentId, tags: AgentTags) -> Self {
        match self.tags.get_mut(agent.index()) {
            Some(t) => *t |= tags,
            None => self.note_bad(agent),
        }
        self
    }

    /// Declare a flock led by `leader` with the given followers.
    ///
    /// An agent may belong to at most one flock; the last declaration wins.
    pub fn flock(mut self, leader: AgentId, followers: &[AgentId]) -> Self {
        self.flocks.push((leader, followers.to_vec()));
        self
    }

    /// Validate ids and construct `AgentStore` and `AgentRngs`.
    pub fn build(self) -> HuntResult<(AgentStore, AgentRngs)> {
        if let Some(agent) = self.bad_id {
            return Err(HuntError::AgentNotFound(agent));
        }

        let mut registry = FlockRegistry::new();
        let mut membership = vec![FlockId::INVALID; self.count];

        for (leader, followers) in &self.flocks {
            if leader.index() >= self.count {
                return Err(HuntError::AgentNotFound(*leader));
            }
            if let Some(bad) = followers.iter().find(|a| a.index() >= self.count) {
                return Err(HuntError::AgentNotFound(*bad));
            }
            if registry.len() >= FlockId::INVALID.index() {
                return Err(HuntError::Config(format!(
                    "too many flocks (max {})",
                    FlockId::INVALID.index()
                )));
            }

            let id = registry.create(*leader);
            membership[leader.index()] = id;
            for &f in followers.iter().filter(|&&f| f != *leader) {
                membership[f.index()] = id;
            }
        }

        // Fill member lists from final membership so re-declared agents end up
        // in exactly one flock.
        for (i, &flock) in membership.iter().enumerate() {
            let agent = AgentId(i as u32);
            if flock.is_valid() && registry.leader(flock) != Some(agent) {
                registry.join(flock, agent);
            }
        }

        let store = AgentStore::new(self.count, self.tags, membership, registry);
        let rngs = AgentRngs::new(self.count, self.seed);
        Ok((store, rngs))
    }

    fn note_bad(&mut self, agent: AgentId) {
        if self.bad_id.is_none() {
            self.bad_id = Some(agent);
        }
    }
}
