//! Flock registry: who leads which flock and who follows.
//!
//! A flock is one leader plus zero or more followers.  The registry owns the
//! membership lists; agents only carry their `FlockId` (see
//! [`AgentStore::flock`][crate::AgentStore::flock]).

use hunt_core::{AgentId, FlockId};

/// Contiguous store of flocks, indexed by `FlockId`.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlockRegistry {
    leaders: Vec<AgentId>,
    /// Followers of each flock in ascending `AgentId` order.  The leader is
    /// not listed here.
    members: Vec<Vec<AgentId>>,
}

impl FlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of flocks.
    pub fn len(&self) -> usize {
        self.leaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaders.is_empty()
    }

    /// Register a new flock led by `leader` and return its id.
    pub(crate) fn create(&mut self, leader: AgentId) -> FlockId {
        let id = FlockId(self.leaders.len() as u16);
        self.leaders.push(leader);
        self.members.push(Vec::new());
        id
    }

    /// Add `agent` as a follower of `flock`.  Duplicate joins are ignored.
    pub(crate) fn join(&mut self, flock: FlockId, agent: AgentId) {
        let list = &mut self.members[flock.index()];
        if let Err(pos) = list.binary_search(&agent) {
            list.insert(pos, agent);
        }
    }

    /// Leader of `flock`, or `None` for an unknown id.
    #[inline]
    pub fn leader(&self, flock: FlockId) -> Option<AgentId> {
        self.leaders.get(flock.index()).copied()
    }

    /// Followers of `flock` (leader excluded).  Empty for an unknown id.
    pub fn members(&self, flock: FlockId) -> &[AgentId] {
        self.members.get(flock.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterator over all flock ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = FlockId> + '_ {
        (0..self.leaders.len() as u16).map(FlockId)
    }
}
