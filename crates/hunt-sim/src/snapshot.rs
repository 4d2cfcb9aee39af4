//! Agent positions captured at tick start.
//!
//! Every neighbor and alert query of a tick runs against this snapshot, so
//! no agent ever observes another agent's mid-tick movement.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use hunt_agent::{AgentStore, AgentTags};
use hunt_core::{AgentId, Vec3};
use hunt_nav::{AgentFilter, AgentOverlap, NavAgentState, NavResult, NavigationPort};
use hunt_steering::FlockMember;

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
struct AgentEntry {
    id:    AgentId,
    point: [f32; 3],
    tags:  AgentTags,
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<[f32; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let d = Vec3::from_array(self.point) - Vec3::from_array(*point);
        d.length_squared()
    }
}

// ── WorldSnapshot ─────────────────────────────────────────────────────────────

pub struct WorldSnapshot {
    states: Vec<NavAgentState>,
    tree:   RTree<AgentEntry>,
}

impl WorldSnapshot {
    /// Sample every agent's locomotion state from `world`.
    pub fn capture<W: NavigationPort + ?Sized>(world: &W, agents: &AgentStore) -> NavResult<Self> {
        let states = agents
            .agent_ids()
            .map(|a| world.agent_state(a))
            .collect::<NavResult<Vec<_>>>()?;
        let entries = states
            .iter()
            .zip(agents.agent_ids())
            .map(|(s, id)| AgentEntry {
                id,
                point: s.position.to_array(),
                tags:  agents.tags[id.index()],
            })
            .collect();
        Ok(Self { states, tree: RTree::bulk_load(entries) })
    }

    #[inline]
    pub fn state(&self, agent: AgentId) -> &NavAgentState {
        &self.states[agent.index()]
    }

    pub fn states(&self) -> &[NavAgentState] {
        &self.states
    }

    pub fn member(&self, agent: AgentId) -> FlockMember {
        let s = self.state(agent);
        FlockMember { id: agent, position: s.position, velocity: s.velocity, forward: s.forward }
    }

    /// Agents within `radius` of `center`, ascending by id.
    pub fn within(&self, center: Vec3, radius: f32) -> Vec<AgentId> {
        let mut found: Vec<AgentId> = self
            .tree
            .locate_within_distance(center.to_array(), radius * radius)
            .map(|e| e.id)
            .collect();
        found.sort_unstable();
        found
    }

    /// Flockmates of `agent` within `radius`, leader and `agent` excluded.
    pub fn flock_neighbors(&self, agent: AgentId, radius: f32, agents: &AgentStore) -> Vec<FlockMember> {
        let Some(flock) = agents.flock_of(agent) else {
            return Vec::new();
        };
        let leader = agents.leader_of(agent);
        self.within(self.state(agent).position, radius)
            .into_iter()
            .filter(|&other| other != agent && Some(other) != leader)
            .filter(|&other| agents.flock_of(other) == Some(flock))
            .map(|other| self.member(other))
            .collect()
    }
}

impl AgentOverlap for WorldSnapshot {
    fn overlap_sphere(&self, center: Vec3, radius: f32, filter: &AgentFilter) -> Vec<AgentId> {
        let mut found: Vec<AgentId> = self
            .tree
            .locate_within_distance(center.to_array(), radius * radius)
            .filter(|e| filter.accepts(e.id, e.tags))
            .map(|e| e.id)
            .collect();
        found.sort_unstable();
        found
    }
}
