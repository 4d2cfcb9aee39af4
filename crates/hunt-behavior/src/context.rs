//! Read-only inputs handed to every brain during the intent phase.

use hunt_agent::AgentStore;
use hunt_core::{SimDuration, SimTime, Vec3};
use hunt_nav::{NavAgentState, NavMeshQuery, SpatialQuery, ViewerCamera};
use hunt_perception::OdorMarker;
use hunt_steering::FlockMember;

/// The target as the simulation sees it this tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TargetView {
    /// Where the target stands (feet).
    pub position: Vec3,
    /// The target's own camera, needed by viewer-frustum perception.
    pub camera:   Option<ViewerCamera>,
}

impl TargetView {
    pub fn at(position: Vec3) -> Self {
        Self { position, camera: None }
    }

    pub fn with_camera(mut self, camera: ViewerCamera) -> Self {
        self.camera = Some(camera);
        self
    }
}

/// State shared by every brain for one tick.
///
/// Built once per tick by `hunt-sim` and read concurrently by all brains.
/// Collaborators are borrowed as trait objects so brains never depend on a
/// concrete world type.
pub struct TickContext<'a> {
    pub now:     SimTime,
    /// Simulated time covered by one tick.
    pub dt:      SimDuration,
    pub agents:  &'a AgentStore,
    /// `None` when no target is configured; every brain then idles.
    pub target:  Option<&'a TargetView>,
    pub nav:     &'a dyn NavMeshQuery,
    pub spatial: &'a dyn SpatialQuery,
}

/// Per-agent data sampled at tick start, before any brain runs.
#[derive(Clone, Debug)]
pub struct AgentInputs {
    pub nav:       NavAgentState,
    /// Odor markers overlapping the agent's smell trigger.
    pub odors:     Vec<OdorMarker>,
    /// Flockmates as sampled at tick start, leader excluded.
    pub neighbors: Vec<FlockMember>,
    pub leader:    Option<FlockMember>,
}

impl AgentInputs {
    /// Inputs for an agent with nothing around it.
    pub fn alone(nav: NavAgentState) -> Self {
        Self { nav, odors: Vec::new(), neighbors: Vec::new(), leader: None }
    }
}
