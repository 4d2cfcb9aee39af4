//! Navigation port: the narrow interface to an external navmesh service.
//!
//! Decision code never plans paths itself.  It samples points onto the
//! walkable surface, asks whether a complete path exists, requests a
//! destination, and reads back the agent's locomotion state.  The service
//! owns true position and velocity.

use hunt_core::{AgentId, Vec3};

use crate::NavResult;

// ── PathStatus ────────────────────────────────────────────────────────────────

/// Outcome of the service's most recent path computation for an agent.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathStatus {
    /// The path reaches the destination.
    #[default]
    Complete,
    /// The path ends somewhere short of the destination.
    Partial,
    /// No path could be computed.
    Invalid,
}

// ── NavAgentState ─────────────────────────────────────────────────────────────

/// Locomotion state of one agent as reported by the navigation service.
///
/// Sampled once per tick before any decision runs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NavAgentState {
    pub position:           Vec3,
    /// Unit facing direction on the ground plane.
    pub forward:            Vec3,
    pub velocity:           Vec3,
    /// Current destination, if a path has been requested.
    pub destination:        Option<Vec3>,
    pub has_path:           bool,
    pub path_pending:       bool,
    pub remaining_distance: f32,
    pub path_status:        PathStatus,
    /// `false` when the agent stands off the walkable surface; no
    /// destination request can succeed until something moves it back.
    pub on_navmesh:         bool,
}

impl NavAgentState {
    /// A stationary agent at `position` facing `forward`, with no path.
    pub fn idle_at(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward,
            velocity:           Vec3::ZERO,
            destination:        None,
            has_path:           false,
            path_pending:       false,
            remaining_distance: 0.0,
            path_status:        PathStatus::Complete,
            on_navmesh:         true,
        }
    }

    /// `true` once the agent is within `tolerance` of its destination and no
    /// path computation is outstanding.
    #[inline]
    pub fn arrived(&self, tolerance: f32) -> bool {
        !self.path_pending && self.remaining_distance <= tolerance
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

// ── Traits ────────────────────────────────────────────────────────────────────

/// Read-only navmesh queries.  Shared across worker threads during the
/// intent phase, hence `Sync`.
pub trait NavMeshQuery: Send + Sync {
    /// Nearest walkable point within `radius` of `point`, if any.
    fn sample_navigable(&self, point: Vec3, radius: f32) -> Option<Vec3>;

    /// `true` if a complete walkable path joins `from` and `to`.
    fn path_is_complete(&self, from: Vec3, to: Vec3) -> bool;
}

/// Full navigation service: queries plus per-agent locomotion control.
///
/// Mutating calls happen only in the sequential apply phase.  Requesting a
/// new destination implicitly cancels the previous one without notification.
pub trait NavigationPort: NavMeshQuery {
    /// Locomotion state for `agent`.
    fn agent_state(&self, agent: AgentId) -> NavResult<NavAgentState>;

    /// Ask the service to move `agent` toward `point` at `speed` units/s.
    fn set_destination(&mut self, agent: AgentId, point: Vec3, speed: f32) -> NavResult<()>;

    /// Integrate locomotion by `dt_secs`.  Services driven by an external
    /// engine loop leave this as a no-op.
    fn advance(&mut self, _dt_secs: f32) {}
}
