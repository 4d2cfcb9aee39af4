//! What a brain asks the simulation to do, and what it shows the world.

use hunt_core::{SimDuration, Vec3};

use crate::{AgentWarning, AllySighting};

/// An action requested during the intent phase and carried out by the
/// simulation loop in the apply phase, in ascending `AgentId` order.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Ask the navigation service to move toward `point` at `speed`.
    ///
    /// A later request supersedes an earlier one without notice.
    SetDestination { point: Vec3, speed: f32 },

    /// Relay a sighting to allies within `radius` of the sender.
    ///
    /// The alert channel drops the request while the sender's previous
    /// broadcast is younger than `cooldown`.
    Alert {
        sighting: AllySighting,
        radius:   f32,
        cooldown: SimDuration,
    },

    /// Surface a failure the agent cannot recover from by itself.
    Warn(AgentWarning),
}

/// The pair an animation layer needs to present an agent.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PresentationFrame {
    /// Speed the agent is trying to move at; zero while holding still.
    pub speed: f32,
    /// `true` while chasing.
    pub alert: bool,
}

/// Everything one brain produced in one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentOutput {
    pub intents: Vec<Intent>,
    pub frame:   PresentationFrame,
}
