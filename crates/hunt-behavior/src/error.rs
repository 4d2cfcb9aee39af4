use thiserror::Error;

use hunt_core::AgentId;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior configuration error: {0}")]
    Config(String),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;

/// A condition the state machine recovers from on its own.
///
/// Faults are logged where they occur and never leave
/// [`AgentBrain::tick`](crate::AgentBrain::tick).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum BehaviorFault {
    /// No target is configured; the agent stays idle.
    #[error("no target to perceive")]
    PerceptionUnavailable,

    /// A destination could not be sampled or has no complete path.
    #[error("destination unreachable")]
    NavigationUnreachable,

    /// A rebuilt search queue offered nothing that was not tried already.
    #[error("search space exhausted")]
    EmptySearchSpace,

    /// Target memory outlived its expiry and was dropped.
    #[error("target memory expired")]
    StaleMemory,
}

/// Failure surfaced to the surrounding system.  Emitted at most once per
/// agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum AgentWarning {
    /// The agent is off the navigable surface and cannot move.
    #[error("{0} cannot reach the navigable surface; staying in place")]
    NavigationUnavailable(AgentId),
}
