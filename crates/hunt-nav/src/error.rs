use hunt_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("agent {0} is not registered with the navigation service")]
    UnknownAgent(AgentId),

    #[error("agent {0} is not on the navigable surface")]
    OffNavMesh(AgentId),

    #[error("navigation configuration error: {0}")]
    Config(String),
}

pub type NavResult<T> = Result<T, NavError>;
