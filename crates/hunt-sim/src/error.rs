use hunt_behavior::BehaviorError;
use hunt_nav::NavError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("invalid agent configuration: {0}")]
    Behavior(#[from] BehaviorError),

    #[error("navigation error: {0}")]
    Nav(#[from] NavError),
}

pub type SimResult<T> = Result<T, SimError>;
