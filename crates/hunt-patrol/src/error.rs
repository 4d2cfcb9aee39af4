use thiserror::Error;

use hunt_core::RouteId;

#[derive(Debug, Error)]
pub enum PatrolError {
    #[error("route parse error: {0}")]
    Parse(String),

    #[error("{0} has no waypoints")]
    EmptyRoute(RouteId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PatrolResult<T> = Result<T, PatrolError>;
