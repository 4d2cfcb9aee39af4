//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `HuntError` via `From` impls or wrap `HuntError` as one variant.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `hunt-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum HuntError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `hunt-*` crates.
pub type HuntResult<T> = Result<T, HuntError>;
