//! `hunt-core`: foundational types for the hunt NPC framework.
//!
//! This crate is a dependency of every other `hunt-*` crate.  It has no
//! `hunt-*` dependencies and few external ones (`glam`, `rand`, `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `FlockId`, `ObstacleId`, `OdorId`, `RouteId`    |
//! | [`geom`]        | `Vec3` re-export, `Aabb`, `LayerMask`, `Obstacle`, helpers |
//! | [`time`]        | `Tick`, `SimTime`, `SimDuration`, `SimClock`, `SimConfig`  |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)                  |
//! | [`error`]       | `HuntError`, `HuntResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geom;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{HuntError, HuntResult};
pub use geom::{Aabb, LayerMask, Obstacle, Vec3};
pub use ids::{AgentId, FlockId, ObstacleId, OdorId, RouteId};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, SimDuration, SimTime, Tick};
