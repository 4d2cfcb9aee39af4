//! `hunt-nav`: the collaborator seams between NPC decision logic and the
//! world it runs in.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                              |
//! |-------------|-----------------------------------------------------------------------|
//! | [`port`]    | `NavMeshQuery`, `NavigationPort` traits; `NavAgentState`, `PathStatus` |
//! | [`query`]   | `SpatialQuery`, `AgentOverlap` traits; `RayHit`, `AgentFilter`        |
//! | [`frustum`] | `ViewerCamera`, `Plane`, `Frustum` (plane extraction + AABB test)     |
//! | [`field`]   | `OpenField`: flat walkable area with box obstacles                    |
//! | [`error`]   | `NavError`, `NavResult<T>`                                            |
//!
//! # Pluggability
//!
//! Decision code only ever sees the traits.  A game engine adapter
//! implements them against its real navmesh and physics scene;
//! [`OpenField`] implements them for tests and demos.  It is not a path
//! planner: agents move in straight lines and obstacles never split the
//! walkable area except through explicitly declared islands.

pub mod error;
pub mod field;
pub mod frustum;
pub mod port;
pub mod query;


pub use error::{NavError, NavResult};
pub use field::OpenField;
pub use frustum::{Frustum, Plane, ViewerCamera};
pub use port::{NavAgentState, NavMeshQuery, NavigationPort, PathStatus};
pub use query::{AgentFilter, AgentOverlap, RayHit, SpatialQuery};
