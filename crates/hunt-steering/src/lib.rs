//! `hunt-steering`: desired headings and the destinations derived from them.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                          |
//! |--------------|-------------------------------------------------------------------|
//! | [`flocking`] | `FlockMember`, `FlockingParams`, `FlockSteering`                  |
//! | [`wander`]   | `WanderParams`, `WanderState` (jittered circle ahead of the agent) |
//! | [`roam`]     | `RoamParams`, `LeaderRoam` (random navigable points in an area)   |
//! | [`throttle`] | `DestinationThrottle` (suppresses redundant re-issues)            |
//!
//! Steering never talks to the navigation service directly except through
//! read-only [`NavMeshQuery`](hunt_nav::NavMeshQuery) sampling.  Turning a
//! heading into a destination request is the caller's job.

pub mod flocking;
pub mod roam;
pub mod throttle;
pub mod wander;

#[cfg(test)]
mod tests;

pub use flocking::{FlockMember, FlockSteering, FlockingParams};
pub use roam::{LeaderRoam, RoamParams};
pub use throttle::DestinationThrottle;
pub use wander::{WanderParams, WanderState};
