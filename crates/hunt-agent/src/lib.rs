//! `hunt-agent`: index-based agent registry for the hunt NPC framework.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`tags`]      | `AgentTags` bit set (alert recipient, alert sender)         |
//! | [`flock`]     | `FlockRegistry`: `FlockId` → leader + member list           |
//! | [`store`]     | `AgentStore` (per-agent arrays), `AgentRngs` (per-agent RNG) |
//! | [`builder`]   | `AgentStoreBuilder` (fluent construction with validation)   |
//!
//! Agents never hold references to each other or to their flock.  Every
//! relation is an index (`AgentId`, `FlockId`) into this registry, so the
//! leader ↔ follower ↔ manager graph has no ownership cycles.

pub mod builder;
pub mod flock;
pub mod store;
pub mod tags;

#[cfg(test)]
mod tests;

pub use builder::AgentStoreBuilder;
pub use flock::FlockRegistry;
pub use store::{AgentRngs, AgentStore};
pub use tags::AgentTags;
