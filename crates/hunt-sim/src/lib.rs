//! `hunt-sim`: tick loop orchestrator for the hunt NPC framework.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Odors    : expire markers; the target drops a new one when due.
//!   ② Snapshot : every agent's NavAgentState, positions in an R-tree.
//!   ③ Alerts   : sightings relayed last tick reach their recipients.
//!   ④ Intents  : AgentBrain::tick for every agent
//!                 (parallel with the `parallel` feature).
//!   ⑤ Apply    : for each agent in ascending AgentId order:
//!                   SetDestination(p, v) → NavigationPort::set_destination
//!                   Alert(..)            → AlertChannel::notify_nearby
//!                   Warn(w)              → SimObserver::on_agent_warning
//!   ⑥ Move     : NavigationPort::advance(dt)
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the intent phase on Rayon's thread pool.          |
//! | `fx-hash`  | FxHash maps inside the alert channel.                  |
//! | `serde`    | Serde support for agent configuration.                 |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use hunt_agent::{AgentStoreBuilder, AgentTags};
//! use hunt_behavior::TargetView;
//! use hunt_core::SimConfig;
//! use hunt_nav::OpenField;
//! use hunt_sim::{NoopObserver, SimBuilder};
//!
//! let (store, rngs) = AgentStoreBuilder::new(4, 42).tag_all(AgentTags::PACK).build()?;
//! let mut sim = SimBuilder::new(SimConfig::default(), store, rngs, field)
//!     .target(TargetView::at(start))
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use snapshot::WorldSnapshot;
