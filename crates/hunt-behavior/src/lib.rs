//! `hunt-behavior`: the per-agent behavior state machine and its inputs
//! and outputs.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                                |
//! |-------------|-------------------------------------------------------------------------|
//! | [`state`]   | `BehaviorState` (`Idle`, `Wander`, `Investigate`, `Chase`)              |
//! | [`memory`]  | `TargetMemory`: last known position with absolute expiry               |
//! | [`config`]  | `AgentConfig` and its groups, with validation                           |
//! | [`context`] | `TickContext<'a>`, `TargetView`, `AgentInputs`: read-only tick inputs   |
//! | [`intent`]  | `Intent`, `PresentationFrame`, `AgentOutput`                            |
//! | [`alert`]   | `AlertChannel`, `AllySighting`, `AllyAlertReceiver`                     |
//! | [`brain`]   | `AgentBrain`: perception, priority, and the per-state logic             |
//! | [`error`]   | `BehaviorError`, `BehaviorFault`, `AgentWarning`                        |
//!
//! # Design notes
//!
//! The two-phase tick loop in hunt-sim works as follows:
//!
//! 1. **Intent phase** (parallel): every brain runs
//!    [`AgentBrain::tick`] against the shared `&TickContext` and its own
//!    pre-collected `AgentInputs`.  A brain mutates only itself.
//!
//! 2. **Apply phase** (sequential): the collected intents are applied in
//!    ascending `AgentId` order: destinations to the navigation port,
//!    alerts to the [`AlertChannel`].
//!
//! Relayed sightings reach their recipients on the following tick, through
//! [`AllyAlertReceiver::on_ally_sighting`], before that tick's intent phase.

pub mod alert;
pub mod brain;
pub mod config;
pub mod context;
pub mod error;
pub mod intent;
pub mod memory;
pub mod state;

mod session;


pub use alert::{AlertChannel, AllyAlertReceiver, AllySighting};
pub use brain::AgentBrain;
pub use config::{
    AgentConfig, AlertConfig, MemoryConfig, NavConfig, SpeedConfig, TimingConfig, VisionConfig,
    VisionMode,
};
pub use context::{AgentInputs, TargetView, TickContext};
pub use error::{AgentWarning, BehaviorError, BehaviorFault, BehaviorResult};
pub use intent::{AgentOutput, Intent, PresentationFrame};
pub use memory::TargetMemory;
pub use state::BehaviorState;
