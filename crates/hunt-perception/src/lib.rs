//! `hunt-perception`: turns world state into perception events.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`event`]   | `PerceptionEvent` (`Sighting`, `Scent`)                       |
//! | [`vision`]  | `VisionSensor`: range, optional view cone, line of sight      |
//! | [`watcher`] | `FrustumWatcher`: rising-edge "seen by the viewer" trigger    |
//! | [`odor`]    | `OdorField` markers, `TrailEmitter`, `TrailConfig`            |
//! | [`scent`]   | `ScentSensor`: enter-edge odor detection with memory window   |
//!
//! Sensors report raw instantaneous perception.  Grace periods, memory
//! expiry, and priority between events belong to the state machine in
//! `hunt-behavior`.  Nothing here mutates agent state.

pub mod event;
pub mod odor;
pub mod scent;
pub mod vision;
pub mod watcher;

#[cfg(test)]
mod tests;

pub use event::PerceptionEvent;
pub use odor::{OdorField, OdorMarker, TrailConfig, TrailEmitter};
pub use scent::ScentSensor;
pub use vision::VisionSensor;
pub use watcher::FrustumWatcher;
