//! Simulation observer trait for progress reporting and data collection.

use hunt_behavior::{AgentWarning, BehaviorState, PresentationFrame};
use hunt_core::{SimTime, Tick};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: state counter
///
/// ```rust,ignore
/// struct Chasers(usize);
///
/// impl SimObserver for Chasers {
///     fn on_tick_end(&mut self, _tick: Tick, states: &[BehaviorState]) {
///         self.0 = states.iter().filter(|s| s.is_alert()).count();
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with every agent's state, indexed by
    /// `AgentId`.
    fn on_tick_end(&mut self, _tick: Tick, _states: &[BehaviorState]) {}

    /// Called every `config.output_interval_ticks` ticks with the frame each
    /// agent produced this tick, indexed by `AgentId`.
    fn on_presentation(&mut self, _tick: Tick, _now: SimTime, _frames: &[PresentationFrame]) {}

    /// Called during the apply phase for a warning an agent surfaced.  Each
    /// agent raises a given warning at most once per run.
    fn on_agent_warning(&mut self, _tick: Tick, _warning: &AgentWarning) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
