//! `SimOutputObserver<W>` bridges `SimObserver` to an `OutputWriter`.

use hunt_behavior::{AgentWarning, BehaviorState, PresentationFrame};
use hunt_core::{SimTime, Tick};
use hunt_sim::SimObserver;

use crate::row::{FrameRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes presentation frames and per-tick state
/// counts to any [`OutputWriter`].
///
/// Writer errors are stored because observer hooks return nothing.  After
/// `sim.run()` returns, check with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    /// States from the latest `on_tick_end`, paired with that tick's frames.
    states:     Vec<BehaviorState>,
    tick_ms:    u64,
    warnings:   Vec<AgentWarning>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// `tick_duration_ms` converts ticks to simulated time in the summaries.
    pub fn new(writer: W, tick_duration_ms: u64) -> Self {
        Self {
            writer,
            states: Vec::new(),
            tick_ms: tick_duration_ms,
            warnings: Vec::new(),
            last_error: None,
        }
    }

    /// Take the first write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Warnings agents raised during the run, in the order received.
    pub fn warnings(&self) -> &[AgentWarning] {
        &self.warnings
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, states: &[BehaviorState]) {
        self.states.clear();
        self.states.extend_from_slice(states);
        let row = TickSummaryRow::count(tick.0, tick.0 * self.tick_ms, states);
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_presentation(&mut self, tick: Tick, now: SimTime, frames: &[PresentationFrame]) {
        let rows: Vec<FrameRow> = frames
            .iter()
            .enumerate()
            .map(|(i, f)| FrameRow {
                agent_id: i as u32,
                tick:     tick.0,
                time_ms:  now.0,
                state:    self.states.get(i).copied().unwrap_or_default(),
                speed:    f.speed,
                alert:    f.alert,
            })
            .collect();
        if !rows.is_empty() {
            let result = self.writer.write_frames(&rows);
            self.store_err(result);
        }
    }

    fn on_agent_warning(&mut self, _tick: Tick, warning: &AgentWarning) {
        self.warnings.push(*warning);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
