//! The `OutputWriter` trait implemented by backend writers.

use crate::{FrameRow, OutputResult, TickSummaryRow};

/// Errors are stored by [`SimOutputObserver`](crate::SimOutputObserver) and
/// retrieved with `take_error`, since observer hooks return nothing.
pub trait OutputWriter {
    /// Write one batch of presentation frames.
    fn write_frames(&mut self, rows: &[FrameRow]) -> OutputResult<()>;

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
