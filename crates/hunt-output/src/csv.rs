//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `presentation_frames.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{FrameRow, OutputResult, TickSummaryRow};

pub const FRAMES_FILE: &str = "presentation_frames.csv";
pub const SUMMARIES_FILE: &str = "tick_summaries.csv";

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    frames:    Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files and write the header
    /// rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut frames = Writer::from_path(dir.join(FRAMES_FILE))?;
        frames.write_record(["agent_id", "tick", "time_ms", "state", "speed", "alert"])?;

        let mut summaries = Writer::from_path(dir.join(SUMMARIES_FILE))?;
        summaries.write_record(["tick", "time_ms", "idle", "wander", "investigate", "chase"])?;

        Ok(Self { frames, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_frames(&mut self, rows: &[FrameRow]) -> OutputResult<()> {
        for row in rows {
            self.frames.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.time_ms.to_string(),
                row.state.as_str().to_string(),
                format!("{:.3}", row.speed),
                (row.alert as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.time_ms.to_string(),
            row.idle.to_string(),
            row.wander.to_string(),
            row.investigate.to_string(),
            row.chase.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.frames.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
