//! Plain data row types written by output backends.

use hunt_behavior::BehaviorState;

/// What one agent showed the presentation layer at one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRow {
    pub agent_id: u32,
    pub tick:     u64,
    pub time_ms:  u64,
    pub state:    BehaviorState,
    pub speed:    f32,
    pub alert:    bool,
}

/// How many agents were in each state at the end of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:        u64,
    pub time_ms:     u64,
    pub idle:        u32,
    pub wander:      u32,
    pub investigate: u32,
    pub chase:       u32,
}

impl TickSummaryRow {
    pub fn count(tick: u64, time_ms: u64, states: &[BehaviorState]) -> Self {
        let mut counts = [0u32; BehaviorState::ALL.len()];
        for s in states {
            counts[s.index()] += 1;
        }
        Self {
            tick,
            time_ms,
            idle:        counts[BehaviorState::Idle.index()],
            wander:      counts[BehaviorState::Wander.index()],
            investigate: counts[BehaviorState::Investigate.index()],
            chase:       counts[BehaviorState::Chase.index()],
        }
    }

    pub fn total(&self) -> u32 {
        self.idle + self.wander + self.investigate + self.chase
    }
}
