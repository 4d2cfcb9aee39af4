//! The four behavior states.

use std::fmt;

/// What an agent is doing.  Exactly one per agent at all times.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorState {
    /// No target to perceive.  The agent stands still.
    #[default]
    Idle,
    /// Patrolling, wandering, roaming, or flocking.
    Wander,
    /// Working through a search queue around a last known position.
    Investigate,
    /// Pursuing the target.
    Chase,
}

impl BehaviorState {
    pub const ALL: [BehaviorState; 4] = [
        BehaviorState::Idle,
        BehaviorState::Wander,
        BehaviorState::Investigate,
        BehaviorState::Chase,
    ];

    /// Lower-case name used in logs and CSV output.
    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorState::Idle => "idle",
            BehaviorState::Wander => "wander",
            BehaviorState::Investigate => "investigate",
            BehaviorState::Chase => "chase",
        }
    }

    /// Position in [`ALL`](Self::ALL).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// `true` for states that react to the target.
    #[inline]
    pub fn is_alert(self) -> bool {
        matches!(self, BehaviorState::Chase)
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
