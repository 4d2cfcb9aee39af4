//! Destination re-issue throttle.

use hunt_core::Vec3;
use hunt_nav::NavAgentState;

/// Decides whether a freshly computed destination is worth sending to the
/// navigation service.  A new request goes out only when the agent has no
/// path, is about to arrive, or the point moved noticeably.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DestinationThrottle {
    /// Remaining distance below which the agent counts as near arrival.
    pub near_arrival:  f32,
    /// Squared distance the destination must move to be re-issued.
    pub min_change_sq: f32,
}

impl Default for DestinationThrottle {
    fn default() -> Self {
        Self { near_arrival: 0.2, min_change_sq: 0.25 }
    }
}

impl DestinationThrottle {
    pub fn allows(&self, state: &NavAgentState, candidate: Vec3) -> bool {
        !state.has_path
            || state.remaining_distance < self.near_arrival
            || state
                .destination
                .is_none_or(|d| (d - candidate).length_squared() > self.min_change_sq)
    }
}
