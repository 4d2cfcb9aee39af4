//! Perception events handed from sensors to the state machine.

use hunt_core::{SimTime, Vec3};

/// One perceived fact about the target.  Consumed once by the state machine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PerceptionEvent {
    /// The target is visible right now at `position`.
    Sighting { position: Vec3, time: SimTime },

    /// The agent walked into an odor marker dropped at `position`.  The
    /// lead stays usable until `expires_at` even without a sighting.
    Scent { position: Vec3, time: SimTime, expires_at: SimTime },
}

impl PerceptionEvent {
    #[inline]
    pub fn position(&self) -> Vec3 {
        match *self {
            PerceptionEvent::Sighting { position, .. } | PerceptionEvent::Scent { position, .. } => position,
        }
    }

    #[inline]
    pub fn time(&self) -> SimTime {
        match *self {
            PerceptionEvent::Sighting { time, .. } | PerceptionEvent::Scent { time, .. } => time,
        }
    }

    #[inline]
    pub fn is_sighting(&self) -> bool {
        matches!(self, PerceptionEvent::Sighting { .. })
    }
}
