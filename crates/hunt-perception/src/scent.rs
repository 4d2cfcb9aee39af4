//! Smell: enter-edge detection over odor markers.

use hunt_core::{OdorId, SimDuration, SimTime};

use crate::{OdorMarker, PerceptionEvent};

/// Reports a `Scent` once per marker, when the agent first overlaps it.
/// Staying inside a marker does not re-fire; leaving and re-entering does.
#[derive(Clone, Debug)]
pub struct ScentSensor {
    /// Radius of the agent's smell trigger.
    pub reach:  f32,
    /// How long a scent lead stays valid.
    pub memory: SimDuration,
    /// Markers overlapped at the previous update, ascending.
    inside:     Vec<OdorId>,
}

impl ScentSensor {
    pub fn new(reach: f32, memory: SimDuration) -> Self {
        Self { reach, memory, inside: Vec::new() }
    }

    /// Update with the markers overlapping the agent this tick.  If any were
    /// entered, returns a `Scent` for the most recently dropped of them.
    pub fn sense(&mut self, overlapping: &[OdorMarker], now: SimTime) -> Option<PerceptionEvent> {
        let freshest = overlapping
            .iter()
            .filter(|m| self.inside.binary_search(&m.id).is_err())
            .max_by(|a, b| a.dropped_at.cmp(&b.dropped_at).then(a.id.cmp(&b.id)))
            .copied();

        self.inside.clear();
        self.inside.extend(overlapping.iter().map(|m| m.id));
        self.inside.sort_unstable();

        freshest.map(|m| PerceptionEvent::Scent {
            position:   m.position,
            time:       now,
            expires_at: now + self.memory,
        })
    }

    /// Number of markers currently overlapped.
    pub fn inside_count(&self) -> usize {
        self.inside.len()
    }
}
