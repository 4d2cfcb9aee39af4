//! Ally alerts: radius-scoped, rate-limited sighting relay.
//!
//! # Delivery
//!
//! ```text
//! tick N   apply phase   Intent::Alert → AlertChannel::notify_nearby
//!                          cooldown gate per sender
//!                          overlap query over ALERT_RECIPIENT agents, sender excluded
//!                          payload appended to each recipient's inbox
//! tick N+1 before intents  inbox drained → AllyAlertReceiver::on_ally_sighting
//! ```
//!
//! Recipients never change state in the middle of another agent's tick.
//! Delivery is fire-and-forget: no acknowledgment, no ordering across
//! recipients.

use log::debug;

use hunt_agent::AgentTags;
use hunt_core::{AgentId, SimDuration, SimTime, Vec3};
use hunt_nav::{AgentFilter, AgentOverlap};

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

/// A relayed sighting.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AllySighting {
    /// The agent that saw the target.
    pub from:     AgentId,
    /// Where the sender stood.  The broadcast radius is measured from here.
    pub origin:   Vec3,
    /// Where the target was seen.
    pub position: Vec3,
    pub time:     SimTime,
}

/// Typed entry point for relayed sightings.
pub trait AllyAlertReceiver {
    fn on_ally_sighting(&mut self, sighting: &AllySighting, now: SimTime);
}

/// Rate-limited fan-out of ally sightings.
///
/// Holds recipient ids and pending payloads only; it never owns agents.
#[derive(Debug, Default)]
pub struct AlertChannel {
    next_allowed: Map<AgentId, SimTime>,
    inbox:        Map<AgentId, Vec<AllySighting>>,
}

impl AlertChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relay `sighting` to every alert recipient within `radius` of its
    /// origin, sender excluded.  Returns the number of recipients reached;
    /// zero when the sender is still cooling down.
    pub fn notify_nearby(
        &mut self,
        sighting: AllySighting,
        radius:   f32,
        cooldown: SimDuration,
        now:      SimTime,
        overlap:  &dyn AgentOverlap,
    ) -> usize {
        if self.is_cooling_down(sighting.from, now) {
            return 0;
        }
        self.next_allowed.insert(sighting.from, now + cooldown);

        let filter = AgentFilter::tagged(AgentTags::ALERT_RECIPIENT).excluding(sighting.from);
        let recipients = overlap.overlap_sphere(sighting.origin, radius, &filter);
        for &to in &recipients {
            self.inbox.entry(to).or_default().push(sighting);
        }
        debug!("{} alerted {} allies", sighting.from, recipients.len());
        recipients.len()
    }

    /// `true` while `origin` may not broadcast again.
    pub fn is_cooling_down(&self, origin: AgentId, now: SimTime) -> bool {
        self.next_allowed.get(&origin).is_some_and(|&t| now < t)
    }

    /// Remove and return everything waiting for `agent`, oldest first.
    pub fn take_inbox(&mut self, agent: AgentId) -> Vec<AllySighting> {
        self.inbox.remove(&agent).unwrap_or_default()
    }

    /// Number of payloads waiting for `agent`.
    pub fn pending(&self, agent: AgentId) -> usize {
        self.inbox.get(&agent).map_or(0, Vec::len)
    }
}
