//! Short-lived memory of where the target was last perceived.

use hunt_core::{SimTime, Vec3};

#[derive(Copy, Clone, Debug, PartialEq)]
struct Lead {
    position:   Vec3,
    seen_at:    SimTime,
    expires_at: SimTime,
}

/// Last known target position with an absolute expiry.
///
/// A lead is usable strictly before its expiry.  [`expire`](Self::expire)
/// drops it so an expired position is never read back, even by code that
/// forgets to pass the current time.
///
/// Refreshing moves the lead but never pulls a live expiry earlier.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TargetMemory {
    lead: Option<Lead>,
}

impl TargetMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `position`, perceived at `seen_at`, until at least
    /// `expires_at`.
    pub fn refresh(&mut self, position: Vec3, seen_at: SimTime, expires_at: SimTime) {
        let expires_at = match self.lead {
            Some(old) if old.expires_at > expires_at => old.expires_at,
            _ => expires_at,
        };
        self.lead = Some(Lead { position, seen_at, expires_at });
    }

    /// Like [`refresh`](Self::refresh), but only when `seen_at` is strictly
    /// later than the current lead.  Returns `true` if the lead moved.
    pub fn refresh_if_newer(&mut self, position: Vec3, seen_at: SimTime, expires_at: SimTime) -> bool {
        if self.lead.is_some_and(|l| seen_at <= l.seen_at) {
            return false;
        }
        self.refresh(position, seen_at, expires_at);
        true
    }

    /// The remembered position while `now < expiry`.
    #[inline]
    pub fn recall(&self, now: SimTime) -> Option<Vec3> {
        self.lead.filter(|l| now < l.expires_at).map(|l| l.position)
    }

    #[inline]
    pub fn has_memory(&self, now: SimTime) -> bool {
        self.recall(now).is_some()
    }

    pub fn expires_at(&self) -> Option<SimTime> {
        self.lead.map(|l| l.expires_at)
    }

    /// When the current lead was perceived.
    pub fn seen_at(&self) -> Option<SimTime> {
        self.lead.map(|l| l.seen_at)
    }

    /// Drop the lead if it has expired.  Returns `true` if one was dropped.
    pub fn expire(&mut self, now: SimTime) -> bool {
        match self.lead {
            Some(l) if now >= l.expires_at => {
                self.lead = None;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.lead = None;
    }
}
