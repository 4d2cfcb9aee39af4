//! Per-agent role flags.

use std::ops::{BitOr, BitOrAssign};

/// Bit set of agent roles consulted by the alert channel and overlap queries.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentTags(pub u8);

impl AgentTags {
    pub const NONE: AgentTags = AgentTags(0);
    /// Receives ally sightings relayed by the alert channel.
    pub const ALERT_RECIPIENT: AgentTags = AgentTags(1 << 0);
    /// Broadcasts its own sightings to nearby recipients.
    pub const ALERT_SENDER: AgentTags = AgentTags(1 << 1);
    /// Default role for a pack hunter.
    pub const PACK: AgentTags = AgentTags(Self::ALERT_RECIPIENT.0 | Self::ALERT_SENDER.0);

    /// `true` if every bit of `other` is set in `self`.
    #[inline]
    pub fn contains(self, other: AgentTags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for AgentTags {
    type Output = AgentTags;
    #[inline]
    fn bitor(self, rhs: AgentTags) -> AgentTags {
        AgentTags(self.0 | rhs.0)
    }
}

impl BitOrAssign for AgentTags {
    #[inline]
    fn bitor_assign(&mut self, rhs: AgentTags) {
        self.0 |= rhs.0;
    }
}
