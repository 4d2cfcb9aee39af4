//! Unit tests for hunt-agent.

use hunt_core::{AgentId, FlockId};

use crate::{AgentStoreBuilder, AgentTags};

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn build_allocates_all_arrays() {
        let (store, rngs) = AgentStoreBuilder::new(5, 1).build().unwrap();
        assert_eq!(store.count, 5);
        assert_eq!(store.tags.len(), 5);
        assert_eq!(store.flock.len(), 5);
        assert_eq!(rngs.len(), 5);
        assert!(store.flocks.is_empty());
    }

    #[test]
    fn empty_store() {
        let (store, rngs) = AgentStoreBuilder::new(0, 1).build().unwrap();
        assert!(store.is_empty());
        assert!(rngs.is_empty());
        assert_eq!(store.agent_ids().count(), 0);
    }

    #[test]
    fn out_of_range_follower_errors() {
        let result = AgentStoreBuilder::new(3, 1)
            .flock(AgentId(0), &[AgentId(1), AgentId(9)])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_tag_errors() {
        let result = AgentStoreBuilder::new(3, 1)
            .tag(AgentId(3), AgentTags::ALERT_SENDER)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn tags_accumulate() {
        let (store, _) = AgentStoreBuilder::new(2, 1)
            .tag_all(AgentTags::ALERT_RECIPIENT)
            .tag(AgentId(1), AgentTags::ALERT_SENDER)
            .build()
            .unwrap();
        assert!(!store.has_tag(AgentId(0), AgentTags::ALERT_SENDER));
        assert!(store.has_tag(AgentId(1), AgentTags::PACK));
        assert!(!store.has_tag(AgentId(7), AgentTags::ALERT_RECIPIENT));
    }
}

// ── Flocks ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod flocks {
    use super::*;

    #[test]
    fn leader_and_followers_resolve() {
        let (store, _) = AgentStoreBuilder::new(5, 1)
            .flock(AgentId(0), &[AgentId(3), AgentId(1), AgentId(2)])
            .build()
            .unwrap();

        let f = store.flock_of(AgentId(2)).unwrap();
        assert_eq!(f, FlockId(0));
        assert_eq!(store.flocks.leader(f), Some(AgentId(0)));
        assert_eq!(store.flocks.members(f), &[AgentId(1), AgentId(2), AgentId(3)]);

        assert!(store.is_leader(AgentId(0)));
        assert_eq!(store.leader_of(AgentId(0)), None);
        assert_eq!(store.leader_of(AgentId(3)), Some(AgentId(0)));
        assert_eq!(store.flock_of(AgentId(4)), None);
    }

    #[test]
    fn flockmates_exclude_self_and_leader() {
        let (store, _) = AgentStoreBuilder::new(4, 1)
            .flock(AgentId(0), &[AgentId(1), AgentId(2), AgentId(3)])
            .build()
            .unwrap();
        let mates: Vec<_> = store.flockmates(AgentId(2)).collect();
        assert_eq!(mates, vec![AgentId(1), AgentId(3)]);
        assert_eq!(store.flockmates(AgentId(0)).count(), 3);
    }

    #[test]
    fn redeclared_member_belongs_to_last_flock() {
        let (store, _) = AgentStoreBuilder::new(5, 1)
            .flock(AgentId(0), &[AgentId(2)])
            .flock(AgentId(1), &[AgentId(2), AgentId(3)])
            .build()
            .unwrap();
        assert_eq!(store.leader_of(AgentId(2)), Some(AgentId(1)));
        assert!(store.flocks.members(FlockId(0)).is_empty());
        assert_eq!(store.flocks.members(FlockId(1)), &[AgentId(2), AgentId(3)]);
    }

    #[test]
    fn leader_listed_as_follower_is_ignored() {
        let (store, _) = AgentStoreBuilder::new(3, 1)
            .flock(AgentId(0), &[AgentId(0), AgentId(1)])
            .build()
            .unwrap();
        assert_eq!(store.flocks.members(FlockId(0)), &[AgentId(1)]);
    }
}

// ── RNG ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rngs {
    use super::*;

    #[test]
    fn per_agent_streams_are_independent() {
        let (_, mut rngs) = AgentStoreBuilder::new(2, 7).build().unwrap();
        let a: u64 = rngs.get_mut(AgentId(0)).random();
        let b: u64 = rngs.get_mut(AgentId(1)).random();
        assert_ne!(a, b);
    }
}
