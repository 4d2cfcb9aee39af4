//! The ordered, finite queue of places to search.

use std::collections::VecDeque;

use hunt_core::geom::flat_distance;
use hunt_core::{ObstacleId, Vec3};

/// Where a candidate came from.  Generation order is cover spots, then ring
/// points, and ties in score keep that order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CandidateSource {
    /// Behind the named obstacle.
    Cover(ObstacleId),
    /// On the fallback ring around the last known position.
    Ring,
    /// The last known position itself, used when nothing else was found.
    LastKnown,
}

/// A navigable point with its ranking score (lower is searched first).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchCandidate {
    pub point:  Vec3,
    pub score:  f32,
    pub source: CandidateSource,
}

/// Search candidates in visiting order.
///
/// Iterating pops from the front; there is no way to push.  An exhausted
/// queue stays exhausted until the planner builds a replacement.
#[derive(Clone, Debug, Default)]
pub struct SearchQueue {
    candidates: VecDeque<SearchCandidate>,
}

impl SearchQueue {
    pub(crate) fn from_ranked(candidates: Vec<SearchCandidate>) -> Self {
        Self { candidates: candidates.into() }
    }

    /// An exhausted queue.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn peek(&self) -> Option<&SearchCandidate> {
        self.candidates.front()
    }

    /// Remaining candidates, front first, without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &SearchCandidate> + '_ {
        self.candidates.iter()
    }

    /// Remaining points, front first.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.candidates.iter().map(|c| c.point)
    }

    /// `true` if some remaining candidate lies within `tolerance` of `point`
    /// on the ground plane.
    pub fn contains_point(&self, point: Vec3, tolerance: f32) -> bool {
        self.candidates.iter().any(|c| flat_distance(c.point, point) <= tolerance)
    }

    /// Drop every remaining candidate.
    pub fn clear(&mut self) {
        self.candidates.clear();
    }
}

impl Iterator for SearchQueue {
    type Item = SearchCandidate;

    fn next(&mut self) -> Option<SearchCandidate> {
        self.candidates.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.candidates.len(), Some(self.candidates.len()))
    }
}

impl ExactSizeIterator for SearchQueue {}
