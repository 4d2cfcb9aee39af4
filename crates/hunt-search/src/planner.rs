//! Search-point generation and ranking.

use std::f32::consts::TAU;

use log::debug;

use hunt_core::geom::flat;
use hunt_core::{LayerMask, Obstacle, Vec3};
use hunt_nav::NavMeshQuery;

use crate::{CandidateSource, SearchCandidate, SearchQueue};

/// Offsets shorter than this give no usable "away from the last sighting"
/// direction and the obstacle is skipped.
const MIN_COVER_DIRECTION: f32 = 0.01;

// ── SearchParams ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchParams {
    /// Obstacles farther than this from the last known position are ignored.
    pub search_radius:   f32,
    /// How far past an obstacle's nearest face a cover spot sits.
    pub cover_offset:    f32,
    pub max_candidates:  usize,
    /// Radius used when snapping candidates onto the navmesh.
    pub sample_radius:   f32,
    /// Fewest points sampled on the fallback ring.
    pub min_ring_points: usize,
    /// Ring radius as a fraction of `search_radius`, before clamping.
    pub ring_fraction:   f32,
    /// Lower clamp of the ring radius.
    pub min_ring_radius: f32,
    /// Weight of the searcher distance term in the score.
    pub searcher_weight: f32,
    /// Layers of obstacles worth searching behind.
    pub cover_mask:      LayerMask,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            search_radius:   25.0,
            cover_offset:    2.0,
            max_candidates:  10,
            sample_radius:   6.0,
            min_ring_points: 6,
            ring_fraction:   0.6,
            min_ring_radius: 4.0,
            searcher_weight: 0.25,
            cover_mask:      LayerMask::ALL,
        }
    }
}

impl SearchParams {
    /// `clamp(search_radius · ring_fraction, min_ring_radius, search_radius)`.
    ///
    /// The upper bound wins when `min_ring_radius > search_radius`.
    pub fn ring_radius(&self) -> f32 {
        (self.search_radius * self.ring_fraction)
            .max(self.min_ring_radius)
            .min(self.search_radius)
    }
}

// ── SearchPlanner ─────────────────────────────────────────────────────────────

/// Stateless search-queue builder.
#[derive(Clone, Debug, Default)]
pub struct SearchPlanner {
    pub params: SearchParams,
}

impl SearchPlanner {
    pub fn new(params: SearchParams) -> Self {
        Self { params }
    }

    /// Ranked candidates around `last_known` for an agent standing at
    /// `searcher`.
    ///
    /// Never returns more than `max(max_candidates, 1)` entries and never
    /// returns an empty queue: with no usable candidate the queue holds
    /// `last_known` alone.  Deterministic for identical inputs.
    pub fn build_search_queue(
        &self,
        last_known:     Vec3,
        searcher:       Vec3,
        obstacles:      &[Obstacle],
        max_candidates: usize,
        nav:            &dyn NavMeshQuery,
    ) -> SearchQueue {
        let p = &self.params;
        let max_candidates = max_candidates.max(1);
        let mut found: Vec<SearchCandidate> = Vec::with_capacity(max_candidates.max(p.min_ring_points));

        let admit = |point: Vec3| -> Option<Vec3> {
            nav.sample_navigable(point, p.sample_radius)
                .filter(|&snapped| nav.path_is_complete(searcher, snapped))
        };
        let score = |point: Vec3| -> f32 {
            (point - last_known).length_squared() + p.searcher_weight * (point - searcher).length_squared()
        };

        // ── 1. Behind cover ───────────────────────────────────────────────
        let radius_sq = p.search_radius * p.search_radius;
        for ob in obstacles {
            let closest = ob.bounds.closest_point(last_known);
            if (closest - last_known).length_squared() > radius_sq {
                continue;
            }
            let away = flat(closest - last_known);
            let len = away.length();
            if len < MIN_COVER_DIRECTION {
                continue;
            }
            if let Some(spot) = admit(closest + away / len * p.cover_offset) {
                found.push(SearchCandidate { point: spot, score: score(spot), source: CandidateSource::Cover(ob.id) });
            }
        }

        // ── 2. Ring fill ──────────────────────────────────────────────────
        let needed = max_candidates.saturating_sub(found.len());
        if needed > 0 {
            let ring_points = needed.max(p.min_ring_points);
            let radius = p.ring_radius();
            for i in 0..ring_points {
                let angle = TAU * (i as f32 / ring_points as f32);
                let point = last_known + Vec3::new(angle.cos(), 0.0, angle.sin()) * radius;
                if let Some(spot) = admit(point) {
                    found.push(SearchCandidate { point: spot, score: score(spot), source: CandidateSource::Ring });
                }
            }
        }

        // ── 3. Rank and truncate ──────────────────────────────────────────
        found.sort_by(|a, b| a.score.total_cmp(&b.score));
        found.truncate(max_candidates);

        if found.is_empty() {
            debug!("no search candidates around {last_known}; falling back to the last known position");
            found.push(SearchCandidate { point: last_known, score: 0.0, source: CandidateSource::LastKnown });
        }
        SearchQueue::from_ranked(found)
    }
}
