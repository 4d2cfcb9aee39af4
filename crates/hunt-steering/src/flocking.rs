//! Flocking: separation, alignment, cohesion, and leader following.
//!
//! # Combination
//!
//! ```text
//! heading = w_coh·cohesion + w_sep·separation + w_align·alignment     (neighbors > 0)
//!         | wander heading                                            (neighbors = 0)
//!         + leader attraction + leader alignment                      (leader known)
//! ```
//!
//! Each rule is normalized before weighting.  The sum is flattened onto the
//! ground plane and normalized again; a negligible sum means no motivation.

use hunt_core::geom::{EPSILON_SQ, flat, inverse_lerp};
use hunt_core::{AgentId, AgentRng, SimTime, Vec3};

use crate::{WanderParams, WanderState};

/// Minimum divisor in the separation term.
const SEPARATION_EPSILON: f32 = 1e-3;

// ── FlockMember ───────────────────────────────────────────────────────────────

/// A flock agent as sampled at the start of the tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlockMember {
    pub id:       AgentId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub forward:  Vec3,
}

impl FlockMember {
    /// Unit direction of travel: velocity while moving, else facing.
    pub fn heading(&self) -> Vec3 {
        if self.velocity.length_squared() > EPSILON_SQ {
            self.velocity.normalize()
        } else {
            self.forward.normalize_or_zero()
        }
    }
}

// ── FlockingParams ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FlockingParams {
    pub neighbor_radius:       f32,
    pub separation_distance:   f32,
    pub separation_weight:     f32,
    pub alignment_weight:      f32,
    pub cohesion_weight:       f32,
    /// Inside this distance the leader only pulls with `leader_inner_pull`.
    pub leader_comfort_radius: f32,
    pub leader_attraction:     f32,
    pub leader_alignment:      f32,
    pub leader_inner_pull:     f32,
    /// Cruising speed bounds; each member draws its speed once.
    pub min_speed:             f32,
    pub max_speed:             f32,
    /// Distance ahead of the agent where the heading becomes a destination.
    pub lookahead:             f32,
    pub sample_radius:         f32,
}

impl Default for FlockingParams {
    fn default() -> Self {
        Self {
            neighbor_radius:       3.0,
            separation_distance:   1.0,
            separation_weight:     1.2,
            alignment_weight:      1.0,
            cohesion_weight:       1.0,
            leader_comfort_radius: 6.0,
            leader_attraction:     1.2,
            leader_alignment:      0.6,
            leader_inner_pull:     0.2,
            min_speed:             2.0,
            max_speed:             5.0,
            lookahead:             3.0,
            sample_radius:         5.0,
        }
    }
}

impl FlockingParams {
    /// A cruising speed in `[min_speed, max_speed]`.
    pub fn draw_cruise_speed(&self, rng: &mut AgentRng) -> f32 {
        if self.max_speed > self.min_speed {
            rng.gen_range(self.min_speed..=self.max_speed)
        } else {
            self.min_speed
        }
    }

    /// Leader attraction factor at `distance`: a constant inner pull inside
    /// the comfort radius, then `inverse_lerp(r, 3r, distance)` beyond it.
    pub fn leader_pull(&self, distance: f32) -> f32 {
        let r = self.leader_comfort_radius;
        if distance > r {
            inverse_lerp(r, r * 3.0, distance)
        } else {
            self.leader_inner_pull.clamp(0.0, 1.0)
        }
    }
}

// ── FlockSteering ─────────────────────────────────────────────────────────────

/// Per-agent flocking state.  Only the wander fallback persists.
#[derive(Clone, Debug, Default)]
pub struct FlockSteering {
    pub wander: WanderState,
}

impl FlockSteering {
    pub fn new() -> Self {
        Self::default()
    }

    /// Desired unit heading for `me`, or `None` if the rules cancel out.
    ///
    /// `neighbors` may contain any agents; only those within
    /// `neighbor_radius` count, and `me` and `leader` are skipped.
    #[allow(clippy::too_many_arguments)]
    pub fn compute_desired_heading(
        &mut self,
        me:        &FlockMember,
        neighbors: &[FlockMember],
        leader:    Option<&FlockMember>,
        params:    &FlockingParams,
        wander:    &WanderParams,
        now:       SimTime,
        rng:       &mut AgentRng,
    ) -> Option<Vec3> {
        let leader_id = leader.map(|l| l.id);
        let radius_sq = params.neighbor_radius * params.neighbor_radius;

        let mut count = 0usize;
        let mut center = Vec3::ZERO;
        let mut separation = Vec3::ZERO;
        let mut alignment = Vec3::ZERO;

        for n in neighbors {
            if n.id == me.id || Some(n.id) == leader_id {
                continue;
            }
            let offset = me.position - n.position;
            let dist_sq = offset.length_squared();
            if dist_sq > radius_sq {
                continue;
            }
            count += 1;
            center += n.position;
            let dist = dist_sq.sqrt();
            if dist < params.separation_distance {
                separation += offset / dist.max(SEPARATION_EPSILON);
            }
            alignment += n.heading();
        }

        let mut desired = Vec3::ZERO;
        if count > 0 {
            let cohesion = center / count as f32 - me.position;
            desired += unit_or_raw(cohesion) * params.cohesion_weight;
            desired += unit_or_raw(separation) * params.separation_weight;
            desired += unit_or_raw(alignment) * params.alignment_weight;
        } else {
            self.wander.update(me.position, me.forward, now, wander, rng);
            desired += self.wander.heading_from(me.position).unwrap_or(Vec3::ZERO);
        }

        if let Some(l) = leader {
            let to_leader = l.position - me.position;
            let dist = to_leader.length();
            if dist > SEPARATION_EPSILON {
                desired += to_leader / dist * params.leader_attraction * params.leader_pull(dist);
                if l.velocity.length_squared() > EPSILON_SQ {
                    desired += l.velocity.normalize() * params.leader_alignment;
                } else {
                    desired += l.forward.normalize_or_zero() * (params.leader_alignment * 0.5);
                }
            }
        }

        let desired = flat(desired);
        (desired.length_squared() > EPSILON_SQ).then(|| desired.normalize())
    }
}

/// Normalize when long enough to have a direction; otherwise leave as is.
fn unit_or_raw(v: Vec3) -> Vec3 {
    if v.length_squared() > EPSILON_SQ { v.normalize() } else { v }
}
