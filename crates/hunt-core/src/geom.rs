//! Geometry primitives shared by perception, search, and navigation.
//!
//! Vectors are `glam::Vec3` with `+Y` up.  Most gameplay math is planar: the
//! `flat` helpers drop the vertical component before measuring distances.

pub use glam::Vec3;

use crate::ObstacleId;

/// Squared length below which a direction is treated as "no direction".
pub const EPSILON_SQ: f32 = 1e-4;

// ── Planar helpers ────────────────────────────────────────────────────────────

/// `v` with its vertical component zeroed.
#[inline]
pub fn flat(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Horizontal distance between two points.
#[inline]
pub fn flat_distance(a: Vec3, b: Vec3) -> f32 {
    flat(a - b).length()
}

/// Where `v` sits between `a` and `b`, clamped to `[0, 1]`.
///
/// Returns `0.0` for a degenerate range.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    if (b - a).abs() <= f32::EPSILON {
        return 0.0;
    }
    ((v - a) / (b - a)).clamp(0.0, 1.0)
}

// ── Aabb ──────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box.  `min <= max` on every axis.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box spanning two arbitrary corners.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        let half = half.abs();
        Self { min: center - half, max: center + half }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// `true` if `p` lies inside the box footprint on the ground plane.
    #[inline]
    pub fn contains_flat(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.z >= self.min.z && p.z <= self.max.z
    }

    /// Closest point on or inside the box to `p`.
    #[inline]
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }

    /// Smallest box containing both `self` and `other`.
    pub fn encapsulate(&self, other: &Aabb) -> Aabb {
        Aabb { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    /// Box grown by `margin` on every side.
    pub fn expanded(&self, margin: f32) -> Aabb {
        Aabb { min: self.min - Vec3::splat(margin), max: self.max + Vec3::splat(margin) }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Slab test.  Returns the distance along the unit `dir` at which a ray
    /// from `origin` enters the box, if that happens within `max_distance`.
    ///
    /// A ray starting inside the box hits at distance `0.0`.
    pub fn ray_intersection(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

// ── LayerMask ─────────────────────────────────────────────────────────────────

/// Bit set of collision layers used to filter ray casts and overlaps.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Mask with only layer `n` (0..32) set.
    #[inline]
    pub const fn layer(n: u8) -> LayerMask {
        LayerMask(1 << (n as u32 & 31))
    }

    #[inline]
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn union(self, other: LayerMask) -> LayerMask {
        LayerMask(self.0 | other.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

// ── Obstacle ──────────────────────────────────────────────────────────────────

/// A static blocker: walls, crates, parked cars.  Blocks line of sight for
/// rays whose mask intersects `layers` and offers cover to a hiding target.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    pub id:     ObstacleId,
    pub bounds: Aabb,
    pub layers: LayerMask,
}
