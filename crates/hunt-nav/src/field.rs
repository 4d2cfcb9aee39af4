//! `OpenField`: a flat rectangular walkable area with box obstacles.
//!
//! # Model
//!
//! - The ground is the plane `y = area.min.y` inside `area`'s footprint.
//! - Obstacles are boxes.  Their footprint, grown by [`CLEARANCE`], is not
//!   walkable; their full 3-D bounds block rays.
//! - Islands are walkable rectangles with no path to the rest of the field
//!   (a fenced yard, a rooftop).  A point inside an island belongs to that
//!   island even when it also lies inside `area`.
//! - Agents move in straight lines at their requested speed and slide
//!   along an axis when the direct step is blocked.  There is no planner;
//!   a destination in another region yields a `Partial` path and the agent
//!   stays put.
//!
//! # Spatial index
//!
//! Obstacle footprints live in an `rstar` R-tree keyed on `[x, z]` so ray
//! casts, overlap queries, and walkability checks touch only nearby boxes.

use log::debug;
use rstar::{RTree, RTreeObject, AABB};

use hunt_core::geom::flat_distance;
use hunt_core::{Aabb, AgentId, LayerMask, Obstacle, ObstacleId, Vec3};

use crate::{
    NavAgentState, NavError, NavMeshQuery, NavResult, NavigationPort, PathStatus, RayHit,
    SpatialQuery,
};

/// Distance agents keep from obstacle faces.
pub const CLEARANCE: f32 = 0.25;

/// How far `set_destination` searches for walkable ground around the
/// requested point.
const DESTINATION_SNAP_RADIUS: f32 = 1.0;

/// Remaining distance below which an agent counts as arrived.
const ARRIVE_EPSILON: f32 = 1e-3;

// ── R-tree obstacle entry ─────────────────────────────────────────────────────

struct ObstacleEntry {
    /// Footprint grown by `CLEARANCE`, as `[x, z]`.
    footprint: AABB<[f32; 2]>,
    index:     usize,
}

impl RTreeObject for ObstacleEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.footprint
    }
}

fn footprint(bounds: &Aabb, margin: f32) -> AABB<[f32; 2]> {
    AABB::from_corners(
        [bounds.min.x - margin, bounds.min.z - margin],
        [bounds.max.x + margin, bounds.max.z + margin],
    )
}

// ── Agents ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct FieldAgent {
    position:    Vec3,
    forward:     Vec3,
    velocity:    Vec3,
    destination: Option<Vec3>,
    speed:       f32,
    path_status: PathStatus,
    on_navmesh:  bool,
}

// ── OpenField ─────────────────────────────────────────────────────────────────

/// Reference implementation of [`NavigationPort`] and [`SpatialQuery`].
pub struct OpenField {
    area:      Aabb,
    islands:   Vec<Aabb>,
    obstacles: Vec<Obstacle>,
    index:     RTree<ObstacleEntry>,
    agents:    Vec<FieldAgent>,
}

impl OpenField {
    /// An empty field covering `area`'s footprint.
    pub fn new(area: Aabb) -> Self {
        Self {
            area,
            islands:   Vec::new(),
            obstacles: Vec::new(),
            index:     RTree::new(),
            agents:    Vec::new(),
        }
    }

    /// Builder-style [`add_obstacle`](Self::add_obstacle).
    pub fn with_obstacle(mut self, bounds: Aabb, layers: LayerMask) -> Self {
        self.add_obstacle(bounds, layers);
        self
    }

    /// Register a box obstacle and return its id.
    pub fn add_obstacle(&mut self, bounds: Aabb, layers: LayerMask) -> ObstacleId {
        let id = ObstacleId(self.obstacles.len() as u32);
        self.index.insert(ObstacleEntry {
            footprint: footprint(&bounds, CLEARANCE),
            index:     self.obstacles.len(),
        });
        self.obstacles.push(Obstacle { id, bounds, layers });
        id
    }

    /// Declare a walkable rectangle with no path to the rest of the field.
    pub fn add_island(&mut self, area: Aabb) {
        self.islands.push(area);
    }

    /// Place a new agent and return its id.  An agent spawned off the
    /// walkable surface is kept but reports `on_navmesh == false`.
    pub fn spawn(&mut self, position: Vec3, forward: Vec3) -> AgentId {
        let id = AgentId(self.agents.len() as u32);
        let position = self.to_ground(position);
        let on_navmesh = self.is_walkable(position);
        if !on_navmesh {
            debug!("{id} spawned off the walkable surface at {position}");
        }
        self.agents.push(FieldAgent {
            position,
            forward: flat_unit(forward).unwrap_or(Vec3::Z),
            velocity: Vec3::ZERO,
            destination: None,
            speed: 0.0,
            path_status: PathStatus::Complete,
            on_navmesh,
        });
        id
    }

    /// Teleport an agent, dropping any destination.
    pub fn warp(&mut self, agent: AgentId, position: Vec3) -> NavResult<()> {
        let position = self.to_ground(position);
        let on_navmesh = self.is_walkable(position);
        let a = self.agents.get_mut(agent.index()).ok_or(NavError::UnknownAgent(agent))?;
        a.position = position;
        a.velocity = Vec3::ZERO;
        a.destination = None;
        a.path_status = PathStatus::Complete;
        a.on_navmesh = on_navmesh;
        Ok(())
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn area(&self) -> &Aabb {
        &self.area
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    #[inline]
    pub fn ground(&self) -> f32 {
        self.area.min.y
    }

    /// `true` if `p`'s footprint is inside a region and clear of obstacles.
    pub fn is_walkable(&self, p: Vec3) -> bool {
        self.region_of(p).is_some() && self.blocking_obstacle(p).is_none()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn to_ground(&self, p: Vec3) -> Vec3 {
        Vec3::new(p.x, self.ground(), p.z)
    }

    /// 0 for the main area, `i + 1` for island `i`.
    fn region_of(&self, p: Vec3) -> Option<usize> {
        if let Some(i) = self.islands.iter().position(|a| a.contains_flat(p)) {
            return Some(i + 1);
        }
        self.area.contains_flat(p).then_some(0)
    }

    fn walkable_region(&self, p: Vec3) -> Option<usize> {
        if self.blocking_obstacle(p).is_some() {
            return None;
        }
        self.region_of(p)
    }

    fn blocking_obstacle(&self, p: Vec3) -> Option<&ObstacleEntry> {
        self.index
            .locate_in_envelope_intersecting(&AABB::from_point([p.x, p.z]))
            .next()
    }

    /// Move `p` to the nearest edge of the clearance-grown footprint it is in.
    fn push_out(entry: &ObstacleEntry, p: Vec3) -> Vec3 {
        const NUDGE: f32 = 1e-3;
        let lo = entry.footprint.lower();
        let hi = entry.footprint.upper();
        let exits = [
            (p.x - lo[0], Vec3::new(lo[0] - NUDGE, p.y, p.z)),
            (hi[0] - p.x, Vec3::new(hi[0] + NUDGE, p.y, p.z)),
            (p.z - lo[1], Vec3::new(p.x, p.y, lo[1] - NUDGE)),
            (hi[1] - p.z, Vec3::new(p.x, p.y, hi[1] + NUDGE)),
        ];
        exits
            .iter()
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|&(_, q)| q)
            .unwrap_or(p)
    }

    fn clamp_into_area(&self, p: Vec3) -> Vec3 {
        let margin = CLEARANCE.min(self.area.half_extents().x).min(self.area.half_extents().z);
        Vec3::new(
            p.x.clamp(self.area.min.x + margin, self.area.max.x - margin),
            p.y,
            p.z.clamp(self.area.min.z + margin, self.area.max.z - margin),
        )
    }

    fn agent(&self, agent: AgentId) -> NavResult<&FieldAgent> {
        self.agents.get(agent.index()).ok_or(NavError::UnknownAgent(agent))
    }
}

fn flat_unit(v: Vec3) -> Option<Vec3> {
    let f = Vec3::new(v.x, 0.0, v.z);
    (f.length_squared() > 1e-8).then(|| f.normalize())
}

// ── NavMeshQuery ──────────────────────────────────────────────────────────────

impl NavMeshQuery for OpenField {
    fn sample_navigable(&self, point: Vec3, radius: f32) -> Option<Vec3> {
        let mut p = self.to_ground(point);
        if self.region_of(p).is_none() {
            p = self.clamp_into_area(p);
        }
        for _ in 0..4 {
            match self.blocking_obstacle(p) {
                Some(entry) => p = Self::push_out(entry, p),
                None => break,
            }
        }
        if !self.is_walkable(p) || flat_distance(point, p) > radius {
            return None;
        }
        Some(p)
    }

    fn path_is_complete(&self, from: Vec3, to: Vec3) -> bool {
        match (self.walkable_region(from), self.walkable_region(to)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

// ── NavigationPort ────────────────────────────────────────────────────────────

impl NavigationPort for OpenField {
    fn agent_state(&self, agent: AgentId) -> NavResult<NavAgentState> {
        let a = self.agent(agent)?;
        let remaining = a
            .destination
            .map(|d| flat_distance(a.position, d))
            .unwrap_or(0.0);
        Ok(NavAgentState {
            position:           a.position,
            forward:            a.forward,
            velocity:           a.velocity,
            destination:        a.destination,
            has_path:           a.destination.is_some() && remaining > ARRIVE_EPSILON,
            path_pending:       false,
            remaining_distance: remaining,
            path_status:        a.path_status,
            on_navmesh:         a.on_navmesh,
        })
    }

    fn set_destination(&mut self, agent: AgentId, point: Vec3, speed: f32) -> NavResult<()> {
        let (position, on_navmesh) = {
            let a = self.agent(agent)?;
            (a.position, a.on_navmesh)
        };
        if !on_navmesh {
            return Err(NavError::OffNavMesh(agent));
        }

        let snapped = self.sample_navigable(point, DESTINATION_SNAP_RADIUS);
        let (destination, status) = match snapped {
            None => (None, PathStatus::Invalid),
            Some(d) if self.path_is_complete(position, d) => (Some(d), PathStatus::Complete),
            Some(d) => (Some(d), PathStatus::Partial),
        };

        let a = &mut self.agents[agent.index()];
        a.destination = destination;
        a.path_status = status;
        a.speed = speed.max(0.0);
        Ok(())
    }

    fn advance(&mut self, dt_secs: f32) {
        if dt_secs <= 0.0 {
            return;
        }
        for i in 0..self.agents.len() {
            let a = self.agents[i].clone();
            let target = match (a.on_navmesh, a.destination, a.path_status) {
                (true, Some(d), PathStatus::Complete) => d,
                _ => {
                    self.agents[i].velocity = Vec3::ZERO;
                    continue;
                }
            };

            let from = a.position;
            let to = Vec3::new(target.x - from.x, 0.0, target.z - from.z);
            let dist = to.length();
            if dist <= ARRIVE_EPSILON {
                self.agents[i].velocity = Vec3::ZERO;
                continue;
            }

            let dir = to / dist;
            let step = (a.speed * dt_secs).min(dist);
            let direct = from + dir * step;
            let slide_x = from + Vec3::new(dir.x * step, 0.0, 0.0);
            let slide_z = from + Vec3::new(0.0, 0.0, dir.z * step);
            let next = [direct, slide_x, slide_z]
                .into_iter()
                .find(|&p| p != from && self.is_walkable(p));

            let agent = &mut self.agents[i];
            match next {
                Some(p) => {
                    agent.velocity = (p - from) / dt_secs;
                    agent.position = if step >= dist && p == direct { target } else { p };
                    agent.forward = dir;
                }
                None => agent.velocity = Vec3::ZERO,
            }
        }
    }
}

// ── SpatialQuery ──────────────────────────────────────────────────────────────

impl SpatialQuery for OpenField {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        let end = origin + direction * max_distance;
        let envelope = AABB::from_corners([origin.x, origin.z], [end.x, end.z]);

        self.index
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| &self.obstacles[entry.index])
            .filter(|ob| ob.layers.intersects(mask))
            .filter_map(|ob| {
                ob.bounds
                    .ray_intersection(origin, direction, max_distance)
                    .map(|t| RayHit { point: origin + direction * t, distance: t, obstacle: ob.id })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance).then(a.obstacle.cmp(&b.obstacle)))
    }

    fn obstacles_near(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<Obstacle> {
        let envelope = AABB::from_corners(
            [center.x - radius, center.z - radius],
            [center.x + radius, center.z + radius],
        );
        let r2 = radius * radius;
        let mut found: Vec<Obstacle> = self
            .index
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| self.obstacles[entry.index])
            .filter(|ob| ob.layers.intersects(mask))
            .filter(|ob| (ob.bounds.closest_point(center) - center).length_squared() <= r2)
            .collect();
        found.sort_by_key(|ob| ob.id);
        found
    }
}
