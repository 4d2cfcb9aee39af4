//! Patrol routes and their traversal order.

use hunt_core::{RouteId, Vec3};

use crate::{PatrolError, PatrolResult};

/// How a patrol continues past the last waypoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatrolMode {
    /// `… → n-1 → 0 → 1 → …`
    Loop,
    /// `… → n-2 → n-1 → n-2 → …`
    #[default]
    PingPong,
}

/// An ordered, non-empty list of waypoints.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatrolRoute {
    pub id:   RouteId,
    pub mode: PatrolMode,
    waypoints: Vec<Vec3>,
}

impl PatrolRoute {
    pub fn new(id: RouteId, waypoints: Vec<Vec3>, mode: PatrolMode) -> PatrolResult<Self> {
        if waypoints.is_empty() {
            return Err(PatrolError::EmptyRoute(id));
        }
        Ok(Self { id, mode, waypoints })
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// `false` for any route built with [`new`](Self::new).  A route
    /// deserialized directly can still be empty.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoint(&self, index: usize) -> Vec3 {
        self.waypoints[index % self.waypoints.len()]
    }

    /// The waypoint after `index` when travelling in direction `dir` (±1),
    /// with the direction to keep travelling in.
    pub fn advance(&self, index: usize, dir: i32) -> (usize, i32) {
        let n = self.waypoints.len() as i64;
        if n == 1 {
            return (0, dir);
        }
        let next = index as i64 + dir as i64;
        match self.mode {
            PatrolMode::Loop => (next.rem_euclid(n) as usize, dir),
            PatrolMode::PingPong => {
                if next >= n {
                    ((n - 2) as usize, -1)
                } else if next < 0 {
                    (1, 1)
                } else {
                    (next as usize, dir)
                }
            }
        }
    }
}
