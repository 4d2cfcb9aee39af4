//! Per-agent tuning.
//!
//! Every duration is given in seconds and converted to [`SimDuration`] once,
//! rounded to the nearest millisecond.  All groups implement `Default` with
//! values tuned for a 50 ms brain tick.

use hunt_core::{Aabb, LayerMask, SimDuration, SimTime, Vec3};
use hunt_patrol::{PatrolParams, PatrolRoute};
use hunt_perception::VisionSensor;
use hunt_search::SearchParams;
use hunt_steering::{DestinationThrottle, FlockingParams, RoamParams, WanderParams};

use crate::{BehaviorError, BehaviorResult};

// ── Groups ────────────────────────────────────────────────────────────────────

/// How the agent notices the target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VisionMode {
    /// The agent looks: range check, optional view cone, line of sight.
    #[default]
    LineOfSight,
    /// The agent reacts to entering the target's own camera view.
    ViewerFrustum,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VisionConfig {
    pub mode:              VisionMode,
    pub range:             f32,
    pub eye_height:        f32,
    /// Vertical view cone in degrees; `None` sees all around.
    pub field_of_view:     Option<f32>,
    pub obstacle_mask:     LayerMask,
    /// Seconds between viewer-frustum tests.
    pub frustum_interval:  f32,
    /// Half extents of the agent's body box tested against the viewer.
    pub body_half_extents: Vec3,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            mode:              VisionMode::LineOfSight,
            range:             40.0,
            eye_height:        1.6,
            field_of_view:     None,
            obstacle_mask:     LayerMask::ALL,
            frustum_interval:  0.1,
            body_half_extents: Vec3::new(0.4, 0.9, 0.4),
        }
    }
}

impl VisionConfig {
    pub fn sensor(&self) -> VisionSensor {
        VisionSensor {
            range:         self.range,
            eye_height:    self.eye_height,
            obstacle_mask: self.obstacle_mask,
            field_of_view: self.field_of_view,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MemoryConfig {
    /// Seconds a sighting stays usable as a lead.
    pub sighting_secs: f32,
    /// Seconds a scent stays usable as a lead.
    pub scent_secs:    f32,
    /// Radius of the agent's smell trigger.
    pub scent_reach:   f32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { sighting_secs: 10.0, scent_secs: 4.0, scent_reach: 0.5 }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Grace period between losing sight and starting a search.
    pub lose_sight_delay:  f32,
    /// Minimum seconds between chase destination updates.
    pub repath_interval:   f32,
    /// Wait at each search candidate.
    pub investigate_pause: f32,
    /// Search length without a fresh lead before giving up.  `0` never
    /// gives up.
    pub give_up_after:     f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            lose_sight_delay:  0.3,
            repath_interval:   0.2,
            investigate_pause: 0.5,
            give_up_after:     15.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpeedConfig {
    pub wander:             f32,
    /// Investigate speed as a multiple of `wander`.
    pub investigate_factor: f32,
    pub chase:              f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self { wander: 1.4, investigate_factor: 1.2, chase: 2.2 }
    }
}

impl SpeedConfig {
    #[inline]
    pub fn investigate(&self) -> f32 {
        self.wander * self.investigate_factor
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AlertConfig {
    /// Allies within this distance hear about a sighting.
    pub radius:        f32,
    /// Seconds between broadcasts from one agent.
    pub cooldown_secs: f32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self { radius: 8.0, cooldown_secs: 2.0 }
    }
}

/// Destination handling shared by every state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavConfig {
    /// Remaining distance at which a destination counts as reached.
    pub stop_tolerance:      f32,
    /// Radius for snapping chase and search destinations onto the navmesh.
    pub sample_radius:       f32,
    /// Reach of the random probe taken when a search runs dry.
    pub probe_radius:        f32,
    pub probe_sample_radius: f32,
    pub throttle:            DestinationThrottle,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            stop_tolerance:      0.3,
            sample_radius:       6.0,
            probe_radius:        3.0,
            probe_sample_radius: 4.0,
            throttle:            DestinationThrottle::default(),
        }
    }
}

// ── AgentConfig ───────────────────────────────────────────────────────────────

/// Everything an [`AgentBrain`](crate::AgentBrain) needs besides the world.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    pub vision:       VisionConfig,
    pub memory:       MemoryConfig,
    pub timing:       TimingConfig,
    pub speed:        SpeedConfig,
    pub alert:        AlertConfig,
    pub nav:          NavConfig,
    pub search:       SearchParams,
    pub flocking:     FlockingParams,
    pub wander:       WanderParams,
    pub roam:         RoamParams,
    pub patrol:       PatrolParams,
    /// Route walked while wandering.  Takes precedence over flocking.
    pub patrol_route: Option<PatrolRoute>,
    /// Area a flock leader roams.  `None` roams around its position.
    pub roam_area:    Option<Aabb>,
}

impl AgentConfig {
    /// Reject values no agent can run with: negative or non-finite numbers,
    /// zero speeds or ranges, inverted speed bounds, empty routes.
    pub fn validate(&self) -> BehaviorResult<()> {
        let non_negative = [
            ("vision.eye_height", self.vision.eye_height),
            ("vision.frustum_interval", self.vision.frustum_interval),
            ("memory.sighting_secs", self.memory.sighting_secs),
            ("memory.scent_secs", self.memory.scent_secs),
            ("memory.scent_reach", self.memory.scent_reach),
            ("timing.lose_sight_delay", self.timing.lose_sight_delay),
            ("timing.repath_interval", self.timing.repath_interval),
            ("timing.investigate_pause", self.timing.investigate_pause),
            ("timing.give_up_after", self.timing.give_up_after),
            ("alert.radius", self.alert.radius),
            ("alert.cooldown_secs", self.alert.cooldown_secs),
            ("nav.stop_tolerance", self.nav.stop_tolerance),
            ("nav.probe_radius", self.nav.probe_radius),
            ("search.search_radius", self.search.search_radius),
            ("search.cover_offset", self.search.cover_offset),
            ("flocking.neighbor_radius", self.flocking.neighbor_radius),
            ("flocking.separation_distance", self.flocking.separation_distance),
            ("flocking.lookahead", self.flocking.lookahead),
            ("wander.circle_distance", self.wander.circle_distance),
            ("wander.circle_radius", self.wander.circle_radius),
            ("wander.interval", self.wander.interval),
            ("roam.interval", self.roam.interval),
            ("patrol.arrive_distance", self.patrol.arrive_distance),
            ("patrol.stuck_after", self.patrol.stuck_after),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(BehaviorError::Config(format!("{name} must be finite and >= 0, got {value}")));
            }
        }

        let positive = [
            ("vision.range", self.vision.range),
            ("speed.wander", self.speed.wander),
            ("speed.investigate_factor", self.speed.investigate_factor),
            ("speed.chase", self.speed.chase),
            ("nav.sample_radius", self.nav.sample_radius),
            ("nav.probe_sample_radius", self.nav.probe_sample_radius),
            ("search.sample_radius", self.search.sample_radius),
            ("wander.sample_radius", self.wander.sample_radius),
            ("flocking.sample_radius", self.flocking.sample_radius),
            ("flocking.min_speed", self.flocking.min_speed),
            ("roam.sample_radius", self.roam.sample_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(BehaviorError::Config(format!("{name} must be finite and > 0, got {value}")));
            }
        }

        if let Some(fov) = self.vision.field_of_view {
            if !fov.is_finite() || fov <= 0.0 || fov >= 180.0 {
                return Err(BehaviorError::Config(format!("vision.field_of_view must be in (0, 180), got {fov}")));
            }
        }
        if self.flocking.max_speed < self.flocking.min_speed {
            return Err(BehaviorError::Config(format!(
                "flocking.max_speed ({}) is below flocking.min_speed ({})",
                self.flocking.max_speed, self.flocking.min_speed
            )));
        }
        if self.search.max_candidates == 0 {
            return Err(BehaviorError::Config("search.max_candidates must be at least 1".into()));
        }
        if let Some(route) = &self.patrol_route {
            if route.is_empty() {
                return Err(BehaviorError::Config(format!("{} has no waypoints", route.id)));
            }
        }
        Ok(())
    }

    // ── Durations ─────────────────────────────────────────────────────────

    pub fn sighting_memory(&self) -> SimDuration {
        SimDuration::from_secs_f32(self.memory.sighting_secs)
    }

    pub fn scent_memory(&self) -> SimDuration {
        SimDuration::from_secs_f32(self.memory.scent_secs)
    }

    pub fn lose_sight_delay(&self) -> SimDuration {
        SimDuration::from_secs_f32(self.timing.lose_sight_delay)
    }

    pub fn repath_interval(&self) -> SimDuration {
        SimDuration::from_secs_f32(self.timing.repath_interval)
    }

    pub fn investigate_pause(&self) -> SimDuration {
        SimDuration::from_secs_f32(self.timing.investigate_pause)
    }

    pub fn give_up_after(&self) -> SimDuration {
        SimDuration::from_secs_f32(self.timing.give_up_after)
    }

    /// When a search started at `now` gives up, or `None` if it never does.
    pub fn give_up_deadline(&self, now: SimTime) -> Option<SimTime> {
        let after = self.give_up_after();
        (!after.is_zero()).then(|| now + after)
    }

    pub fn alert_cooldown(&self) -> SimDuration {
        SimDuration::from_secs_f32(self.alert.cooldown_secs)
    }
}
