//! "Seen by the viewer" perception for agents that react to being looked at.

use hunt_core::{Aabb, SimDuration, SimTime, Vec3};
use hunt_nav::{SpatialQuery, ViewerCamera};

use crate::PerceptionEvent;

/// Edge-triggered frustum test.
///
/// Reports a `Sighting` only on the transition from not-visible to visible.
/// The test runs at most once per `check_interval`; between checks the last
/// result is held.
#[derive(Clone, Debug)]
pub struct FrustumWatcher {
    check_interval: SimDuration,
    next_check:     SimTime,
    visible:        bool,
}

impl FrustumWatcher {
    pub fn new(check_interval: SimDuration) -> Self {
        Self { check_interval, next_check: SimTime::ZERO, visible: false }
    }

    /// Level state from the most recent check.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Test `bounds` against `camera`.  `target` is the position reported in
    /// the sighting, normally where the viewer stands.
    pub fn observe(
        &mut self,
        camera:  &ViewerCamera,
        bounds:  &Aabb,
        target:  Vec3,
        now:     SimTime,
        spatial: &dyn SpatialQuery,
    ) -> Option<PerceptionEvent> {
        if now < self.next_check {
            return None;
        }
        self.next_check = now + self.check_interval;

        let now_visible = spatial.frustum_intersects(camera, bounds) && camera.is_in_front(bounds.center());
        let rising = now_visible && !self.visible;
        self.visible = now_visible;

        rising.then_some(PerceptionEvent::Sighting { position: target, time: now })
    }
}
