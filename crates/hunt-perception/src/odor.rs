//! Odor markers left behind by the target.
//!
//! The target drops a marker every 1–2 s once it has moved far enough from
//! the previous drop.  Markers are spherical trigger zones that vanish after
//! a fixed lifetime; agents detect them through [`ScentSensor`](crate::ScentSensor).

use log::trace;

use hunt_core::{OdorId, SimDuration, SimRng, SimTime, Vec3};

// ── OdorMarker ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OdorMarker {
    pub id:         OdorId,
    pub position:   Vec3,
    pub radius:     f32,
    pub dropped_at: SimTime,
    /// Exclusive: the marker is gone at this instant.
    pub expires_at: SimTime,
}

// ── OdorField ─────────────────────────────────────────────────────────────────

/// Live odor markers, oldest first.
#[derive(Clone, Debug)]
pub struct OdorField {
    markers:  Vec<OdorMarker>,
    next_id:  u32,
    radius:   f32,
    lifetime: SimDuration,
}

impl OdorField {
    pub fn new(radius: f32, lifetime: SimDuration) -> Self {
        Self { markers: Vec::new(), next_id: 0, radius, lifetime }
    }

    /// Place a marker at `position` and return its id.
    pub fn drop_marker(&mut self, position: Vec3, now: SimTime) -> OdorId {
        let id = OdorId(self.next_id);
        self.next_id += 1;
        self.markers.push(OdorMarker {
            id,
            position,
            radius: self.radius,
            dropped_at: now,
            expires_at: now + self.lifetime,
        });
        id
    }

    /// Remove markers whose lifetime has ended.  Returns how many were removed.
    pub fn expire(&mut self, now: SimTime) -> usize {
        let before = self.markers.len();
        self.markers.retain(|m| now < m.expires_at);
        before - self.markers.len()
    }

    /// Markers whose trigger sphere touches a sensor sphere of radius `reach`
    /// centered on `point`.
    pub fn overlapping(&self, point: Vec3, reach: f32) -> Vec<OdorMarker> {
        self.markers
            .iter()
            .filter(|m| {
                let r = m.radius + reach;
                (m.position - point).length_squared() <= r * r
            })
            .copied()
            .collect()
    }

    pub fn markers(&self) -> &[OdorMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

// ── TrailConfig ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrailConfig {
    /// Shortest gap between drops, seconds.
    pub min_interval:  f32,
    /// Longest gap between drops, seconds.
    pub max_interval:  f32,
    /// Distance the target must cover after a drop before the next one.
    pub min_spacing:   f32,
    /// Vertical offset of a marker above the target's feet.
    pub drop_offset_y: f32,
    pub marker_radius: f32,
    /// Seconds a marker stays detectable.
    pub lifetime:      f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            min_interval:  1.0,
            max_interval:  2.0,
            min_spacing:   0.75,
            drop_offset_y: 0.05,
            marker_radius: 0.75,
            lifetime:      4.0,
        }
    }
}

impl TrailConfig {
    pub fn make_field(&self) -> OdorField {
        OdorField::new(self.marker_radius, SimDuration::from_secs_f32(self.lifetime))
    }
}

// ── TrailEmitter ──────────────────────────────────────────────────────────────

/// Drops odor markers behind a moving target.
#[derive(Clone, Debug)]
pub struct TrailEmitter {
    config:    TrailConfig,
    next_drop: SimTime,
    last_drop: Option<Vec3>,
}

impl TrailEmitter {
    pub fn new(config: TrailConfig, now: SimTime, rng: &mut SimRng) -> Self {
        let mut emitter = Self { config, next_drop: now, last_drop: None };
        emitter.schedule_next(now, rng);
        emitter
    }

    /// Drop a marker if the interval has elapsed and the target has moved
    /// at least `min_spacing` since the previous drop.
    pub fn update(
        &mut self,
        position: Vec3,
        now:      SimTime,
        field:    &mut OdorField,
        rng:      &mut SimRng,
    ) -> Option<OdorId> {
        if now < self.next_drop {
            return None;
        }
        let spacing_sq = self.config.min_spacing * self.config.min_spacing;
        if self.last_drop.is_some_and(|last| (position - last).length_squared() < spacing_sq) {
            return None;
        }

        let id = field.drop_marker(position + Vec3::Y * self.config.drop_offset_y, now);
        trace!("odor marker {id} dropped at {position}");
        self.last_drop = Some(position);
        self.schedule_next(now, rng);
        Some(id)
    }

    fn schedule_next(&mut self, now: SimTime, rng: &mut SimRng) {
        let lo = self.config.min_interval.max(0.0);
        let hi = self.config.max_interval.max(lo);
        let gap = if hi > lo { rng.gen_range(lo..hi) } else { lo };
        self.next_drop = now + SimDuration::from_secs_f32(gap);
    }
}
