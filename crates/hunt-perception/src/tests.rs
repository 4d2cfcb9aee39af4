//! Unit tests for hunt-perception.

use hunt_core::{Aabb, LayerMask, OdorId, SimDuration, SimRng, SimTime, Vec3};
use hunt_nav::{OpenField, ViewerCamera};

use crate::{
    FrustumWatcher, OdorField, PerceptionEvent, ScentSensor, TrailConfig, TrailEmitter, VisionSensor,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const WALLS: LayerMask = LayerMask::layer(1);

fn secs(s: f32) -> SimTime {
    SimTime::ZERO + SimDuration::from_secs_f32(s)
}

/// Open field with a 3 m tall wall segment spanning x ∈ [-2, 2] at z = 5.
fn walled_field() -> OpenField {
    OpenField::new(Aabb::new(Vec3::splat(-30.0), Vec3::splat(30.0)))
        .with_obstacle(Aabb::new(Vec3::new(-2.0, -30.0, 4.8), Vec3::new(2.0, 3.0, 5.2)), WALLS)
}

fn eyes() -> VisionSensor {
    VisionSensor { range: 12.0, eye_height: 1.6, obstacle_mask: WALLS, field_of_view: None }
}

// ── Vision ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod vision {
    use super::*;

    #[test]
    fn clear_line_in_range_is_a_sighting() {
        let field = walled_field();
        let target = Vec3::new(8.0, 0.0, 0.0);
        let ev = eyes().look(Vec3::ZERO, Vec3::X, target, secs(1.0), &field).unwrap();
        assert_eq!(ev, PerceptionEvent::Sighting { position: target, time: secs(1.0) });
    }

    #[test]
    fn out_of_range_is_not_visible() {
        let field = walled_field();
        assert!(eyes().look(Vec3::ZERO, Vec3::X, Vec3::new(12.5, 0.0, 0.0), SimTime::ZERO, &field).is_none());
    }

    #[test]
    fn wall_blocks_line_of_sight() {
        let field = walled_field();
        assert!(eyes().look(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 10.0), SimTime::ZERO, &field).is_none());
    }

    #[test]
    fn wall_on_unmasked_layer_does_not_block() {
        let field = walled_field();
        let sensor = VisionSensor { obstacle_mask: LayerMask::layer(7), ..eyes() };
        assert!(sensor.look(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 10.0), SimTime::ZERO, &field).is_some());
    }

    #[test]
    fn coincident_target_is_visible() {
        let field = walled_field();
        assert!(eyes().look(Vec3::ONE, Vec3::X, Vec3::ONE, SimTime::ZERO, &field).is_some());
    }

    #[test]
    fn view_cone_rejects_targets_behind() {
        let field = walled_field();
        let sensor = VisionSensor { field_of_view: Some(60.0), ..eyes() };
        let target = Vec3::new(-6.0, 0.0, 0.0);
        assert!(sensor.look(Vec3::ZERO, Vec3::X, target, SimTime::ZERO, &field).is_none());
        assert!(sensor.look(Vec3::ZERO, -Vec3::X, target, SimTime::ZERO, &field).is_some());
    }
}

// ── Frustum watcher ───────────────────────────────────────────────────────────

#[cfg(test)]
mod watcher {
    use super::*;

    fn body() -> Aabb {
        Aabb::from_center_half_extents(Vec3::new(0.0, 1.0, 10.0), Vec3::new(0.4, 1.0, 0.4))
    }

    #[test]
    fn fires_only_on_rising_edge() {
        let field = walled_field();
        let facing = ViewerCamera::looking(Vec3::new(0.0, 1.6, 0.0), Vec3::Z);
        let away = ViewerCamera::looking(Vec3::new(0.0, 1.6, 0.0), -Vec3::Z);
        let mut w = FrustumWatcher::new(SimDuration::from_millis(100));
        let viewer = facing.position;

        assert!(w.observe(&facing, &body(), viewer, secs(0.0), &field).is_some());
        assert!(w.is_visible());
        assert!(w.observe(&facing, &body(), viewer, secs(0.1), &field).is_none());
        assert!(w.observe(&away, &body(), viewer, secs(0.2), &field).is_none());
        assert!(!w.is_visible());
        let again = w.observe(&facing, &body(), viewer, secs(0.3), &field).unwrap();
        assert_eq!(again.position(), viewer);
    }

    #[test]
    fn holds_result_between_checks() {
        let field = walled_field();
        let facing = ViewerCamera::looking(Vec3::new(0.0, 1.6, 0.0), Vec3::Z);
        let away = ViewerCamera::looking(Vec3::new(0.0, 1.6, 0.0), -Vec3::Z);
        let mut w = FrustumWatcher::new(SimDuration::from_millis(100));

        w.observe(&facing, &body(), Vec3::ZERO, secs(0.0), &field);
        // Inside the check interval: no test, level unchanged.
        assert!(w.observe(&away, &body(), Vec3::ZERO, secs(0.05), &field).is_none());
        assert!(w.is_visible());
    }
}

// ── Odor field ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod odor {
    use super::*;

    #[test]
    fn markers_expire_after_lifetime() {
        let mut field = OdorField::new(0.5, SimDuration::from_secs_f32(4.0));
        field.drop_marker(Vec3::ZERO, secs(0.0));
        field.drop_marker(Vec3::X, secs(1.0));
        assert_eq!(field.expire(secs(3.999)), 0);
        assert_eq!(field.expire(secs(4.0)), 1);
        assert_eq!(field.len(), 1);
        assert_eq!(field.markers()[0].id, OdorId(1));
    }

    #[test]
    fn overlap_uses_both_radii() {
        let mut field = OdorField::new(0.5, SimDuration::from_secs_f32(4.0));
        field.drop_marker(Vec3::ZERO, SimTime::ZERO);
        assert_eq!(field.overlapping(Vec3::new(0.9, 0.0, 0.0), 0.5).len(), 1);
        assert!(field.overlapping(Vec3::new(1.1, 0.0, 0.0), 0.5).is_empty());
    }

    #[test]
    fn emitter_waits_for_interval_and_spacing() {
        let mut rng = SimRng::new(7);
        let mut field = TrailConfig::default().make_field();
        let mut trail = TrailEmitter::new(TrailConfig::default(), SimTime::ZERO, &mut rng);

        // Nothing before the first interval (at least 1 s).
        assert!(trail.update(Vec3::ZERO, secs(0.95), &mut field, &mut rng).is_none());
        assert!(trail.update(Vec3::ZERO, secs(2.0), &mut field, &mut rng).is_some());
        assert!((field.markers()[0].position.y - 0.05).abs() < 1e-6);

        // Interval elapsed but the target barely moved.
        assert!(trail.update(Vec3::new(0.5, 0.0, 0.0), secs(4.5), &mut field, &mut rng).is_none());
        assert!(trail.update(Vec3::new(0.8, 0.0, 0.0), secs(4.5), &mut field, &mut rng).is_some());
        assert_eq!(field.len(), 2);
    }

    #[test]
    fn emitter_gap_stays_within_bounds() {
        let mut rng = SimRng::new(99);
        let mut field = TrailConfig::default().make_field();
        let mut trail = TrailEmitter::new(TrailConfig::default(), SimTime::ZERO, &mut rng);
        let mut drops = Vec::new();
        for ms in (0..20_000).step_by(50) {
            let p = Vec3::new(ms as f32 / 100.0, 0.0, 0.0);
            let now = SimTime::from_millis(ms);
            if trail.update(p, now, &mut field, &mut rng).is_some() {
                drops.push(now);
            }
        }
        assert!(drops.len() >= 9);
        for pair in drops.windows(2) {
            let gap = pair[1].since(pair[0]).as_millis();
            assert!((1_000..=2_050).contains(&gap), "gap {gap}");
        }
    }
}

// ── Scent ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scent {
    use super::*;

    #[test]
    fn fires_once_per_enter() {
        let mut field = OdorField::new(0.75, SimDuration::from_secs_f32(4.0));
        field.drop_marker(Vec3::new(3.0, 0.05, 0.0), SimTime::ZERO);
        let mut nose = ScentSensor::new(0.5, SimDuration::from_secs_f32(4.0));

        let near = Vec3::new(2.5, 0.0, 0.0);
        let ev = nose.sense(&field.overlapping(near, nose.reach), secs(1.0)).unwrap();
        assert_eq!(
            ev,
            PerceptionEvent::Scent { position: Vec3::new(3.0, 0.05, 0.0), time: secs(1.0), expires_at: secs(5.0) }
        );
        assert!(nose.sense(&field.overlapping(near, nose.reach), secs(1.05)).is_none());

        // Leave and come back.
        assert!(nose.sense(&field.overlapping(Vec3::ZERO, nose.reach), secs(1.1)).is_none());
        assert_eq!(nose.inside_count(), 0);
        assert!(nose.sense(&field.overlapping(near, nose.reach), secs(1.2)).is_some());
    }

    #[test]
    fn reports_freshest_new_marker() {
        let mut field = OdorField::new(1.0, SimDuration::from_secs_f32(4.0));
        field.drop_marker(Vec3::new(0.5, 0.0, 0.0), secs(0.0));
        field.drop_marker(Vec3::new(-0.5, 0.0, 0.0), secs(1.5));
        let mut nose = ScentSensor::new(0.5, SimDuration::from_secs_f32(4.0));
        let ev = nose.sense(&field.overlapping(Vec3::ZERO, nose.reach), secs(2.0)).unwrap();
        assert_eq!(ev.position(), Vec3::new(-0.5, 0.0, 0.0));
        assert!(!ev.is_sighting());
    }

    #[test]
    fn new_marker_while_inside_another_fires() {
        let mut field = OdorField::new(1.0, SimDuration::from_secs_f32(4.0));
        field.drop_marker(Vec3::ZERO, secs(0.0));
        let mut nose = ScentSensor::new(0.5, SimDuration::from_secs_f32(4.0));
        assert!(nose.sense(&field.overlapping(Vec3::ZERO, 0.5), secs(0.5)).is_some());
        field.drop_marker(Vec3::new(0.3, 0.0, 0.0), secs(1.0));
        let ev = nose.sense(&field.overlapping(Vec3::ZERO, 0.5), secs(1.0)).unwrap();
        assert_eq!(ev.position(), Vec3::new(0.3, 0.0, 0.0));
    }
}
