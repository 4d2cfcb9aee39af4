//! Integration tests for hunt-sim.

use hunt_agent::{AgentRngs, AgentStore, AgentStoreBuilder, AgentTags};
use hunt_behavior::{AgentConfig, AgentWarning, BehaviorState, PresentationFrame, TargetView, VisionMode};
use hunt_core::geom::flat_distance;
use hunt_core::{Aabb, AgentId, SimConfig, SimTime, Tick, Vec3};
use hunt_nav::{NavigationPort, OpenField};
use hunt_perception::TrailConfig;

use crate::{NoopObserver, Sim, SimBuilder, SimError, SimObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig {
        tick_duration_ms:      50,
        total_ticks,
        seed:                  42,
        num_threads:           Some(1),
        output_interval_ticks: 1,
    }
}

fn arena() -> OpenField {
    OpenField::new(Aabb::new(Vec3::new(-30.0, 0.0, -30.0), Vec3::new(30.0, 4.0, 30.0)))
}

/// A field with one agent spawned per position, facing +z.
fn field_with(positions: &[Vec3]) -> OpenField {
    let mut field = arena();
    for &p in positions {
        field.spawn(p, Vec3::Z);
    }
    field
}

fn pack(n: usize) -> (AgentStore, AgentRngs) {
    AgentStoreBuilder::new(n, 42).tag_all(AgentTags::PACK).build().unwrap()
}

fn short_sighted() -> AgentConfig {
    let mut c = AgentConfig::default();
    c.vision.range = 1.0;
    c
}

/// A sim whose agents stand at `positions`, with the target far away.
fn sim_with(positions: &[Vec3], config: AgentConfig) -> Sim<OpenField> {
    let (store, rngs) = pack(positions.len());
    SimBuilder::new(test_config(100), store, rngs, field_with(positions))
        .agent_config(config)
        .target(TargetView::at(Vec3::new(28.0, 0.0, 28.0)))
        .build()
        .unwrap()
}

fn position(sim: &Sim<OpenField>, agent: u32) -> Vec3 {
    sim.world.agent_state(AgentId(agent)).unwrap().position
}

#[derive(Default)]
struct Recorder {
    starts:   Vec<Tick>,
    states:   Vec<Vec<BehaviorState>>,
    frames:   Vec<(Tick, SimTime, Vec<PresentationFrame>)>,
    warnings: Vec<(Tick, AgentWarning)>,
    finished: Option<Tick>,
}

impl SimObserver for Recorder {
    fn on_tick_start(&mut self, tick: Tick) {
        self.starts.push(tick);
    }

    fn on_tick_end(&mut self, _tick: Tick, states: &[BehaviorState]) {
        self.states.push(states.to_vec());
    }

    fn on_presentation(&mut self, tick: Tick, now: SimTime, frames: &[PresentationFrame]) {
        self.frames.push((tick, now, frames.to_vec()));
    }

    fn on_agent_warning(&mut self, tick: Tick, warning: &AgentWarning) {
        self.warnings.push((tick, *warning));
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.finished = Some(final_tick);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use hunt_nav::NavError;

    use super::*;

    #[test]
    fn builds_successfully_with_defaults() {
        let (store, rngs) = pack(3);
        let field = field_with(&[Vec3::ZERO, Vec3::X, Vec3::Z]);
        let sim = SimBuilder::new(test_config(10), store, rngs, field).build().unwrap();
        assert_eq!(sim.brains.len(), 3);
        assert_eq!(sim.states, vec![BehaviorState::Idle; 3]);
        assert!(sim.target().is_none());
        assert!(sim.odors.is_empty());
    }

    #[test]
    fn rng_count_mismatch_errors() {
        let (store, _) = pack(3);
        let (_, rngs) = pack(2);
        let field = field_with(&[Vec3::ZERO, Vec3::X, Vec3::Z]);
        let err = SimBuilder::new(test_config(10), store, rngs, field).build().err().unwrap();
        assert!(matches!(err, SimError::AgentCountMismatch { expected: 3, got: 2, .. }));
    }

    #[test]
    fn config_count_mismatch_errors() {
        let (store, rngs) = pack(2);
        let field = field_with(&[Vec3::ZERO, Vec3::X]);
        let err = SimBuilder::new(test_config(10), store, rngs, field)
            .agent_configs(vec![AgentConfig::default()])
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::AgentCountMismatch { what: "agent configs", .. }));
    }

    #[test]
    fn unregistered_agent_errors() {
        let (store, rngs) = pack(2);
        let field = field_with(&[Vec3::ZERO]);
        let err = SimBuilder::new(test_config(10), store, rngs, field).build().err().unwrap();
        assert!(matches!(err, SimError::Nav(NavError::UnknownAgent(AgentId(1)))));
    }

    #[test]
    fn invalid_agent_config_errors() {
        let (store, rngs) = pack(1);
        let mut bad = AgentConfig::default();
        bad.speed.wander = -1.0;
        let err = SimBuilder::new(test_config(10), store, rngs, field_with(&[Vec3::ZERO]))
            .agent_config(bad)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Behavior(_)));
    }

    #[test]
    fn zero_tick_length_errors() {
        let (store, rngs) = pack(1);
        let config = SimConfig { tick_duration_ms: 0, ..test_config(10) };
        let err = SimBuilder::new(config, store, rngs, field_with(&[Vec3::ZERO])).build().err().unwrap();
        assert!(matches!(err, SimError::Config(_)));
    }
}

// ── Basic run ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn runs_to_end_tick() {
        let mut sim = sim_with(&[Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)], short_sighted());
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert_eq!(rec.starts.len(), 100);
        assert_eq!(rec.starts[0], Tick(0));
        assert_eq!(rec.finished, Some(Tick(100)));
        assert_eq!(sim.now(), SimTime(5_000));
    }

    #[test]
    fn run_ticks_ignores_end_tick() {
        let mut sim = sim_with(&[Vec3::ZERO], short_sighted());
        sim.run_ticks(150, &mut NoopObserver).unwrap();
        assert_eq!(sim.clock.current_tick, Tick(150));
    }

    #[test]
    fn presentation_every_interval() {
        let (store, rngs) = pack(2);
        let config = SimConfig { output_interval_ticks: 10, ..test_config(30) };
        let mut sim = SimBuilder::new(config, store, rngs, field_with(&[Vec3::ZERO, Vec3::X]))
            .target(TargetView::at(Vec3::new(28.0, 0.0, 28.0)))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        let ticks: Vec<Tick> = rec.frames.iter().map(|f| f.0).collect();
        assert_eq!(ticks, [Tick(0), Tick(10), Tick(20)]);
        assert_eq!(rec.frames[1].1, SimTime(500));
        assert!(rec.frames.iter().all(|f| f.2.len() == 2));
    }

    #[test]
    fn no_target_keeps_everyone_idle() {
        let (store, rngs) = pack(3);
        let field = field_with(&[Vec3::ZERO, Vec3::X, Vec3::Z]);
        let mut sim = SimBuilder::new(test_config(20), store, rngs, field).build().unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert!(rec.states.iter().flatten().all(|&s| s == BehaviorState::Idle));
        assert!(sim.frames.iter().all(|f| f.speed == 0.0 && !f.alert));
        assert_eq!(position(&sim, 0), Vec3::ZERO);
    }

    #[test]
    fn clearing_target_idles_agents() {
        let mut sim = sim_with(&[Vec3::ZERO], AgentConfig::default());
        sim.set_target(Some(TargetView::at(Vec3::new(0.0, 0.0, 10.0))));
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.states[0], BehaviorState::Chase);
        sim.set_target(None);
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.states[0], BehaviorState::Idle);
    }

    #[test]
    fn exactly_one_state_per_agent_every_tick() {
        let mut sim = sim_with(&[Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), Vec3::new(-5.0, 0.0, 5.0)], AgentConfig::default());
        let mut rec = Recorder::default();
        for i in 0..100 {
            let angle = i as f32 * 0.05;
            sim.move_target(Vec3::new(angle.cos() * 20.0, 0.0, angle.sin() * 20.0));
            sim.run_ticks(1, &mut rec).unwrap();
        }
        assert_eq!(rec.states.len(), 100);
        for states in &rec.states {
            assert_eq!(states.len(), 3);
        }
        for (_, _, frames) in &rec.frames {
            assert_eq!(frames.len(), 3);
        }
    }
}

// ── Chase and alerts ──────────────────────────────────────────────────────────

#[cfg(test)]
mod pursuit_tests {
    use super::*;

    #[test]
    fn visible_target_is_chased() {
        let mut sim = sim_with(&[Vec3::ZERO], AgentConfig::default());
        let target = Vec3::new(0.0, 0.0, 10.0);
        sim.set_target(Some(TargetView::at(target)));
        sim.run_ticks(20, &mut NoopObserver).unwrap();
        assert_eq!(sim.states[0], BehaviorState::Chase);
        assert!(sim.frames[0].alert);
        // 1 s at 2.2 m/s.
        let d = flat_distance(position(&sim, 0), target);
        assert!((d - (10.0 - 2.2)).abs() < 0.15, "distance {d}");
    }

    #[test]
    fn sighting_reaches_allies_next_tick() {
        let mut config = AgentConfig::default();
        config.vision.range = 12.0;
        let (store, rngs) = AgentStoreBuilder::new(3, 42)
            .tag(AgentId(0), AgentTags::PACK)
            .tag(AgentId(1), AgentTags::PACK)
            .build()
            .unwrap();
        // Agent 0 sees the target; 1 and 2 are just out of range.
        let field = field_with(&[Vec3::ZERO, Vec3::new(-5.0, 0.0, -1.0), Vec3::new(5.0, 0.0, -1.0)]);
        let mut sim = SimBuilder::new(test_config(100), store, rngs, field)
            .agent_config(config)
            .target(TargetView::at(Vec3::new(0.0, 0.0, 10.0)))
            .build()
            .unwrap();

        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.states, [BehaviorState::Chase, BehaviorState::Wander, BehaviorState::Wander]);
        assert_eq!(sim.alerts.pending(AgentId(1)), 1);
        assert_eq!(sim.alerts.pending(AgentId(2)), 0, "untagged agents get nothing");

        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.states[1], BehaviorState::Chase);
        assert_eq!(sim.states[2], BehaviorState::Wander);
        // Agent 0 still sees the target but is cooling down.
        assert_eq!(sim.alerts.pending(AgentId(1)), 0);
    }

    #[test]
    fn broadcast_respects_cooldown() {
        let (store, rngs) = pack(2);
        let field = field_with(&[Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)]);
        let mut sim = SimBuilder::new(test_config(100), store, rngs, field)
            .target(TargetView::at(Vec3::new(0.0, 0.0, 10.0)))
            .build()
            .unwrap();

        // Both see the target each tick; each may relay once per 2 s.
        let mut delivered = 0;
        for _ in 0..20 {
            sim.run_ticks(1, &mut NoopObserver).unwrap();
            delivered += sim.alerts.pending(AgentId(0)) + sim.alerts.pending(AgentId(1));
        }
        assert_eq!(delivered, 2);
        assert!(sim.alerts.is_cooling_down(AgentId(0), sim.now()));
    }

    #[test]
    fn off_navmesh_agent_warns_once() {
        let (store, rngs) = pack(2);
        let field = field_with(&[Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0)]);
        let mut sim = SimBuilder::new(test_config(40), store, rngs, field)
            .target(TargetView::at(Vec3::new(0.0, 0.0, 10.0)))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert_eq!(rec.warnings, vec![(Tick(0), AgentWarning::NavigationUnavailable(AgentId(1)))]);
        assert_eq!(sim.states[1], BehaviorState::Wander);
        assert_eq!(position(&sim, 1).x, 100.0);
    }
}

// ── Odors ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod odor_tests {
    use super::*;

    #[test]
    fn marker_under_agent_starts_search() {
        let mut sim = sim_with(&[Vec3::new(-10.0, 0.0, 0.0)], short_sighted());
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.states[0], BehaviorState::Wander);

        let spot = position(&sim, 0);
        let now = sim.now();
        sim.odors.drop_marker(spot, now);
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.states[0], BehaviorState::Investigate);
        assert_eq!(sim.brain(AgentId(0)).search_origin(), Some(spot));
    }

    #[test]
    fn moving_target_leaves_a_trail() {
        let (store, rngs) = pack(1);
        let mut sim = SimBuilder::new(test_config(100), store, rngs, field_with(&[Vec3::new(20.0, 0.0, 20.0)]))
            .agent_config(short_sighted())
            .target(TargetView::at(Vec3::new(-20.0, 0.0, 0.0)))
            .trail(TrailConfig::default())
            .build()
            .unwrap();
        for i in 0..60 {
            sim.move_target(Vec3::new(-20.0 + i as f32 * 0.1, 0.0, 0.0));
            sim.run_ticks(1, &mut NoopObserver).unwrap();
        }
        assert!(!sim.odors.is_empty());
        assert!(sim.odors.markers().iter().all(|m| m.position.z.abs() < 1e-3 && m.position.x < -14.0));
    }

    #[test]
    fn markers_expire() {
        let mut sim = sim_with(&[Vec3::new(-10.0, 0.0, 0.0)], short_sighted());
        sim.odors.drop_marker(Vec3::new(10.0, 0.0, 10.0), SimTime::ZERO);
        sim.run_ticks(80, &mut NoopObserver).unwrap();
        assert_eq!(sim.odors.len(), 1);
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert!(sim.odors.is_empty());
    }

    #[test]
    fn frustum_agents_still_follow_scent() {
        let mut config = AgentConfig::default();
        config.vision.mode = VisionMode::ViewerFrustum;
        // The target has no camera, so vision never fires.
        let mut sim = sim_with(&[Vec3::ZERO], config);
        sim.set_target(Some(TargetView::at(Vec3::new(0.0, 0.0, 2.0))));
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.states[0], BehaviorState::Wander);

        let now = sim.now();
        sim.odors.drop_marker(position(&sim, 0), now);
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.states[0], BehaviorState::Investigate);
    }
}

// ── Snapshot queries ──────────────────────────────────────────────────────────

#[cfg(test)]
mod snapshot_tests {
    use hunt_nav::{AgentFilter, AgentOverlap};

    use crate::WorldSnapshot;

    use super::*;

    fn flock_world() -> (OpenField, AgentStore) {
        let field = field_with(&[
            Vec3::ZERO,                  // 0: leader
            Vec3::new(1.0, 0.0, 0.0),    // 1: follower
            Vec3::new(0.0, 0.0, 2.0),    // 2: follower
            Vec3::new(10.0, 0.0, 0.0),   // 3: follower, far
            Vec3::new(1.0, 0.0, 1.0),    // 4: solo
        ]);
        let (store, _) = AgentStoreBuilder::new(5, 42)
            .flock(AgentId(0), &[AgentId(1), AgentId(2), AgentId(3)])
            .tag(AgentId(2), AgentTags::ALERT_RECIPIENT)
            .tag(AgentId(4), AgentTags::ALERT_RECIPIENT)
            .build()
            .unwrap();
        (field, store)
    }

    #[test]
    fn flock_neighbors_skip_self_leader_and_strangers() {
        let (field, store) = flock_world();
        let snap = WorldSnapshot::capture(&field, &store).unwrap();
        let ids: Vec<AgentId> = snap.flock_neighbors(AgentId(1), 3.0, &store).iter().map(|m| m.id).collect();
        assert_eq!(ids, [AgentId(2)]);
        assert!(snap.flock_neighbors(AgentId(4), 3.0, &store).is_empty());
    }

    #[test]
    fn overlap_is_sorted_and_filtered() {
        let (field, store) = flock_world();
        let snap = WorldSnapshot::capture(&field, &store).unwrap();
        assert_eq!(snap.within(Vec3::ZERO, 2.5), [AgentId(0), AgentId(1), AgentId(2), AgentId(4)]);

        let filter = AgentFilter::tagged(AgentTags::ALERT_RECIPIENT).excluding(AgentId(4));
        assert_eq!(snap.overlap_sphere(Vec3::ZERO, 20.0, &filter), [AgentId(2)]);
    }

    #[test]
    fn member_mirrors_state() {
        let (field, store) = flock_world();
        let snap = WorldSnapshot::capture(&field, &store).unwrap();
        let m = snap.member(AgentId(3));
        assert_eq!(m.position, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(m.forward, Vec3::Z);
        assert_eq!(snap.states().len(), 5);
    }
}

// ── Determinism ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod determinism_tests {
    use super::*;

    fn scenario() -> Sim<OpenField> {
        let positions = [
            Vec3::new(-10.0, 0.0, -10.0),
            Vec3::new(-8.0, 0.0, -10.0),
            Vec3::new(-9.0, 0.0, -8.0),
            Vec3::new(12.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, 15.0),
        ];
        let (store, rngs) = AgentStoreBuilder::new(positions.len(), 7)
            .tag_all(AgentTags::PACK)
            .flock(AgentId(0), &[AgentId(1), AgentId(2)])
            .build()
            .unwrap();
        let mut config = AgentConfig::default();
        config.vision.range = 10.0;
        let field = field_with(&positions).with_obstacle(
            Aabb::new(Vec3::new(2.0, 0.0, 2.0), Vec3::new(4.0, 3.0, 6.0)),
            hunt_core::LayerMask::ALL,
        );
        SimBuilder::new(test_config(300), store, rngs, field)
            .agent_config(config)
            .target(TargetView::at(Vec3::ZERO))
            .trail(TrailConfig::default())
            .build()
            .unwrap()
    }

    fn drive(sim: &mut Sim<OpenField>) -> Vec<(Vec<BehaviorState>, Vec<Vec3>)> {
        let mut trace = Vec::new();
        for i in 0..300 {
            let t = i as f32 * 0.02;
            sim.move_target(Vec3::new(t.cos() * 12.0, 0.0, t.sin() * 12.0));
            sim.run_ticks(1, &mut NoopObserver).unwrap();
            let positions = (0..5).map(|a| position(sim, a)).collect();
            trace.push((sim.states.clone(), positions));
        }
        trace
    }

    #[test]
    fn same_seed_same_run() {
        let a = drive(&mut scenario());
        let b = drive(&mut scenario());
        assert_eq!(a, b);
    }
}
