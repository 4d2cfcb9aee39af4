//! Unit tests for hunt-steering.

use hunt_core::{Aabb, AgentId, AgentRng, SimDuration, SimTime, Vec3};
use hunt_nav::{NavAgentState, NavMeshQuery, OpenField};

use crate::{
    DestinationThrottle, FlockMember, FlockSteering, FlockingParams, LeaderRoam, RoamParams, WanderParams,
    WanderState,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn member(id: u32, position: Vec3, velocity: Vec3, forward: Vec3) -> FlockMember {
    FlockMember { id: AgentId(id), position, velocity, forward }
}

fn still(id: u32, position: Vec3, forward: Vec3) -> FlockMember {
    member(id, position, Vec3::ZERO, forward)
}

fn rng(seed: u64) -> AgentRng {
    AgentRng::new(seed, AgentId(1))
}

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

struct NoNavmesh;

impl NavMeshQuery for NoNavmesh {
    fn sample_navigable(&self, _point: Vec3, _radius: f32) -> Option<Vec3> {
        None
    }
    fn path_is_complete(&self, _from: Vec3, _to: Vec3) -> bool {
        false
    }
}

// ── Flocking ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod flocking {
    use super::*;

    #[test]
    fn isolated_agent_follows_wander_heading() {
        let me = still(1, Vec3::new(2.0, 0.0, 3.0), Vec3::X);
        let mut steer = FlockSteering::new();
        let mut r = rng(5);
        let h = steer
            .compute_desired_heading(&me, &[], None, &FlockingParams::default(), &WanderParams::default(), SimTime::ZERO, &mut r)
            .unwrap();
        let wander = steer.wander.heading_from(me.position).unwrap();
        assert!(approx(h, wander));
        assert!((h.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn isolated_agent_never_stalls() {
        let params = FlockingParams::default();
        let wander = WanderParams::default();
        let mut steer = FlockSteering::new();
        let mut r = rng(11);
        let mut me = still(1, Vec3::ZERO, Vec3::Z);
        for ms in (0..10_000).step_by(50) {
            let h = steer
                .compute_desired_heading(&me, &[], None, &params, &wander, SimTime::from_millis(ms), &mut r)
                .expect("wander keeps the agent motivated");
            assert!(h.length_squared() > 0.99);
            me.position += h * 0.1;
            me.forward = h;
        }
    }

    #[test]
    fn out_of_radius_neighbors_do_not_count() {
        let me = still(1, Vec3::ZERO, Vec3::Z);
        let far = still(2, Vec3::new(10.0, 0.0, 0.0), Vec3::X);
        let params = FlockingParams::default();
        let wander = WanderParams::default();

        let mut a = FlockSteering::new();
        let mut b = FlockSteering::new();
        let ha = a.compute_desired_heading(&me, &[far], None, &params, &wander, SimTime::ZERO, &mut rng(3));
        let hb = b.compute_desired_heading(&me, &[], None, &params, &wander, SimTime::ZERO, &mut rng(3));
        assert_eq!(ha, hb);
    }

    #[test]
    fn self_and_leader_are_not_neighbors() {
        let me = still(1, Vec3::ZERO, Vec3::Z);
        let leader = still(0, Vec3::new(1.0, 0.0, 0.0), Vec3::X);
        let params = FlockingParams::default();
        let wander = WanderParams::default();

        let mut a = FlockSteering::new();
        let mut b = FlockSteering::new();
        let ha = a.compute_desired_heading(&me, &[me, leader], Some(&leader), &params, &wander, SimTime::ZERO, &mut rng(8));
        let hb = b.compute_desired_heading(&me, &[], Some(&leader), &params, &wander, SimTime::ZERO, &mut rng(8));
        assert_eq!(ha, hb);
    }

    #[test]
    fn close_neighbor_pushes_away() {
        let me = still(1, Vec3::ZERO, Vec3::Z);
        let n = still(2, Vec3::new(0.5, 0.0, 0.0), Vec3::Z);
        let h = FlockSteering::new()
            .compute_desired_heading(&me, &[n], None, &FlockingParams::default(), &WanderParams::default(), SimTime::ZERO, &mut rng(1))
            .unwrap();
        // cohesion +x (1.0), separation −x (1.2), alignment +z (1.0).
        assert!(approx(h, Vec3::new(-0.2, 0.0, 1.0).normalize()));
    }

    #[test]
    fn moving_neighbor_aligns_by_velocity() {
        let me = still(1, Vec3::ZERO, Vec3::Z);
        let left = member(2, Vec3::new(-2.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0), Vec3::Z);
        let right = member(3, Vec3::new(2.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), -Vec3::Z);
        let h = FlockSteering::new()
            .compute_desired_heading(&me, &[left, right], None, &FlockingParams::default(), &WanderParams::default(), SimTime::ZERO, &mut rng(1))
            .unwrap();
        assert!(approx(h, Vec3::X));
    }

    #[test]
    fn balanced_flock_without_leader_has_no_motivation() {
        let me = still(1, Vec3::ZERO, Vec3::Z);
        let left = still(2, Vec3::new(-2.0, 0.0, 0.0), Vec3::Z);
        let right = still(3, Vec3::new(2.0, 0.0, 0.0), -Vec3::Z);
        let h = FlockSteering::new().compute_desired_heading(
            &me,
            &[left, right],
            None,
            &FlockingParams::default(),
            &WanderParams::default(),
            SimTime::ZERO,
            &mut rng(1),
        );
        assert!(h.is_none());
    }

    #[test]
    fn distant_leader_pulls_at_full_strength() {
        let me = still(1, Vec3::ZERO, Vec3::Z);
        let left = still(2, Vec3::new(-2.0, 0.0, 0.0), Vec3::Z);
        let right = still(3, Vec3::new(2.0, 0.0, 0.0), -Vec3::Z);
        let leader = still(0, Vec3::new(0.0, 0.0, 18.0), Vec3::X);
        let h = FlockSteering::new()
            .compute_desired_heading(&me, &[left, right], Some(&leader), &FlockingParams::default(), &WanderParams::default(), SimTime::ZERO, &mut rng(1))
            .unwrap();
        // attraction 1.2 toward +z, stationary leader → half-weight facing term 0.3 along +x.
        assert!(approx(h, Vec3::new(0.3, 0.0, 1.2).normalize()));
    }

    #[test]
    fn leader_pull_profile() {
        let p = FlockingParams::default();
        assert_eq!(p.leader_pull(3.0), 0.2);
        assert_eq!(p.leader_pull(6.0), 0.2);
        assert!((p.leader_pull(12.0) - 0.5).abs() < 1e-6);
        assert_eq!(p.leader_pull(18.0), 1.0);
        assert_eq!(p.leader_pull(40.0), 1.0);
    }

    #[test]
    fn cruise_speed_within_bounds() {
        let p = FlockingParams::default();
        let mut r = rng(2);
        for _ in 0..100 {
            let s = p.draw_cruise_speed(&mut r);
            assert!((p.min_speed..=p.max_speed).contains(&s));
        }
    }
}

// ── Wander ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod wander {
    use super::*;

    #[test]
    fn target_lies_on_circle_ahead() {
        let params = WanderParams::default();
        let mut w = WanderState::new();
        let pos = Vec3::new(1.0, 0.0, 1.0);
        let t = w.update(pos, Vec3::X, SimTime::ZERO, &params, &mut rng(4));
        let center = pos + Vec3::X * params.circle_distance;
        assert!(((t - center).length() - params.circle_radius).abs() < 1e-4);
    }

    #[test]
    fn target_held_until_interval() {
        let params = WanderParams::default();
        let mut w = WanderState::new();
        let mut r = rng(4);
        let first = w.update(Vec3::ZERO, Vec3::Z, SimTime::ZERO, &params, &mut r);
        let held = w.update(Vec3::ZERO, Vec3::Z, SimTime::from_millis(300), &params, &mut r);
        assert_eq!(first, held);
        let moved = w.update(Vec3::ZERO, Vec3::Z, SimTime::from_millis(350), &params, &mut r);
        assert_ne!(first, moved);
        assert_eq!(w.current_target(), Some(moved));
    }

    #[test]
    fn reaching_target_resamples_early() {
        let params = WanderParams::default();
        let mut w = WanderState::new();
        let mut r = rng(9);
        let first = w.update(Vec3::ZERO, Vec3::Z, SimTime::ZERO, &params, &mut r);
        let next = w.update(first, Vec3::Z, SimTime::from_millis(50), &params, &mut r);
        assert_ne!(first, next);
    }
}

// ── Leader roaming ────────────────────────────────────────────────────────────

#[cfg(test)]
mod roam {
    use super::*;

    fn area() -> Aabb {
        Aabb::new(Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 0.0, 10.0))
    }

    #[test]
    fn picks_on_first_call_then_waits() {
        let field = OpenField::new(Aabb::new(Vec3::new(-20.0, 0.0, -20.0), Vec3::new(20.0, 2.0, 20.0)));
        let params = RoamParams::default();
        let mut roam = LeaderRoam::new();
        let mut r = rng(6);

        let mut state = NavAgentState::idle_at(Vec3::ZERO, Vec3::Z);
        let p = roam.update(Some(&area()), &state, SimTime::ZERO, &params, &field, &mut r).unwrap();
        assert!(area().expanded(0.01).contains_flat(p));

        state.remaining_distance = 5.0;
        state.has_path = true;
        assert!(roam.update(Some(&area()), &state, SimTime::from_millis(1_000), &params, &field, &mut r).is_none());
        assert!(roam.update(Some(&area()), &state, SimTime::from_millis(3_000), &params, &field, &mut r).is_some());

        state.remaining_distance = 0.5;
        assert!(roam.update(Some(&area()), &state, SimTime::from_millis(3_050), &params, &field, &mut r).is_some());
    }

    #[test]
    fn pending_path_defers_pick() {
        let field = OpenField::new(Aabb::new(Vec3::new(-20.0, 0.0, -20.0), Vec3::new(20.0, 2.0, 20.0)));
        let mut state = NavAgentState::idle_at(Vec3::ZERO, Vec3::Z);
        state.path_pending = true;
        let mut roam = LeaderRoam::new();
        assert!(roam.update(None, &state, SimTime::ZERO, &RoamParams::default(), &field, &mut rng(1)).is_none());
    }

    #[test]
    fn no_navmesh_holds_position() {
        let origin = Vec3::new(3.0, 0.0, -2.0);
        let state = NavAgentState::idle_at(origin, Vec3::Z);
        let mut roam = LeaderRoam::new();
        let p = roam.update(None, &state, SimTime::ZERO, &RoamParams::default(), &NoNavmesh, &mut rng(1));
        assert_eq!(p, Some(origin));
    }
}

// ── Throttle ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod throttle {
    use super::*;

    fn travelling(dest: Vec3, remaining: f32) -> NavAgentState {
        NavAgentState {
            destination: Some(dest),
            has_path: true,
            remaining_distance: remaining,
            ..NavAgentState::idle_at(Vec3::ZERO, Vec3::Z)
        }
    }

    #[test]
    fn reissues_without_path() {
        let t = DestinationThrottle::default();
        assert!(t.allows(&NavAgentState::idle_at(Vec3::ZERO, Vec3::Z), Vec3::X));
    }

    #[test]
    fn suppresses_small_changes() {
        let t = DestinationThrottle::default();
        let s = travelling(Vec3::new(5.0, 0.0, 0.0), 5.0);
        assert!(!t.allows(&s, Vec3::new(5.4, 0.0, 0.0)));
        assert!(t.allows(&s, Vec3::new(5.6, 0.0, 0.0)));
    }

    #[test]
    fn reissues_near_arrival() {
        let t = DestinationThrottle::default();
        let s = travelling(Vec3::new(5.0, 0.0, 0.0), 0.1);
        assert!(t.allows(&s, Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn wander_interval_is_millisecond_exact() {
        assert_eq!(SimDuration::from_secs_f32(WanderParams::default().interval).as_millis(), 350);
    }
}
