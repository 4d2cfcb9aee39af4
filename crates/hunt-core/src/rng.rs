//! Deterministic per-agent and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//! Agents never share RNG state, so wander jitter, probe offsets, and patrol
//! start indices are identical whether the intent phase runs on one thread
//! or many.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{AgentId, Vec3};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── Sampling helpers ─────────────────────────────────────────────────────────

fn sample_in_unit_sphere<R: Rng>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0_f32..=1.0),
            rng.gen_range(-1.0_f32..=1.0),
            rng.gen_range(-1.0_f32..=1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

fn sample_on_unit_circle<R: Rng>(rng: &mut R) -> Vec3 {
    let angle = rng.gen_range(0.0_f32..std::f32::consts::TAU);
    Vec3::new(angle.cos(), 0.0, angle.sin())
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
///
/// Create one per agent at simulation init and store it in a parallel
/// `Vec<AgentRng>` next to the agent brains.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform point inside the unit ball (rejection sampled).
    #[inline]
    pub fn in_unit_sphere(&mut self) -> Vec3 {
        sample_in_unit_sphere(&mut self.0)
    }

    /// Uniform unit vector on the ground plane.
    #[inline]
    pub fn on_unit_circle(&mut self) -> Vec3 {
        sample_on_unit_circle(&mut self.0)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for world operations (odor trail timing, demo
/// target movement).
///
/// Used only in the sequential parts of the tick loop.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn in_unit_sphere(&mut self) -> Vec3 {
        sample_in_unit_sphere(&mut self.0)
    }

    #[inline]
    pub fn on_unit_circle(&mut self) -> Vec3 {
        sample_on_unit_circle(&mut self.0)
    }
}
