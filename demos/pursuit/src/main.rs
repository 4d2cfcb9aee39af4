//! pursuit: smallest end-to-end run of the hunt NPC framework.
//!
//! A walled courtyard holds a four-strong pack (one leader, three
//! followers) and two sentries walking patrol routes.  The target circles
//! the courtyard, dropping a scent trail; the pack wanders until someone
//! spots it or steps on its trail.
//!
//! ```text
//! cargo run -p pursuit -- [agent.json] [routes.csv]
//! RUST_LOG=debug cargo run -p pursuit
//! ```
//!
//! Output lands in `output/pursuit/`.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use log::info;

use hunt_agent::{AgentStoreBuilder, AgentTags};
use hunt_behavior::{AgentConfig, BehaviorState, TargetView};
use hunt_core::{Aabb, AgentId, LayerMask, SimConfig, Tick, Vec3};
use hunt_nav::{NavigationPort, OpenField};
use hunt_output::{CsvWriter, SimOutputObserver};
use hunt_patrol::{PatrolRoute, load_routes_csv, load_routes_reader};
use hunt_sim::{SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                  u64 = 42;
const TICK_MS:               u64 = 50;
const SIM_SECS:              u64 = 120;
const OUTPUT_INTERVAL_TICKS: u64 = 10; // twice a second
const ARENA_HALF:            f32 = 30.0;
const TARGET_ORBIT:          f32 = 22.0;
const TARGET_LAP_SECS:       f32 = 40.0;

const PACK_SIZE: usize = 4;
const SENTRIES:  usize = 2;

// ── Patrol CSV ────────────────────────────────────────────────────────────────

// Sentry 4 loops the north wall, sentry 5 paces the east gate.
const ROUTES_CSV: &str = "\
route_id,seq,x,y,z,mode\n\
0,0,-20.0,0.0,20.0,loop\n\
0,1,20.0,0.0,20.0,loop\n\
0,2,20.0,0.0,12.0,loop\n\
0,3,-20.0,0.0,12.0,loop\n\
1,0,24.0,0.0,-8.0,ping_pong\n\
1,1,24.0,0.0,8.0,ping_pong\n\
";

// ── Observer wrapper to count transitions ─────────────────────────────────────

struct CountingObserver<W: hunt_output::OutputWriter> {
    inner:       SimOutputObserver<W>,
    previous:    Vec<BehaviorState>,
    transitions: usize,
    first_chase: Option<Tick>,
}

impl<W: hunt_output::OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, previous: Vec::new(), transitions: 0, first_chase: None }
    }
}

impl<W: hunt_output::OutputWriter> SimObserver for CountingObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, states: &[BehaviorState]) {
        if !self.previous.is_empty() {
            self.transitions += self.previous.iter().zip(states).filter(|(a, b)| a != b).count();
        }
        if self.first_chase.is_none() && states.contains(&BehaviorState::Chase) {
            self.first_chase = Some(tick);
        }
        self.previous.clear();
        self.previous.extend_from_slice(states);
        self.inner.on_tick_end(tick, states);
    }

    fn on_presentation(&mut self, tick: Tick, now: hunt_core::SimTime, frames: &[hunt_behavior::PresentationFrame]) {
        self.inner.on_presentation(tick, now, frames);
    }

    fn on_agent_warning(&mut self, tick: Tick, warning: &hunt_behavior::AgentWarning) {
        self.inner.on_agent_warning(tick, warning);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<AgentConfig> {
    let Some(path) = path else {
        return Ok(AgentConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: AgentConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn load_routes(path: Option<&Path>) -> Result<Vec<PatrolRoute>> {
    let routes = match path {
        Some(p) => load_routes_csv(p)?,
        None => load_routes_reader(Cursor::new(ROUTES_CSV))?,
    };
    if routes.len() < SENTRIES {
        bail!("need {SENTRIES} patrol routes, found {}", routes.len());
    }
    Ok(routes)
}

fn courtyard() -> OpenField {
    let walls = LayerMask::layer(0);
    OpenField::new(Aabb::new(
        Vec3::new(-ARENA_HALF, 0.0, -ARENA_HALF),
        Vec3::new(ARENA_HALF, 4.0, ARENA_HALF),
    ))
    .with_obstacle(Aabb::new(Vec3::new(-8.0, 0.0, -1.0), Vec3::new(8.0, 3.0, 1.0)), walls)
    .with_obstacle(Aabb::new(Vec3::new(-1.0, 0.0, -18.0), Vec3::new(1.0, 3.0, -6.0)), walls)
}

fn target_at(secs: f32) -> Vec3 {
    let angle = secs / TARGET_LAP_SECS * std::f32::consts::TAU;
    Vec3::new(angle.cos() * TARGET_ORBIT, 0.0, angle.sin() * TARGET_ORBIT)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let base = load_config(args.first().map(PathBuf::as_path))?;
    let routes = load_routes(args.get(1).map(PathBuf::as_path))?;

    // 1. World: pack huddled in the south-west, sentries on their routes.
    let mut field = courtyard();
    for i in 0..PACK_SIZE {
        field.spawn(Vec3::new(-20.0 + i as f32 * 1.5, 0.0, -20.0), Vec3::Z);
    }
    for route in &routes[..SENTRIES] {
        field.spawn(route.waypoint(0), Vec3::X);
    }

    // 2. Roles: the pack relays sightings, sentries only shout.
    let agent_count = PACK_SIZE + SENTRIES;
    let leader = AgentId(0);
    let followers: Vec<AgentId> = (1..PACK_SIZE as u32).map(AgentId).collect();
    let mut builder = AgentStoreBuilder::new(agent_count, SEED).flock(leader, &followers);
    for i in 0..PACK_SIZE {
        builder = builder.tag(AgentId(i as u32), AgentTags::PACK);
    }
    for i in PACK_SIZE..agent_count {
        builder = builder.tag(AgentId(i as u32), AgentTags::ALERT_SENDER);
    }
    let (store, rngs) = builder.build()?;

    // 3. Per-agent configuration.
    let arena = *field.area();
    let configs: Vec<AgentConfig> = (0..agent_count)
        .map(|i| {
            let mut c = base.clone();
            if i == leader.index() {
                c.roam_area = Some(arena);
            }
            if i >= PACK_SIZE {
                c.patrol_route = Some(routes[i - PACK_SIZE].clone());
            }
            c
        })
        .collect();

    let config = SimConfig {
        tick_duration_ms:      TICK_MS,
        total_ticks:           SIM_SECS * 1_000 / TICK_MS,
        seed:                  SEED,
        num_threads:           None,
        output_interval_ticks: OUTPUT_INTERVAL_TICKS,
    };
    info!(
        "pursuit: {agent_count} agents, {} ticks of {TICK_MS} ms, {} patrol routes",
        config.total_ticks,
        routes.len()
    );

    // 4. Build sim.
    let mut sim = SimBuilder::new(config.clone(), store, rngs, field)
        .agent_configs(configs)
        .target(TargetView::at(target_at(0.0)))
        .trail(Default::default())
        .build()?;

    // 5. Output.
    let out_dir = Path::new("output/pursuit");
    let writer = CsvWriter::new(out_dir)?;
    let mut obs = CountingObserver::new(SimOutputObserver::new(writer, config.tick_duration_ms));

    // 6. Run, moving the target between ticks.
    let t0 = Instant::now();
    while sim.clock.current_tick < config.end_tick() {
        sim.move_target(target_at(sim.now().0 as f32 / 1_000.0));
        sim.run_ticks(1, &mut obs)?;
    }
    obs.on_sim_end(sim.clock.current_tick);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        bail!("output error: {e}");
    }

    // 7. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    match obs.first_chase {
        Some(t) => println!("  first chase       : {t} ({})", sim.clock.time_at(t)),
        None => println!("  first chase       : never"),
    }
    println!("  state transitions : {}", obs.transitions);
    println!("  scent markers     : {}", sim.odors.len());
    println!("  warnings          : {}", obs.inner.warnings().len());
    println!("  output            : {}", out_dir.display());
    println!();

    println!("{:<8} {:<12} {:>8} {:>8}", "Agent", "State", "x", "z");
    println!("{}", "-".repeat(40));
    for (i, state) in sim.states.iter().enumerate() {
        let id = AgentId(i as u32);
        let pos = sim.world.agent_state(id).map(|s| s.position).unwrap_or(Vec3::ZERO);
        println!("{:<8} {:<12} {:>8.2} {:>8.2}", i, state, pos.x, pos.z);
    }

    Ok(())
}
