//! CSV patrol route loader.
//!
//! # CSV format
//!
//! One row per waypoint.  Rows of one route may appear in any order; `seq`
//! fixes the visiting order.  Every row of a route must name the same mode.
//!
//! ```csv
//! route_id,seq,x,y,z,mode
//! 0,0,-10.0,0.0,-10.0,loop
//! 0,1,10.0,0.0,-10.0,loop
//! 0,2,10.0,0.0,10.0,loop
//! 1,0,0.0,0.0,5.0,ping_pong
//! 1,1,0.0,0.0,15.0,ping_pong
//! ```
//!
//! **`mode`** field: `loop`, or `ping_pong` (also accepted: `pingpong`).

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use hunt_core::{RouteId, Vec3};

use crate::{PatrolError, PatrolMode, PatrolResult, PatrolRoute};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RouteRecord {
    route_id: u16,
    seq:      u32,
    x:        f32,
    y:        f32,
    z:        f32,
    mode:     String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every route in a CSV file, ascending by route id.
pub fn load_routes_csv(path: &Path) -> PatrolResult<Vec<PatrolRoute>> {
    let file = std::fs::File::open(path).map_err(PatrolError::Io)?;
    load_routes_reader(file)
}

/// Like [`load_routes_csv`] but accepts any `Read` source.
pub fn load_routes_reader<R: Read>(reader: R) -> PatrolResult<Vec<PatrolRoute>> {
    // ── Parse CSV rows ────────────────────────────────────────────────────
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_route: BTreeMap<u16, (PatrolMode, Vec<(u32, Vec3)>)> = BTreeMap::new();

    for result in csv_reader.deserialize::<RouteRecord>() {
        let row = result.map_err(|e| PatrolError::Parse(e.to_string()))?;
        let mode = parse_mode(&row.mode)?;
        let (route_mode, points) = by_route.entry(row.route_id).or_insert((mode, Vec::new()));
        if *route_mode != mode {
            return Err(PatrolError::Parse(format!(
                "route {} mixes modes {route_mode:?} and {mode:?}",
                row.route_id
            )));
        }
        points.push((row.seq, Vec3::new(row.x, row.y, row.z)));
    }

    // ── Build one PatrolRoute per id ──────────────────────────────────────
    by_route
        .into_iter()
        .map(|(id, (mode, mut points))| {
            points.sort_by_key(|&(seq, _)| seq);
            if let Some(w) = points.windows(2).find(|w| w[0].0 == w[1].0) {
                return Err(PatrolError::Parse(format!("route {id} repeats seq {}", w[0].0)));
            }
            PatrolRoute::new(RouteId(id), points.into_iter().map(|(_, p)| p).collect(), mode)
        })
        .collect()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_mode(s: &str) -> PatrolResult<PatrolMode> {
    match s.trim().to_ascii_lowercase().as_str() {
        "loop" => Ok(PatrolMode::Loop),
        "ping_pong" | "pingpong" => Ok(PatrolMode::PingPong),
        other => Err(PatrolError::Parse(format!(
            "invalid mode {other:?}: expected \"loop\" or \"ping_pong\""
        ))),
    }
}
