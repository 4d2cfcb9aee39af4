//! `hunt-patrol`: waypoint patrols.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                       |
//! |------------|----------------------------------------------------------------|
//! | [`route`]  | `PatrolMode` (`Loop`, `PingPong`), `PatrolRoute`               |
//! | [`cursor`] | `PatrolParams`, `PatrolCursor` (arrival, stuck, skip logic)    |
//! | [`loader`] | `load_routes_csv`, `load_routes_reader`                        |
//! | [`error`]  | `PatrolError`, `PatrolResult<T>`                               |
//!
//! A route is shared, immutable data.  Each patrolling agent owns a
//! `PatrolCursor` that remembers where along the route it is.

pub mod cursor;
pub mod error;
pub mod loader;
pub mod route;


pub use cursor::{PatrolCursor, PatrolParams};
pub use error::{PatrolError, PatrolResult};
pub use loader::{load_routes_csv, load_routes_reader};
pub use route::{PatrolMode, PatrolRoute};
