//! `hunt-search`: where to look after the target slips out of sight.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`planner`] | `SearchParams`, `SearchPlanner::build_search_queue`             |
//! | [`queue`]   | `SearchQueue` (finite, front-to-back), `SearchCandidate`        |
//!
//! # Algorithm
//!
//! ```text
//! 1. cover spots: for each obstacle within search_radius of the last known
//!    position, step cover_offset past its nearest face (away from the last
//!    known position), snap to the navmesh, keep if a complete path exists.
//! 2. ring fill:   if short of max_candidates, sample max(needed, 6) evenly
//!    spaced points on a ring of radius clamp(0.6·search_radius, 4, search_radius),
//!    snapped and path-checked the same way.
//! 3. rank:        stable sort by |p − last|² + 0.25·|p − searcher|².
//! 4. truncate:    keep max_candidates; an empty result becomes [last known].
//! ```
//!
//! A queue is never patched.  The state machine consumes it front to back and
//! asks for a fresh one when it runs dry.

pub mod planner;
pub mod queue;


pub use planner::{SearchParams, SearchPlanner};
pub use queue::{CandidateSource, SearchCandidate, SearchQueue};
