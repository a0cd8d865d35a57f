//! Live run ("trip") records and the execution event correlator.
//!
//! One execution of a flow is a *trip*: the service streams back one event
//! per completed step, carrying the outcome label and a state snapshot.
//! Delivery is unordered and duplicate-prone, so the raw stream is not
//! directly renderable. This module reduces it into a stable view:
//!
//! - [`TripEvent`] / [`Trip`]: the wire-stable run records
//! - [`TripView`]: the pure reducer: deduplicated events sorted by
//!   timestamp, a merged cumulative state snapshot, and the set of
//!   positions that have fired
//! - [`TripCorrelator`]: the per-run Idle -> Subscribed -> Closed state
//!   machine, with generation tokens so a stale subscription can never
//!   bleed into the next run's view
//! - [`TripWatcher`]: the background task bridging a server stream into
//!   the correlator
//!
//! # Reduction guarantees
//!
//! Re-delivering an event with a known identity replaces the prior entry;
//! the merged state is recomputed from the full deduplicated set on every
//! change rather than appended to. Any permutation of the same deliveries
//! therefore produces the same view.
//!
//! # Examples
//!
//! ```rust
//! use routeloom::trip::{TripEvent, TripView};
//! use serde_json::json;
//!
//! let mut view = TripView::default();
//! view.apply(TripEvent::new("1", "r1", "fetch", 100).with_state("x", json!("1")));
//! view.apply(TripEvent::new("2", "r1", "build", 50).with_state("x", json!("2")));
//!
//! // Sorted ascending by timestamp; the later snapshot wins the merge.
//! assert_eq!(view.events()[0].position, "build");
//! assert_eq!(view.merged_state()["x"], json!("1"));
//! assert!(view.has_fired("fetch") && view.has_fired("build"));
//! ```

mod correlator;
mod event;
mod view;
mod watcher;

pub use correlator::{TripCorrelator, WatchPhase};
pub use event::{Entity, EventKey, Trip, TripEvent, TripStatus};
pub use view::TripView;
pub use watcher::TripWatcher;
