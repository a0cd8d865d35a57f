//! Constructors for the crate's standard map types.

use rustc_hash::FxHashMap;
use serde_json::Value;

/// Creates an empty state map of the shape carried by trip events.
///
/// Spares callers the turbofish when seeding initial run state or building
/// event snapshots in tests.
#[must_use]
pub fn new_state_map() -> FxHashMap<String, Value> {
    FxHashMap::default()
}
