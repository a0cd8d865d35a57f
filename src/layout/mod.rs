//! Deterministic layered layout for flow graphs.
//!
//! The engine assigns every node a 2-D coordinate from topology and edge
//! labels alone: a pure function of `(nodes, edges, labels)` with no hidden
//! state, so the same graph always lands in the same arrangement.
//!
//! # Algorithm
//!
//! Classic layered (hierarchical) drawing in three passes:
//!
//! 1. **Ranking**: longest path from the source frontier, top to bottom.
//!    Cycles are permitted in the input; a back edge simply stops
//!    contributing to its target's rank instead of looping the pass.
//! 2. **Ordering**: weighted barycenter sweeps within each rank. Success
//!    edges carry more weight than failure edges, so the happy path pulls
//!    itself straight while failure branches take the slack.
//! 3. **Positioning**: fixed rank/node spacing, with a straightening pass
//!    that snaps a node under its sole success predecessor when that does
//!    not crowd its rank.
//!
//! # Recompute policy
//!
//! Layout is recomputed in full whenever the node or edge set (or an edge
//! label) changes. It is never patched incrementally, and never run for
//! coordinate-only changes, so manual drags survive within a session. That
//! policy lives in [`crate::session::FlowSession`]; this module only
//! provides the pure computation.
//!
//! # Examples
//!
//! ```rust
//! use routeloom::graph::FlowGraph;
//! use routeloom::handler::Handler;
//! use routeloom::layout;
//!
//! let mut graph = FlowGraph::new("deploy", "infra");
//! let a = graph.add_node(Handler::new("infra", "fetch"), None);
//! let b = graph.add_node(Handler::new("infra", "build"), None);
//! graph.add_edge(&a, &b).unwrap();
//!
//! let positions = layout::positions(&graph);
//! assert!(positions[&a].y < positions[&b].y);
//! ```

mod engine;

pub use engine::{NODE_SEP, RANK_SEP, assign, positions, ranks};
