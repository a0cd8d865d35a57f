//! Canonical flow graph model and edit operations.
//!
//! This module owns the in-memory representation of a flow (nodes and
//! edges with stable opaque identifiers) independent of any wire format,
//! plus the validating edit operations that mutate it.
//!
//! # Core Concepts
//!
//! - **Nodes**: steps bound to a remote handler, addressed by [`NodeId`]
//! - **Edges**: labeled directed transitions, addressed by [`EdgeId`]
//! - **Identity vs. naming**: the graph is the source of truth keyed by
//!   opaque ids; display names only matter at the wire boundary
//!   ([`crate::wire`]), where transitions are addressed by name
//! - **Validation**: every edit checks its preconditions before mutating;
//!   a rejected edit leaves the graph untouched
//!
//! # Quick Start
//!
//! ```rust
//! use routeloom::graph::FlowGraph;
//! use routeloom::handler::Handler;
//! use routeloom::types::ExitLabel;
//!
//! let mut graph = FlowGraph::new("deploy", "infra");
//! let fetch = graph.add_node(Handler::new("infra", "fetch"), None);
//! let build = graph.add_node(Handler::new("infra", "build"), None);
//!
//! let edge = graph.add_edge(&fetch, &build).unwrap();
//! graph.set_edge_label(&edge, ExitLabel::Success).unwrap();
//!
//! // Deleting a node cascades to its incident edges.
//! graph.delete_node(&build).unwrap();
//! assert!(graph.edges().is_empty());
//! ```
//!
//! [`NodeId`]: crate::types::NodeId
//! [`EdgeId`]: crate::types::EdgeId

mod edit;
mod model;


pub use edit::{DEFAULT_NODE_POSITION, EditError};
pub use model::{FlowEdge, FlowGraph, FlowNode, ParameterMapping};
