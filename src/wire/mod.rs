//! Wire route format and the bidirectional graph adapter.
//!
//! The remote service persists a flow as a *route*: a flat list of
//! positions plus transitions addressed by **position name**, with no
//! concept of the client's opaque ids. This module owns both the serde
//! types for that persisted shape ([`Route`], [`RoutePosition`],
//! [`RouteTransition`]) and the lossless mapping between it and the
//! canonical id-keyed [`FlowGraph`](crate::graph::FlowGraph).
//!
//! # Degradation, not invention
//!
//! A transition naming a position absent from the route is a
//! data-integrity error in the source. The adapter never invents a node
//! for it: the edge is dropped, a [`WireWarning`] is returned, and the
//! rest of the route still decodes so the user can view and repair the
//! inconsistent definition.
//!
//! # No I/O
//!
//! The adapter is pure. Persisting the serialized route (and reporting
//! persistence failures) is owned by [`crate::session::FlowSession`].
//!
//! # Examples
//!
//! ```rust
//! use routeloom::graph::FlowGraph;
//! use routeloom::handler::Handler;
//! use routeloom::wire::{graph_to_route, route_to_graph};
//!
//! let mut graph = FlowGraph::new("deploy", "infra");
//! let a = graph.add_node(Handler::new("infra", "fetch"), None);
//! let b = graph.add_node(Handler::new("infra", "build"), None);
//! graph.add_edge(&a, &b).unwrap();
//!
//! let route = graph_to_route(&graph);
//! let (decoded, warnings) = route_to_graph(&route);
//! assert!(warnings.is_empty());
//! assert_eq!(decoded.nodes().len(), 2);
//! assert_eq!(decoded.edges().len(), 1);
//! ```

mod adapter;
mod route;

pub use adapter::{WireWarning, graph_to_route, route_to_graph, route_to_graph_with};
pub use route::{Route, RoutePosition, RouteTransition};
