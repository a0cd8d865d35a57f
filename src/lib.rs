//! # Routeloom: Flow Graph Editing and Live Run Observation
//!
//! Routeloom is the client-side core of an interactive editor and live
//! execution viewer for *flows*: directed graphs of named steps
//! ("positions") connected by labeled transitions, backed by a remote
//! workflow-execution service.
//!
//! ## Core Concepts
//!
//! - **Graph**: the canonical in-memory flow, keyed by opaque ids
//! - **Wire route**: the service's name-addressed persisted form
//! - **Layout**: deterministic layered coordinates from topology + labels
//! - **Session**: explicit dependency injection, optimistic persistence
//! - **Trip**: one run of a flow, observed as a reduced event stream
//!
//! ## Quick Start
//!
//! ### Editing a flow
//!
//! ```
//! use routeloom::graph::FlowGraph;
//! use routeloom::handler::Handler;
//! use routeloom::types::ExitLabel;
//! use routeloom::{layout, wire};
//!
//! let mut graph = FlowGraph::new("deploy", "infra");
//! let fetch = graph.add_node(Handler::new("infra", "fetch"), None);
//! let build = graph.add_node(Handler::new("infra", "build"), None);
//! let edge = graph.add_edge(&fetch, &build).unwrap();
//! graph.set_edge_label(&edge, ExitLabel::Success).unwrap();
//!
//! // Layout is a pure function of topology and labels.
//! let positions = layout::positions(&graph);
//! assert!(positions[&fetch].y < positions[&build].y);
//!
//! // The wire form round-trips by display name, not by id.
//! let route = wire::graph_to_route(&graph);
//! let (decoded, warnings) = wire::route_to_graph(&route);
//! assert!(warnings.is_empty());
//! assert_eq!(decoded.edges().len(), 1);
//! ```
//!
//! ### Observing a run
//!
//! ```
//! use routeloom::trip::{TripCorrelator, TripEvent};
//! use serde_json::json;
//!
//! let mut correlator = TripCorrelator::new();
//! let generation = correlator.begin("trip-1");
//!
//! // Delivery order and duplication do not matter.
//! correlator.deliver(
//!     generation,
//!     TripEvent::new("2", "trip-1", "build", 200).with_state("ok", json!(true)),
//! );
//! correlator.deliver(
//!     generation,
//!     TripEvent::new("1", "trip-1", "fetch", 100).with_state("ok", json!(false)),
//! );
//!
//! let view = correlator.view();
//! assert_eq!(view.events()[0].position, "fetch");
//! assert_eq!(view.merged_state()["ok"], json!(true));
//! assert!(view.has_fired("build"));
//! ```
//!
//! ## Error Handling
//!
//! Validation failures ([`graph::EditError`]) are rejected before any
//! mutation. Degraded wire input decodes best-effort with
//! [`wire::WireWarning`]s. Service failures ([`client::ServiceError`])
//! surface as session notices and never roll back local state. Internal
//! referential corruption is a caller bug and fails loudly.
//!
//! ## Module Guide
//!
//! - [`types`] - Identifiers, outcome labels, coordinates
//! - [`handler`] - Handler catalog descriptors
//! - [`graph`] - Canonical graph model and edit operations
//! - [`wire`] - Wire route format and the bidirectional adapter
//! - [`layout`] - Deterministic layered layout engine
//! - [`trip`] - Run records, event reducer, correlator, watcher
//! - [`client`] - Remote service contracts
//! - [`session`] - Per-context dependency injection and optimistic sync
//! - [`config`] - Session tuning from the environment
//! - [`telemetry`] - Tracing subscriber setup

pub mod client;
pub mod config;
pub mod graph;
pub mod handler;
pub mod layout;
pub mod session;
pub mod telemetry;
pub mod trip;
pub mod types;
pub mod utils;
pub mod wire;
