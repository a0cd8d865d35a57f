//! Bidirectional mapping between the wire route and the canonical graph.

use miette::Diagnostic;
use thiserror::Error;

use super::route::{Route, RoutePosition, RouteTransition};
use crate::graph::{FlowGraph, FlowNode};
use crate::types::{LabelMatch, NodeId, Point};

/// Integrity problems found while decoding a route.
///
/// Warnings, not errors: the source definition is degraded but the user
/// must still be able to view and repair it, so decoding always produces a
/// best-effort graph alongside whatever was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum WireWarning {
    /// A transition names a position absent from the route; the edge was
    /// dropped rather than invented.
    #[error("transition references unknown position: {from} -> {to}")]
    #[diagnostic(
        code(routeloom::wire::dangling_transition),
        help("The stored route is inconsistent; reconnect the step and re-register.")
    )]
    DanglingTransition { from: String, to: String },

    /// Two positions share a name. The later one was renamed with a numeric
    /// suffix to keep the graph addressable; transitions using the name bind
    /// to the first occurrence.
    #[error("duplicate position name: {name}")]
    #[diagnostic(
        code(routeloom::wire::duplicate_position),
        help("Rename one of the positions and re-register the route.")
    )]
    DuplicatePosition { name: String },
}

/// Decodes a wire route into a canonical graph, matching labels exactly.
///
/// One node per position (fresh opaque id, display name taken from the
/// position name), one edge per transition with endpoints resolved by
/// name against the just-created nodes. Unresolvable transitions are
/// dropped and surfaced as [`WireWarning`]s.
#[must_use]
pub fn route_to_graph(route: &Route) -> (FlowGraph, Vec<WireWarning>) {
    route_to_graph_with(route, LabelMatch::Exact)
}

/// Decodes a wire route, resolving outcome labels under the given mode.
///
/// See [`crate::types::ExitLabel::normalized`] for what the mode changes.
#[must_use]
pub fn route_to_graph_with(route: &Route, mode: LabelMatch) -> (FlowGraph, Vec<WireWarning>) {
    let mut warnings = Vec::new();

    let mut graph = FlowGraph::new(route.name.clone(), route.context.clone());
    graph.version = route.version;
    graph.parameters = route.parameters.clone();

    let mut by_name: rustc_hash::FxHashMap<String, NodeId> = rustc_hash::FxHashMap::default();
    for position in &route.positions {
        let mut node = FlowNode::new(position.handler.clone(), Point::default());
        node.display_name = position.name.clone();
        if by_name.contains_key(&position.name) {
            tracing::warn!(position = %position.name, "duplicate position name in route");
            warnings.push(WireWarning::DuplicatePosition {
                name: position.name.clone(),
            });
            let mut n = 2;
            while by_name.contains_key(&format!("{}-{n}", position.name)) {
                n += 1;
            }
            node.display_name = format!("{}-{n}", position.name);
        }
        by_name.insert(node.display_name.clone(), node.id().clone());
        graph.nodes.push(node);
    }

    for transition in &route.transitions {
        let (Some(source), Some(target)) =
            (by_name.get(&transition.from), by_name.get(&transition.to))
        else {
            tracing::warn!(
                from = %transition.from,
                to = %transition.to,
                route = %route.name,
                "dropping transition with unresolved endpoint"
            );
            warnings.push(WireWarning::DanglingTransition {
                from: transition.from.clone(),
                to: transition.to.clone(),
            });
            continue;
        };
        let mut edge = crate::graph::FlowEdge::new(source.clone(), target.clone());
        edge.label = transition.label.clone().normalized(mode);
        edge.mappings = transition.mappings.clone();
        graph.edges.push(edge);
    }

    (graph, warnings)
}

/// Encodes a canonical graph into its wire route form.
///
/// The inverse of [`route_to_graph`]: opaque ids are stripped and
/// transitions are keyed by node display names. An edge endpoint that no
/// longer resolves to a node is referential corruption (a bug in whatever
/// bypassed the validated edit operations) and panics rather than
/// emitting a malformed route.
#[must_use]
pub fn graph_to_route(graph: &FlowGraph) -> Route {
    let positions = graph
        .nodes()
        .iter()
        .map(|node| RoutePosition {
            name: node.display_name().to_string(),
            handler: node.handler.clone(),
        })
        .collect();

    let transitions = graph
        .edges()
        .iter()
        .map(|edge| {
            let from = graph
                .node(edge.source())
                .expect("edge source resolves to a graph node");
            let to = graph
                .node(edge.target())
                .expect("edge target resolves to a graph node");
            RouteTransition {
                from: from.display_name().to_string(),
                to: to.display_name().to_string(),
                label: edge.label().clone(),
                mappings: edge.mappings().to_vec(),
            }
        })
        .collect();

    Route {
        name: graph.name.clone(),
        context: graph.context.clone(),
        version: graph.version,
        parameters: graph.parameters.clone(),
        positions,
        transitions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;
    use crate::types::ExitLabel;

    fn sample_route() -> Route {
        let mut route = Route::new("deploy", "infra");
        route.positions = vec![
            RoutePosition {
                name: "fetch".into(),
                handler: Handler::new("infra", "fetch"),
            },
            RoutePosition {
                name: "build".into(),
                handler: Handler::new("infra", "build"),
            },
        ];
        route.transitions = vec![RouteTransition {
            from: "fetch".into(),
            to: "build".into(),
            label: ExitLabel::Success,
            mappings: Vec::new(),
        }];
        route
    }

    #[test]
    fn decode_assigns_fresh_ids_and_resolves_names() {
        let (graph, warnings) = route_to_graph(&sample_route());
        assert!(warnings.is_empty());
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.edges().len(), 1);

        let edge = &graph.edges()[0];
        assert_eq!(graph.node(edge.source()).unwrap().display_name(), "fetch");
        assert_eq!(graph.node(edge.target()).unwrap().display_name(), "build");
        assert!(edge.label().is_success());
    }

    #[test]
    fn dangling_transition_is_dropped_with_warning() {
        let mut route = sample_route();
        route.transitions.push(RouteTransition {
            from: "build".into(),
            to: "missing".into(),
            label: ExitLabel::Unset,
            mappings: Vec::new(),
        });

        let (graph, warnings) = route_to_graph(&route);
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(
            warnings,
            vec![WireWarning::DanglingTransition {
                from: "build".into(),
                to: "missing".into(),
            }]
        );
    }

    #[test]
    fn case_insensitive_mode_resolves_lowercase_labels() {
        let mut route = sample_route();
        route.transitions[0].label = ExitLabel::Custom("success".into());

        let (exact, _) = route_to_graph(&route);
        assert_eq!(
            exact.edges()[0].label(),
            &ExitLabel::Custom("success".into())
        );

        let (relaxed, _) = route_to_graph_with(&route, LabelMatch::IgnoreCase);
        assert!(relaxed.edges()[0].label().is_success());
    }

    #[test]
    fn round_trip_preserves_names_labels_and_adjacency() {
        let (graph, _) = route_to_graph(&sample_route());
        let route = graph_to_route(&graph);
        assert_eq!(route, sample_route());
    }

    #[test]
    fn wire_json_shape_is_stable() {
        let route = sample_route();
        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["name"], "deploy");
        assert_eq!(json["context"], "infra");
        assert_eq!(json["positions"][0]["name"], "fetch");
        assert_eq!(json["transitions"][0]["from"], "fetch");
        assert_eq!(json["transitions"][0]["to"], "build");
        assert_eq!(json["transitions"][0]["label"], "SUCCESS");
    }
}
