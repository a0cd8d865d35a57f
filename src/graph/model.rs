//! Data types for the canonical flow graph.
//!
//! This module contains the node, edge, and graph containers plus their
//! lookup helpers. All mutation goes through the edit operations in
//! [`super::edit`].

use serde::{Deserialize, Serialize};

use crate::handler::{FieldDescriptor, Handler};
use crate::types::{EdgeId, ExitLabel, NodeId, Point};

/// One (source output field -> target input field) pair on an edge.
///
/// Mappings route a handler's return fields into the next handler's
/// parameters; order is preserved because later mappings may shadow earlier
/// ones on the service side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterMapping {
    pub source_output: String,
    pub target_input: String,
}

impl ParameterMapping {
    /// Creates a mapping from its field names.
    #[must_use]
    pub fn new(source_output: impl Into<String>, target_input: impl Into<String>) -> Self {
        Self {
            source_output: source_output.into(),
            target_input: target_input.into(),
        }
    }
}

/// One step in a flow, bound to a remote handler.
///
/// The id is immutable for the node's lifetime. The display name defaults
/// to the handler's name and stays non-empty once editing completes; it is
/// what the wire format addresses transitions by, so renames are first-class
/// edits rather than silent field writes (see
/// [`FlowGraph::rename_node`](super::FlowGraph::rename_node)).
#[derive(Clone, Debug, PartialEq)]
pub struct FlowNode {
    pub(crate) id: NodeId,
    pub(crate) display_name: String,
    /// The remote capability this step invokes, with its declared fields.
    pub handler: Handler,
    /// Canvas coordinates, owned by the layout engine except immediately
    /// after creation.
    pub position: Point,
}

impl FlowNode {
    /// Creates a node with a fresh id, named after its handler.
    #[must_use]
    pub(crate) fn new(handler: Handler, position: Point) -> Self {
        Self {
            id: NodeId::fresh(),
            display_name: handler.name.clone(),
            handler,
            position,
        }
    }

    /// The node's stable opaque identifier.
    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// The user-facing (and wire-addressing) name of this node.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// A labeled directed transition between two nodes.
///
/// Both endpoints must reference nodes present in the same graph at all
/// times; deleting a node cascades to its incident edges.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowEdge {
    pub(crate) id: EdgeId,
    pub(crate) source: NodeId,
    pub(crate) target: NodeId,
    pub(crate) label: ExitLabel,
    pub(crate) mappings: Vec<ParameterMapping>,
}

impl FlowEdge {
    /// Creates an unlabeled edge with a fresh id.
    #[must_use]
    pub(crate) fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            id: EdgeId::fresh(),
            source,
            target,
            label: ExitLabel::Unset,
            mappings: Vec::new(),
        }
    }

    /// The edge's stable opaque identifier.
    #[must_use]
    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    /// Id of the node this edge leaves.
    #[must_use]
    pub fn source(&self) -> &NodeId {
        &self.source
    }

    /// Id of the node this edge enters.
    #[must_use]
    pub fn target(&self) -> &NodeId {
        &self.target
    }

    /// The outcome tag selecting this transition at run time.
    #[must_use]
    pub fn label(&self) -> &ExitLabel {
        &self.label
    }

    /// The ordered parameter mappings carried by this edge.
    #[must_use]
    pub fn mappings(&self) -> &[ParameterMapping] {
        &self.mappings
    }
}

/// The canonical in-memory representation of a flow.
///
/// Invariants, enforced by the edit operations and checked in debug builds:
/// node ids and edge ids are unique within the graph, display names are
/// unique within the graph (the wire format keys adjacency by name), and
/// every edge's endpoints resolve to nodes present in the graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowGraph {
    /// Flow name, unique within its context on the service side.
    pub name: String,
    /// Namespacing key the flow is registered under.
    pub context: String,
    /// Version counter of the persisted route this graph was loaded from.
    pub version: u32,
    /// The flow's own declared input parameters, in declaration order.
    pub parameters: Vec<FieldDescriptor>,
    pub(crate) nodes: Vec<FlowNode>,
    pub(crate) edges: Vec<FlowEdge>,
}

impl FlowGraph {
    /// Creates an empty flow.
    #[must_use]
    pub fn new(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: context.into(),
            version: 0,
            parameters: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Declares a flow input parameter.
    #[must_use]
    pub fn with_parameter(mut self, field: FieldDescriptor) -> Self {
        self.parameters.push(field);
        self
    }

    /// All nodes, in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    /// All edges, in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut FlowNode> {
        self.nodes.iter_mut().find(|n| n.id == *id)
    }

    /// Looks up a node by display name.
    #[must_use]
    pub fn node_named(&self, name: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.display_name == name)
    }

    /// Looks up an edge by id.
    #[must_use]
    pub fn edge(&self, id: &EdgeId) -> Option<&FlowEdge> {
        self.edges.iter().find(|e| e.id == *id)
    }

    pub(crate) fn edge_mut(&mut self, id: &EdgeId) -> Option<&mut FlowEdge> {
        self.edges.iter_mut().find(|e| e.id == *id)
    }

    /// Returns `true` if a node with this id is present.
    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Edges leaving the given node.
    pub fn outgoing(&self, id: &NodeId) -> impl Iterator<Item = &FlowEdge> {
        self.edges.iter().filter(move |e| e.source == *id)
    }

    /// Edges entering the given node.
    pub fn incoming(&self, id: &NodeId) -> impl Iterator<Item = &FlowEdge> {
        self.edges.iter().filter(move |e| e.target == *id)
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks referential integrity; violations are caller bugs.
    ///
    /// Runs after every mutation in debug builds. An edge whose endpoint no
    /// longer resolves means an edit bypassed the validated operations.
    pub(crate) fn invariants_hold(&self) -> bool {
        let ids_unique = self
            .nodes
            .iter()
            .enumerate()
            .all(|(i, n)| !self.nodes[..i].iter().any(|m| m.id == n.id));
        let names_unique = self
            .nodes
            .iter()
            .enumerate()
            .all(|(i, n)| !self.nodes[..i].iter().any(|m| m.display_name == n.display_name));
        let edge_ids_unique = self
            .edges
            .iter()
            .enumerate()
            .all(|(i, e)| !self.edges[..i].iter().any(|f| f.id == e.id));
        let endpoints_resolve = self
            .edges
            .iter()
            .all(|e| self.contains_node(&e.source) && self.contains_node(&e.target));
        ids_unique && names_unique && edge_ids_unique && endpoints_resolve
    }
}
