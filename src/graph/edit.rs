//! Validating edit operations on the canonical flow graph.
//!
//! Every operation checks its preconditions before mutating; a rejected
//! edit returns a descriptive [`EditError`] and leaves the graph untouched.
//! The operations here are pure with respect to the outside world; wire
//! re-synchronization after a successful edit is owned by
//! [`crate::session::FlowSession`].

use miette::Diagnostic;
use thiserror::Error;

use super::model::{FlowEdge, FlowGraph, FlowNode, ParameterMapping};
use crate::handler::Handler;
use crate::types::{EdgeId, ExitLabel, NodeId, Point};

/// Where a node lands when the caller does not supply a position.
///
/// A fixed offset pending the next layout pass, matching the editor's
/// drop-in default.
pub const DEFAULT_NODE_POSITION: Point = Point { x: 100.0, y: 100.0 };

/// Validation failures reported by the edit operations.
///
/// These are synchronous rejections surfaced before any mutation; they are
/// never coerced into silent fixes. Internal referential corruption, by
/// contrast, is a caller bug and fails loudly via debug assertions.
#[derive(Debug, Error, Diagnostic)]
pub enum EditError {
    /// A node's display name may not be empty once editing completes.
    #[error("node display name may not be empty")]
    #[diagnostic(
        code(routeloom::graph::empty_display_name),
        help("Pick a non-empty name; the wire format addresses transitions by node name.")
    )]
    EmptyDisplayName,

    /// Another node already carries this display name.
    #[error("display name already in use: {name}")]
    #[diagnostic(
        code(routeloom::graph::duplicate_display_name),
        help("Names key the wire-level adjacency, so they must be unique within a flow.")
    )]
    DuplicateDisplayName { name: String },

    /// The referenced node is not part of this graph.
    #[error("unknown node: {id}")]
    #[diagnostic(code(routeloom::graph::unknown_node))]
    UnknownNode { id: NodeId },

    /// The referenced edge is not part of this graph.
    #[error("unknown edge: {id}")]
    #[diagnostic(code(routeloom::graph::unknown_edge))]
    UnknownEdge { id: EdgeId },

    /// An equivalent edge (same endpoints, same label) already exists.
    #[error("duplicate edge from {from} to {target}")]
    #[diagnostic(
        code(routeloom::graph::duplicate_edge),
        help("Parallel edges are only allowed when their outcome labels differ.")
    )]
    DuplicateEdge { from: NodeId, target: NodeId },
}

impl FlowGraph {
    /// Appends a node for the given handler and returns its fresh id.
    ///
    /// The display name defaults to the handler's name; when that name is
    /// already taken a numeric suffix keeps it unique, since the wire
    /// format cannot address two positions by the same name. The node lands
    /// at `position`, or at [`DEFAULT_NODE_POSITION`] pending the next
    /// layout pass.
    pub fn add_node(&mut self, handler: Handler, position: Option<Point>) -> NodeId {
        let mut node = FlowNode::new(handler, position.unwrap_or(DEFAULT_NODE_POSITION));
        if self.node_named(&node.display_name).is_some() {
            let base = node.display_name.clone();
            let mut n = 2;
            while self.node_named(&format!("{base}-{n}")).is_some() {
                n += 1;
            }
            node.display_name = format!("{base}-{n}");
        }
        let id = node.id.clone();
        self.nodes.push(node);
        debug_assert!(self.invariants_hold());
        id
    }

    /// Connects two nodes with a fresh, unlabeled edge.
    ///
    /// Fails if either endpoint is absent, or if an edge over the same
    /// (source, target) pair already carries the label the new edge would
    /// start with. Parallel edges with distinct labels are legitimate: a
    /// success and a failure transition between the same pair of nodes.
    pub fn add_edge(&mut self, source: &NodeId, target: &NodeId) -> Result<EdgeId, EditError> {
        if !self.contains_node(source) {
            return Err(EditError::UnknownNode { id: source.clone() });
        }
        if !self.contains_node(target) {
            return Err(EditError::UnknownNode { id: target.clone() });
        }
        if self
            .edges
            .iter()
            .any(|e| e.source == *source && e.target == *target && e.label == ExitLabel::Unset)
        {
            return Err(EditError::DuplicateEdge {
                from: source.clone(),
                target: target.clone(),
            });
        }
        let edge = FlowEdge::new(source.clone(), target.clone());
        let id = edge.id.clone();
        self.edges.push(edge);
        debug_assert!(self.invariants_hold());
        Ok(id)
    }

    /// Renames a node.
    ///
    /// Fails on an empty name and on a collision with another node's name.
    /// Renaming is a first-class edit, not a silent field write: the wire
    /// format keys transitions by name, so the adjacency emitted by the
    /// next serialization is re-derived from the graph's id-keyed edges
    /// rather than patched in place.
    pub fn rename_node(&mut self, id: &NodeId, new_name: &str) -> Result<(), EditError> {
        if new_name.trim().is_empty() {
            return Err(EditError::EmptyDisplayName);
        }
        if !self.contains_node(id) {
            return Err(EditError::UnknownNode { id: id.clone() });
        }
        if let Some(existing) = self.node_named(new_name)
            && existing.id != *id
        {
            return Err(EditError::DuplicateDisplayName {
                name: new_name.to_string(),
            });
        }
        let node = self.node_mut(id).expect("node existence checked above");
        node.display_name = new_name.to_string();
        debug_assert!(self.invariants_hold());
        Ok(())
    }

    /// Sets an edge's outcome label.
    ///
    /// Fails on an unknown edge, and on relabeling that would leave two
    /// edges over the same endpoints with the same label.
    pub fn set_edge_label(&mut self, id: &EdgeId, label: ExitLabel) -> Result<(), EditError> {
        let Some(edge) = self.edge(id) else {
            return Err(EditError::UnknownEdge { id: id.clone() });
        };
        let (source, target) = (edge.source.clone(), edge.target.clone());
        if self
            .edges
            .iter()
            .any(|e| e.id != *id && e.source == source && e.target == target && e.label == label)
        {
            return Err(EditError::DuplicateEdge { from: source, target });
        }
        self.edge_mut(id).expect("edge existence checked above").label = label;
        debug_assert!(self.invariants_hold());
        Ok(())
    }

    /// Replaces an edge's ordered parameter mappings.
    pub fn set_edge_mappings(
        &mut self,
        id: &EdgeId,
        mappings: Vec<ParameterMapping>,
    ) -> Result<(), EditError> {
        let Some(edge) = self.edge_mut(id) else {
            return Err(EditError::UnknownEdge { id: id.clone() });
        };
        edge.mappings = mappings;
        Ok(())
    }

    /// Moves a node to explicit coordinates (a manual drag).
    ///
    /// Coordinate-only: no layout recomputation and no wire content change
    /// follows from this edit.
    pub fn move_node(&mut self, id: &NodeId, position: Point) -> Result<(), EditError> {
        let Some(node) = self.node_mut(id) else {
            return Err(EditError::UnknownNode { id: id.clone() });
        };
        node.position = position;
        Ok(())
    }

    /// Removes a node and, atomically, every edge touching it.
    ///
    /// This is the only cascading delete in the model; no partially
    /// cascaded state is ever observable.
    pub fn delete_node(&mut self, id: &NodeId) -> Result<(), EditError> {
        if !self.contains_node(id) {
            return Err(EditError::UnknownNode { id: id.clone() });
        }
        let removed = self
            .edges
            .iter()
            .filter(|e| e.source == *id || e.target == *id)
            .count();
        self.edges.retain(|e| e.source != *id && e.target != *id);
        self.nodes.retain(|n| n.id != *id);
        tracing::debug!(node = %id, cascaded_edges = removed, "deleted node");
        debug_assert!(self.invariants_hold());
        Ok(())
    }

    /// Removes an edge. No cascade.
    pub fn delete_edge(&mut self, id: &EdgeId) -> Result<(), EditError> {
        if self.edge(id).is_none() {
            return Err(EditError::UnknownEdge { id: id.clone() });
        }
        self.edges.retain(|e| e.id != *id);
        debug_assert!(self.invariants_hold());
        Ok(())
    }
}
