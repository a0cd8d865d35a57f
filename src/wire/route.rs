//! Serde types for the persisted route shape.
//!
//! This is a stable serialized form: the field sets of [`Route`],
//! [`RoutePosition`], and [`RouteTransition`], plus the name-based (not
//! id-based) transition addressing, are part of the service contract and
//! must not drift.

use serde::{Deserialize, Serialize};

use crate::graph::ParameterMapping;
use crate::handler::{FieldDescriptor, Handler};
use crate::types::ExitLabel;

/// A named, versioned flow as the remote service stores it.
///
/// # JSON layout
///
/// ```json
/// {
///   "name": "deploy",
///   "context": "infra",
///   "version": 3,
///   "parameters": [{"name": "region", "type": "string", "label": "required"}],
///   "positions": [{"name": "fetch", "handler": {"context": "infra", "name": "fetch"}}],
///   "transitions": [{"from": "fetch", "to": "build", "label": "SUCCESS"}]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub context: String,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub parameters: Vec<FieldDescriptor>,
    #[serde(default)]
    pub positions: Vec<RoutePosition>,
    #[serde(default)]
    pub transitions: Vec<RouteTransition>,
}

impl Route {
    /// Creates an empty route.
    #[must_use]
    pub fn new(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: context.into(),
            version: 0,
            parameters: Vec::new(),
            positions: Vec::new(),
            transitions: Vec::new(),
        }
    }
}

/// One step of a route, addressed by its unique name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutePosition {
    pub name: String,
    pub handler: Handler,
}

/// One transition of a route, keyed by the names of its endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteTransition {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: ExitLabel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<ParameterMapping>,
}
