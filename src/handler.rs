//! Handler descriptors: the remote capabilities a flow step can invoke.
//!
//! A handler is a remote-invocable capability referenced by `(context, name)`
//! with declared input and output field descriptors. The handler catalog
//! (see [`crate::client::HandlerCatalog`]) is the source of these records;
//! this module only models their shape.
//!
//! # Examples
//!
//! ```rust
//! use routeloom::handler::{FieldDescriptor, FieldLabel, FieldType, Handler};
//!
//! let handler = Handler::new("infra", "create_bucket")
//!     .with_description("Provision an object storage bucket")
//!     .with_parameter(FieldDescriptor::new("name", FieldType::String, FieldLabel::Required))
//!     .with_return(FieldDescriptor::new("bucket_arn", FieldType::String, FieldLabel::Required));
//!
//! assert_eq!(handler.reference().qualified(), "infra.create_bucket");
//! assert_eq!(handler.parameters.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar type of a declared handler field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Int,
    Float,
    Bool,
    Bytes,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
            Self::Bytes => write!(f, "bytes"),
        }
    }
}

/// Cardinality of a declared handler field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldLabel {
    Required,
    Optional,
    Repeated,
}

impl fmt::Display for FieldLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Optional => write!(f, "optional"),
            Self::Repeated => write!(f, "repeated"),
        }
    }
}

/// One declared parameter or return field of a handler (or of a flow).
///
/// Flows declare their own input parameters with the same descriptor shape,
/// so this type appears in both the handler catalog and the route wire
/// format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: FieldLabel,
}

impl FieldDescriptor {
    /// Creates a descriptor from its parts.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType, label: FieldLabel) -> Self {
        Self {
            name: name.into(),
            field_type,
            label,
        }
    }
}

/// The `(context, name)` pair identifying a handler.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandlerRef {
    pub context: String,
    pub name: String,
}

impl HandlerRef {
    /// Creates a reference from its parts.
    #[must_use]
    pub fn new(context: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            name: name.into(),
        }
    }

    /// The dotted `context.name` form used in display surfaces.
    #[must_use]
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.context, self.name)
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.context, self.name)
    }
}

/// A remote-invocable capability with its declared field descriptors.
///
/// Nodes carry the full handler record (not just the reference) so the
/// editor can offer parameter mappings without a catalog round-trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handler {
    pub context: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<FieldDescriptor>,
    #[serde(default)]
    pub returns: Vec<FieldDescriptor>,
}

impl Handler {
    /// Creates a handler with no declared fields.
    #[must_use]
    pub fn new(context: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
            returns: Vec::new(),
        }
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a declared input parameter.
    #[must_use]
    pub fn with_parameter(mut self, field: FieldDescriptor) -> Self {
        self.parameters.push(field);
        self
    }

    /// Appends a declared return field.
    #[must_use]
    pub fn with_return(mut self, field: FieldDescriptor) -> Self {
        self.returns.push(field);
        self
    }

    /// The `(context, name)` reference for this handler.
    #[must_use]
    pub fn reference(&self) -> HandlerRef {
        HandlerRef::new(self.context.clone(), self.name.clone())
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.context, self.name)
    }
}
