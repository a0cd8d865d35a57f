//! Core identifier and label types for the Routeloom flow model.
//!
//! This module defines the fundamental types used throughout the crate for
//! identifying nodes and edges in flow graphs and for tagging transition
//! outcomes. These are the core domain concepts that define what a flow *is*.
//!
//! For the remote wire representation, see [`crate::wire`]; for run-time
//! execution records, see [`crate::trip`].
//!
//! # Key Types
//!
//! - [`NodeId`] / [`EdgeId`]: opaque, client-generated stable identifiers
//! - [`ExitLabel`]: the enumerated outcome tag carried by a transition
//! - [`Point`]: a 2-D coordinate owned by the layout engine
//!
//! # Identity vs. naming
//!
//! Identifiers are opaque and never leave the client: the wire format
//! addresses positions by display name, not by id. The [`crate::wire`]
//! adapter resolves between the two at the serialization boundary, which is
//! why ids can be regenerated freely on every decode while names must stay
//! unique within a graph.
//!
//! # Examples
//!
//! ```rust
//! use routeloom::types::{ExitLabel, NodeId};
//!
//! let id = NodeId::fresh();
//! assert!(!id.as_str().is_empty());
//!
//! let label = ExitLabel::decode("SUCCESS");
//! assert!(label.is_success());
//! assert_eq!(label.encode(), "SUCCESS");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque, stable identifier for a node within a flow graph.
///
/// Ids are client-generated (UUID v4), unique within a graph, and immutable
/// for the node's lifetime. They are never serialized to the wire format.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Generates a fresh, globally unique node id.
    #[must_use]
    pub fn fresh() -> Self {
        NodeId(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

/// Opaque, stable identifier for an edge within a flow graph.
///
/// Same identity rules as [`NodeId`]: client-generated, unique within a
/// graph, absent from the wire format.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Generates a fresh, globally unique edge id.
    #[must_use]
    pub fn fresh() -> Self {
        EdgeId(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        EdgeId(s.to_string())
    }
}

/// How wire-level outcome labels are matched against the known enum names.
///
/// The remote service contract is ambiguous about label casing, so matching
/// is configuration rather than a hard-coded rule. See
/// [`crate::config::SessionConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LabelMatch {
    /// Labels must match the wire spelling exactly (`"SUCCESS"`, `"FAILURE"`).
    #[default]
    Exact,
    /// Labels are matched ASCII-case-insensitively (`"success"` works too).
    IgnoreCase,
}

/// The enumerated outcome tag carried by a flow transition.
///
/// A transition is selected at run time by the handler's outcome; the label
/// records which outcome this transition answers to. A freshly drawn edge
/// starts [`Unset`](Self::Unset) until the user picks an outcome.
///
/// # Wire form
///
/// `ExitLabel` serializes as its encoded string (`""`, `"SUCCESS"`,
/// `"FAILURE"`, or the custom text), keeping the persisted route format
/// stable and human-readable.
///
/// # Examples
///
/// ```rust
/// use routeloom::types::{ExitLabel, LabelMatch};
///
/// assert_eq!(ExitLabel::decode(""), ExitLabel::Unset);
/// assert_eq!(ExitLabel::decode("FAILURE"), ExitLabel::Failure);
///
/// // Unknown names are preserved rather than rejected.
/// assert_eq!(
///     ExitLabel::decode("RETRY"),
///     ExitLabel::Custom("RETRY".to_string())
/// );
///
/// // Case sensitivity is configuration, not policy.
/// assert_eq!(
///     ExitLabel::decode("success").normalized(LabelMatch::IgnoreCase),
///     ExitLabel::Success
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ExitLabel {
    /// No outcome chosen yet. Encoded as the empty string.
    #[default]
    Unset,
    /// The handler completed successfully.
    Success,
    /// The handler reported a failure.
    Failure,
    /// A service-defined outcome this client has no special handling for.
    ///
    /// Preserved verbatim for forward compatibility with new outcome names.
    Custom(String),
}

impl ExitLabel {
    /// Wire spelling of the success outcome.
    pub const SUCCESS: &'static str = "SUCCESS";
    /// Wire spelling of the failure outcome.
    pub const FAILURE: &'static str = "FAILURE";

    /// Encode the label into its persisted string form.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            ExitLabel::Unset => String::new(),
            ExitLabel::Success => Self::SUCCESS.to_string(),
            ExitLabel::Failure => Self::FAILURE.to_string(),
            ExitLabel::Custom(s) => s.clone(),
        }
    }

    /// Decode a persisted string form back into a label, matching exactly.
    ///
    /// Unrecognized spellings become [`Custom`](Self::Custom) so that a
    /// route using outcome names this client predates still round-trips.
    #[must_use]
    pub fn decode(s: &str) -> Self {
        if s.is_empty() {
            ExitLabel::Unset
        } else if s == Self::SUCCESS {
            ExitLabel::Success
        } else if s == Self::FAILURE {
            ExitLabel::Failure
        } else {
            ExitLabel::Custom(s.to_string())
        }
    }

    /// Re-resolve a decoded label under the given matching mode.
    ///
    /// Under [`LabelMatch::IgnoreCase`], a custom label whose text is a
    /// case variant of a known outcome collapses into that outcome; under
    /// [`LabelMatch::Exact`] the label is returned unchanged.
    #[must_use]
    pub fn normalized(self, mode: LabelMatch) -> Self {
        match (&self, mode) {
            (ExitLabel::Custom(s), LabelMatch::IgnoreCase) => {
                if s.eq_ignore_ascii_case(Self::SUCCESS) {
                    ExitLabel::Success
                } else if s.eq_ignore_ascii_case(Self::FAILURE) {
                    ExitLabel::Failure
                } else {
                    self
                }
            }
            _ => self,
        }
    }

    /// Returns `true` if this is the [`Success`](Self::Success) outcome.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns `true` if this is the [`Failure`](Self::Failure) outcome.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure)
    }

    /// Returns `true` once an outcome has been chosen.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }
}

impl fmt::Display for ExitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "(unset)"),
            Self::Success => write!(f, "{}", Self::SUCCESS),
            Self::Failure => write!(f, "{}", Self::FAILURE),
            Self::Custom(name) => write!(f, "{}", name),
        }
    }
}

impl From<&str> for ExitLabel {
    fn from(s: &str) -> Self {
        ExitLabel::decode(s)
    }
}

impl From<String> for ExitLabel {
    fn from(s: String) -> Self {
        ExitLabel::decode(&s)
    }
}

impl From<ExitLabel> for String {
    fn from(label: ExitLabel) -> Self {
        label.encode()
    }
}

/// A 2-D coordinate in the editor canvas.
///
/// Coordinates are owned by the layout engine except immediately after node
/// creation, where a caller-supplied default applies until the next layout
/// pass. They never appear in the wire format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a point from its coordinates.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
