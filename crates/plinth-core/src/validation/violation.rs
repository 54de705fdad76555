//! Validation outcomes.

use thiserror::Error;

use crate::{
    diagram::NodeId,
    element::{EdgeTag, NodeTag},
    registry::DiagramType,
    validation::SemanticRule,
};

/// A containment or connectivity invariant that does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralViolation {
    #[error("`{tag}` nodes are not allowed in a {diagram_type}")]
    NodeNotAllowed {
        tag: NodeTag,
        diagram_type: DiagramType,
    },

    #[error("`{tag}` cannot be placed inside `{parent}`")]
    InvalidContainer { tag: NodeTag, parent: NodeTag },

    #[error("`{tag}` must be placed inside a container")]
    MissingContainer { tag: NodeTag },

    #[error("`{tag}` cannot have a container, found `{parent}`")]
    ContainerForbidden { tag: NodeTag, parent: NodeTag },

    #[error("container {0} is not part of the diagram")]
    UnknownContainer(NodeId),

    #[error("`{tag}` edges are not allowed in a {diagram_type}")]
    EdgeNotAllowed {
        tag: EdgeTag,
        diagram_type: DiagramType,
    },

    #[error("`{tag}` edge is not connected to both of its endpoints")]
    UnconnectedEdge { tag: EdgeTag },

    #[error("`{tag}` edge refers to node {node}, which is not part of the diagram")]
    DanglingEdge { tag: EdgeTag, node: NodeId },

    #[error("only note edges may be attached to `{node}`, found `{tag}`")]
    NoteEdgeRequired { tag: EdgeTag, node: NodeTag },

    #[error("a note edge must be attached to a note")]
    NoteEdgeWithoutNote,

    #[error("a note edge cannot join two notes")]
    NoteEdgeBetweenNotes,
}

/// An edge that breaks one of its diagram type's semantic rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{tag}` edge from {start} to {end} is not allowed: {rule}")]
pub struct SemanticViolation {
    pub rule: SemanticRule,
    pub tag: EdgeTag,
    pub start: NodeId,
    pub end: NodeId,
}

/// The first problem found by a [`Validator`](crate::Validator).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error(transparent)]
    Structural(#[from] StructuralViolation),

    #[error(transparent)]
    Semantic(#[from] SemanticViolation),
}

impl Violation {
    /// Returns `true` for containment and connectivity problems.
    pub fn is_structural(&self) -> bool {
        matches!(self, Violation::Structural(_))
    }

    /// Returns `true` for diagram-type rule violations.
    pub fn is_semantic(&self) -> bool {
        matches!(self, Violation::Semantic(_))
    }
}
