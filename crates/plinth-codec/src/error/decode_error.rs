//! The error type returned by the decoder.

use std::fmt;

use plinth_core::{
    Diagram, DiagramType, GraphError,
    property::PropertyError,
    validation::{SemanticViolation, StructuralViolation},
};
use thiserror::Error;

use crate::error::{ErrorCategory, ErrorCode};

/// The record of a document an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    /// A node record, by document id.
    Node(u64),
    /// An edge record, by position in the edge list.
    Edge(usize),
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Node(id) => write!(f, "node {id}"),
            RecordRef::Edge(index) => write!(f, "edge #{index}"),
        }
    }
}

/// Errors raised while turning a document into a diagram.
///
/// Syntactic and structural errors abort decoding. A semantic error carries
/// the fully rebuilt diagram, so the caller may accept it with a warning.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("invalid document: {0}")]
    Shape(#[source] serde_json::Error),

    #[error("unknown diagram type `{0}`")]
    UnknownDiagramType(String),

    #[error("{record}: `{tag}` is not a node type of a {diagram_type}")]
    UnknownNodeType {
        record: RecordRef,
        tag: String,
        diagram_type: DiagramType,
    },

    #[error("{record}: `{tag}` is not an edge type of a {diagram_type}")]
    UnknownEdgeType {
        record: RecordRef,
        tag: String,
        diagram_type: DiagramType,
    },

    #[error("{record}: {source}")]
    Property {
        record: RecordRef,
        #[source]
        source: PropertyError,
    },

    #[error("{record}: missing property `{property}` of `{element}`")]
    MissingProperty {
        record: RecordRef,
        element: &'static str,
        property: &'static str,
    },

    #[error("node id {0} is used by more than one node")]
    DuplicateNodeId(u64),

    #[error("{record}: no node has id {id}")]
    UnknownNodeId { record: RecordRef, id: u64 },

    #[error("node {child} is listed as a child of both node {first} and node {second}")]
    MultipleParents { child: u64, first: u64, second: u64 },

    #[error("node {0} is listed as its own child")]
    SelfContainment(u64),

    #[error("node {0} is part of a containment cycle")]
    ContainmentCycle(u64),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Structural(#[from] StructuralViolation),

    #[error("{violation}")]
    Semantic {
        violation: SemanticViolation,
        diagram: Box<Diagram>,
    },
}

impl DecodeError {
    /// Returns the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::Syntax(_) => ErrorCode::E001,
            DecodeError::Shape(_) => ErrorCode::E002,
            DecodeError::UnknownDiagramType(_) => ErrorCode::E100,
            DecodeError::UnknownNodeType { .. } => ErrorCode::E101,
            DecodeError::UnknownEdgeType { .. } => ErrorCode::E102,
            DecodeError::Property {
                source: PropertyError::Unknown { .. },
                ..
            } => ErrorCode::E103,
            DecodeError::Property { .. } => ErrorCode::E104,
            DecodeError::MissingProperty { .. } => ErrorCode::E105,
            DecodeError::DuplicateNodeId(_) => ErrorCode::E106,
            DecodeError::UnknownNodeId { .. } => ErrorCode::E107,
            DecodeError::MultipleParents { .. }
            | DecodeError::SelfContainment(_)
            | DecodeError::ContainmentCycle(_) => ErrorCode::E108,
            DecodeError::Graph(_) | DecodeError::Structural(_) => ErrorCode::E109,
            DecodeError::Semantic { .. } => ErrorCode::E200,
        }
    }

    /// Returns the category of the error.
    pub fn category(&self) -> ErrorCategory {
        self.code().category()
    }

    /// Returns a hint on how to fix the document, if there is one.
    pub fn help(&self) -> Option<String> {
        match self {
            DecodeError::UnknownDiagramType(_) => Some(format!(
                "valid diagram types: {}",
                DiagramType::ALL.map(DiagramType::as_str).join(", ")
            )),
            DecodeError::UnknownNodeType { diagram_type, .. } => Some(format!(
                "valid node types: {}",
                tag_list(
                    plinth_core::registry::descriptor(*diagram_type)
                        .node_tags()
                        .map(|tag| tag.as_str())
                )
            )),
            DecodeError::UnknownEdgeType { diagram_type, .. } => Some(format!(
                "valid edge types: {}",
                tag_list(
                    plinth_core::registry::descriptor(*diagram_type)
                        .edge_tags()
                        .map(|tag| tag.as_str())
                )
            )),
            DecodeError::ContainmentCycle(_) => {
                Some("every chain of `children` lists must end at a root node".to_string())
            }
            DecodeError::Semantic { .. } => {
                Some("the diagram can still be loaded with a relaxed load policy".to_string())
            }
            _ => None,
        }
    }

    /// Returns the 1-based line and column of a JSON error, if known.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            DecodeError::Syntax(err) | DecodeError::Shape(err) if err.line() > 0 => {
                Some((err.line(), err.column()))
            }
            _ => None,
        }
    }

    /// Returns the decoded diagram carried by a semantic error.
    pub fn into_diagram(self) -> Option<Diagram> {
        match self {
            DecodeError::Semantic { diagram, .. } => Some(*diagram),
            _ => None,
        }
    }
}

fn tag_list<'a>(tags: impl Iterator<Item = &'a str>) -> String {
    tags.collect::<Vec<_>>().join(", ")
}
