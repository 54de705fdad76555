//! Diagram-type rules evaluated per edge.
//!
//! A rule is a pure predicate over a [`Candidate`] edge and the diagram it
//! belongs to (or would belong to). Rules that do not concern the candidate's
//! variant accept it. Counting rules skip the candidate itself when it is
//! already stored, so the same rule set serves both full validation and the
//! interactive check of a new edge.

use std::fmt;

use crate::{
    diagram::{Diagram, EdgeId, NodeId},
    element::{Edge, EdgeTag, NodeTag},
};

/// An edge under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    id: Option<EdgeId>,
    tag: EdgeTag,
    start: NodeId,
    end: NodeId,
}

impl Candidate {
    /// Creates a candidate for an edge that is not stored in the diagram.
    pub fn new(tag: EdgeTag, start: NodeId, end: NodeId) -> Self {
        Self {
            id: None,
            tag,
            start,
            end,
        }
    }

    /// Creates a candidate for a stored edge; `None` if it is not connected.
    pub fn stored(id: EdgeId, edge: &Edge) -> Option<Self> {
        let (start, end) = edge.endpoints()?;
        Some(Self {
            id: Some(id),
            tag: edge.tag(),
            start,
            end,
        })
    }

    /// Returns the edge variant.
    pub fn tag(&self) -> EdgeTag {
        self.tag
    }

    /// Returns the start node.
    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Returns the end node.
    pub fn end(&self) -> NodeId {
        self.end
    }

    fn is_self_edge(&self) -> bool {
        self.start == self.end
    }
}

/// A rule an edge must satisfy in a given diagram type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticRule {
    /// Edges of the variant must not start and end on the same node.
    NoSelfEdge(EdgeTag),
    NoSelfGeneralization,
    /// No edge of the variant from A to B when one from B to A exists.
    NoDirectCycles(EdgeTag),
    /// Fewer than `n` other edges of the same variant on the same ordered pair.
    MaxEdges(usize),
    /// Two nodes are never joined by both an association and an aggregation.
    NoCombinedAssociationAggregation,
    /// A return goes from a call back to the call that made it.
    ReturnEdge,
    /// Calls and constructors only target an object's header before its first
    /// activation, and constructors only target that first activation.
    CallEdgeEnd,
    /// At most one call starts directly on an object's lifeline.
    SingleEntryPoint,
    NoEdgeFromFinalState,
    NoEdgeToInitialState,
    /// An object reference goes from a field to an object.
    FieldReference,
    /// A collaboration joins two objects.
    ObjectCollaboration,
}

impl SemanticRule {
    /// Returns `true` if `candidate` satisfies this rule in `diagram`.
    pub fn allows(&self, candidate: &Candidate, diagram: &Diagram) -> bool {
        let tag_of = |id: NodeId| diagram.node(id).map(|node| node.tag());

        match *self {
            SemanticRule::NoSelfEdge(tag) => candidate.tag != tag || !candidate.is_self_edge(),
            SemanticRule::NoSelfGeneralization => {
                candidate.tag != EdgeTag::Generalization || !candidate.is_self_edge()
            }
            SemanticRule::NoDirectCycles(tag) => {
                candidate.tag != tag
                    || candidate.is_self_edge()
                    || !others(diagram, candidate).any(|edge| {
                        edge.tag() == tag
                            && edge.endpoints() == Some((candidate.end, candidate.start))
                    })
            }
            SemanticRule::MaxEdges(limit) => {
                others(diagram, candidate)
                    .filter(|edge| {
                        edge.tag() == candidate.tag
                            && edge.endpoints() == Some((candidate.start, candidate.end))
                    })
                    .count()
                    < limit
            }
            SemanticRule::NoCombinedAssociationAggregation => {
                let opposite = match candidate.tag {
                    EdgeTag::Association => EdgeTag::Aggregation,
                    EdgeTag::Aggregation => EdgeTag::Association,
                    _ => return true,
                };
                !others(diagram, candidate).any(|edge| {
                    edge.tag() == opposite
                        && (edge.endpoints() == Some((candidate.start, candidate.end))
                            || edge.endpoints() == Some((candidate.end, candidate.start)))
                })
            }
            SemanticRule::ReturnEdge => {
                if candidate.tag != EdgeTag::Return {
                    return true;
                }
                tag_of(candidate.start) == Some(NodeTag::Call)
                    && tag_of(candidate.end) == Some(NodeTag::Call)
                    && !candidate.is_self_edge()
                    && diagram.parent(candidate.start) != diagram.parent(candidate.end)
                    && caller(diagram, candidate, candidate.start) == Some(candidate.end)
            }
            SemanticRule::CallEdgeEnd => match (candidate.tag, tag_of(candidate.end)) {
                (EdgeTag::Call | EdgeTag::Constructor, Some(NodeTag::ImplicitParameter)) => {
                    diagram.children(candidate.end).is_empty()
                }
                (EdgeTag::Constructor, Some(NodeTag::Call)) => {
                    is_first_activation(diagram, candidate.end)
                        && !constructed_elsewhere(diagram, candidate)
                }
                _ => true,
            },
            SemanticRule::SingleEntryPoint => {
                candidate.tag != EdgeTag::Call
                    || tag_of(candidate.start) != Some(NodeTag::ImplicitParameter)
                    || !others(diagram, candidate).any(|edge| {
                        edge.tag() == EdgeTag::Call && edge.start() == Some(candidate.start)
                    })
            }
            SemanticRule::NoEdgeFromFinalState => {
                candidate.tag != EdgeTag::StateTransition
                    || tag_of(candidate.start) != Some(NodeTag::FinalState)
            }
            SemanticRule::NoEdgeToInitialState => {
                candidate.tag != EdgeTag::StateTransition
                    || tag_of(candidate.end) != Some(NodeTag::InitialState)
            }
            SemanticRule::FieldReference => {
                candidate.tag != EdgeTag::ObjectReference
                    || (tag_of(candidate.start) == Some(NodeTag::Field)
                        && tag_of(candidate.end) == Some(NodeTag::Object))
            }
            SemanticRule::ObjectCollaboration => {
                candidate.tag != EdgeTag::ObjectCollaboration
                    || (tag_of(candidate.start) == Some(NodeTag::Object)
                        && tag_of(candidate.end) == Some(NodeTag::Object))
            }
        }
    }
}

impl fmt::Display for SemanticRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticRule::NoSelfEdge(tag) => {
                write!(f, "`{tag}` edges cannot start and end on the same node")
            }
            SemanticRule::NoSelfGeneralization => write!(f, "a class cannot generalize itself"),
            SemanticRule::NoDirectCycles(tag) => {
                write!(f, "`{tag}` edges cannot point both ways between two nodes")
            }
            SemanticRule::MaxEdges(limit) => write!(
                f,
                "at most {limit} edge(s) of one type may go from one node to another"
            ),
            SemanticRule::NoCombinedAssociationAggregation => write!(
                f,
                "two nodes cannot be joined by both an association and an aggregation"
            ),
            SemanticRule::ReturnEdge => {
                write!(f, "a return must go from a call back to the call that made it")
            }
            SemanticRule::CallEdgeEnd => write!(
                f,
                "an object can only be called at its header before its first activation, \
                 and only its first activation can be constructed"
            ),
            SemanticRule::SingleEntryPoint => {
                write!(f, "at most one call may start directly on an object's lifeline")
            }
            SemanticRule::NoEdgeFromFinalState => {
                write!(f, "no transition can leave a final state")
            }
            SemanticRule::NoEdgeToInitialState => {
                write!(f, "no transition can enter an initial state")
            }
            SemanticRule::FieldReference => {
                write!(f, "an object reference must go from a field to an object")
            }
            SemanticRule::ObjectCollaboration => write!(f, "a collaboration must join two objects"),
        }
    }
}

/// Evaluates `rules` in order and returns the first one `candidate` breaks.
pub(crate) fn first_broken(
    rules: &[SemanticRule],
    candidate: &Candidate,
    diagram: &Diagram,
) -> Option<SemanticRule> {
    rules
        .iter()
        .find(|rule| !rule.allows(candidate, diagram))
        .copied()
}

/// Stored edges other than the candidate itself.
fn others<'a>(diagram: &'a Diagram, candidate: &Candidate) -> impl Iterator<Item = &'a Edge> {
    let skip = candidate.id;
    diagram
        .edges()
        .filter(move |(id, _)| Some(*id) != skip)
        .map(|(_, edge)| edge)
}

/// The node whose call or constructor edge activated `call`.
fn caller(diagram: &Diagram, candidate: &Candidate, call: NodeId) -> Option<NodeId> {
    others(diagram, candidate)
        .find(|edge| {
            matches!(edge.tag(), EdgeTag::Call | EdgeTag::Constructor) && edge.end() == Some(call)
        })
        .and_then(Edge::start)
}

fn is_first_activation(diagram: &Diagram, call: NodeId) -> bool {
    diagram
        .parent(call)
        .is_some_and(|lifeline| diagram.children(lifeline).first() == Some(&call))
}

/// Whether another constructor already targets the lifeline owning `candidate.end`.
fn constructed_elsewhere(diagram: &Diagram, candidate: &Candidate) -> bool {
    let Some(lifeline) = diagram.parent(candidate.end) else {
        return false;
    };
    others(diagram, candidate).any(|edge| {
        edge.tag() == EdgeTag::Constructor
            && edge
                .end()
                .is_some_and(|end| end == lifeline || diagram.parent(end) == Some(lifeline))
    })
}
