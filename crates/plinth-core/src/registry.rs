//! Diagram types and the per-type variant registry.
//!
//! Each [`DiagramType`] owns a static [`DiagramDescriptor`] listing the node
//! and edge variants it admits, a default-state constructor for each, and the
//! ordered list of semantic rules its edges must satisfy. The table is built
//! once on first use and is read-only afterwards.

use std::{
    fmt::{self, Display},
    str::FromStr,
    sync::OnceLock,
};

use indexmap::IndexMap;

use crate::{
    element::{EdgeConstructor, EdgeKind, EdgeTag, NodeConstructor, NodeKind, NodeTag},
    validation::SemanticRule,
};

/// The kind of a diagram, fixed when the diagram is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramType {
    Class,
    Sequence,
    State,
    Object,
    UseCase,
}

impl DiagramType {
    /// All diagram types, in registry order.
    pub const ALL: [DiagramType; 5] = [
        DiagramType::Class,
        DiagramType::Sequence,
        DiagramType::State,
        DiagramType::Object,
        DiagramType::UseCase,
    ];

    /// Returns the document name of this type.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    fn index(self) -> usize {
        match self {
            DiagramType::Class => 0,
            DiagramType::Sequence => 1,
            DiagramType::State => 2,
            DiagramType::Object => 3,
            DiagramType::UseCase => 4,
        }
    }
}

impl FromStr for DiagramType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ClassDiagram" => Ok(Self::Class),
            "SequenceDiagram" => Ok(Self::Sequence),
            "StateDiagram" => Ok(Self::State),
            "ObjectDiagram" => Ok(Self::Object),
            "UseCaseDiagram" => Ok(Self::UseCase),
            _ => Err(format!("unknown diagram type `{s}`")),
        }
    }
}

impl From<DiagramType> for &'static str {
    fn from(val: DiagramType) -> Self {
        match val {
            DiagramType::Class => "ClassDiagram",
            DiagramType::Sequence => "SequenceDiagram",
            DiagramType::State => "StateDiagram",
            DiagramType::Object => "ObjectDiagram",
            DiagramType::UseCase => "UseCaseDiagram",
        }
    }
}

impl Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Variants and rules admitted by one diagram type.
#[derive(Debug)]
pub struct DiagramDescriptor {
    diagram_type: DiagramType,
    nodes: IndexMap<NodeTag, NodeConstructor>,
    edges: IndexMap<EdgeTag, EdgeConstructor>,
    rules: Vec<SemanticRule>,
}

static REGISTRY: OnceLock<[DiagramDescriptor; 5]> = OnceLock::new();

/// Returns the descriptor of a diagram type.
pub fn descriptor(diagram_type: DiagramType) -> &'static DiagramDescriptor {
    let table = REGISTRY.get_or_init(|| DiagramType::ALL.map(DiagramDescriptor::build));
    &table[diagram_type.index()]
}

impl DiagramDescriptor {
    fn build(diagram_type: DiagramType) -> Self {
        // Notes are available in every diagram type.
        let nodes = node_tags(diagram_type)
            .iter()
            .chain(&[NodeTag::Note, NodeTag::Point])
            .map(|&tag| (tag, tag.constructor()))
            .collect();
        let edges = edge_tags(diagram_type)
            .iter()
            .chain(&[EdgeTag::Note])
            .map(|&tag| (tag, tag.constructor()))
            .collect();

        Self {
            diagram_type,
            nodes,
            edges,
            rules: rules(diagram_type),
        }
    }

    /// Returns the described diagram type.
    pub fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }

    /// Creates a node variant in its default state, if the type admits it.
    pub fn create_node(&self, tag: NodeTag) -> Option<NodeKind> {
        self.nodes.get(&tag).map(|constructor| constructor())
    }

    /// Creates an edge variant in its default state, if the type admits it.
    pub fn create_edge(&self, tag: EdgeTag) -> Option<EdgeKind> {
        self.edges.get(&tag).map(|constructor| constructor())
    }

    /// Returns the admitted node tags, in registration order.
    pub fn node_tags(&self) -> impl Iterator<Item = NodeTag> + '_ {
        self.nodes.keys().copied()
    }

    /// Returns the admitted edge tags, in registration order.
    pub fn edge_tags(&self) -> impl Iterator<Item = EdgeTag> + '_ {
        self.edges.keys().copied()
    }

    /// Returns `true` if nodes of this variant may appear in the diagram type.
    pub fn allows_node(&self, kind: &NodeKind) -> bool {
        self.nodes.contains_key(&kind.tag())
    }

    /// Returns `true` if edges of this variant may appear in the diagram type.
    pub fn allows_edge(&self, kind: &EdgeKind) -> bool {
        self.edges.contains_key(&kind.tag())
    }

    /// Returns the semantic rules, in evaluation order.
    pub fn rules(&self) -> &[SemanticRule] {
        &self.rules
    }
}

fn node_tags(diagram_type: DiagramType) -> &'static [NodeTag] {
    match diagram_type {
        DiagramType::Class => &[
            NodeTag::Class,
            NodeTag::Interface,
            NodeTag::Package,
            NodeTag::PackageDescription,
        ],
        DiagramType::Sequence => &[NodeTag::ImplicitParameter, NodeTag::Call],
        DiagramType::State => &[NodeTag::State, NodeTag::InitialState, NodeTag::FinalState],
        DiagramType::Object => &[NodeTag::Object, NodeTag::Field],
        DiagramType::UseCase => &[NodeTag::Actor, NodeTag::UseCase],
    }
}

fn edge_tags(diagram_type: DiagramType) -> &'static [EdgeTag] {
    match diagram_type {
        DiagramType::Class => &[
            EdgeTag::Dependency,
            EdgeTag::Generalization,
            EdgeTag::Association,
            EdgeTag::Aggregation,
        ],
        DiagramType::Sequence => &[EdgeTag::Call, EdgeTag::Constructor, EdgeTag::Return],
        DiagramType::State => &[EdgeTag::StateTransition],
        DiagramType::Object => &[EdgeTag::ObjectReference, EdgeTag::ObjectCollaboration],
        DiagramType::UseCase => &[
            EdgeTag::UseCaseAssociation,
            EdgeTag::UseCaseGeneralization,
            EdgeTag::UseCaseDependency,
        ],
    }
}

fn rules(diagram_type: DiagramType) -> Vec<SemanticRule> {
    use SemanticRule::*;

    match diagram_type {
        DiagramType::Class => vec![
            MaxEdges(1),
            NoSelfGeneralization,
            NoSelfEdge(EdgeTag::Dependency),
            NoDirectCycles(EdgeTag::Dependency),
            NoDirectCycles(EdgeTag::Generalization),
            NoDirectCycles(EdgeTag::Aggregation),
            NoCombinedAssociationAggregation,
        ],
        DiagramType::Sequence => vec![MaxEdges(1), ReturnEdge, CallEdgeEnd, SingleEntryPoint],
        DiagramType::State => vec![MaxEdges(2), NoEdgeFromFinalState, NoEdgeToInitialState],
        DiagramType::Object => vec![
            MaxEdges(1),
            FieldReference,
            ObjectCollaboration,
            NoSelfEdge(EdgeTag::ObjectCollaboration),
        ],
        DiagramType::UseCase => vec![
            MaxEdges(1),
            NoSelfEdge(EdgeTag::UseCaseAssociation),
            NoSelfEdge(EdgeTag::UseCaseGeneralization),
            NoSelfEdge(EdgeTag::UseCaseDependency),
            NoDirectCycles(EdgeTag::UseCaseGeneralization),
        ],
    }
}
