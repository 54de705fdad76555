//! Edge variants and their enumeration properties.

use std::{fmt, str::FromStr};

use crate::{
    diagram::NodeId,
    element::Element,
    property::{
        self, PropertyDescriptor, PropertyError, PropertyKind, PropertyValue, property_enum,
    },
};

/// Constructor producing an edge variant in its default state.
pub type EdgeConstructor = fn() -> EdgeKind;

property_enum! {
    /// Arrow heads on a class dependency.
    Directionality {
        #[default]
        Unidirectional,
        Bidirectional,
    }
}

property_enum! {
    /// Navigability of a class association.
    AssociationDirectionality {
        #[default]
        None,
        Start,
        End,
        Both,
    }
}

property_enum! {
    /// Flavor of a generalization edge.
    GeneralizationType {
        #[default]
        Inheritance,
        Implementation,
    }
}

property_enum! {
    /// Flavor of a whole-part edge.
    AggregationType {
        #[default]
        Aggregation,
        Composition,
    }
}

property_enum! {
    /// Stereotype of a use case dependency.
    UseCaseDependencyType {
        #[default]
        Include,
        Extend,
    }
}

/// Identifies a concrete edge variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeTag {
    Dependency,
    Generalization,
    Association,
    Aggregation,
    Call,
    Constructor,
    Return,
    StateTransition,
    ObjectReference,
    ObjectCollaboration,
    UseCaseAssociation,
    UseCaseGeneralization,
    UseCaseDependency,
    Note,
}

impl EdgeTag {
    /// All edge tags, in declaration order.
    pub const ALL: [EdgeTag; 14] = [
        EdgeTag::Dependency,
        EdgeTag::Generalization,
        EdgeTag::Association,
        EdgeTag::Aggregation,
        EdgeTag::Call,
        EdgeTag::Constructor,
        EdgeTag::Return,
        EdgeTag::StateTransition,
        EdgeTag::ObjectReference,
        EdgeTag::ObjectCollaboration,
        EdgeTag::UseCaseAssociation,
        EdgeTag::UseCaseGeneralization,
        EdgeTag::UseCaseDependency,
        EdgeTag::Note,
    ];

    /// Returns the document name of this variant.
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeTag::Dependency => "DependencyEdge",
            EdgeTag::Generalization => "GeneralizationEdge",
            EdgeTag::Association => "AssociationEdge",
            EdgeTag::Aggregation => "AggregationEdge",
            EdgeTag::Call => "CallEdge",
            EdgeTag::Constructor => "ConstructorEdge",
            EdgeTag::Return => "ReturnEdge",
            EdgeTag::StateTransition => "StateTransitionEdge",
            EdgeTag::ObjectReference => "ObjectReferenceEdge",
            EdgeTag::ObjectCollaboration => "ObjectCollaborationEdge",
            EdgeTag::UseCaseAssociation => "UseCaseAssociationEdge",
            EdgeTag::UseCaseGeneralization => "UseCaseGeneralizationEdge",
            EdgeTag::UseCaseDependency => "UseCaseDependencyEdge",
            EdgeTag::Note => "NoteEdge",
        }
    }

    /// Returns the constructor for this variant.
    pub fn constructor(self) -> EdgeConstructor {
        match self {
            EdgeTag::Dependency => || EdgeKind::Dependency {
                middle_label: String::new(),
                directionality: Directionality::default(),
            },
            EdgeTag::Generalization => || EdgeKind::Generalization {
                generalization_type: GeneralizationType::default(),
            },
            EdgeTag::Association => || EdgeKind::Association {
                start_label: String::new(),
                middle_label: String::new(),
                end_label: String::new(),
                directionality: AssociationDirectionality::default(),
            },
            EdgeTag::Aggregation => || EdgeKind::Aggregation {
                start_label: String::new(),
                middle_label: String::new(),
                end_label: String::new(),
                aggregation_type: AggregationType::default(),
            },
            EdgeTag::Call => || EdgeKind::Call {
                middle_label: String::new(),
                signal: false,
            },
            EdgeTag::Constructor => || EdgeKind::Constructor {
                middle_label: String::new(),
            },
            EdgeTag::Return => || EdgeKind::Return {
                middle_label: String::new(),
            },
            EdgeTag::StateTransition => || EdgeKind::StateTransition {
                middle_label: String::new(),
            },
            EdgeTag::ObjectReference => || EdgeKind::ObjectReference,
            EdgeTag::ObjectCollaboration => || EdgeKind::ObjectCollaboration {
                middle_label: String::new(),
            },
            EdgeTag::UseCaseAssociation => || EdgeKind::UseCaseAssociation,
            EdgeTag::UseCaseGeneralization => || EdgeKind::UseCaseGeneralization,
            EdgeTag::UseCaseDependency => || EdgeKind::UseCaseDependency {
                dependency_type: UseCaseDependencyType::default(),
            },
            EdgeTag::Note => || EdgeKind::Note,
        }
    }

    /// Creates this variant in its default state.
    pub fn create(self) -> EdgeKind {
        (self.constructor())()
    }
}

impl FromStr for EdgeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EdgeTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("unknown edge type `{s}`"))
    }
}

impl fmt::Display for EdgeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const START_LABEL: PropertyDescriptor =
    PropertyDescriptor::new("startLabel", PropertyKind::String);
const MIDDLE_LABEL: PropertyDescriptor =
    PropertyDescriptor::new("middleLabel", PropertyKind::String);
const END_LABEL: PropertyDescriptor = PropertyDescriptor::new("endLabel", PropertyKind::String);
const SIGNAL: PropertyDescriptor = PropertyDescriptor::new("signal", PropertyKind::Boolean);
const DEPENDENCY_DIRECTIONALITY: PropertyDescriptor = PropertyDescriptor::new(
    "directionality",
    PropertyKind::Enum(Directionality::VARIANTS),
);
const ASSOCIATION_DIRECTIONALITY: PropertyDescriptor = PropertyDescriptor::new(
    "directionality",
    PropertyKind::Enum(AssociationDirectionality::VARIANTS),
);
const GENERALIZATION_TYPE: PropertyDescriptor = PropertyDescriptor::new(
    "generalizationType",
    PropertyKind::Enum(GeneralizationType::VARIANTS),
);
const AGGREGATION_TYPE: PropertyDescriptor = PropertyDescriptor::new(
    "aggregationType",
    PropertyKind::Enum(AggregationType::VARIANTS),
);
const DEPENDENCY_TYPE: PropertyDescriptor = PropertyDescriptor::new(
    "dependencyType",
    PropertyKind::Enum(UseCaseDependencyType::VARIANTS),
);

const DEPENDENCY_PROPERTIES: &[PropertyDescriptor] = &[MIDDLE_LABEL, DEPENDENCY_DIRECTIONALITY];
const GENERALIZATION_PROPERTIES: &[PropertyDescriptor] = &[GENERALIZATION_TYPE];
const ASSOCIATION_PROPERTIES: &[PropertyDescriptor] =
    &[START_LABEL, MIDDLE_LABEL, END_LABEL, ASSOCIATION_DIRECTIONALITY];
const AGGREGATION_PROPERTIES: &[PropertyDescriptor] =
    &[START_LABEL, MIDDLE_LABEL, END_LABEL, AGGREGATION_TYPE];
const CALL_PROPERTIES: &[PropertyDescriptor] = &[MIDDLE_LABEL, SIGNAL];
const LABELED_PROPERTIES: &[PropertyDescriptor] = &[MIDDLE_LABEL];
const USE_CASE_DEPENDENCY_PROPERTIES: &[PropertyDescriptor] = &[DEPENDENCY_TYPE];

/// An edge variant with its variant-specific state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeKind {
    Dependency {
        middle_label: String,
        directionality: Directionality,
    },
    Generalization {
        generalization_type: GeneralizationType,
    },
    Association {
        start_label: String,
        middle_label: String,
        end_label: String,
        directionality: AssociationDirectionality,
    },
    Aggregation {
        start_label: String,
        middle_label: String,
        end_label: String,
        aggregation_type: AggregationType,
    },
    Call {
        middle_label: String,
        signal: bool,
    },
    /// A call that creates the object it targets.
    Constructor {
        middle_label: String,
    },
    Return {
        middle_label: String,
    },
    StateTransition {
        middle_label: String,
    },
    ObjectReference,
    ObjectCollaboration {
        middle_label: String,
    },
    UseCaseAssociation,
    UseCaseGeneralization,
    UseCaseDependency {
        dependency_type: UseCaseDependencyType,
    },
    Note,
}

impl EdgeKind {
    /// Returns the tag of this variant.
    pub fn tag(&self) -> EdgeTag {
        match self {
            EdgeKind::Dependency { .. } => EdgeTag::Dependency,
            EdgeKind::Generalization { .. } => EdgeTag::Generalization,
            EdgeKind::Association { .. } => EdgeTag::Association,
            EdgeKind::Aggregation { .. } => EdgeTag::Aggregation,
            EdgeKind::Call { .. } => EdgeTag::Call,
            EdgeKind::Constructor { .. } => EdgeTag::Constructor,
            EdgeKind::Return { .. } => EdgeTag::Return,
            EdgeKind::StateTransition { .. } => EdgeTag::StateTransition,
            EdgeKind::ObjectReference => EdgeTag::ObjectReference,
            EdgeKind::ObjectCollaboration { .. } => EdgeTag::ObjectCollaboration,
            EdgeKind::UseCaseAssociation => EdgeTag::UseCaseAssociation,
            EdgeKind::UseCaseGeneralization => EdgeTag::UseCaseGeneralization,
            EdgeKind::UseCaseDependency { .. } => EdgeTag::UseCaseDependency,
            EdgeKind::Note => EdgeTag::Note,
        }
    }

    /// Returns the `middleLabel` property, if the variant has one.
    pub fn middle_label(&self) -> Option<&str> {
        self.text(MIDDLE_LABEL.name()).map(String::as_str)
    }

    fn text(&self, property: &str) -> Option<&String> {
        match (self, property) {
            (
                EdgeKind::Association { start_label, .. }
                | EdgeKind::Aggregation { start_label, .. },
                "startLabel",
            ) => Some(start_label),
            (
                EdgeKind::Association { end_label, .. } | EdgeKind::Aggregation { end_label, .. },
                "endLabel",
            ) => Some(end_label),
            (
                EdgeKind::Dependency { middle_label, .. }
                | EdgeKind::Association { middle_label, .. }
                | EdgeKind::Aggregation { middle_label, .. }
                | EdgeKind::Call { middle_label, .. }
                | EdgeKind::Constructor { middle_label }
                | EdgeKind::Return { middle_label }
                | EdgeKind::StateTransition { middle_label }
                | EdgeKind::ObjectCollaboration { middle_label },
                "middleLabel",
            ) => Some(middle_label),
            _ => None,
        }
    }

    fn text_mut(&mut self, property: &str) -> Option<&mut String> {
        match (self, property) {
            (
                EdgeKind::Association { start_label, .. }
                | EdgeKind::Aggregation { start_label, .. },
                "startLabel",
            ) => Some(start_label),
            (
                EdgeKind::Association { end_label, .. } | EdgeKind::Aggregation { end_label, .. },
                "endLabel",
            ) => Some(end_label),
            (
                EdgeKind::Dependency { middle_label, .. }
                | EdgeKind::Association { middle_label, .. }
                | EdgeKind::Aggregation { middle_label, .. }
                | EdgeKind::Call { middle_label, .. }
                | EdgeKind::Constructor { middle_label }
                | EdgeKind::Return { middle_label }
                | EdgeKind::StateTransition { middle_label }
                | EdgeKind::ObjectCollaboration { middle_label },
                "middleLabel",
            ) => Some(middle_label),
            _ => None,
        }
    }

    fn flag(&self, property: &str) -> Option<bool> {
        match (self, property) {
            (EdgeKind::Call { signal, .. }, "signal") => Some(*signal),
            _ => None,
        }
    }

    fn flag_mut(&mut self, property: &str) -> Option<&mut bool> {
        match (self, property) {
            (EdgeKind::Call { signal, .. }, "signal") => Some(signal),
            _ => None,
        }
    }

    fn choice(&self, property: &str) -> Option<&'static str> {
        match (self, property) {
            (EdgeKind::Dependency { directionality, .. }, "directionality") => {
                Some(directionality.as_str())
            }
            (EdgeKind::Association { directionality, .. }, "directionality") => {
                Some(directionality.as_str())
            }
            (
                EdgeKind::Generalization {
                    generalization_type,
                },
                "generalizationType",
            ) => Some(generalization_type.as_str()),
            (EdgeKind::Aggregation { aggregation_type, .. }, "aggregationType") => {
                Some(aggregation_type.as_str())
            }
            (EdgeKind::UseCaseDependency { dependency_type }, "dependencyType") => {
                Some(dependency_type.as_str())
            }
            _ => None,
        }
    }

    fn set_choice(&mut self, property: &str, constant: &str) -> Option<Result<(), String>> {
        match (self, property) {
            (EdgeKind::Dependency { directionality, .. }, "directionality") => {
                Some(constant.parse().map(|value| *directionality = value))
            }
            (EdgeKind::Association { directionality, .. }, "directionality") => {
                Some(constant.parse().map(|value| *directionality = value))
            }
            (
                EdgeKind::Generalization {
                    generalization_type,
                },
                "generalizationType",
            ) => Some(constant.parse().map(|value| *generalization_type = value)),
            (EdgeKind::Aggregation { aggregation_type, .. }, "aggregationType") => {
                Some(constant.parse().map(|value| *aggregation_type = value))
            }
            (EdgeKind::UseCaseDependency { dependency_type }, "dependencyType") => {
                Some(constant.parse().map(|value| *dependency_type = value))
            }
            _ => None,
        }
    }
}

impl Element for EdgeKind {
    fn tag_name(&self) -> &'static str {
        self.tag().as_str()
    }

    fn descriptors(&self) -> &'static [PropertyDescriptor] {
        match self.tag() {
            EdgeTag::Dependency => DEPENDENCY_PROPERTIES,
            EdgeTag::Generalization => GENERALIZATION_PROPERTIES,
            EdgeTag::Association => ASSOCIATION_PROPERTIES,
            EdgeTag::Aggregation => AGGREGATION_PROPERTIES,
            EdgeTag::Call => CALL_PROPERTIES,
            EdgeTag::Constructor
            | EdgeTag::Return
            | EdgeTag::StateTransition
            | EdgeTag::ObjectCollaboration => LABELED_PROPERTIES,
            EdgeTag::UseCaseDependency => USE_CASE_DEPENDENCY_PROPERTIES,
            EdgeTag::ObjectReference
            | EdgeTag::UseCaseAssociation
            | EdgeTag::UseCaseGeneralization
            | EdgeTag::Note => &[],
        }
    }

    fn property(&self, name: &str) -> Option<PropertyValue> {
        let descriptor = self.descriptors().iter().find(|d| d.name() == name)?;
        match descriptor.kind() {
            PropertyKind::String => self.text(name).cloned().map(PropertyValue::String),
            PropertyKind::Boolean => self.flag(name).map(PropertyValue::Boolean),
            PropertyKind::Enum(_) => self.choice(name).map(PropertyValue::Enum),
            // No edge variant declares an integer property.
            PropertyKind::Integer => None,
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        let element = self.tag_name();
        let descriptor = property::resolve(element, self.descriptors(), name)?;
        let applied = match property::coerce(descriptor, value)? {
            PropertyValue::String(text) => self.text_mut(name).map(|slot| {
                *slot = text;
                Ok(())
            }),
            PropertyValue::Boolean(flag) => self.flag_mut(name).map(|slot| {
                *slot = flag;
                Ok(())
            }),
            PropertyValue::Enum(constant) => self.set_choice(name, constant),
            PropertyValue::Integer(_) => None,
        };

        match applied {
            Some(Ok(())) => Ok(()),
            Some(Err(value)) => Err(PropertyError::InvalidConstant {
                property: descriptor.name(),
                value,
                allowed: &[],
            }),
            None => Err(PropertyError::Unknown {
                element,
                property: name.to_string(),
            }),
        }
    }
}

/// An edge between two nodes of a diagram.
///
/// Endpoints are unset only while an edge is being created interactively; a
/// [`Diagram`](crate::Diagram) refuses to store an edge that is not connected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    kind: EdgeKind,
    start: Option<NodeId>,
    end: Option<NodeId>,
}

impl Edge {
    /// Creates an unconnected edge.
    pub fn new(kind: EdgeKind) -> Self {
        Self {
            kind,
            start: None,
            end: None,
        }
    }

    /// Creates an edge connected to the given endpoints.
    pub fn connected(kind: EdgeKind, start: NodeId, end: NodeId) -> Self {
        let mut edge = Self::new(kind);
        edge.connect(start, end);
        edge
    }

    /// Attaches both endpoints.
    pub fn connect(&mut self, start: NodeId, end: NodeId) {
        self.start = Some(start);
        self.end = Some(end);
    }

    /// Borrow the variant state.
    pub fn kind(&self) -> &EdgeKind {
        &self.kind
    }

    /// Mutably borrow the variant state.
    pub fn kind_mut(&mut self) -> &mut EdgeKind {
        &mut self.kind
    }

    /// Returns the variant tag.
    pub fn tag(&self) -> EdgeTag {
        self.kind.tag()
    }

    /// Returns the start node, if connected.
    pub fn start(&self) -> Option<NodeId> {
        self.start
    }

    /// Returns the end node, if connected.
    pub fn end(&self) -> Option<NodeId> {
        self.end
    }

    /// Returns both endpoints when the edge is fully connected.
    pub fn endpoints(&self) -> Option<(NodeId, NodeId)> {
        self.start.zip(self.end)
    }

    /// Returns `true` if the edge starts or ends on `node`.
    pub fn touches(&self, node: NodeId) -> bool {
        self.start == Some(node) || self.end == Some(node)
    }
}
