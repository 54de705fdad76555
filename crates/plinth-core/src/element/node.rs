//! Node variants and containment rules.

use std::{fmt, str::FromStr};

use crate::{
    element::Element,
    geometry::Point,
    property::{self, PropertyDescriptor, PropertyError, PropertyKind, PropertyValue},
};

/// Constructor producing a node variant in its default state.
pub type NodeConstructor = fn() -> NodeKind;

/// Identifies a concrete node variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Class,
    Interface,
    Package,
    PackageDescription,
    ImplicitParameter,
    Call,
    State,
    InitialState,
    FinalState,
    Object,
    Field,
    Actor,
    UseCase,
    Note,
    /// An attachment point for note edges that end in empty space.
    Point,
}

/// Whether a node variant lives inside a container node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// The node must be a root.
    Forbidden,
    /// The node may be a root or a child.
    Optional,
    /// The node must have a container.
    Required,
}

impl NodeTag {
    /// All node tags, in declaration order.
    pub const ALL: [NodeTag; 15] = [
        NodeTag::Class,
        NodeTag::Interface,
        NodeTag::Package,
        NodeTag::PackageDescription,
        NodeTag::ImplicitParameter,
        NodeTag::Call,
        NodeTag::State,
        NodeTag::InitialState,
        NodeTag::FinalState,
        NodeTag::Object,
        NodeTag::Field,
        NodeTag::Actor,
        NodeTag::UseCase,
        NodeTag::Note,
        NodeTag::Point,
    ];

    /// Returns the document name of this variant.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeTag::Class => "ClassNode",
            NodeTag::Interface => "InterfaceNode",
            NodeTag::Package => "PackageNode",
            NodeTag::PackageDescription => "PackageDescriptionNode",
            NodeTag::ImplicitParameter => "ImplicitParameterNode",
            NodeTag::Call => "CallNode",
            NodeTag::State => "StateNode",
            NodeTag::InitialState => "InitialStateNode",
            NodeTag::FinalState => "FinalStateNode",
            NodeTag::Object => "ObjectNode",
            NodeTag::Field => "FieldNode",
            NodeTag::Actor => "ActorNode",
            NodeTag::UseCase => "UseCaseNode",
            NodeTag::Note => "NoteNode",
            NodeTag::Point => "PointNode",
        }
    }

    /// Returns the constructor for this variant.
    pub fn constructor(self) -> NodeConstructor {
        match self {
            NodeTag::Class => || NodeKind::Class {
                name: String::new(),
                attributes: String::new(),
                methods: String::new(),
            },
            NodeTag::Interface => || NodeKind::Interface {
                name: String::new(),
                methods: String::new(),
            },
            NodeTag::Package => || NodeKind::Package {
                name: String::new(),
            },
            NodeTag::PackageDescription => || NodeKind::PackageDescription {
                name: String::new(),
                contents: String::new(),
            },
            NodeTag::ImplicitParameter => || NodeKind::ImplicitParameter {
                name: String::new(),
            },
            NodeTag::Call => || NodeKind::Call { open_bottom: false },
            NodeTag::State => || NodeKind::State {
                name: String::new(),
            },
            NodeTag::InitialState => || NodeKind::InitialState,
            NodeTag::FinalState => || NodeKind::FinalState,
            NodeTag::Object => || NodeKind::Object {
                name: String::new(),
            },
            NodeTag::Field => || NodeKind::Field {
                name: String::new(),
                value: String::new(),
            },
            NodeTag::Actor => || NodeKind::Actor {
                name: String::new(),
            },
            NodeTag::UseCase => || NodeKind::UseCase {
                name: String::new(),
            },
            NodeTag::Note => || NodeKind::Note {
                name: String::new(),
            },
            NodeTag::Point => || NodeKind::Point,
        }
    }

    /// Creates this variant in its default state.
    pub fn create(self) -> NodeKind {
        (self.constructor())()
    }

    /// Returns whether nodes of this variant need, accept or refuse a container.
    pub fn containment(self) -> Containment {
        match self {
            NodeTag::Class
            | NodeTag::Interface
            | NodeTag::Package
            | NodeTag::PackageDescription => Containment::Optional,
            NodeTag::Call | NodeTag::Field => Containment::Required,
            _ => Containment::Forbidden,
        }
    }

    /// Returns `true` if this variant may be nested under `parent`.
    pub fn accepts_parent(self, parent: NodeTag) -> bool {
        match self {
            NodeTag::Class
            | NodeTag::Interface
            | NodeTag::Package
            | NodeTag::PackageDescription => parent == NodeTag::Package,
            NodeTag::Call => parent == NodeTag::ImplicitParameter,
            NodeTag::Field => parent == NodeTag::Object,
            _ => false,
        }
    }

    /// Returns `true` if this variant may hold `child` in its child list.
    pub fn can_contain(self, child: NodeTag) -> bool {
        match self {
            NodeTag::Package => matches!(
                child,
                NodeTag::Class | NodeTag::Interface | NodeTag::Package | NodeTag::PackageDescription
            ),
            NodeTag::ImplicitParameter => child == NodeTag::Call,
            NodeTag::Object => child == NodeTag::Field,
            _ => false,
        }
    }

    /// Returns `true` if this variant can have children at all.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeTag::Package | NodeTag::ImplicitParameter | NodeTag::Object
        )
    }
}

impl FromStr for NodeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("unknown node type `{s}`"))
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const NAME: PropertyDescriptor = PropertyDescriptor::new("name", PropertyKind::String);
const ATTRIBUTES: PropertyDescriptor = PropertyDescriptor::new("attributes", PropertyKind::String);
const METHODS: PropertyDescriptor = PropertyDescriptor::new("methods", PropertyKind::String);
const CONTENTS: PropertyDescriptor = PropertyDescriptor::new("contents", PropertyKind::String);
const VALUE: PropertyDescriptor = PropertyDescriptor::new("value", PropertyKind::String);
const OPEN_BOTTOM: PropertyDescriptor =
    PropertyDescriptor::new("openBottom", PropertyKind::Boolean);

const CLASS_PROPERTIES: &[PropertyDescriptor] = &[NAME, ATTRIBUTES, METHODS];
const INTERFACE_PROPERTIES: &[PropertyDescriptor] = &[NAME, METHODS];
const NAMED_PROPERTIES: &[PropertyDescriptor] = &[NAME];
const PACKAGE_DESCRIPTION_PROPERTIES: &[PropertyDescriptor] = &[NAME, CONTENTS];
const CALL_PROPERTIES: &[PropertyDescriptor] = &[OPEN_BOTTOM];
const FIELD_PROPERTIES: &[PropertyDescriptor] = &[NAME, VALUE];

/// A node variant with its variant-specific state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Class {
        name: String,
        attributes: String,
        methods: String,
    },
    Interface {
        name: String,
        methods: String,
    },
    Package {
        name: String,
    },
    PackageDescription {
        name: String,
        contents: String,
    },
    ImplicitParameter {
        name: String,
    },
    Call {
        open_bottom: bool,
    },
    State {
        name: String,
    },
    InitialState,
    FinalState,
    Object {
        name: String,
    },
    Field {
        name: String,
        value: String,
    },
    Actor {
        name: String,
    },
    UseCase {
        name: String,
    },
    Note {
        name: String,
    },
    Point,
}

impl NodeKind {
    /// Creates a variant in its default state with its `name` property set.
    ///
    /// Variants without a name are returned in their default state.
    pub fn named(tag: NodeTag, name: impl Into<String>) -> Self {
        let mut kind = tag.create();
        if let Some(slot) = kind.text_mut(NAME.name()) {
            *slot = name.into();
        }
        kind
    }

    /// Returns the tag of this variant.
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Class { .. } => NodeTag::Class,
            NodeKind::Interface { .. } => NodeTag::Interface,
            NodeKind::Package { .. } => NodeTag::Package,
            NodeKind::PackageDescription { .. } => NodeTag::PackageDescription,
            NodeKind::ImplicitParameter { .. } => NodeTag::ImplicitParameter,
            NodeKind::Call { .. } => NodeTag::Call,
            NodeKind::State { .. } => NodeTag::State,
            NodeKind::InitialState => NodeTag::InitialState,
            NodeKind::FinalState => NodeTag::FinalState,
            NodeKind::Object { .. } => NodeTag::Object,
            NodeKind::Field { .. } => NodeTag::Field,
            NodeKind::Actor { .. } => NodeTag::Actor,
            NodeKind::UseCase { .. } => NodeTag::UseCase,
            NodeKind::Note { .. } => NodeTag::Note,
            NodeKind::Point => NodeTag::Point,
        }
    }

    /// Returns the `name` property, if the variant has one.
    pub fn name(&self) -> Option<&str> {
        self.text(NAME.name()).map(String::as_str)
    }

    fn text(&self, property: &str) -> Option<&String> {
        match (self, property) {
            (
                NodeKind::Class { name, .. }
                | NodeKind::Interface { name, .. }
                | NodeKind::Package { name }
                | NodeKind::PackageDescription { name, .. }
                | NodeKind::ImplicitParameter { name }
                | NodeKind::State { name }
                | NodeKind::Object { name }
                | NodeKind::Field { name, .. }
                | NodeKind::Actor { name }
                | NodeKind::UseCase { name }
                | NodeKind::Note { name },
                "name",
            ) => Some(name),
            (NodeKind::Class { attributes, .. }, "attributes") => Some(attributes),
            (NodeKind::Class { methods, .. } | NodeKind::Interface { methods, .. }, "methods") => {
                Some(methods)
            }
            (NodeKind::PackageDescription { contents, .. }, "contents") => Some(contents),
            (NodeKind::Field { value, .. }, "value") => Some(value),
            _ => None,
        }
    }

    fn text_mut(&mut self, property: &str) -> Option<&mut String> {
        match (self, property) {
            (
                NodeKind::Class { name, .. }
                | NodeKind::Interface { name, .. }
                | NodeKind::Package { name }
                | NodeKind::PackageDescription { name, .. }
                | NodeKind::ImplicitParameter { name }
                | NodeKind::State { name }
                | NodeKind::Object { name }
                | NodeKind::Field { name, .. }
                | NodeKind::Actor { name }
                | NodeKind::UseCase { name }
                | NodeKind::Note { name },
                "name",
            ) => Some(name),
            (NodeKind::Class { attributes, .. }, "attributes") => Some(attributes),
            (NodeKind::Class { methods, .. } | NodeKind::Interface { methods, .. }, "methods") => {
                Some(methods)
            }
            (NodeKind::PackageDescription { contents, .. }, "contents") => Some(contents),
            (NodeKind::Field { value, .. }, "value") => Some(value),
            _ => None,
        }
    }

    fn flag(&self, property: &str) -> Option<bool> {
        match (self, property) {
            (NodeKind::Call { open_bottom }, "openBottom") => Some(*open_bottom),
            _ => None,
        }
    }

    fn flag_mut(&mut self, property: &str) -> Option<&mut bool> {
        match (self, property) {
            (NodeKind::Call { open_bottom }, "openBottom") => Some(open_bottom),
            _ => None,
        }
    }
}

impl Element for NodeKind {
    fn tag_name(&self) -> &'static str {
        self.tag().as_str()
    }

    fn descriptors(&self) -> &'static [PropertyDescriptor] {
        match self.tag() {
            NodeTag::Class => CLASS_PROPERTIES,
            NodeTag::Interface => INTERFACE_PROPERTIES,
            NodeTag::PackageDescription => PACKAGE_DESCRIPTION_PROPERTIES,
            NodeTag::Call => CALL_PROPERTIES,
            NodeTag::Field => FIELD_PROPERTIES,
            NodeTag::InitialState | NodeTag::FinalState | NodeTag::Point => &[],
            NodeTag::Package
            | NodeTag::ImplicitParameter
            | NodeTag::State
            | NodeTag::Object
            | NodeTag::Actor
            | NodeTag::UseCase
            | NodeTag::Note => NAMED_PROPERTIES,
        }
    }

    fn property(&self, name: &str) -> Option<PropertyValue> {
        let descriptor = self.descriptors().iter().find(|d| d.name() == name)?;
        match descriptor.kind() {
            PropertyKind::String => self.text(name).cloned().map(PropertyValue::String),
            PropertyKind::Boolean => self.flag(name).map(PropertyValue::Boolean),
            // Node variants declare only text and flag properties.
            PropertyKind::Integer | PropertyKind::Enum(_) => None,
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        let element = self.tag_name();
        let descriptor = property::resolve(element, self.descriptors(), name)?;
        let applied = match property::coerce(descriptor, value)? {
            PropertyValue::String(text) => self.text_mut(name).map(|slot| *slot = text),
            PropertyValue::Boolean(flag) => self.flag_mut(name).map(|slot| *slot = flag),
            PropertyValue::Integer(_) | PropertyValue::Enum(_) => None,
        };
        applied.ok_or_else(|| PropertyError::Unknown {
            element,
            property: name.to_string(),
        })
    }
}

/// A node placed in a diagram.
///
/// The containment relation is owned by the [`Diagram`](crate::Diagram); a node
/// only carries its variant state and its own position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    position: Point,
}

impl Node {
    /// Creates a node at the origin.
    pub fn new(kind: NodeKind) -> Self {
        Self::at(kind, Point::default())
    }

    /// Creates a node at the given position.
    pub fn at(kind: NodeKind, position: Point) -> Self {
        Self { kind, position }
    }

    /// Borrow the variant state.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Mutably borrow the variant state.
    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Returns the variant tag.
    pub fn tag(&self) -> NodeTag {
        self.kind.tag()
    }

    /// Returns the node position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Moves the node to an absolute position.
    pub fn move_to(&mut self, position: Point) {
        self.position = position;
    }

    /// Moves the node by the given offsets.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.position = self.position.translate(dx, dy);
    }
}

impl From<NodeKind> for Node {
    fn from(kind: NodeKind) -> Self {
        Node::new(kind)
    }
}
