//! Document to diagram conversion.
//!
//! Decoding happens in order:
//!
//! 1. Resolve the diagram type.
//! 2. Instantiate every node record from its type, position and properties.
//! 3. Link child lists, checking every id they mention.
//! 4. Insert parentless nodes as roots in declaration order, each followed
//!    by its subtree, recording document ids in an [`IdContext`].
//! 5. Resolve, build and attach every edge record.
//! 6. Validate the rebuilt diagram.
//!
//! Any failure before the last step aborts decoding. A semantic violation in
//! the last step is reported together with the rebuilt diagram.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, trace};
use plinth_core::{
    Diagram, NodeId, Validator, Violation,
    element::{Edge, EdgeTag, Element, Node, NodeTag},
    geometry::Point,
    property::{PropertyError, PropertyValue},
    registry::{self, DiagramDescriptor},
};
use serde_json::Value;

use crate::{
    context::IdContext,
    document::{Document, EdgeRecord, NodeRecord},
    error::{DecodeError, RecordRef},
};

/// Parses JSON text and decodes it.
///
/// # Errors
///
/// Returns [`DecodeError::Syntax`] for malformed JSON, and any error of
/// [`decode_value`] otherwise.
pub fn decode_str(text: &str) -> Result<Diagram, DecodeError> {
    let value: Value = serde_json::from_str(text).map_err(DecodeError::Syntax)?;
    decode_value(value)
}

/// Decodes a parsed JSON document.
///
/// # Errors
///
/// Returns [`DecodeError::Shape`] if the value is not shaped like a
/// [`Document`], and any error of [`decode`] otherwise.
pub fn decode_value(value: Value) -> Result<Diagram, DecodeError> {
    let document: Document = serde_json::from_value(value).map_err(DecodeError::Shape)?;
    decode(&document)
}

/// Rebuilds a diagram from a document.
///
/// # Errors
///
/// Returns a structural error if the document does not describe a sound
/// diagram, and [`DecodeError::Semantic`] with the rebuilt diagram if an edge
/// breaks a rule of the diagram type.
pub fn decode(document: &Document) -> Result<Diagram, DecodeError> {
    let diagram_type = document
        .diagram
        .parse()
        .map_err(|_| DecodeError::UnknownDiagramType(document.diagram.clone()))?;
    debug!(
        version = document.version.as_str(),
        diagram:% = diagram_type,
        nodes = document.nodes.len(),
        edges = document.edges.len();
        "Decoding document"
    );

    let mut decoder = Decoder {
        descriptor: registry::descriptor(diagram_type),
        diagram: Diagram::new(diagram_type),
        context: IdContext::new(),
    };
    decoder.insert_nodes(&document.nodes)?;
    decoder.insert_edges(&document.edges)?;
    decoder.validate()
}

struct Decoder {
    descriptor: &'static DiagramDescriptor,
    diagram: Diagram,
    context: IdContext,
}

impl Decoder {
    fn insert_nodes(&mut self, records: &[NodeRecord]) -> Result<(), DecodeError> {
        let mut pending = HashMap::with_capacity(records.len());
        for record in records {
            let node = self.instantiate_node(record)?;
            if pending.insert(record.id, node).is_some() {
                return Err(DecodeError::DuplicateNodeId(record.id));
            }
        }

        let mut parents = HashMap::new();
        let mut children = HashMap::new();
        for record in records {
            for &child in &record.children {
                if child == record.id {
                    return Err(DecodeError::SelfContainment(child));
                }
                if !pending.contains_key(&child) {
                    return Err(DecodeError::UnknownNodeId {
                        record: RecordRef::Node(record.id),
                        id: child,
                    });
                }
                if let Some(first) = parents.insert(child, record.id) {
                    return Err(DecodeError::MultipleParents {
                        child,
                        first,
                        second: record.id,
                    });
                }
            }
            children.insert(record.id, record.children.as_slice());
        }

        for record in records {
            if !parents.contains_key(&record.id) {
                self.insert_subtree(record.id, None, &mut pending, &children)?;
            }
        }

        // Whatever was not reached from a root hangs off a containment cycle.
        match records.iter().find(|record| pending.contains_key(&record.id)) {
            Some(stranded) => Err(DecodeError::ContainmentCycle(stranded.id)),
            None => Ok(()),
        }
    }

    /// Inserts a record and everything below it in pre-order. The walk keeps
    /// its own stack so deep containment chains cannot exhaust the call stack.
    fn insert_subtree(
        &mut self,
        root: u64,
        parent: Option<NodeId>,
        pending: &mut HashMap<u64, Node>,
        children: &HashMap<u64, &[u64]>,
    ) -> Result<(), DecodeError> {
        let mut stack = vec![(root, parent)];
        while let Some((doc_id, parent)) = stack.pop() {
            let Some(node) = pending.remove(&doc_id) else {
                continue;
            };
            let id = match parent {
                Some(parent) => self.diagram.add_child_node(parent, node)?,
                None => self.diagram.add_root_node(node),
            };
            self.context.insert(doc_id, id);
            trace!(doc_id = doc_id, id:% = id; "Inserted node");

            let records = children.get(&doc_id).copied().unwrap_or_default();
            stack.extend(records.iter().rev().map(|&child| (child, Some(id))));
        }
        Ok(())
    }

    fn instantiate_node(&self, record: &NodeRecord) -> Result<Node, DecodeError> {
        let reference = RecordRef::Node(record.id);
        let mut kind = record
            .tag
            .parse::<NodeTag>()
            .ok()
            .and_then(|tag| self.descriptor.create_node(tag))
            .ok_or_else(|| DecodeError::UnknownNodeType {
                record: reference,
                tag: record.tag.clone(),
                diagram_type: self.descriptor.diagram_type(),
            })?;
        apply_properties(&mut kind, &record.properties, reference)?;
        Ok(Node::at(kind, Point::new(record.x, record.y)))
    }

    fn insert_edges(&mut self, records: &[EdgeRecord]) -> Result<(), DecodeError> {
        for (index, record) in records.iter().enumerate() {
            let reference = RecordRef::Edge(index);
            let resolve = |id: u64| {
                self.context
                    .node(id)
                    .ok_or(DecodeError::UnknownNodeId {
                        record: reference,
                        id,
                    })
            };
            let start = resolve(record.start)?;
            let end = resolve(record.end)?;

            let mut kind = record
                .tag
                .parse::<EdgeTag>()
                .ok()
                .and_then(|tag| self.descriptor.create_edge(tag))
                .ok_or_else(|| DecodeError::UnknownEdgeType {
                    record: reference,
                    tag: record.tag.clone(),
                    diagram_type: self.descriptor.diagram_type(),
                })?;
            apply_properties(&mut kind, &record.properties, reference)?;

            self.diagram.add_edge(Edge::connected(kind, start, end))?;
        }
        Ok(())
    }

    fn validate(self) -> Result<Diagram, DecodeError> {
        match Validator::new(&self.diagram).validate() {
            Ok(()) => {
                debug!(
                    nodes = self.diagram.nodes_count(),
                    edges = self.diagram.edges_count();
                    "Decoded diagram"
                );
                Ok(self.diagram)
            }
            Err(Violation::Structural(violation)) => Err(violation.into()),
            Err(Violation::Semantic(violation)) => Err(DecodeError::Semantic {
                violation,
                diagram: Box::new(self.diagram),
            }),
        }
    }
}

/// Sets every recorded property, then checks that none is missing.
fn apply_properties(
    element: &mut impl Element,
    properties: &IndexMap<String, Value>,
    record: RecordRef,
) -> Result<(), DecodeError> {
    let invalid = |source| DecodeError::Property { record, source };

    for (name, value) in properties {
        let descriptor = element
            .descriptors()
            .iter()
            .find(|descriptor| descriptor.name() == name)
            .ok_or_else(|| {
                invalid(PropertyError::Unknown {
                    element: element.tag_name(),
                    property: name.clone(),
                })
            })?;
        let value = property_value(value).ok_or_else(|| {
            invalid(PropertyError::TypeMismatch {
                property: descriptor.name(),
                expected: descriptor.kind().type_name(),
                found: json_type_name(value),
            })
        })?;
        element
            .set_property(descriptor.name(), value)
            .map_err(invalid)?;
    }

    match element
        .descriptors()
        .iter()
        .find(|descriptor| !properties.contains_key(descriptor.name()))
    {
        Some(missing) => Err(DecodeError::MissingProperty {
            record,
            element: element.tag_name(),
            property: missing.name(),
        }),
        None => Ok(()),
    }
}

fn property_value(value: &Value) -> Option<PropertyValue> {
    match value {
        Value::String(text) => Some(PropertyValue::String(text.clone())),
        Value::Bool(flag) => Some(PropertyValue::Boolean(*flag)),
        Value::Number(number) => number.as_i64().map(PropertyValue::Integer),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_i64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
