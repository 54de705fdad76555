//! Diagram to document conversion.

use indexmap::IndexMap;
use log::debug;
use plinth_core::{
    Diagram,
    element::Element,
    property::PropertyValue,
};
use serde_json::Value;

use crate::{
    context::IdContext,
    document::{Document, EdgeRecord, FORMAT_VERSION, NodeRecord},
};

/// Converts a diagram to a document in the current format.
///
/// Node ids are assigned afresh on every call, sequentially from 0 in
/// pre-order, so encoding an unchanged diagram always yields the same
/// document.
pub fn encode(diagram: &Diagram) -> Document {
    let context = IdContext::for_encoding(diagram);

    let nodes: Vec<_> = context
        .iter()
        .filter_map(|(doc_id, id)| {
            let node = diagram.node(id)?;
            Some(NodeRecord {
                id: doc_id,
                tag: node.tag().as_str().to_string(),
                x: node.position().x(),
                y: node.position().y(),
                children: diagram
                    .children(id)
                    .iter()
                    .filter_map(|&child| context.id(child))
                    .collect(),
                properties: properties(node.kind()),
            })
        })
        .collect();

    let edges: Vec<_> = diagram
        .edges()
        .filter_map(|(_, edge)| {
            let (start, end) = edge.endpoints()?;
            Some(EdgeRecord {
                tag: edge.tag().as_str().to_string(),
                start: context.id(start)?,
                end: context.id(end)?,
                properties: properties(edge.kind()),
            })
        })
        .collect();

    debug!(
        diagram:% = diagram.diagram_type(),
        nodes = nodes.len(),
        edges = edges.len();
        "Encoded diagram"
    );

    Document {
        version: FORMAT_VERSION.to_string(),
        diagram: diagram.diagram_type().as_str().to_string(),
        nodes,
        edges,
    }
}

/// Converts a diagram to JSON text in the current format.
pub fn encode_to_string(diagram: &Diagram, pretty: bool) -> String {
    encode(diagram).to_json(pretty)
}

fn properties(element: &impl Element) -> IndexMap<String, Value> {
    element
        .properties()
        .into_iter()
        .map(|(name, value)| (name.to_string(), property_value(value)))
        .collect()
}

fn property_value(value: PropertyValue) -> Value {
    match value {
        PropertyValue::String(text) => Value::String(text),
        PropertyValue::Integer(number) => Value::from(number),
        PropertyValue::Boolean(flag) => Value::Bool(flag),
        PropertyValue::Enum(constant) => Value::from(constant),
    }
}
