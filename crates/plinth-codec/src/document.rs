//! The persisted document model.
//!
//! A document is a JSON object:
//!
//! ```json
//! {
//!   "version": "3.8",
//!   "diagram": "ClassDiagram",
//!   "nodes": [
//!     { "id": 0, "type": "PackageNode", "x": 10, "y": 10, "name": "model", "children": [1] },
//!     { "id": 1, "type": "ClassNode", "x": 20, "y": 40, "name": "Account", "attributes": "", "methods": "" }
//!   ],
//!   "edges": [
//!     { "type": "NoteEdge", "start": 2, "end": 1 }
//!   ]
//! }
//! ```
//!
//! Variant-specific properties sit next to the fixed fields of a record and
//! keep their document order.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

/// The document format version written by this crate.
pub const FORMAT_VERSION: &str = "3.8";

/// A whole persisted diagram.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Document {
    pub version: String,
    pub diagram: String,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// One node of a document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub tag: String,
    pub x: i32,
    pub y: i32,
    /// Document ids of the direct children, in order.
    #[serde(default)]
    pub children: Vec<u64>,
    #[serde(flatten)]
    pub properties: IndexMap<String, Value>,
}

/// One edge of a document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EdgeRecord {
    #[serde(rename = "type")]
    pub tag: String,
    pub start: u64,
    pub end: u64,
    #[serde(flatten)]
    pub properties: IndexMap<String, Value>,
}

impl Document {
    /// Converts the document to a JSON value.
    ///
    /// Node records are written as `id`, `type`, `x`, `y`, the properties,
    /// then `children` when non-empty. Edge records are written as `type`,
    /// the properties, `start`, `end`.
    pub fn to_value(&self) -> Value {
        let mut document = Map::new();
        document.insert("version".to_string(), Value::from(self.version.as_str()));
        document.insert("diagram".to_string(), Value::from(self.diagram.as_str()));
        document.insert(
            "nodes".to_string(),
            self.nodes.iter().map(NodeRecord::to_value).collect(),
        );
        document.insert(
            "edges".to_string(),
            self.edges.iter().map(EdgeRecord::to_value).collect(),
        );
        Value::Object(document)
    }

    /// Renders the document as JSON text.
    pub fn to_json(&self, pretty: bool) -> String {
        let value = self.to_value();
        if pretty {
            format!("{value:#}")
        } else {
            value.to_string()
        }
    }
}

impl NodeRecord {
    fn to_value(&self) -> Value {
        let mut record = Map::new();
        record.insert("id".to_string(), Value::from(self.id));
        record.insert("type".to_string(), Value::from(self.tag.as_str()));
        record.insert("x".to_string(), Value::from(self.x));
        record.insert("y".to_string(), Value::from(self.y));
        extend(&mut record, &self.properties);
        if !self.children.is_empty() {
            record.insert(
                "children".to_string(),
                self.children.iter().copied().map(Value::from).collect(),
            );
        }
        Value::Object(record)
    }
}

impl EdgeRecord {
    fn to_value(&self) -> Value {
        let mut record = Map::new();
        record.insert("type".to_string(), Value::from(self.tag.as_str()));
        extend(&mut record, &self.properties);
        record.insert("start".to_string(), Value::from(self.start));
        record.insert("end".to_string(), Value::from(self.end));
        Value::Object(record)
    }
}

fn extend(record: &mut Map<String, Value>, properties: &IndexMap<String, Value>) {
    for (name, value) in properties {
        record.insert(name.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_properties_are_flattened() {
        let record: NodeRecord = serde_json::from_value(json!({
            "id": 4,
            "type": "FieldNode",
            "x": -3,
            "y": 7,
            "name": "balance",
            "value": "0"
        }))
        .unwrap();

        assert_eq!(record.id, 4);
        assert_eq!(record.tag, "FieldNode");
        assert_eq!((record.x, record.y), (-3, 7));
        assert!(record.children.is_empty());
        let names: Vec<_> = record.properties.keys().map(String::as_str).collect();
        assert_eq!(names, ["name", "value"]);
    }

    #[test]
    fn test_shape_errors() {
        let missing_end = serde_json::from_value::<EdgeRecord>(json!({
            "type": "NoteEdge",
            "start": 0
        }));
        assert!(missing_end.is_err());

        let text_id = serde_json::from_value::<NodeRecord>(json!({
            "id": "zero",
            "type": "NoteNode",
            "x": 0,
            "y": 0
        }));
        assert!(text_id.is_err());
    }

    #[test]
    fn test_to_value_field_order() {
        let document = Document {
            version: FORMAT_VERSION.to_string(),
            diagram: "ObjectDiagram".to_string(),
            nodes: vec![NodeRecord {
                id: 0,
                tag: "ObjectNode".to_string(),
                x: 1,
                y: 2,
                children: vec![1],
                properties: IndexMap::from([("name".to_string(), json!("acct"))]),
            }],
            edges: vec![EdgeRecord {
                tag: "ObjectCollaborationEdge".to_string(),
                start: 0,
                end: 0,
                properties: IndexMap::from([("middleLabel".to_string(), json!(""))]),
            }],
        };

        assert_eq!(
            document.to_json(false),
            r#"{"version":"3.8","diagram":"ObjectDiagram","nodes":[{"id":0,"type":"ObjectNode","x":1,"y":2,"name":"acct","children":[1]}],"edges":[{"type":"ObjectCollaborationEdge","middleLabel":"","start":0,"end":0}]}"#
        );

        let reparsed: Document = serde_json::from_str(&document.to_json(true)).unwrap();
        assert_eq!(reparsed, document);
    }
}
