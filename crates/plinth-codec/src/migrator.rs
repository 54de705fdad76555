//! Rewrites obsolete document shapes into the current shape.
//!
//! Migration runs on raw JSON, before decoding. Each rule targets one
//! diagram type, is independent of the others, and is idempotent. Shapes a
//! rule does not recognize are left alone; the decoder reports genuine
//! incompatibilities.

use log::{debug, info};
use serde_json::{Map, Value};

/// The outcome of [`migrate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    /// The document in the current shape.
    pub document: Value,
    /// Whether any rule rewrote the document.
    pub migrated: bool,
}

struct Rule {
    name: &'static str,
    diagram: &'static str,
    apply: fn(&mut Map<String, Value>) -> bool,
}

const RULES: &[Rule] = &[
    Rule {
        name: "package contents superseded by children",
        diagram: "ClassDiagram",
        apply: drop_contents_of_filled_packages,
    },
    Rule {
        name: "content-only package becomes package description",
        diagram: "ClassDiagram",
        apply: convert_content_only_packages,
    },
    Rule {
        name: "self dependency removed",
        diagram: "ClassDiagram",
        apply: drop_self_dependencies,
    },
    Rule {
        name: "sequence edge end labels removed",
        diagram: "SequenceDiagram",
        apply: drop_sequence_end_labels,
    },
];

/// Applies every migration rule to a raw document.
pub fn migrate(mut document: Value) -> Migration {
    let mut migrated = false;
    if let Some(root) = document.as_object_mut() {
        let diagram = root
            .get("diagram")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        for rule in RULES.iter().filter(|rule| rule.diagram == diagram) {
            if (rule.apply)(root) {
                info!(rule = rule.name; "Migrated document");
                migrated = true;
            }
        }
    }
    if !migrated {
        debug!("Document already in current shape");
    }
    Migration { document, migrated }
}

fn records<'a>(
    root: &'a mut Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a mut Map<String, Value>> {
    root.get_mut(key)
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

fn has_type(record: &Map<String, Value>, tags: &[&str]) -> bool {
    record
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|tag| tags.contains(&tag))
}

fn has_children(record: &Map<String, Value>) -> bool {
    record
        .get("children")
        .and_then(Value::as_array)
        .is_some_and(|children| !children.is_empty())
}

fn drop_contents_of_filled_packages(root: &mut Map<String, Value>) -> bool {
    let mut changed = false;
    for node in records(root, "nodes") {
        if has_type(node, &["PackageNode"]) && has_children(node) {
            changed |= node.remove("contents").is_some();
        }
    }
    changed
}

fn convert_content_only_packages(root: &mut Map<String, Value>) -> bool {
    let mut changed = false;
    for node in records(root, "nodes") {
        if has_type(node, &["PackageNode"])
            && node.contains_key("contents")
            && !has_children(node)
        {
            node.insert("type".to_string(), Value::from("PackageDescriptionNode"));
            changed = true;
        }
    }
    changed
}

// Compatibility shim: older editors could save a dependency from a class to
// itself, which the class rules now reject.
fn drop_self_dependencies(root: &mut Map<String, Value>) -> bool {
    let Some(edges) = root.get_mut("edges").and_then(Value::as_array_mut) else {
        return false;
    };
    let before = edges.len();
    edges.retain(|edge| {
        let is_self_dependency = edge.as_object().is_some_and(|edge| {
            has_type(edge, &["DependencyEdge"])
                && edge.get("start").is_some()
                && edge.get("start") == edge.get("end")
        });
        !is_self_dependency
    });
    edges.len() != before
}

fn drop_sequence_end_labels(root: &mut Map<String, Value>) -> bool {
    let mut changed = false;
    for edge in records(root, "edges") {
        if has_type(edge, &["CallEdge", "ReturnEdge", "ConstructorEdge"]) {
            changed |= edge.remove("startLabel").is_some();
            changed |= edge.remove("endLabel").is_some();
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_filled_package_loses_contents() {
        let migration = migrate(json!({
            "version": "2.1",
            "diagram": "ClassDiagram",
            "nodes": [
                { "id": 0, "type": "PackageNode", "x": 0, "y": 0, "name": "p", "contents": "old", "children": [1] },
                { "id": 1, "type": "ClassNode", "x": 0, "y": 0, "name": "A", "attributes": "", "methods": "" }
            ],
            "edges": []
        }));

        assert!(migration.migrated);
        assert_eq!(
            migration.document["nodes"][0],
            json!({ "id": 0, "type": "PackageNode", "x": 0, "y": 0, "name": "p", "children": [1] })
        );
    }

    #[test]
    fn test_content_only_package_becomes_description() {
        let migration = migrate(json!({
            "version": "2.1",
            "diagram": "ClassDiagram",
            "nodes": [
                { "id": 0, "type": "PackageNode", "x": 0, "y": 0, "name": "p", "contents": "notes", "children": [] }
            ],
            "edges": []
        }));

        assert!(migration.migrated);
        assert_eq!(
            migration.document["nodes"][0],
            json!({
                "id": 0,
                "type": "PackageDescriptionNode",
                "x": 0,
                "y": 0,
                "name": "p",
                "contents": "notes",
                "children": []
            })
        );
    }

    #[test]
    fn test_self_dependency_dropped() {
        let migration = migrate(json!({
            "version": "2.1",
            "diagram": "ClassDiagram",
            "nodes": [],
            "edges": [
                { "type": "DependencyEdge", "start": 0, "end": 0 },
                { "type": "DependencyEdge", "start": 0, "end": 1 },
                { "type": "GeneralizationEdge", "start": 1, "end": 1 }
            ]
        }));

        assert!(migration.migrated);
        assert_eq!(
            migration.document["edges"],
            json!([
                { "type": "DependencyEdge", "start": 0, "end": 1 },
                { "type": "GeneralizationEdge", "start": 1, "end": 1 }
            ])
        );
    }

    #[test]
    fn test_sequence_end_labels_dropped() {
        let migration = migrate(json!({
            "version": "2.1",
            "diagram": "SequenceDiagram",
            "nodes": [],
            "edges": [
                { "type": "CallEdge", "startLabel": "", "middleLabel": "run()", "endLabel": "", "signal": false, "start": 0, "end": 1 }
            ]
        }));

        assert!(migration.migrated);
        assert_eq!(
            migration.document["edges"][0],
            json!({ "type": "CallEdge", "middleLabel": "run()", "signal": false, "start": 0, "end": 1 })
        );
    }

    #[test]
    fn test_rules_are_scoped_to_their_diagram_type() {
        let document = json!({
            "version": "2.1",
            "diagram": "StateDiagram",
            "nodes": [],
            "edges": [{ "type": "DependencyEdge", "start": 0, "end": 0 }]
        });

        let migration = migrate(document.clone());
        assert!(!migration.migrated);
        assert_eq!(migration.document, document);
    }

    #[test]
    fn test_unknown_shapes_are_left_alone() {
        for document in [
            json!(null),
            json!([1, 2, 3]),
            json!({ "diagram": "ClassDiagram", "nodes": "none", "edges": {} }),
            json!({ "diagram": 4 }),
        ] {
            let migration = migrate(document.clone());
            assert!(!migration.migrated);
            assert_eq!(migration.document, document);
        }
    }
}
