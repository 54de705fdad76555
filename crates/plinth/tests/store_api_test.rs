//! Integration tests for the DiagramStore API.

use std::fs;

use plinth::{
    DecodeError, DiagramStore, DiagramType, ErrorCode, PlinthError, Violation,
    config::{AppConfig, LoadConfig, SaveConfig, SemanticPolicy},
    validation::SemanticRule,
};
use tempfile::tempdir;

const STATE_DIAGRAM: &str = r#"{
    "version": "3.8",
    "diagram": "StateDiagram",
    "nodes": [
        { "id": 0, "type": "InitialStateNode", "x": 10, "y": 10 },
        { "id": 1, "type": "StateNode", "x": 120, "y": 10, "name": "Idle" }
    ],
    "edges": [
        { "type": "StateTransitionEdge", "middleLabel": "start", "start": 0, "end": 1 }
    ]
}"#;

const SELF_GENERALIZATION: &str = r#"{
    "version": "3.8",
    "diagram": "ClassDiagram",
    "nodes": [
        { "id": 0, "type": "ClassNode", "x": 0, "y": 0, "name": "A", "attributes": "", "methods": "" }
    ],
    "edges": [
        { "type": "GeneralizationEdge", "generalizationType": "Inheritance", "start": 0, "end": 0 }
    ]
}"#;

const LEGACY_PACKAGE: &str = r#"{
    "version": "3.0",
    "diagram": "ClassDiagram",
    "nodes": [
        { "id": 0, "type": "PackageNode", "x": 0, "y": 0, "name": "util", "contents": "helpers" }
    ],
    "edges": []
}"#;

fn store_with(load: LoadConfig) -> DiagramStore {
    DiagramStore::new(AppConfig::new(load, SaveConfig::default()))
}

#[test]
fn test_load_valid_diagram() {
    let loaded = DiagramStore::default()
        .load(STATE_DIAGRAM)
        .expect("Failed to load diagram");

    assert_eq!(loaded.diagram.diagram_type(), DiagramType::State);
    assert_eq!(loaded.diagram.nodes_count(), 2);
    assert_eq!(loaded.diagram.edges_count(), 1);
    assert!(!loaded.migrated);
    assert!(loaded.warnings.is_empty());
}

#[test]
fn test_syntax_error_keeps_source() {
    let source = "{ \"diagram\": ";
    let err = DiagramStore::default().load(source).unwrap_err();

    match err {
        PlinthError::Decode { err, src } => {
            assert_eq!(err.code(), ErrorCode::E001);
            assert!(err.location().is_some());
            assert_eq!(src, source);
        }
        other => panic!("Expected decode error, got {other:?}"),
    }
}

#[test]
fn test_semantic_violation_rejected_by_default() {
    let err = DiagramStore::default()
        .load(SELF_GENERALIZATION)
        .unwrap_err();

    assert!(matches!(
        err,
        PlinthError::Decode {
            err: DecodeError::Semantic { .. },
            ..
        }
    ));
}

#[test]
fn test_semantic_violation_accepted_with_warning() {
    let store = store_with(LoadConfig::new(SemanticPolicy::Warn, true));
    let loaded = store
        .load(SELF_GENERALIZATION)
        .expect("Warn policy should accept the diagram");

    assert_eq!(loaded.diagram.edges_count(), 1);
    assert_eq!(loaded.warnings.len(), 1);
    assert!(matches!(
        &loaded.warnings[0],
        Violation::Semantic(violation) if violation.rule == SemanticRule::NoSelfGeneralization
    ));
}

#[test]
fn test_structural_error_ignores_policy() {
    let source = STATE_DIAGRAM.replace("\"end\": 1", "\"end\": 9");
    let store = store_with(LoadConfig::new(SemanticPolicy::Warn, true));

    match store.load(&source).unwrap_err() {
        PlinthError::Decode { err, .. } => assert_eq!(err.code(), ErrorCode::E107),
        other => panic!("Expected decode error, got {other:?}"),
    }
}

#[test]
fn test_migration_on_load() {
    let loaded = DiagramStore::default()
        .load(LEGACY_PACKAGE)
        .expect("Legacy document should migrate");
    assert!(loaded.migrated);

    let without_migration = store_with(LoadConfig::new(SemanticPolicy::Reject, false));
    match without_migration.load(LEGACY_PACKAGE).unwrap_err() {
        PlinthError::Decode { err, .. } => assert_eq!(err.code(), ErrorCode::E103),
        other => panic!("Expected decode error, got {other:?}"),
    }
}

#[test]
fn test_save_uses_current_format() {
    let store = DiagramStore::default();
    let migrated = store.load(LEGACY_PACKAGE).unwrap();
    let saved = store.save(&migrated.diagram);

    assert!(saved.contains("\"version\": \"3.8\""));
    assert!(saved.contains("PackageDescriptionNode"));

    let reloaded = store.load(&saved).expect("Saved document should load");
    assert!(!reloaded.migrated);
    assert_eq!(store.save(&reloaded.diagram), saved);
}

#[test]
fn test_compact_output() {
    let store = DiagramStore::new(AppConfig::new(LoadConfig::default(), SaveConfig::new(false)));
    let loaded = store.load(STATE_DIAGRAM).unwrap();

    assert!(!store.save(&loaded.diagram).contains('\n'));
}

#[test]
fn test_file_round_trip() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("state.json");
    let output = temp_dir.path().join("saved.json");
    fs::write(&input, STATE_DIAGRAM).unwrap();

    let store = DiagramStore::default();
    let loaded = store.load_file(&input).expect("Failed to load file");
    store
        .save_file(&loaded.diagram, &output)
        .expect("Failed to save file");

    let reloaded = store.load_file(&output).expect("Failed to reload file");
    assert_eq!(reloaded.diagram.nodes_count(), 2);
}

#[test]
fn test_missing_file_is_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let err = DiagramStore::default()
        .load_file(temp_dir.path().join("absent.json"))
        .unwrap_err();

    assert!(matches!(err, PlinthError::Io(_)));
}
