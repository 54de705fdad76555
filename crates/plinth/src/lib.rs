//! Plinth - typed UML diagrams that are valid by construction.
//!
//! Loading, validation and saving of class, sequence, state, object and use
//! case diagrams. Documents are JSON; obsolete document shapes are migrated
//! on load, and every loaded diagram has passed the rules of its type.

pub mod config;

mod error;

pub use plinth_codec::{DecodeError, ErrorCategory, ErrorCode, FORMAT_VERSION};
pub use plinth_core::{
    Diagram, DiagramType, EdgeId, NodeId, Validator, Violation, element, geometry, property,
    registry, validation,
};

pub use error::PlinthError;

use std::{fs, path::Path};

use log::{debug, info, warn};
use serde_json::Value;

use config::{AppConfig, SemanticPolicy};

/// A diagram produced by [`DiagramStore::load`].
#[derive(Debug)]
pub struct LoadedDiagram {
    /// The decoded diagram.
    pub diagram: Diagram,
    /// Whether the document was rewritten from an obsolete shape.
    pub migrated: bool,
    /// Semantic violations accepted under [`SemanticPolicy::Warn`].
    pub warnings: Vec<Violation>,
}

/// Entry point for loading and saving Plinth diagrams.
///
/// # Examples
///
/// ```rust
/// use plinth::{DiagramStore, DiagramType, config::AppConfig};
///
/// let source = r#"{ "version": "3.8", "diagram": "UseCaseDiagram", "nodes": [], "edges": [] }"#;
///
/// let store = DiagramStore::new(AppConfig::default());
/// let loaded = store.load(source).expect("Failed to load");
/// assert_eq!(loaded.diagram.diagram_type(), DiagramType::UseCase);
///
/// let json = store.save(&loaded.diagram);
/// assert!(json.contains("\"UseCaseDiagram\""));
/// ```
#[derive(Debug, Default)]
pub struct DiagramStore {
    config: AppConfig,
}

impl DiagramStore {
    /// Create a new diagram store with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load a diagram from JSON text.
    ///
    /// The text is parsed, migrated if the configuration asks for it, and
    /// decoded. A semantic violation fails the load under
    /// [`SemanticPolicy::Reject`] and becomes a warning under
    /// [`SemanticPolicy::Warn`].
    ///
    /// # Errors
    ///
    /// Returns [`PlinthError::Decode`] with the source text attached if the
    /// document cannot be decoded.
    pub fn load(&self, source: &str) -> Result<LoadedDiagram, PlinthError> {
        info!("Loading diagram");

        let value: Value = serde_json::from_str(source)
            .map_err(|err| PlinthError::new_decode_error(DecodeError::Syntax(err), source))?;

        let (value, migrated) = if self.config.load().migrate() {
            let migration = plinth_codec::migrate(value);
            (migration.document, migration.migrated)
        } else {
            (value, false)
        };

        let policy = self.config.load().semantic_policy();
        let (diagram, warnings) = match plinth_codec::decode_value(value) {
            Ok(diagram) => (diagram, Vec::new()),
            Err(DecodeError::Semantic { violation, diagram }) if policy == SemanticPolicy::Warn => {
                warn!(violation:% = violation; "Accepted diagram with semantic violation");
                (*diagram, vec![Violation::Semantic(violation)])
            }
            Err(err) => return Err(PlinthError::new_decode_error(err, source)),
        };

        info!(
            diagram:% = diagram.diagram_type(),
            nodes = diagram.nodes_count(),
            edges = diagram.edges_count(),
            migrated = migrated;
            "Diagram loaded"
        );
        Ok(LoadedDiagram {
            diagram,
            migrated,
            warnings,
        })
    }

    /// Load a diagram from a file.
    ///
    /// # Errors
    ///
    /// Returns [`PlinthError::Io`] if the file cannot be read, and any error
    /// of [`DiagramStore::load`] otherwise.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<LoadedDiagram, PlinthError> {
        let path = path.as_ref();
        debug!(path:% = path.display(); "Reading diagram file");
        let source = fs::read_to_string(path)?;
        self.load(&source)
    }

    /// Encode a diagram as a document in the current format.
    pub fn save(&self, diagram: &Diagram) -> String {
        plinth_codec::encode_to_string(diagram, self.config.save().pretty())
    }

    /// Encode a diagram and write it to a file.
    ///
    /// # Errors
    ///
    /// Returns [`PlinthError::Io`] if the file cannot be written.
    pub fn save_file(&self, diagram: &Diagram, path: impl AsRef<Path>) -> Result<(), PlinthError> {
        let path = path.as_ref();
        fs::write(path, self.save(diagram))?;
        info!(path:% = path.display(); "Diagram saved");
        Ok(())
    }
}
