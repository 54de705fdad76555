//! CLI logic for the Plinth diagram tool.
//!
//! The tool checks a diagram document against the rules of its type, and
//! optionally writes it back in the current format.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use log::{info, warn};

use plinth::{DiagramStore, PlinthError};

/// Run the Plinth CLI application
///
/// Loads the input document, logs a summary of the diagram, and writes the
/// re-encoded diagram to the output file when one is given.
///
/// # Errors
///
/// Returns `PlinthError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Decode errors, including semantic violations under the reject policy
pub fn run(args: &Args) -> Result<(), PlinthError> {
    info!(input_path = args.input; "Processing diagram");

    let app_config = config::load_config(args.config.as_ref())?;
    let store = DiagramStore::new(app_config);

    let loaded = store.load_file(&args.input)?;
    for warning in &loaded.warnings {
        warn!(violation:% = warning; "Diagram breaks a rule of its type");
    }
    info!(
        diagram:% = loaded.diagram.diagram_type(),
        nodes = loaded.diagram.nodes_count(),
        edges = loaded.diagram.edges_count(),
        migrated = loaded.migrated,
        warnings = loaded.warnings.len();
        "Diagram is valid"
    );

    if let Some(output) = &args.output {
        store.save_file(&loaded.diagram, output)?;
        info!(output_file = output; "Diagram written");
    }

    Ok(())
}
