//! Plinth Persistence Codec
//!
//! This crate turns [`plinth_core::Diagram`]s into portable JSON documents and
//! back. It includes:
//!
//! - **Document**: The typed document model ([`document`] module)
//! - **Encoder**: Diagram to document conversion ([`encode`], [`encode_to_string`])
//! - **Decoder**: Document to diagram conversion with validation ([`decode`],
//!   [`decode_value`], [`decode_str`])
//! - **Id context**: Node identity during one encode or decode call ([`IdContext`])
//! - **Migrator**: Rewrites of obsolete document shapes ([`migrate`])
//! - **Errors**: Categorized, coded decode errors ([`error`] module)
//!
//! # Example
//!
//! ```
//! use plinth_codec::{decode_str, encode_to_string};
//!
//! let text = r#"{
//!     "version": "3.8",
//!     "diagram": "StateDiagram",
//!     "nodes": [
//!         { "id": 0, "type": "InitialStateNode", "x": 0, "y": 0 },
//!         { "id": 1, "type": "StateNode", "x": 80, "y": 0, "name": "Idle" }
//!     ],
//!     "edges": [
//!         { "type": "StateTransitionEdge", "middleLabel": "start", "start": 0, "end": 1 }
//!     ]
//! }"#;
//!
//! let diagram = decode_str(text).unwrap();
//! assert_eq!(diagram.nodes_count(), 2);
//!
//! let saved = encode_to_string(&diagram, false);
//! assert!(saved.starts_with(r#"{"version":"3.8","diagram":"StateDiagram""#));
//! ```

mod context;
mod decoder;
pub mod document;
mod encoder;
pub mod error;
mod migrator;

pub use context::IdContext;
pub use decoder::{decode, decode_str, decode_value};
pub use document::{Document, FORMAT_VERSION};
pub use encoder::{encode, encode_to_string};
pub use error::{DecodeError, ErrorCategory, ErrorCode};
pub use migrator::{Migration, migrate};
