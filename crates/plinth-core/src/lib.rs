//! Plinth Core Types and Definitions
//!
//! This crate provides the in-memory model behind Plinth diagrams. It includes:
//!
//! - **Geometry**: Integer positions for nodes ([`geometry`] module)
//! - **Properties**: Typed, named element properties ([`property`] module)
//! - **Elements**: Node and edge variants ([`element`] module)
//! - **Diagram**: The arena-backed containment tree and edge list ([`diagram`] module)
//! - **Registry**: Per diagram type variant tables and rule sets ([`registry`] module)
//! - **Validation**: Structural and semantic checks ([`validation`] module)

pub mod diagram;
pub mod element;
pub mod geometry;
pub mod property;
pub mod registry;
pub mod validation;

pub use diagram::{Diagram, EdgeId, GraphError, NodeId};
pub use registry::DiagramType;
pub use validation::{Validator, Violation};
