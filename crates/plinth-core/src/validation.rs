//! Diagram validation.
//!
//! A [`Validator`] answers whether a diagram, or a change to it, is legal for
//! the diagram's type. Checks come in two tiers:
//!
//! - **Structural**: every node variant is admitted by the diagram type and
//!   sits in a legal container; every edge variant is admitted, is connected
//!   to live nodes, and respects the note attachment rules.
//! - **Semantic**: every edge satisfies each [`SemanticRule`] registered for
//!   the diagram type.
//!
//! Structural checks always run first, so a semantic violation implies a
//! structurally sound diagram.

mod semantic;
mod structural;
mod violation;

use log::debug;

pub use semantic::{Candidate, SemanticRule};
pub use violation::{SemanticViolation, StructuralViolation, Violation};

use crate::{
    diagram::{Diagram, NodeId},
    element::{EdgeKind, NodeKind},
    registry::{self, DiagramDescriptor},
};

/// Validates a diagram against the rules of its type.
///
/// The validator holds a shared borrow of the diagram and caches nothing,
/// so it always reflects the diagram's current state.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    diagram: &'a Diagram,
}

impl<'a> Validator<'a> {
    /// Creates a validator bound to `diagram`.
    pub fn new(diagram: &'a Diagram) -> Self {
        Self { diagram }
    }

    /// Returns `true` if the whole diagram passes validation.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validates the whole diagram.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: nodes in pre-order, then edges in
    /// order for the structural tier, then edges in order for the semantic tier.
    pub fn validate(&self) -> Result<(), Violation> {
        let descriptor = self.descriptor();
        structural::check_diagram(self.diagram, descriptor).inspect_err(|err| {
            debug!(violation:% = err; "Structural validation failed");
        })?;

        for (id, edge) in self.diagram.edges() {
            if let Some(candidate) = Candidate::stored(id, edge) {
                self.check_rules(descriptor, &candidate)?;
            }
        }
        Ok(())
    }

    /// Checks an edge that is not yet part of the diagram.
    ///
    /// # Errors
    ///
    /// Returns a violation if adding the edge would make the diagram invalid.
    pub fn check_edge(&self, kind: &EdgeKind, start: NodeId, end: NodeId) -> Result<(), Violation> {
        let descriptor = self.descriptor();
        structural::check_edge(self.diagram, descriptor, kind, Some(start), Some(end))?;
        self.check_rules(descriptor, &Candidate::new(kind.tag(), start, end))
    }

    /// Checks whether a node of the given variant may be placed under `parent`,
    /// or as a root when `parent` is `None`.
    ///
    /// # Errors
    ///
    /// Returns a structural violation if the placement is illegal.
    pub fn check_node_placement(
        &self,
        kind: &NodeKind,
        parent: Option<NodeId>,
    ) -> Result<(), Violation> {
        structural::check_placement(self.diagram, self.descriptor(), kind, parent)?;
        Ok(())
    }

    fn descriptor(&self) -> &'static DiagramDescriptor {
        registry::descriptor(self.diagram.diagram_type())
    }

    fn check_rules(
        &self,
        descriptor: &DiagramDescriptor,
        candidate: &Candidate,
    ) -> Result<(), Violation> {
        match semantic::first_broken(descriptor.rules(), candidate, self.diagram) {
            Some(rule) => {
                let violation = SemanticViolation {
                    rule,
                    tag: candidate.tag(),
                    start: candidate.start(),
                    end: candidate.end(),
                };
                debug!(violation:% = violation; "Semantic validation failed");
                Err(violation.into())
            }
            None => Ok(()),
        }
    }
}
