//! Containment and connectivity checks.

use crate::{
    diagram::{Diagram, NodeId},
    element::{Containment, EdgeKind, EdgeTag, NodeKind, NodeTag},
    registry::DiagramDescriptor,
    validation::StructuralViolation,
};

/// Checks every node in pre-order, then every edge in order.
pub(super) fn check_diagram(
    diagram: &Diagram,
    descriptor: &DiagramDescriptor,
) -> Result<(), StructuralViolation> {
    for id in diagram.all_nodes() {
        let Some(node) = diagram.node(id) else {
            continue;
        };
        check_placement(diagram, descriptor, node.kind(), diagram.parent(id))?;
    }

    for (_, edge) in diagram.edges() {
        check_edge(diagram, descriptor, edge.kind(), edge.start(), edge.end())?;
    }

    Ok(())
}

/// Checks that a node of the given variant may live under `parent`.
pub(super) fn check_placement(
    diagram: &Diagram,
    descriptor: &DiagramDescriptor,
    kind: &NodeKind,
    parent: Option<NodeId>,
) -> Result<(), StructuralViolation> {
    let tag = kind.tag();
    if !descriptor.allows_node(kind) {
        return Err(StructuralViolation::NodeNotAllowed {
            tag,
            diagram_type: descriptor.diagram_type(),
        });
    }

    let parent = match parent {
        Some(id) => Some(
            diagram
                .node(id)
                .map(|node| node.tag())
                .ok_or(StructuralViolation::UnknownContainer(id))?,
        ),
        None => None,
    };

    match (tag.containment(), parent) {
        (Containment::Required, None) => Err(StructuralViolation::MissingContainer { tag }),
        (Containment::Forbidden, Some(parent)) => {
            Err(StructuralViolation::ContainerForbidden { tag, parent })
        }
        (_, Some(parent)) if !(tag.accepts_parent(parent) && parent.can_contain(tag)) => {
            Err(StructuralViolation::InvalidContainer { tag, parent })
        }
        _ => Ok(()),
    }
}

/// Checks that an edge of the given variant may join `start` and `end`.
pub(super) fn check_edge(
    diagram: &Diagram,
    descriptor: &DiagramDescriptor,
    kind: &EdgeKind,
    start: Option<NodeId>,
    end: Option<NodeId>,
) -> Result<(), StructuralViolation> {
    let tag = kind.tag();
    if !descriptor.allows_edge(kind) {
        return Err(StructuralViolation::EdgeNotAllowed {
            tag,
            diagram_type: descriptor.diagram_type(),
        });
    }

    let (Some(start), Some(end)) = (start, end) else {
        return Err(StructuralViolation::UnconnectedEdge { tag });
    };
    let endpoint = |id: NodeId| {
        diagram
            .node(id)
            .map(|node| node.tag())
            .ok_or(StructuralViolation::DanglingEdge { tag, node: id })
    };
    let endpoints = [endpoint(start)?, endpoint(end)?];

    check_note_connectivity(tag, endpoints)
}

fn check_note_connectivity(
    tag: EdgeTag,
    endpoints: [NodeTag; 2],
) -> Result<(), StructuralViolation> {
    if tag == EdgeTag::Note {
        return match endpoints.iter().filter(|&&node| node == NodeTag::Note).count() {
            0 => Err(StructuralViolation::NoteEdgeWithoutNote),
            1 => Ok(()),
            _ => Err(StructuralViolation::NoteEdgeBetweenNotes),
        };
    }

    match endpoints
        .into_iter()
        .find(|&node| matches!(node, NodeTag::Note | NodeTag::Point))
    {
        Some(node) => Err(StructuralViolation::NoteEdgeRequired { tag, node }),
        None => Ok(()),
    }
}
