//! Validation scenarios over complete diagrams.

use plinth_core::{
    Diagram, DiagramType, NodeId, Validator,
    element::{Edge, EdgeTag, Node, NodeKind, NodeTag},
    validation::{SemanticRule, StructuralViolation, Violation},
};

fn root(diagram: &mut Diagram, tag: NodeTag, name: &str) -> NodeId {
    diagram.add_root_node(Node::new(NodeKind::named(tag, name)))
}

fn broken_rule(result: Result<(), Violation>) -> Option<SemanticRule> {
    match result {
        Err(Violation::Semantic(violation)) => Some(violation.rule),
        _ => None,
    }
}

#[test]
fn test_max_edges_one() {
    let mut diagram = Diagram::new(DiagramType::Class);
    let a = root(&mut diagram, NodeTag::Class, "A");
    let b = root(&mut diagram, NodeTag::Class, "B");
    let c = root(&mut diagram, NodeTag::Class, "C");
    diagram
        .add_edge(Edge::connected(EdgeTag::Association.create(), a, b))
        .unwrap();

    let validator = Validator::new(&diagram);
    let association = EdgeTag::Association.create();
    assert_eq!(
        broken_rule(validator.check_edge(&association, a, b)),
        Some(SemanticRule::MaxEdges(1))
    );
    assert_eq!(validator.check_edge(&association, a, c), Ok(()));
}

#[test]
fn test_max_edges_two() {
    let mut diagram = Diagram::new(DiagramType::State);
    let idle = root(&mut diagram, NodeTag::State, "idle");
    let busy = root(&mut diagram, NodeTag::State, "busy");
    let transition = EdgeTag::StateTransition.create();

    for _ in 0..2 {
        assert_eq!(Validator::new(&diagram).check_edge(&transition, idle, busy), Ok(()));
        diagram
            .add_edge(Edge::connected(transition.clone(), idle, busy))
            .unwrap();
    }

    assert_eq!(
        broken_rule(Validator::new(&diagram).check_edge(&transition, idle, busy)),
        Some(SemanticRule::MaxEdges(2))
    );
    assert!(Validator::new(&diagram).is_valid());
}

#[test]
fn test_no_self_edge() {
    let mut diagram = Diagram::new(DiagramType::UseCase);
    let a = root(&mut diagram, NodeTag::UseCase, "Log in");
    let b = root(&mut diagram, NodeTag::UseCase, "Authenticate");
    let include = EdgeTag::UseCaseDependency.create();

    let validator = Validator::new(&diagram);
    assert_eq!(
        broken_rule(validator.check_edge(&include, a, a)),
        Some(SemanticRule::NoSelfEdge(EdgeTag::UseCaseDependency))
    );
    assert_eq!(validator.check_edge(&include, a, b), Ok(()));
}

#[test]
fn test_note_edges() {
    let mut diagram = Diagram::new(DiagramType::Class);
    let class = root(&mut diagram, NodeTag::Class, "A");
    let note = root(&mut diagram, NodeTag::Note, "remember");
    let other_note = root(&mut diagram, NodeTag::Note, "also");
    let point = diagram.add_root_node(Node::new(NodeTag::Point.create()));

    let validator = Validator::new(&diagram);
    let note_edge = EdgeTag::Note.create();
    assert_eq!(
        validator.check_edge(&note_edge, note, other_note),
        Err(StructuralViolation::NoteEdgeBetweenNotes.into())
    );
    assert_eq!(validator.check_edge(&note_edge, note, class), Ok(()));
    assert_eq!(validator.check_edge(&note_edge, note, point), Ok(()));
    assert_eq!(
        validator.check_edge(&EdgeTag::Dependency.create(), class, note),
        Err(StructuralViolation::NoteEdgeRequired {
            tag: EdgeTag::Dependency,
            node: NodeTag::Note,
        }
        .into())
    );
}

#[test]
fn test_class_diagram_cycle() {
    let mut diagram = Diagram::new(DiagramType::Class);
    let a = root(&mut diagram, NodeTag::Class, "A");
    let b = root(&mut diagram, NodeTag::Class, "B");
    diagram
        .add_edge(Edge::connected(EdgeTag::Dependency.create(), a, b))
        .unwrap();

    let validator = Validator::new(&diagram);
    assert_eq!(
        broken_rule(validator.check_edge(&EdgeTag::Dependency.create(), b, a)),
        Some(SemanticRule::NoDirectCycles(EdgeTag::Dependency))
    );
    assert_eq!(
        validator.check_edge(&EdgeTag::Generalization.create(), b, a),
        Ok(())
    );
}

#[test]
fn test_sequence_construction() {
    let mut diagram = Diagram::new(DiagramType::Sequence);
    let client = root(&mut diagram, NodeTag::ImplicitParameter, "client");
    let caller = diagram
        .add_child_node(client, Node::new(NodeTag::Call.create()))
        .unwrap();
    let created = root(&mut diagram, NodeTag::ImplicitParameter, "created");

    // The header of an empty lifeline accepts the call.
    let call = EdgeTag::Call.create();
    assert_eq!(Validator::new(&diagram).check_edge(&call, caller, created), Ok(()));

    // The call becomes a constructor targeting the first activation.
    let activation = diagram
        .add_child_node(created, Node::new(NodeTag::Call.create()))
        .unwrap();
    diagram
        .add_edge(Edge::connected(EdgeTag::Constructor.create(), caller, activation))
        .unwrap();
    assert!(Validator::new(&diagram).is_valid());

    // Once the lifeline has an activation, its header is closed.
    let later = diagram
        .add_child_node(client, Node::new(NodeTag::Call.create()))
        .unwrap();
    let validator = Validator::new(&diagram);
    assert_eq!(
        broken_rule(validator.check_edge(&call, later, created)),
        Some(SemanticRule::CallEdgeEnd)
    );
    assert_eq!(
        broken_rule(validator.check_edge(&EdgeTag::Constructor.create(), later, activation)),
        Some(SemanticRule::CallEdgeEnd)
    );
}

#[test]
fn test_sequence_return() {
    let mut diagram = Diagram::new(DiagramType::Sequence);
    let client = root(&mut diagram, NodeTag::ImplicitParameter, "client");
    let server = root(&mut diagram, NodeTag::ImplicitParameter, "server");
    let request = diagram
        .add_child_node(client, Node::new(NodeTag::Call.create()))
        .unwrap();
    let handler = diagram
        .add_child_node(server, Node::new(NodeTag::Call.create()))
        .unwrap();
    diagram
        .add_edge(Edge::connected(EdgeTag::Call.create(), request, handler))
        .unwrap();
    diagram
        .add_edge(Edge::connected(EdgeTag::Return.create(), handler, request))
        .unwrap();

    assert!(Validator::new(&diagram).is_valid());
    assert_eq!(
        broken_rule(Validator::new(&diagram).check_edge(
            &EdgeTag::Return.create(),
            request,
            handler
        )),
        Some(SemanticRule::ReturnEdge)
    );
}

#[test]
fn test_invalid_placement_is_structural() {
    let mut diagram = Diagram::new(DiagramType::Class);
    let note = root(&mut diagram, NodeTag::Note, "n");
    diagram
        .add_child_node(note, Node::new(NodeKind::named(NodeTag::Class, "Nested")))
        .unwrap();

    assert_eq!(
        Validator::new(&diagram).validate(),
        Err(StructuralViolation::InvalidContainer {
            tag: NodeTag::Class,
            parent: NodeTag::Note,
        }
        .into())
    );
}
