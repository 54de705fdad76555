//! The diagram graph: a containment tree of nodes plus a list of edges.
//!
//! Nodes and edges are stored in arenas owned by the [`Diagram`] and are
//! addressed through the typed indices [`NodeId`] and [`EdgeId`]. The
//! parent/child relation is kept as indices on both sides, so it is updated
//! in one place and can never refer to a node owned by another diagram.
//!
//! # Invariants
//!
//! - A live node is either in the root list or in exactly one parent's child
//!   list, never both.
//! - The containment relation is acyclic.
//! - Every stored edge has both endpoints set, and both are live nodes.
//! - Root order, child order and edge order are insertion order.
//!
//! Validity with respect to a diagram type is *not* enforced here; that is
//! the job of the [`Validator`](crate::Validator).

use std::fmt;

use log::trace;
use thiserror::Error;

use crate::{
    element::{Edge, EdgeKind, Node},
    registry::DiagramType,
};

// =============================================================================
// Indices
// =============================================================================

/// Index of a node within its diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates an index from its raw value.
    pub fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the raw index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of an edge within its diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Creates an index from its raw value.
    pub fn new(index: usize) -> Self {
        EdgeId(index)
    }

    /// Returns the raw index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge #{}", self.0)
    }
}

/// Errors raised by graph mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("unknown {0}")]
    UnknownEdge(EdgeId),

    #[error("edge is not connected to both of its endpoints")]
    UnconnectedEdge,

    #[error("node {child} cannot be placed under {parent}: it would contain itself")]
    ContainmentCycle { parent: NodeId, child: NodeId },

    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
}

// =============================================================================
// Diagram
// =============================================================================

#[derive(Debug, Clone)]
struct NodeSlot {
    node: Node,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A typed diagram owning its nodes and edges.
#[derive(Debug, Clone)]
pub struct Diagram {
    diagram_type: DiagramType,
    nodes: Vec<Option<NodeSlot>>,
    roots: Vec<NodeId>,
    edges: Vec<Option<Edge>>,
}

impl Diagram {
    /// Creates an empty diagram of the given type.
    pub fn new(diagram_type: DiagramType) -> Self {
        Self {
            diagram_type,
            nodes: Vec::new(),
            roots: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Returns the diagram type, fixed at creation.
    pub fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }

    // -------------------------------------------------------------------------
    // Node mutation
    // -------------------------------------------------------------------------

    /// Adds a node to the end of the root list.
    pub fn add_root_node(&mut self, node: Node) -> NodeId {
        let id = self.push_slot(node, None);
        self.roots.push(id);
        trace!(id:% = id, tag:% = self.tag_of(id); "Added root node");
        id
    }

    /// Adds a node to the end of `parent`'s child list.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if `parent` is not live.
    pub fn add_child_node(&mut self, parent: NodeId, node: Node) -> Result<NodeId, GraphError> {
        self.slot(parent)?;
        let id = self.push_slot(node, Some(parent));
        self.slot_mut(parent)?.children.push(id);
        trace!(id:% = id, parent:% = parent; "Added child node");
        Ok(id)
    }

    /// Moves an existing node to the end of `parent`'s child list.
    ///
    /// The node is first detached from its current parent, or from the root
    /// list. Its subtree moves with it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ContainmentCycle`] if `child` is `parent` or one of
    /// its ancestors, and [`GraphError::UnknownNode`] if either node is not live.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        self.slot(parent)?;
        self.slot(child)?;
        if child == parent || self.is_ancestor(child, parent) {
            return Err(GraphError::ContainmentCycle { parent, child });
        }

        self.detach(child);
        self.slot_mut(child)?.parent = Some(parent);
        self.slot_mut(parent)?.children.push(child);
        trace!(child:% = child, parent:% = parent; "Reparented node");
        Ok(())
    }

    /// Removes a node, its whole subtree, and every edge attached to a removed node.
    ///
    /// Returns the removed node itself.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if `id` is not live.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, GraphError> {
        self.slot(id)?;
        self.detach(id);

        let subtree = self.subtree(id);
        let mut removed_edges = 0;
        for slot in self.edges.iter_mut() {
            let attached = slot
                .as_ref()
                .is_some_and(|edge| subtree.iter().any(|&node| edge.touches(node)));
            if attached {
                *slot = None;
                removed_edges += 1;
            }
        }

        let mut removed = None;
        for node in subtree.iter().rev() {
            removed = self.nodes[node.index()].take();
        }
        trace!(
            id:% = id,
            subtree = subtree.len(),
            edges = removed_edges;
            "Removed node"
        );

        removed
            .map(|slot| slot.node)
            .ok_or(GraphError::UnknownNode(id))
    }

    /// Removes `child` from `parent` along with its subtree and attached edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotAChild`] if `child` is not directly contained
    /// in `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<Node, GraphError> {
        self.slot(parent)?;
        if self.parent(child) != Some(parent) {
            return Err(GraphError::NotAChild { parent, child });
        }
        self.remove_node(child)
    }

    // -------------------------------------------------------------------------
    // Edge mutation
    // -------------------------------------------------------------------------

    /// Appends an edge to the edge list.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnconnectedEdge`] if an endpoint is unset, and
    /// [`GraphError::UnknownNode`] if an endpoint is not live.
    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeId, GraphError> {
        let (start, end) = edge.endpoints().ok_or(GraphError::UnconnectedEdge)?;
        self.slot(start)?;
        self.slot(end)?;

        let id = EdgeId(self.edges.len());
        trace!(id:% = id, tag:% = edge.tag(), start:% = start, end:% = end; "Added edge");
        self.edges.push(Some(edge));
        Ok(id)
    }

    /// Removes an edge from the diagram.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownEdge`] if `id` is not live.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, GraphError> {
        let edge = self
            .edges
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(GraphError::UnknownEdge(id))?;
        trace!(id:% = id; "Removed edge");
        Ok(edge)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Returns the node with the given id, if it is live.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slot(id).ok().map(|slot| &slot.node)
    }

    /// Mutably borrow a node. Its containment cannot be changed through it.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slot_mut(id).ok().map(|slot| &mut slot.node)
    }

    /// Returns the edge with the given id, if it is live.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index()).and_then(Option::as_ref)
    }

    /// Mutably borrow the variant state of an edge.
    ///
    /// Endpoints of a stored edge are fixed; remove and re-add the edge to
    /// reconnect it.
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut EdgeKind> {
        self.edges
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .map(Edge::kind_mut)
    }

    /// Returns the container of a node, or `None` for roots and unknown nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).ok().and_then(|slot| slot.parent)
    }

    /// Returns the children of a node in order; empty for unknown nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id)
            .map(|slot| slot.children.as_slice())
            .unwrap_or_default()
    }

    /// Returns the root nodes in insertion order.
    pub fn root_nodes(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns every node in pre-order: each root in order, followed depth
    /// first by its descendants.
    pub fn all_nodes(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes_count());
        self.collect_pre_order(&self.roots, &mut order);
        order
    }

    /// Returns the live edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|edge| (EdgeId(index), edge)))
    }

    /// Returns the edges going from `start` to `end`.
    pub fn edges_between(
        &self,
        start: NodeId,
        end: NodeId,
    ) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges()
            .filter(move |(_, edge)| edge.endpoints() == Some((start, end)))
    }

    /// Returns the edges starting or ending on `id`.
    pub fn edges_attached(&self, id: NodeId) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges().filter(move |(_, edge)| edge.touches(id))
    }

    /// Returns `true` if `id` names a live node of this diagram.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.slot(id).is_ok()
    }

    /// Returns the number of live nodes.
    pub fn nodes_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Returns the number of live edges.
    pub fn edges_count(&self) -> usize {
        self.edges.iter().flatten().count()
    }

    /// Returns `true` if `ancestor` contains `node`, directly or transitively.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn slot(&self, id: NodeId) -> Result<&NodeSlot, GraphError> {
        self.nodes
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(GraphError::UnknownNode(id))
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut NodeSlot, GraphError> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(GraphError::UnknownNode(id))
    }

    fn push_slot(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(NodeSlot {
            node,
            parent,
            children: Vec::new(),
        }));
        id
    }

    fn tag_of(&self, id: NodeId) -> &'static str {
        self.node(id).map_or("?", |node| node.tag().as_str())
    }

    /// Unlinks a node from its parent or from the root list.
    fn detach(&mut self, id: NodeId) {
        match self.parent(id) {
            Some(parent) => {
                if let Ok(slot) = self.slot_mut(parent) {
                    slot.children.retain(|&child| child != id);
                }
            }
            None => self.roots.retain(|&root| root != id),
        }
        if let Ok(slot) = self.slot_mut(id) {
            slot.parent = None;
        }
    }

    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        self.collect_pre_order(&[id], &mut nodes);
        nodes
    }

    /// Walks the trees under `starts` with an explicit stack, so nesting depth
    /// is bounded by memory rather than by the call stack.
    fn collect_pre_order(&self, starts: &[NodeId], out: &mut Vec<NodeId>) {
        let mut stack: Vec<NodeId> = starts.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{EdgeTag, NodeKind, NodeTag};

    fn class(name: &str) -> Node {
        Node::new(NodeKind::named(NodeTag::Class, name))
    }

    fn package(name: &str) -> Node {
        Node::new(NodeKind::named(NodeTag::Package, name))
    }

    fn dependency(start: NodeId, end: NodeId) -> Edge {
        Edge::connected(EdgeTag::Dependency.create(), start, end)
    }

    fn name_of(diagram: &Diagram, id: NodeId) -> &str {
        diagram.node(id).and_then(|node| node.kind().name()).unwrap()
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    #[test]
    fn test_new_diagram_is_empty() {
        let diagram = Diagram::new(DiagramType::Class);
        assert_eq!(diagram.diagram_type(), DiagramType::Class);
        assert_eq!(diagram.nodes_count(), 0);
        assert_eq!(diagram.edges_count(), 0);
        assert!(diagram.root_nodes().is_empty());
        assert!(diagram.all_nodes().is_empty());
    }

    #[test]
    fn test_add_nodes() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let pkg = diagram.add_root_node(package("p"));
        let a = diagram.add_child_node(pkg, class("A")).unwrap();
        let b = diagram.add_root_node(class("B"));

        assert_eq!(diagram.root_nodes(), &[pkg, b]);
        assert_eq!(diagram.children(pkg), &[a]);
        assert_eq!(diagram.parent(a), Some(pkg));
        assert_eq!(diagram.parent(b), None);
        assert_eq!(diagram.nodes_count(), 3);
    }

    #[test]
    fn test_add_child_node_to_unknown_parent() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let missing = NodeId::new(7);
        assert_eq!(
            diagram.add_child_node(missing, class("A")),
            Err(GraphError::UnknownNode(missing))
        );
        assert_eq!(diagram.nodes_count(), 0);
    }

    #[test]
    fn test_all_nodes_is_pre_order() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let outer = diagram.add_root_node(package("outer"));
        let inner = diagram.add_child_node(outer, package("inner")).unwrap();
        diagram.add_child_node(inner, class("Deep")).unwrap();
        diagram.add_child_node(outer, class("Sibling")).unwrap();
        diagram.add_root_node(class("Last"));

        let names: Vec<_> = diagram
            .all_nodes()
            .into_iter()
            .map(|id| name_of(&diagram, id).to_string())
            .collect();
        assert_eq!(names, ["outer", "inner", "Deep", "Sibling", "Last"]);
    }

    #[test]
    fn test_deep_nesting_walks_and_removes() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let root = diagram.add_root_node(package("p0"));
        let mut parent = root;
        for depth in 1..100_000 {
            parent = diagram
                .add_child_node(parent, package(&format!("p{depth}")))
                .unwrap();
        }

        let order = diagram.all_nodes();
        assert_eq!(order.len(), 100_000);
        assert_eq!(order.first(), Some(&root));
        assert_eq!(order.last(), Some(&parent));

        diagram.remove_node(root).unwrap();
        assert_eq!(diagram.nodes_count(), 0);
    }

    // -------------------------------------------------------------------------
    // Reparenting
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_child_moves_root() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let pkg = diagram.add_root_node(package("p"));
        let a = diagram.add_root_node(class("A"));

        diagram.add_child(pkg, a).unwrap();

        assert_eq!(diagram.root_nodes(), &[pkg]);
        assert_eq!(diagram.children(pkg), &[a]);
        assert_eq!(diagram.parent(a), Some(pkg));
    }

    #[test]
    fn test_add_child_moves_between_parents() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let first = diagram.add_root_node(package("first"));
        let second = diagram.add_root_node(package("second"));
        let a = diagram.add_child_node(first, class("A")).unwrap();

        diagram.add_child(second, a).unwrap();

        assert!(diagram.children(first).is_empty());
        assert_eq!(diagram.children(second), &[a]);
        assert_eq!(diagram.parent(a), Some(second));
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let outer = diagram.add_root_node(package("outer"));
        let inner = diagram.add_child_node(outer, package("inner")).unwrap();

        assert_eq!(
            diagram.add_child(inner, outer),
            Err(GraphError::ContainmentCycle {
                parent: inner,
                child: outer
            })
        );
        assert_eq!(
            diagram.add_child(outer, outer),
            Err(GraphError::ContainmentCycle {
                parent: outer,
                child: outer
            })
        );
        assert!(diagram.is_ancestor(outer, inner));
        assert!(!diagram.is_ancestor(inner, outer));
        assert_eq!(diagram.root_nodes(), &[outer]);
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    #[test]
    fn test_remove_node_removes_subtree_and_edges() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let pkg = diagram.add_root_node(package("p"));
        let a = diagram.add_child_node(pkg, class("A")).unwrap();
        let b = diagram.add_root_node(class("B"));
        let c = diagram.add_root_node(class("C"));
        diagram.add_edge(dependency(b, a)).unwrap();
        let kept = diagram.add_edge(dependency(b, c)).unwrap();

        let removed = diagram.remove_node(pkg).unwrap();

        assert_eq!(removed.kind().name(), Some("p"));
        assert!(!diagram.contains_node(pkg));
        assert!(!diagram.contains_node(a));
        assert_eq!(diagram.root_nodes(), &[b, c]);
        let edges: Vec<_> = diagram.edges().map(|(id, _)| id).collect();
        assert_eq!(edges, [kept]);
        assert_eq!(diagram.remove_node(pkg), Err(GraphError::UnknownNode(pkg)));
    }

    #[test]
    fn test_remove_child_checks_relation() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let pkg = diagram.add_root_node(package("p"));
        let a = diagram.add_child_node(pkg, class("A")).unwrap();
        let b = diagram.add_root_node(class("B"));

        assert_eq!(
            diagram.remove_child(pkg, b),
            Err(GraphError::NotAChild { parent: pkg, child: b })
        );
        diagram.remove_child(pkg, a).unwrap();
        assert!(diagram.children(pkg).is_empty());
        assert_eq!(diagram.nodes_count(), 2);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let a = diagram.add_root_node(class("A"));
        diagram.remove_node(a).unwrap();
        let b = diagram.add_root_node(class("B"));

        assert_ne!(a, b);
        assert!(diagram.node(a).is_none());
    }

    // -------------------------------------------------------------------------
    // Edges
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_edge_requires_live_endpoints() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let a = diagram.add_root_node(class("A"));

        assert_eq!(
            diagram.add_edge(Edge::new(EdgeTag::Dependency.create())),
            Err(GraphError::UnconnectedEdge)
        );
        let missing = NodeId::new(9);
        assert_eq!(
            diagram.add_edge(dependency(a, missing)),
            Err(GraphError::UnknownNode(missing))
        );
        assert_eq!(diagram.edges_count(), 0);
    }

    #[test]
    fn test_edge_queries() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let a = diagram.add_root_node(class("A"));
        let b = diagram.add_root_node(class("B"));
        let c = diagram.add_root_node(class("C"));
        let ab = diagram.add_edge(dependency(a, b)).unwrap();
        let bc = diagram.add_edge(dependency(b, c)).unwrap();

        let between: Vec<_> = diagram.edges_between(a, b).map(|(id, _)| id).collect();
        assert_eq!(between, [ab]);
        assert_eq!(diagram.edges_between(b, a).count(), 0);

        let attached: Vec<_> = diagram.edges_attached(b).map(|(id, _)| id).collect();
        assert_eq!(attached, [ab, bc]);

        let removed = diagram.remove_edge(ab).unwrap();
        assert_eq!(removed.endpoints(), Some((a, b)));
        assert_eq!(diagram.remove_edge(ab), Err(GraphError::UnknownEdge(ab)));
        assert_eq!(diagram.edges_count(), 1);
    }

    #[test]
    fn test_edge_mut_changes_properties_only() {
        use crate::{element::Element, property::PropertyValue};

        let mut diagram = Diagram::new(DiagramType::Class);
        let a = diagram.add_root_node(class("A"));
        let b = diagram.add_root_node(class("B"));
        let id = diagram.add_edge(dependency(a, b)).unwrap();

        diagram
            .edge_mut(id)
            .unwrap()
            .set_property("middleLabel", "uses".into())
            .unwrap();

        let edge = diagram.edge(id).unwrap();
        assert_eq!(
            edge.kind().property("middleLabel"),
            Some(PropertyValue::from("uses"))
        );
        assert_eq!(edge.endpoints(), Some((a, b)));
    }
}

#[cfg(test)]
mod proptest_tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use crate::element::{EdgeTag, NodeTag};

    #[derive(Debug, Clone)]
    enum Op {
        AddRoot,
        AddChild(usize),
        Reparent(usize, usize),
        Remove(usize),
        Connect(usize, usize),
        Disconnect(usize),
    }

    // ===================
    // Strategies
    // ===================

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::AddRoot),
            any::<usize>().prop_map(Op::AddChild),
            (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Reparent(a, b)),
            any::<usize>().prop_map(Op::Remove),
            (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Connect(a, b)),
            any::<usize>().prop_map(Op::Disconnect),
        ]
    }

    /// Picks a live node by position, wrapping around.
    fn pick(diagram: &Diagram, index: usize) -> Option<NodeId> {
        let nodes = diagram.all_nodes();
        (!nodes.is_empty()).then(|| nodes[index % nodes.len()])
    }

    fn apply(diagram: &mut Diagram, op: &Op) {
        let package = || Node::new(NodeTag::Package.create());
        match *op {
            Op::AddRoot => {
                diagram.add_root_node(package());
            }
            Op::AddChild(parent) => {
                if let Some(parent) = pick(diagram, parent) {
                    diagram.add_child_node(parent, package()).unwrap();
                }
            }
            Op::Reparent(parent, child) => {
                if let (Some(parent), Some(child)) = (pick(diagram, parent), pick(diagram, child)) {
                    let cyclic = parent == child || diagram.is_ancestor(child, parent);
                    assert_eq!(diagram.add_child(parent, child).is_err(), cyclic);
                }
            }
            Op::Remove(node) => {
                if let Some(node) = pick(diagram, node) {
                    diagram.remove_node(node).unwrap();
                }
            }
            Op::Connect(start, end) => {
                if let (Some(start), Some(end)) = (pick(diagram, start), pick(diagram, end)) {
                    diagram
                        .add_edge(Edge::connected(EdgeTag::Dependency.create(), start, end))
                        .unwrap();
                }
            }
            Op::Disconnect(edge) => {
                let edges: Vec<_> = diagram.edges().map(|(id, _)| id).collect();
                if !edges.is_empty() {
                    diagram.remove_edge(edges[edge % edges.len()]).unwrap();
                }
            }
        }
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Every live node is reached exactly once from the roots, and both sides
    /// of the containment relation agree.
    fn check_containment_consistent(diagram: &Diagram) -> Result<(), TestCaseError> {
        let order = diagram.all_nodes();
        let unique: HashSet<_> = order.iter().copied().collect();
        prop_assert_eq!(unique.len(), order.len());
        prop_assert_eq!(order.len(), diagram.nodes_count());

        for &root in diagram.root_nodes() {
            prop_assert_eq!(diagram.parent(root), None);
        }
        for &id in &order {
            for &child in diagram.children(id) {
                prop_assert_eq!(diagram.parent(child), Some(id));
            }
            prop_assert!(!diagram.is_ancestor(id, id));
        }
        Ok(())
    }

    /// Every stored edge is connected to live nodes.
    fn check_edges_attached(diagram: &Diagram) -> Result<(), TestCaseError> {
        for (_, edge) in diagram.edges() {
            let (start, end) = edge.endpoints().ok_or_else(|| {
                TestCaseError::fail("stored edge is not connected")
            })?;
            prop_assert!(diagram.contains_node(start));
            prop_assert!(diagram.contains_node(end));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn mutations_preserve_invariants(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let mut diagram = Diagram::new(DiagramType::Class);
            for op in &ops {
                apply(&mut diagram, op);
                check_containment_consistent(&diagram)?;
                check_edges_attached(&diagram)?;
            }
        }
    }
}
