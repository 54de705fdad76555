//! Node identity for the span of one encode or decode call.

use std::collections::HashMap;

use indexmap::IndexMap;
use plinth_core::{Diagram, NodeId};

/// A two-way association between diagram nodes and document ids.
///
/// Ids are an artifact of one encode or decode call: a context is created,
/// filled and dropped inside that call, and is never stored in a diagram.
#[derive(Debug, Default, Clone)]
pub struct IdContext {
    nodes: IndexMap<u64, NodeId>,
    ids: HashMap<NodeId, u64>,
}

impl IdContext {
    /// Creates an empty context, to be filled while decoding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns sequential ids from 0 to the nodes of `diagram` in pre-order.
    pub fn for_encoding(diagram: &Diagram) -> Self {
        let mut context = Self::new();
        for (doc_id, node) in (0..).zip(diagram.all_nodes()) {
            context.insert(doc_id, node);
        }
        context
    }

    /// Associates a document id with a node.
    ///
    /// Returns `false` and leaves the context unchanged if either side is
    /// already associated.
    pub fn insert(&mut self, doc_id: u64, node: NodeId) -> bool {
        if self.nodes.contains_key(&doc_id) || self.ids.contains_key(&node) {
            return false;
        }
        self.nodes.insert(doc_id, node);
        self.ids.insert(node, doc_id);
        true
    }

    /// Returns the node associated with a document id.
    pub fn node(&self, doc_id: u64) -> Option<NodeId> {
        self.nodes.get(&doc_id).copied()
    }

    /// Returns the document id associated with a node.
    pub fn id(&self, node: NodeId) -> Option<u64> {
        self.ids.get(&node).copied()
    }

    /// Returns the associations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, NodeId)> + '_ {
        self.nodes.iter().map(|(&doc_id, &node)| (doc_id, node))
    }

    /// Returns the number of associations.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node has been associated yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
