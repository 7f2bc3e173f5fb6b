use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::domain::graph::Graph;
use crate::domain::graph::node::NodeKey;
use crate::domain::utils::id::NodeId;

/// Lazy topological walk over a [`Graph`].
///
/// Yields every node exactly once, parents before children. Among the nodes that
/// are ready at the same time the one with the smallest id comes first. The
/// iterator consumes its own bookkeeping and cannot be restarted; ask the graph
/// for a new one instead.
pub struct TopologicalOrder<'a> {
    graph: &'a Graph,
    remaining_parents: HashMap<NodeKey, usize>,
    ready: BinaryHeap<Reverse<(&'a NodeId, NodeKey)>>,
}

impl<'a> TopologicalOrder<'a> {
    pub(crate) fn new(graph: &'a Graph) -> Self {
        let mut remaining_parents = HashMap::with_capacity(graph.len());
        let mut ready = BinaryHeap::new();

        for (key, node) in graph.arena() {
            if node.parents().is_empty() {
                ready.push(Reverse((node.id(), key)));
            } else {
                remaining_parents.insert(key, node.parents().len());
            }
        }

        TopologicalOrder { graph, remaining_parents, ready }
    }
}

impl Iterator for TopologicalOrder<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let Reverse((_, key)) = self.ready.pop()?;

        for &child in self.graph.arena()[key].children() {
            if let Some(count) = self.remaining_parents.get_mut(&child) {
                *count -= 1;
                if *count == 0 {
                    self.remaining_parents.remove(&child);
                    self.ready.push(Reverse((self.graph.arena()[child].id(), child)));
                }
            }
        }

        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let upper = self.ready.len() + self.remaining_parents.len();
        (upper, Some(upper))
    }
}
