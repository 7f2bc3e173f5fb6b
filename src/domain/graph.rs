use std::collections::{HashMap, HashSet};

use slotmap::SlotMap;

use crate::api::workflow_dto::{TaskDto, WorkflowDto};
use crate::domain::graph::node::{Color, Node, NodeKey};
use crate::domain::graph::task_profile::TaskProfile;
use crate::domain::graph::topological_order::TopologicalOrder;
use crate::domain::utils::id::{NodeId, SiteId, TransformationName, WorkflowId};
use crate::error::{Error, Result};

pub mod bag;
pub mod node;
pub mod task_profile;
pub mod topological_order;

/// The workflow as a directed acyclic graph of tasks.
///
/// Nodes live in a slot map arena and refer to each other by [`NodeKey`]. An
/// index from [`NodeId`] to key gives lookup by id. Cycles are rejected when an
/// edge is inserted, so every traversal can rely on the graph being acyclic.
#[derive(Debug, Clone)]
pub struct Graph {
    id: WorkflowId,
    nodes: SlotMap<NodeKey, Node>,
    index: HashMap<NodeId, NodeKey>,
}

impl Graph {
    pub fn new(id: impl Into<WorkflowId>) -> Self {
        Graph { id: id.into(), nodes: SlotMap::with_key(), index: HashMap::new() }
    }

    pub fn id(&self) -> &WorkflowId {
        &self.id
    }

    pub fn add_node(&mut self, id: impl Into<NodeId>, content: TaskProfile) -> Result<NodeKey> {
        let id = id.into();
        let name = id.to_string();
        self.add_named_node(id, name, content)
    }

    pub fn add_named_node(&mut self, id: impl Into<NodeId>, name: impl Into<String>, content: TaskProfile) -> Result<NodeKey> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(Error::DuplicateNodeError(id));
        }
        content.validate(&id)?;

        let key = self.nodes.insert(Node::new(id.clone(), name.into(), content));
        self.index.insert(id, key);
        self.invalidate_depths();
        Ok(key)
    }

    /// Adds the edge `parent -> child`.
    ///
    /// Adding an edge that already exists is a no-op.
    pub fn add_edge(&mut self, parent_id: &NodeId, child_id: &NodeId) -> Result<()> {
        let parent = self.key_of(parent_id).ok_or_else(|| Error::UnknownNodeError(parent_id.clone()))?;
        let child = self.key_of(child_id).ok_or_else(|| Error::UnknownNodeError(child_id.clone()))?;

        if self.nodes[parent].children.contains(&child) {
            log::debug!("Edge '{}' -> '{}' already present in workflow {}.", parent_id, child_id, self.id);
            return Ok(());
        }

        // The new edge closes a cycle iff the parent is already reachable from the child.
        if parent == child || self.is_reachable(child, parent) {
            return Err(Error::CycleError { parent: parent_id.clone(), child: child_id.clone() });
        }

        self.nodes[parent].children.push(child);
        self.nodes[child].parents.push(parent);
        self.invalidate_depths();
        Ok(())
    }

    /// Removes a node together with all edges touching it.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<Node> {
        let key = self.index.remove(id).ok_or_else(|| Error::UnknownNodeError(id.clone()))?;
        let node = self.nodes.remove(key).ok_or_else(|| Error::UnknownNodeError(id.clone()))?;

        for parent in &node.parents {
            if let Some(parent) = self.nodes.get_mut(*parent) {
                parent.children.retain(|c| *c != key);
            }
        }
        for child in &node.children {
            if let Some(child) = self.nodes.get_mut(*child) {
                child.parents.retain(|p| *p != key);
            }
        }

        self.invalidate_depths();
        Ok(node)
    }

    pub fn key_of(&self, id: &NodeId) -> Option<NodeKey> {
        self.index.get(id).copied()
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.key_of(id).and_then(|key| self.nodes.get(key))
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        let key = self.key_of(id)?;
        self.nodes.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.children.len()).sum()
    }

    pub(crate) fn arena(&self) -> &SlotMap<NodeKey, Node> {
        &self.nodes
    }

    /// All node keys in ascending id order.
    pub fn sorted_keys(&self) -> Vec<NodeKey> {
        let mut keys: Vec<NodeKey> = self.nodes.keys().collect();
        keys.sort_by(|a, b| self.nodes[*a].id().cmp(self.nodes[*b].id()));
        keys
    }

    /// All nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.sorted_keys().into_iter().map(move |key| &self.nodes[key])
    }

    pub fn topological_order(&self) -> TopologicalOrder<'_> {
        TopologicalOrder::new(self)
    }

    /// Nodes without parents, in ascending id order.
    pub fn entry_nodes(&self) -> Vec<NodeKey> {
        self.sorted_keys().into_iter().filter(|key| self.nodes[*key].is_entry()).collect()
    }

    /// Nodes without children, in ascending id order.
    pub fn exit_nodes(&self) -> Vec<NodeKey> {
        self.sorted_keys().into_iter().filter(|key| self.nodes[*key].is_exit()).collect()
    }

    pub fn set_color(&mut self, key: NodeKey, color: Color) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.color = color;
        }
    }

    pub fn is_color(&self, key: NodeKey, color: Color) -> bool {
        self.nodes.get(key).is_some_and(|node| node.is_color(color))
    }

    /// True if every parent of `key` carries `color`. Entry nodes trivially qualify.
    pub fn all_parents_colored(&self, key: NodeKey, color: Color) -> bool {
        match self.nodes.get(key) {
            Some(node) => node.parents.iter().all(|p| self.nodes[*p].is_color(color)),
            None => false,
        }
    }

    pub fn reset_colors(&mut self) {
        for node in self.nodes.values_mut() {
            node.color = Color::Unvisited;
        }
    }

    /// Drops all scheduler scratch state so the graph can be planned again.
    pub fn reset_bags(&mut self) {
        for node in self.nodes.values_mut() {
            node.bag = Default::default();
        }
    }

    /// Sets every node's depth to its longest-path distance from an entry node.
    pub fn compute_depths(&mut self) {
        let order: Vec<NodeKey> = self.topological_order().collect();

        for key in order {
            let depth = self.nodes[key].parents.iter().filter_map(|p| self.nodes[*p].depth).map(|d| d + 1).max().unwrap_or(0);
            self.nodes[key].depth = Some(depth);
        }
    }

    fn invalidate_depths(&mut self) {
        for node in self.nodes.values_mut() {
            node.depth = None;
        }
    }

    fn is_reachable(&self, from: NodeKey, to: NodeKey) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::from([from]);

        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            for &child in &self.nodes[current].children {
                if seen.insert(child) {
                    stack.push(child);
                }
            }
        }
        false
    }
}

impl Graph {
    /// Constructs the workflow graph from a [`WorkflowDto`].
    ///
    /// All tasks are inserted first, then all edges, so edges may refer to tasks
    /// listed later in the document.
    pub fn from_dto(dto: WorkflowDto) -> Result<Self> {
        let mut graph = Graph::new(dto.id);

        // Phase 1: Create all nodes from the DTO tasks
        for task in dto.tasks {
            let id = NodeId::new(task.id.clone());
            let name = task.name.clone().unwrap_or_else(|| task.id.clone());
            graph.add_named_node(id, name, Self::profile_from_dto(task))?;
        }

        // Phase 2: Connect them
        for edge in dto.edges {
            graph.add_edge(&NodeId::new(edge.parent), &NodeId::new(edge.child))?;
        }

        log::info!("Workflow {} constructed with {} nodes and {} edges.", graph.id(), graph.len(), graph.edge_count());
        Ok(graph)
    }

    fn profile_from_dto(task: TaskDto) -> TaskProfile {
        TaskProfile {
            average_compute_time: task.average_compute_time,
            site_runtimes: task.site_runtimes.into_iter().map(|(site, runtime)| (SiteId::new(site), runtime)).collect(),
            transformation: task.transformation.map(TransformationName::new),
            runnable_sites: task.runnable_sites.map(|sites| sites.into_iter().map(SiteId::new).collect()),
            instance_type: task.instance_type,
            execution_site: None,
        }
    }
}

impl TryFrom<WorkflowDto> for Graph {
    type Error = Error;

    fn try_from(dto: WorkflowDto) -> Result<Self> {
        Graph::from_dto(dto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(graph: &Graph, keys: impl IntoIterator<Item = NodeKey>) -> Vec<String> {
        keys.into_iter().map(|key| graph.get(key).unwrap().id().to_string()).collect()
    }

    fn diamond() -> Graph {
        let mut graph = Graph::new("diamond");
        for id in ["A", "B", "C", "D"] {
            graph.add_node(id, TaskProfile::with_average(1.0)).unwrap();
        }
        for (parent, child) in [("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")] {
            graph.add_edge(&NodeId::new(parent), &NodeId::new(child)).unwrap();
        }
        graph
    }

    #[test]
    fn test_duplicate_node_is_rejected() {
        let mut graph = Graph::new("wf");
        graph.add_node("A", TaskProfile::default()).unwrap();

        let result = graph.add_node("A", TaskProfile::default());
        assert!(matches!(result, Err(Error::DuplicateNodeError(id)) if id.as_str() == "A"));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_negative_runtime_is_rejected() {
        let mut graph = Graph::new("wf");
        let result = graph.add_node("A", TaskProfile::with_average(-1.0));
        assert!(matches!(result, Err(Error::InvalidRuntimeError { .. })));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_edge_to_unknown_node_is_rejected() {
        let mut graph = Graph::new("wf");
        graph.add_node("A", TaskProfile::default()).unwrap();

        let result = graph.add_edge(&NodeId::new("A"), &NodeId::new("missing"));
        assert!(matches!(result, Err(Error::UnknownNodeError(id)) if id.as_str() == "missing"));
    }

    #[test]
    fn test_cycle_is_rejected_eagerly() {
        let mut graph = diamond();

        let result = graph.add_edge(&NodeId::new("D"), &NodeId::new("A"));
        assert!(matches!(result, Err(Error::CycleError { .. })));

        let result = graph.add_edge(&NodeId::new("B"), &NodeId::new("B"));
        assert!(matches!(result, Err(Error::CycleError { .. })));

        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.topological_order().count(), 4);
    }

    #[test]
    fn test_duplicate_edge_is_ignored() {
        let mut graph = diamond();
        graph.add_edge(&NodeId::new("A"), &NodeId::new("B")).unwrap();

        assert_eq!(graph.edge_count(), 4);
        let b = graph.node(&NodeId::new("B")).unwrap();
        assert_eq!(b.parents().len(), 1);
    }

    #[test]
    fn test_topological_order_breaks_ties_by_id() {
        let graph = diamond();
        let order = ids(&graph, graph.topological_order());
        assert_eq!(order, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_entry_and_exit_nodes() {
        let graph = diamond();
        assert_eq!(ids(&graph, graph.entry_nodes()), vec!["A"]);
        assert_eq!(ids(&graph, graph.exit_nodes()), vec!["D"]);
    }

    #[test]
    fn test_depths_follow_longest_path() {
        let mut graph = diamond();
        graph.add_node("E", TaskProfile::default()).unwrap();
        graph.add_edge(&NodeId::new("A"), &NodeId::new("E")).unwrap();
        graph.add_edge(&NodeId::new("E"), &NodeId::new("C")).unwrap();

        graph.compute_depths();
        let depth = |id: &str| graph.node(&NodeId::new(id)).unwrap().depth();
        assert_eq!(depth("A"), Some(0));
        assert_eq!(depth("B"), Some(1));
        assert_eq!(depth("E"), Some(1));
        assert_eq!(depth("C"), Some(2));
        assert_eq!(depth("D"), Some(3));

        graph.add_node("F", TaskProfile::default()).unwrap();
        assert_eq!(graph.node(&NodeId::new("D")).unwrap().depth(), None);
    }

    #[test]
    fn test_remove_node_detaches_edges() {
        let mut graph = diamond();
        let removed = graph.remove_node(&NodeId::new("B")).unwrap();
        assert_eq!(removed.id().as_str(), "B");

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edge_count(), 2);
        let d = graph.node(&NodeId::new("D")).unwrap();
        assert_eq!(ids(&graph, d.parents().to_vec()), vec!["C"]);
        assert!(graph.node(&NodeId::new("B")).is_none());
    }

    #[test]
    fn test_parent_coloring() {
        let mut graph = diamond();
        let b = graph.key_of(&NodeId::new("B")).unwrap();
        let c = graph.key_of(&NodeId::new("C")).unwrap();
        let d = graph.key_of(&NodeId::new("D")).unwrap();

        assert!(!graph.all_parents_colored(d, Color::Done));
        graph.set_color(b, Color::Done);
        assert!(!graph.all_parents_colored(d, Color::Done));
        graph.set_color(c, Color::Done);
        assert!(graph.all_parents_colored(d, Color::Done));

        graph.reset_colors();
        assert!(graph.is_color(b, Color::Unvisited));
        assert!(graph.all_parents_colored(graph.key_of(&NodeId::new("A")).unwrap(), Color::Done));
    }

    #[test]
    fn test_long_chain_with_edges_added_children_first() {
        const LENGTH: usize = 3000;
        let id = |i: usize| NodeId::new(format!("n{:05}", i));

        let mut graph = Graph::new("chain");
        for i in 0..LENGTH {
            graph.add_node(id(i), TaskProfile::default()).unwrap();
        }
        for i in (1..LENGTH).rev() {
            graph.add_edge(&id(i - 1), &id(i)).unwrap();
        }
        assert_eq!(graph.edge_count(), LENGTH - 1);

        let result = graph.add_edge(&id(LENGTH - 1), &id(0));
        assert!(matches!(result, Err(Error::CycleError { .. })));

        let order = ids(&graph, graph.topological_order());
        assert_eq!(order.first().map(String::as_str), Some("n00000"));
        assert_eq!(order.last().map(String::as_str), Some("n02999"));
    }
}
