use std::fmt;

use slotmap::new_key_type;

use crate::domain::graph::bag::SchedulingBag;
use crate::domain::graph::task_profile::TaskProfile;
use crate::domain::utils::id::NodeId;

new_key_type! {
    /// Arena handle of a [`Node`] inside its [`Graph`](crate::domain::graph::Graph).
    pub struct NodeKey;
}

/// Traversal marker used by the graph walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Unvisited,
    InProgress,
    Done,
}

/// One schedulable task of the workflow.
///
/// Parents and children are arena keys. Only the owning graph may change them,
/// which keeps both directions of every edge consistent.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: String,
    pub(crate) parents: Vec<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    pub(crate) depth: Option<usize>,
    pub(crate) color: Color,
    pub content: TaskProfile,
    pub bag: SchedulingBag,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: String, content: TaskProfile) -> Self {
        Node { id, name, parents: Vec::new(), children: Vec::new(), depth: None, color: Color::Unvisited, content, bag: SchedulingBag::new() }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> &[NodeKey] {
        &self.parents
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn is_entry(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_exit(&self) -> bool {
        self.children.is_empty()
    }

    /// Longest-path distance from an entry node, if computed since the last structural edit.
    pub fn depth(&self) -> Option<usize> {
        self.depth
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_color(&self, color: Color) -> bool {
        self.color == color
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID->{} name->{} parents->{} children->{} Bag-{{{}}}", self.id, self.name, self.parents.len(), self.children.len(), self.bag)
    }
}
