use std::collections::{BTreeMap, BTreeSet};

use crate::domain::makespan::makespan_of;
use crate::domain::utils::id::{NodeId, SiteId, WorkflowId};

/// Placement of a single node.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub site: SiteId,
    pub start: f64,
    pub finish: f64,
}

impl Assignment {
    pub fn duration(&self) -> f64 {
        self.finish - self.start
    }
}

/// Result of one scheduling run.
///
/// Maps every node to its site, start and finish time, and keeps the order in
/// which the scheduler placed the nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    workflow: WorkflowId,
    assignments: BTreeMap<NodeId, Assignment>,
    order: Vec<NodeId>,
    makespan: f64,
}

impl Schedule {
    pub(crate) fn new(workflow: WorkflowId, assignments: BTreeMap<NodeId, Assignment>, order: Vec<NodeId>, makespan: f64) -> Self {
        Schedule { workflow, assignments, order, makespan }
    }

    pub fn empty(workflow: WorkflowId) -> Self {
        Schedule { workflow, assignments: BTreeMap::new(), order: Vec::new(), makespan: 0.0 }
    }

    pub fn workflow(&self) -> &WorkflowId {
        &self.workflow
    }

    pub fn get(&self, node: &NodeId) -> Option<&Assignment> {
        self.assignments.get(node)
    }

    /// Assignments in ascending node id order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Assignment)> {
        self.assignments.iter()
    }

    /// Node ids in the order the scheduler placed them.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn makespan(&self) -> f64 {
        self.makespan
    }

    /// Derives the makespan again from the assignments alone.
    pub fn recompute_makespan(&self) -> f64 {
        makespan_of(self.assignments.values().map(|a| a.finish))
    }

    pub fn sites_used(&self) -> BTreeSet<&SiteId> {
        self.assignments.values().map(|a| &a.site).collect()
    }
}
