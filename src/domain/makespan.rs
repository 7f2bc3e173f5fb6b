use crate::domain::graph::Graph;
use crate::error::{Error, Result};

/// Running maximum of the finish times seen during one scheduling run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MakespanTracker {
    makespan: f64,
    recorded: usize,
}

impl MakespanTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, finish_time: f64) {
        self.makespan = self.makespan.max(finish_time);
        self.recorded += 1;
    }

    pub fn makespan(&self) -> f64 {
        self.makespan
    }

    pub fn recorded(&self) -> usize {
        self.recorded
    }
}

/// Maximum of the given finish times, 0 if there are none.
pub fn makespan_of(finish_times: impl IntoIterator<Item = f64>) -> f64 {
    finish_times.into_iter().fold(0.0, f64::max)
}

/// Makespan of a scheduled graph: the latest finish time among its exit nodes.
///
/// Fails if an exit node carries no finish time in its bag.
pub fn makespan_from_graph(graph: &Graph) -> Result<f64> {
    let mut finish_times = Vec::new();
    for key in graph.exit_nodes() {
        let Some(node) = graph.get(key) else { continue };
        let finish = node.bag.finish_time.ok_or_else(|| Error::UnscheduledNodeError(node.id().clone()))?;
        finish_times.push(finish);
    }
    Ok(makespan_of(finish_times))
}
