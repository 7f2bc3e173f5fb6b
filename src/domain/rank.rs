//! Upward and downward ranks of the workflow nodes.
//!
//! Both ranks estimate elapsed time along the longest path of the workflow,
//! assuming average compute times and the average communication cost between
//! any two jobs:
//!
//! ```text
//! rank_up(n)   = avg(n) + max(0, max over children c of (comm + rank_up(c)))
//! rank_down(n) = max over parents p of (rank_down(p) + avg(p) + comm)
//! ```
//!
//! An exit node's upward rank is its own average compute time, an entry node's
//! downward rank is 0.

use crate::domain::catalog::runtime_catalog::RuntimeCatalog;
use crate::domain::config::PlannerConfig;
use crate::domain::graph::Graph;
use crate::domain::graph::node::{Color, NodeKey};
use crate::domain::graph::task_profile::TaskProfile;
use crate::domain::site::Site;

/// Stores the average compute time of every node in its bag.
///
/// The value is taken from the first source that has one:
/// 1. the average the catalog declares for the task,
/// 2. the per-site runtimes the catalog knows for runnable sites, weighted by each site's free units,
/// 3. the configured default average compute time.
pub fn prepare_average_compute_times(graph: &mut Graph, sites: &[Site], catalog: &dyn RuntimeCatalog, config: &PlannerConfig) {
    for key in graph.sorted_keys() {
        let Some(node) = graph.get_mut(key) else { continue };
        let average = average_compute_time(&node.content, sites, catalog, config);

        log::debug!("Average Compute Time {} is {}", node.id(), average);
        node.bag.avg_compute_time = Some(average);
    }
}

fn average_compute_time(task: &TaskProfile, sites: &[Site], catalog: &dyn RuntimeCatalog, config: &PlannerConfig) -> f64 {
    if let Some(declared) = catalog.declared_average(task) {
        return declared;
    }

    let mut weighted_total = 0.0;
    let mut total_units = 0.0;
    let mut plain_total = 0.0;
    let mut known_sites = 0;

    for site in sites.iter().filter(|site| site.can_run(task)) {
        if let Some(runtime) = catalog.site_runtime(task, &site.id) {
            let units = f64::from(site.resolved_units(config.default_free_units));
            weighted_total += runtime * units;
            total_units += units;
            plain_total += runtime;
            known_sites += 1;
        }
    }

    match known_sites {
        0 => {
            log::debug!("No runtime estimate found, using default average compute time {}.", config.default_average_compute_time);
            config.default_average_compute_time
        }
        _ if total_units > 0.0 => weighted_total / total_units,
        n => plain_total / n as f64,
    }
}

fn avg_of(graph: &Graph, key: NodeKey, config: &PlannerConfig) -> f64 {
    graph.get(key).and_then(|node| node.bag.avg_compute_time).unwrap_or(config.default_average_compute_time)
}

/// Computes the upward rank of every node.
///
/// Walks the graph depth first from the entry nodes. A node stays on the stack,
/// coloured in progress, until all of its children carry a rank.
pub fn compute_upward_ranks(graph: &mut Graph, config: &PlannerConfig) {
    let communication_cost = config.average_communication_cost();
    graph.reset_colors();

    let mut stack: Vec<NodeKey> = graph.entry_nodes();
    stack.reverse();
    for key in &stack {
        graph.set_color(*key, Color::InProgress);
    }

    while let Some(&key) = stack.last() {
        if graph.is_color(key, Color::Done) {
            stack.pop();
            continue;
        }

        let children = graph.get(key).map(|node| node.children().to_vec()).unwrap_or_default();
        let mut is_successor_without_rank = false;
        let mut longest_successor_path: f64 = 0.0;

        for child in children {
            if graph.is_color(child, Color::Done) {
                let child_rank = graph.get(child).and_then(|c| c.bag.upward_rank).unwrap_or(0.0);
                longest_successor_path = longest_successor_path.max(communication_cost + child_rank);
            } else {
                is_successor_without_rank = true;
                graph.set_color(child, Color::InProgress);
                stack.push(child);
            }
        }

        if !is_successor_without_rank {
            let rank = avg_of(graph, key, config) + longest_successor_path;
            if let Some(node) = graph.get_mut(key) {
                log::debug!("Upward rank for node {} is {}", node.id(), rank);
                node.bag.upward_rank = Some(rank);
            }
            graph.set_color(key, Color::Done);
            stack.pop();
        }
    }
}

/// Computes the downward rank of every node in topological order.
pub fn compute_downward_ranks(graph: &mut Graph, config: &PlannerConfig) {
    let communication_cost = config.average_communication_cost();
    graph.reset_colors();

    let order: Vec<NodeKey> = graph.topological_order().collect();
    for key in order {
        debug_assert!(graph.all_parents_colored(key, Color::Done), "topological order visits parents first");

        let parents = graph.get(key).map(|node| node.parents().to_vec()).unwrap_or_default();
        let rank = parents
            .iter()
            .map(|parent| {
                let parent_rank = graph.get(*parent).and_then(|p| p.bag.downward_rank).unwrap_or(0.0);
                parent_rank + avg_of(graph, *parent, config) + communication_cost
            })
            .fold(0.0, f64::max);

        if let Some(node) = graph.get_mut(key) {
            log::debug!("Downward rank for node {} is {}", node.id(), rank);
            node.bag.downward_rank = Some(rank);
        }
        graph.set_color(key, Color::Done);
    }
}

/// Computes both ranks of every node.
pub fn compute_ranks(graph: &mut Graph, config: &PlannerConfig) {
    compute_upward_ranks(graph, config);
    compute_downward_ranks(graph, config);
}
