use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use crate::domain::catalog::runtime_catalog::RuntimeCatalog;
use crate::domain::config::PlannerConfig;
use crate::domain::graph::Graph;
use crate::domain::graph::node::NodeKey;
use crate::domain::makespan::MakespanTracker;
use crate::domain::rank::{compute_ranks, prepare_average_compute_times};
use crate::domain::scheduler::schedule::{Assignment, Schedule};
use crate::domain::scheduler::scheduler_policy::CapacityPolicy;
use crate::domain::site::Site;
use crate::domain::site::timeline::{SiteTimeline, Slot};
use crate::domain::utils::id::{NodeId, SiteId};
use crate::error::{Error, Result};

/**
 * Scheduler using the HEFT workflow scheduling algorithm.
 *
 * The basic idea of the scheduling algorithm is a list scheduler using the
 * length of the critical path assuming average resources as list sorting
 * criteria. Each job is placed on the site providing the earliest finishing
 * time (EFT).
 *
 * A job only becomes eligible once all of its parents are placed. Among the
 * eligible jobs the one with the highest priority goes first.
 */
pub struct HeftScheduler<'a> {
    config: &'a PlannerConfig,
    catalog: &'a dyn RuntimeCatalog,
}

/// Winning site of one node.
#[derive(Debug, Clone)]
struct SiteDecision {
    site: SiteId,
    slot: Slot,
    finish: f64,
}

/// Site state owned by the scheduler for the duration of one run.
struct SiteTable<'s> {
    sites: BTreeMap<SiteId, &'s Site>,
    timelines: BTreeMap<SiteId, SiteTimeline>,
}

impl<'a> HeftScheduler<'a> {
    pub fn new(config: &'a PlannerConfig, catalog: &'a dyn RuntimeCatalog) -> Self {
        HeftScheduler { config, catalog }
    }

    /// Computes average compute times and ranks, then assigns every node to a site.
    pub fn schedule(&self, graph: &mut Graph, sites: &[Site]) -> Result<Schedule> {
        self.config.validate()?;
        if graph.is_empty() {
            log::info!("Workflow {} has no nodes, returning an empty schedule.", graph.id());
            return Ok(Schedule::empty(graph.id().clone()));
        }
        if sites.is_empty() {
            return Err(Error::NoSitesAvailableError);
        }

        prepare_average_compute_times(graph, sites, self.catalog, self.config);
        compute_ranks(graph, self.config);

        self.assign_sites(graph, sites)
    }

    /// Assigns every node to a site, using the ranks already stored in the node bags.
    pub fn assign_sites(&self, graph: &mut Graph, sites: &[Site]) -> Result<Schedule> {
        if graph.is_empty() {
            return Ok(Schedule::empty(graph.id().clone()));
        }
        let mut site_table = self.build_site_table(sites, graph.len())?;

        for key in graph.sorted_keys() {
            if let Some(node) = graph.get_mut(key) {
                node.bag.clear_assignment();
            }
        }

        let total = graph.len();
        let started = Instant::now();
        let mut tracker = MakespanTracker::new();
        let mut assignments = BTreeMap::new();
        let mut order = Vec::with_capacity(total);

        let mut remaining_parents: HashMap<NodeKey, usize> = HashMap::with_capacity(total);
        let mut ready: Vec<NodeKey> = Vec::new();
        for key in graph.sorted_keys() {
            let parents = graph.get(key).map(|n| n.parents().len()).unwrap_or(0);
            if parents == 0 {
                ready.push(key);
            } else {
                remaining_parents.insert(key, parents);
            }
        }

        while !ready.is_empty() {
            self.check_budget(tracker.recorded(), total, started)?;

            let position = self.next_ready_position(graph, &ready);
            let key = ready.swap_remove(position);

            let decision = self.select_site(graph, key, &site_table)?;
            let Some(timeline) = site_table.timelines.get_mut(&decision.site) else {
                return Err(Error::NoRunnableSiteError(node_id(graph, key)));
            };
            timeline.book(decision.slot, decision.finish);
            tracker.record(decision.finish);

            let Some(node) = graph.get_mut(key) else { continue };
            node.bag.scheduled_site = Some(decision.site.clone());
            node.bag.start_time = Some(decision.slot.start);
            node.bag.finish_time = Some(decision.finish);
            log::debug!("Scheduled job {} to site {} with from {} till {}", node.id(), decision.site, decision.slot.start, decision.finish);

            let id = node.id().clone();
            let children = node.children().to_vec();
            assignments.insert(id.clone(), Assignment { site: decision.site, start: decision.slot.start, finish: decision.finish });
            order.push(id);

            for child in children {
                if let Some(count) = remaining_parents.get_mut(&child) {
                    *count -= 1;
                    if *count == 0 {
                        remaining_parents.remove(&child);
                        ready.push(child);
                    }
                }
            }
        }

        log::info!("Scheduled {} nodes of workflow {} on {} sites, makespan {}.", order.len(), graph.id(), site_table.sites.len(), tracker.makespan());
        site_table.timelines.values().for_each(|timeline| {
            log::debug!("Site {} has {} lanes, busy for {}.", timeline.site(), timeline.lanes(), timeline.busy_time());
        });

        Ok(Schedule::new(graph.id().clone(), assignments, order, tracker.makespan()))
    }

    /// A site never needs more lanes than there are nodes to place.
    fn build_site_table<'s>(&self, sites: &'s [Site], node_count: usize) -> Result<SiteTable<'s>> {
        if sites.is_empty() {
            return Err(Error::NoSitesAvailableError);
        }

        let mut table = SiteTable { sites: BTreeMap::new(), timelines: BTreeMap::new() };
        for site in sites {
            if table.sites.insert(site.id.clone(), site).is_some() {
                return Err(Error::DuplicateSiteError(site.id.clone()));
            }

            let units = site.resolved_units(self.config.default_free_units);
            log::debug!("Available units set for site {} {}", site.id, units);

            let lanes = match self.config.capacity_policy {
                CapacityPolicy::Informational => 1,
                CapacityPolicy::SlotLimited => (units as usize).min(node_count),
            };
            if lanes == 0 {
                log::warn!("Site {} has no free units and is skipped.", site.id);
                continue;
            }
            table.timelines.insert(site.id.clone(), SiteTimeline::new(site.id.clone(), lanes));
        }
        Ok(table)
    }

    fn check_budget(&self, scheduled: usize, total: usize, started: Instant) -> Result<()> {
        let budget = &self.config.budget;

        let assignments_exhausted = budget.max_assignments.is_some_and(|max| scheduled >= max);
        let time_exhausted = budget.time_limit.is_some_and(|limit| started.elapsed() >= limit);

        if assignments_exhausted || time_exhausted {
            log::warn!("Scheduling budget exhausted after {} of {} nodes.", scheduled, total);
            return Err(Error::BudgetExceededError { scheduled, total });
        }
        Ok(())
    }

    fn next_ready_position(&self, graph: &Graph, ready: &[NodeKey]) -> usize {
        let policy = self.config.priority_policy;
        let entry = move |key: NodeKey| {
            let node = &graph.arena()[key];
            (node.id(), &node.bag)
        };

        ready
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| policy.compare(entry(**a), entry(**b)))
            .map(|(position, _)| position)
            .unwrap_or(0)
    }

    /// Earliest finish time of `key` on every runnable site; the smallest wins, ties go to the smaller site id.
    fn select_site(&self, graph: &Graph, key: NodeKey, site_table: &SiteTable<'_>) -> Result<SiteDecision> {
        let node = &graph.arena()[key];
        let mut best: Option<SiteDecision> = None;

        for (site_id, timeline) in &site_table.timelines {
            let site = site_table.sites[site_id];
            if !site.can_run(&node.content) {
                continue;
            }

            let mut ready_time: f64 = 0.0;
            for parent_key in node.parents() {
                let parent = &graph.arena()[*parent_key];
                let (Some(parent_site), Some(parent_finish)) = (&parent.bag.scheduled_site, parent.bag.finish_time) else {
                    return Err(Error::UnscheduledNodeError(parent.id().clone()));
                };
                let delay = match site_table.sites.get(parent_site) {
                    Some(parent_site) => self.config.communication_delay(parent_site, site),
                    None => self.config.average_communication_cost(),
                };
                ready_time = ready_time.max(parent_finish + delay);
            }

            let duration = self
                .catalog
                .site_runtime(&node.content, site_id)
                .or(node.bag.avg_compute_time)
                .unwrap_or(self.config.default_average_compute_time);
            if !duration.is_finite() || duration < 0.0 {
                return Err(Error::InvalidRuntimeError { node: node.id().clone(), value: duration });
            }

            let slot = timeline.earliest_slot(ready_time, duration, self.config.timeline_policy);
            let finish = slot.start + duration;
            log::trace!("Node {} on site {}: ready {}, start {}, finish {}", node.id(), site_id, ready_time, slot.start, finish);

            if best.as_ref().is_none_or(|b| finish < b.finish) {
                best = Some(SiteDecision { site: site_id.clone(), slot, finish });
            }
        }

        best.ok_or_else(|| Error::NoRunnableSiteError(node.id().clone()))
    }
}

fn node_id(graph: &Graph, key: NodeKey) -> NodeId {
    graph.arena()[key].id().clone()
}
