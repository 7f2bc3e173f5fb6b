use std::time::Duration;

use deco_site_selector::domain::catalog::profile_catalog::ProfileCatalog;
use deco_site_selector::domain::catalog::runtime_catalog::RuntimeCatalog;
use deco_site_selector::domain::config::PlannerConfig;
use deco_site_selector::domain::graph::Graph;
use deco_site_selector::domain::graph::task_profile::TaskProfile;
use deco_site_selector::domain::scheduler::heft_scheduler::HeftScheduler;
use deco_site_selector::domain::scheduler::schedule::Schedule;
use deco_site_selector::domain::scheduler::scheduler_policy::{CapacityPolicy, PriorityPolicy, SchedulingBudget, TimelinePolicy};
use deco_site_selector::domain::site::Site;
use deco_site_selector::domain::site_selector::SiteSelector;
use deco_site_selector::domain::statistics::{ScheduleStatistics, write_schedule_csv};
use deco_site_selector::domain::utils::id::{NodeId, SiteId};
use deco_site_selector::error::{ConversionError, Error, Result};

fn run(graph: &mut Graph, sites: &[Site], config: &PlannerConfig) -> Result<Schedule> {
    HeftScheduler::new(config, &ProfileCatalog).schedule(graph, sites)
}

fn zero_communication() -> PlannerConfig {
    PlannerConfig::default().with_communication(0.0, 1.0)
}

fn start_of(schedule: &Schedule, node: &str) -> f64 {
    schedule.get(&NodeId::new(node)).unwrap().start
}

fn site_of(schedule: &Schedule, node: &str) -> String {
    schedule.get(&NodeId::new(node)).unwrap().site.to_string()
}

/// P runs on s2 only and feeds C on s1, leaving s1 idle until C's data arrives.
/// Q is independent, restricted to s1 and scheduled last.
fn gap_graph() -> Graph {
    let mut graph = Graph::new("gap");
    graph.add_node("P", TaskProfile::with_average(5.0).with_runnable_sites(["s2"])).unwrap();
    graph.add_node("C", TaskProfile::with_average(1.0).with_runnable_sites(["s1"])).unwrap();
    graph.add_node("Q", TaskProfile::with_average(3.0).with_runnable_sites(["s1"])).unwrap();
    graph.add_edge(&NodeId::new("P"), &NodeId::new("C")).unwrap();
    graph
}

fn independent_graph(count: usize, average: f64) -> Graph {
    let mut graph = Graph::new("independent");
    for i in 0..count {
        graph.add_node(format!("t{}", i).as_str(), TaskProfile::with_average(average)).unwrap();
    }
    graph
}

#[test]
fn test_append_timeline_queues_behind_last_task() {
    let mut graph = gap_graph();
    let sites = vec![Site::new("s1"), Site::new("s2")];
    let config = PlannerConfig::default().with_communication(2.0, 1.0);

    let schedule = run(&mut graph, &sites, &config).unwrap();

    assert_eq!(schedule.order(), &[NodeId::new("P"), NodeId::new("C"), NodeId::new("Q")]);
    assert_eq!(start_of(&schedule, "C"), 7.0);
    assert_eq!(start_of(&schedule, "Q"), 8.0);
    assert_eq!(schedule.makespan(), 11.0);
}

#[test]
fn test_insertion_timeline_fills_idle_gap() {
    let mut graph = gap_graph();
    let sites = vec![Site::new("s1"), Site::new("s2")];
    let config = PlannerConfig::default().with_communication(2.0, 1.0).with_timeline_policy(TimelinePolicy::Insertion);

    let schedule = run(&mut graph, &sites, &config).unwrap();

    assert_eq!(start_of(&schedule, "C"), 7.0);
    assert_eq!(start_of(&schedule, "Q"), 0.0);
    assert_eq!(schedule.makespan(), 8.0);
}

#[test]
fn test_informational_capacity_serialises_site() {
    let mut graph = independent_graph(3, 4.0);
    let sites = vec![Site::new("cluster").with_idle_units(2)];

    let schedule = run(&mut graph, &sites, &zero_communication()).unwrap();

    assert_eq!(start_of(&schedule, "t0"), 0.0);
    assert_eq!(start_of(&schedule, "t1"), 4.0);
    assert_eq!(start_of(&schedule, "t2"), 8.0);
    assert_eq!(schedule.makespan(), 12.0);
}

#[test]
fn test_slot_limited_capacity_runs_units_in_parallel() {
    let mut graph = independent_graph(3, 4.0);
    let sites = vec![Site::new("cluster").with_idle_units(2)];
    let config = zero_communication().with_capacity_policy(CapacityPolicy::SlotLimited);

    let schedule = run(&mut graph, &sites, &config).unwrap();

    assert_eq!(start_of(&schedule, "t0"), 0.0);
    assert_eq!(start_of(&schedule, "t1"), 0.0);
    assert_eq!(start_of(&schedule, "t2"), 4.0);
    assert_eq!(schedule.makespan(), 8.0);
}

#[test]
fn test_slot_limited_capacity_skips_sites_without_free_units() {
    let mut graph = independent_graph(3, 4.0);
    let sites = vec![Site::new("busy").with_idle_units(0).with_total_units(0), Site::new("free").with_idle_units(1)];
    let config = zero_communication().with_capacity_policy(CapacityPolicy::SlotLimited);

    let schedule = run(&mut graph, &sites, &config).unwrap();

    assert!(schedule.iter().all(|(_, a)| a.site == SiteId::new("free")));
    assert_eq!(schedule.makespan(), 12.0);
}

#[test]
fn test_slot_limited_capacity_with_huge_unit_count() {
    let mut graph = independent_graph(3, 4.0);
    let sites = vec![Site::new("cloud").with_idle_units(u32::MAX)];
    let config = zero_communication().with_capacity_policy(CapacityPolicy::SlotLimited);

    let schedule = run(&mut graph, &sites, &config).unwrap();

    assert!(schedule.iter().all(|(_, a)| a.start == 0.0));
    assert_eq!(schedule.makespan(), 4.0);
}

#[test]
fn test_runnable_sites_restrict_placement() {
    let mut graph = Graph::new("restricted");
    graph.add_node("A", TaskProfile::with_average(1.0).with_site_runtime("fast", 1.0).with_site_runtime("slow", 20.0).with_runnable_sites(["slow"])).unwrap();
    let sites = vec![Site::new("fast"), Site::new("slow")];

    let schedule = run(&mut graph, &sites, &zero_communication()).unwrap();

    assert_eq!(site_of(&schedule, "A"), "slow");
    assert_eq!(schedule.makespan(), 20.0);
}

#[test]
fn test_unknown_runnable_site_is_an_error() {
    let mut graph = Graph::new("restricted");
    graph.add_node("A", TaskProfile::with_average(1.0).with_runnable_sites(["elsewhere"])).unwrap();
    let sites = vec![Site::new("s1")];

    let result = run(&mut graph, &sites, &zero_communication());
    assert!(matches!(result, Err(Error::NoRunnableSiteError(node)) if node == NodeId::new("A")));
}

#[test]
fn test_instance_type_must_match() {
    let mut graph = Graph::new("typed");
    graph.add_node("A", TaskProfile::with_average(1.0).with_instance_type("m1.large")).unwrap();

    let sites = vec![Site::new("s1").with_instance_type("m1.small")];
    let result = run(&mut graph, &sites, &zero_communication());
    assert!(matches!(result, Err(Error::NoRunnableSiteError(_))));

    let sites = vec![Site::new("s1").with_instance_type("m1.small"), Site::new("s2").with_instance_type("m1.large")];
    let schedule = run(&mut graph, &sites, &zero_communication()).unwrap();
    assert_eq!(site_of(&schedule, "A"), "s2");
}

#[test]
fn test_assignment_budget_aborts_scheduling() {
    let mut graph = independent_graph(3, 1.0);
    let sites = vec![Site::new("s1")];

    let config = zero_communication().with_budget(SchedulingBudget { max_assignments: Some(2), time_limit: None });
    let result = run(&mut graph, &sites, &config);
    assert!(matches!(result, Err(Error::BudgetExceededError { scheduled: 2, total: 3 })));

    let config = zero_communication().with_budget(SchedulingBudget { max_assignments: Some(3), time_limit: Some(Duration::from_secs(60)) });
    let schedule = run(&mut graph, &sites, &config).unwrap();
    assert_eq!(schedule.len(), 3);
}

/// A -> B plus an independent, long running C on a single site.
fn priority_graph() -> Graph {
    let mut graph = Graph::new("priorities");
    graph.add_node("A", TaskProfile::with_average(1.0)).unwrap();
    graph.add_node("B", TaskProfile::with_average(1.0)).unwrap();
    graph.add_node("C", TaskProfile::with_average(10.0)).unwrap();
    graph.add_edge(&NodeId::new("A"), &NodeId::new("B")).unwrap();
    graph
}

#[test]
fn test_priority_policies_change_scheduling_order() {
    let sites = vec![Site::new("s1")];
    let order_for = |policy: PriorityPolicy| {
        let mut graph = priority_graph();
        let config = zero_communication().with_priority_policy(policy);
        run(&mut graph, &sites, &config).unwrap().order().iter().map(|id| id.to_string()).collect::<Vec<_>>()
    };

    assert_eq!(order_for(PriorityPolicy::CriticalPath), ["C", "A", "B"]);
    assert_eq!(order_for(PriorityPolicy::UpwardRank), ["C", "A", "B"]);
    assert_eq!(order_for(PriorityPolicy::DownwardRank), ["A", "C", "B"]);
}

#[test]
fn test_site_selector_records_execution_sites() {
    let mut graph = Graph::new("selector");
    graph.add_node("A", TaskProfile::with_average(1.0)).unwrap();
    graph.add_node("B", TaskProfile::with_average(1.0).with_runnable_sites(["s2"])).unwrap();
    graph.add_edge(&NodeId::new("A"), &NodeId::new("B")).unwrap();
    let sites = vec![Site::new("s1"), Site::new("s2")];

    let selector = SiteSelector::new(zero_communication()).unwrap();
    let schedule = selector.map_workflow(&mut graph, &sites).unwrap();

    for node in graph.nodes() {
        assert_eq!(node.content.execution_site.as_ref(), Some(&schedule.get(node.id()).unwrap().site));
    }
    assert_eq!(graph.node(&NodeId::new("B")).unwrap().content.execution_site, Some(SiteId::new("s2")));
}

#[test]
fn test_statistics_and_csv_export() {
    let mut graph = Graph::new("stats");
    graph.add_node("A", TaskProfile::with_average(2.0)).unwrap();
    graph.add_node("B", TaskProfile::with_average(3.0)).unwrap();
    graph.add_edge(&NodeId::new("A"), &NodeId::new("B")).unwrap();
    let sites = vec![Site::new("s1")];

    let schedule = run(&mut graph, &sites, &zero_communication()).unwrap();

    let statistics = ScheduleStatistics::from_schedule(&schedule);
    assert_eq!(statistics.makespan, 5.0);
    let s1 = statistics.get(&SiteId::new("s1")).unwrap();
    assert_eq!(s1.tasks, 2);
    assert_eq!(s1.busy_time, 5.0);
    assert_eq!(s1.utilization, 1.0);

    let mut buffer = Vec::new();
    write_schedule_csv(&schedule, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "node,site,start,finish");
    assert!(lines[1].starts_with("A,s1,"));
    assert!(lines[2].starts_with("B,s1,"));
}

#[test]
fn test_negative_default_average_is_rejected() {
    let mut graph = independent_graph(1, 1.0);
    graph.node_mut(&NodeId::new("t0")).unwrap().content.average_compute_time = None;
    let sites = vec![Site::new("s1")];
    let config = zero_communication().with_default_average_compute_time(-3.0);

    let result = run(&mut graph, &sites, &config);
    assert!(matches!(result, Err(Error::ConversionError(ConversionError::InvalidConfigValue { field: "defaultAverageComputeTime", .. }))));
}

/// Catalog that reports a broken runtime for every site.
#[derive(Debug)]
struct BrokenCatalog;

impl RuntimeCatalog for BrokenCatalog {
    fn name(&self) -> &'static str {
        "Broken"
    }

    fn declared_average(&self, _task: &TaskProfile) -> Option<f64> {
        Some(1.0)
    }

    fn site_runtime(&self, _task: &TaskProfile, _site: &SiteId) -> Option<f64> {
        Some(-5.0)
    }
}

#[test]
fn test_negative_runtime_from_catalog_is_rejected() {
    let mut graph = independent_graph(1, 1.0);
    let sites = vec![Site::new("s1")];
    let config = zero_communication();

    let result = HeftScheduler::new(&config, &BrokenCatalog).schedule(&mut graph, &sites);
    assert!(matches!(result, Err(Error::InvalidRuntimeError { node, value }) if node == NodeId::new("t0") && value == -5.0));
}
