use std::path::{Path, PathBuf};

use deco_site_selector::api::schedule_dto::ScheduleDto;
use deco_site_selector::domain::catalog::catalog_type::CatalogType;
use deco_site_selector::domain::scheduler::scheduler_policy::PriorityPolicy;
use deco_site_selector::domain::utils::id::{NodeId, SiteId};
use deco_site_selector::error::{ConversionError, Error};
use deco_site_selector::{load_config, load_sites, load_workflow, plan_workflow};

fn data_file(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

#[test]
fn test_load_workflow_builds_graph() {
    let graph = load_workflow(data_file("montage_workflow.json")).unwrap();

    assert_eq!(graph.id().as_str(), "montage-small");
    assert_eq!(graph.len(), 4);
    assert_eq!(graph.edge_count(), 3);
    assert_eq!(graph.node(&NodeId::new("mDiff")).unwrap().name(), "mDiffFit");
    assert_eq!(graph.node(&NodeId::new("mAdd")).unwrap().name(), "mAdd");

    let entries: Vec<&str> = graph.entry_nodes().into_iter().map(|key| graph.get(key).unwrap().id().as_str()).collect();
    assert_eq!(entries, ["mProject_1", "mProject_2"]);
}

#[test]
fn test_load_sites_and_config() {
    let sites = load_sites(data_file("sites.json")).unwrap();
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].id, SiteId::new("isi"));
    assert_eq!(sites[1].bandwidth, Some(5.0));

    let config = load_config(data_file("planner_config.json")).unwrap();
    assert_eq!(config.average_communication_cost(), 2.0);
    assert_eq!(config.priority_policy, PriorityPolicy::CriticalPath);
    assert_eq!(config.catalog_type, CatalogType::Transformation);
    assert_eq!(config.default_average_compute_time, 1.0);
    assert_eq!(config.catalog_file, Some(data_file("transformation_catalog.json")));
}

#[test]
fn test_plan_workflow_end_to_end() {
    let config_path = data_file("planner_config.json");
    let (graph, schedule) = plan_workflow(data_file("montage_workflow.json"), data_file("sites.json"), Some(config_path.as_path())).unwrap();

    let expect = |node: &str, site: &str, start: f64, finish: f64| {
        let assignment = schedule.get(&NodeId::new(node)).unwrap();
        assert_eq!(assignment.site, SiteId::new(site), "site of {}", node);
        assert_eq!((assignment.start, assignment.finish), (start, finish), "times of {}", node);
        assert_eq!(graph.node(&NodeId::new(node)).unwrap().content.execution_site, Some(SiteId::new(site)));
    };

    expect("mProject_1", "ucsd", 0.0, 2.0);
    expect("mProject_2", "isi", 0.0, 4.0);
    expect("mDiff", "isi", 4.0, 6.0);
    expect("mAdd", "isi", 6.0, 9.0);
    assert_eq!(schedule.makespan(), 9.0);

    let dto = ScheduleDto::from(&schedule);
    assert_eq!(dto.workflow, "montage-small");
    assert_eq!(dto.assignments.len(), 4);
    assert_eq!(dto.assignments[0].node, "mProject_1");
    let json = serde_json::to_string(&dto).unwrap();
    assert!(json.contains("\"makespan\":9.0"));
}

#[test]
fn test_plan_workflow_without_config_uses_defaults() {
    let (_, schedule) = plan_workflow(data_file("montage_workflow.json"), data_file("sites.json"), None).unwrap();

    // Without the transformation catalog only mAdd has a runtime estimate.
    assert_eq!(schedule.len(), 4);
    assert!(schedule.makespan() > 0.0);
    assert_eq!(schedule.recompute_makespan(), schedule.makespan());
}

#[test]
fn test_cyclic_workflow_is_rejected() {
    let result = load_workflow(data_file("cyclic_workflow.json"));
    assert!(matches!(result, Err(Error::CycleError { .. })));
}

#[test]
fn test_unknown_policy_is_rejected() {
    let result = load_config(data_file("bad_policy_config.json"));
    assert!(matches!(result, Err(Error::ConversionError(ConversionError::UnknownPriorityPolicy(name))) if name == "Shortest-Job-First"));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let result = load_workflow(data_file("does_not_exist.json"));
    assert!(matches!(result, Err(Error::IoError(_))));
}
