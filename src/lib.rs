use std::path::Path;

use crate::api::config_dto::PlannerConfigDto;
use crate::api::site_dto::SitesDto;
use crate::api::workflow_dto::WorkflowDto;
use crate::domain::config::PlannerConfig;
use crate::domain::graph::Graph;
use crate::domain::scheduler::schedule::Schedule;
use crate::domain::site::Site;
use crate::domain::site_selector::SiteSelector;
use crate::error::Result;
use crate::loader::parser::parse_json_file;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Loads a planner configuration file. Missing fields take their defaults.
///
/// A relative `catalogFile` is taken relative to the directory of the configuration file.
pub fn load_config(file_path: impl AsRef<Path>) -> Result<PlannerConfig> {
    let file_path = file_path.as_ref();
    let dto: PlannerConfigDto = parse_json_file(file_path)?;
    let mut config = PlannerConfig::try_from(dto)?;

    if let Some(base_dir) = file_path.parent() {
        config.resolve_catalog_file(base_dir);
    }
    Ok(config)
}

/// Loads a site list.
pub fn load_sites(file_path: impl AsRef<Path>) -> Result<Vec<Site>> {
    let dto: SitesDto = parse_json_file(file_path)?;
    Ok(dto.sites.into_iter().map(Site::from).collect())
}

/// Loads a workflow and builds its graph.
pub fn load_workflow(file_path: impl AsRef<Path>) -> Result<Graph> {
    let dto: WorkflowDto = parse_json_file(file_path)?;
    Graph::from_dto(dto)
}

/// Plans a workflow stored on disk onto the given sites.
///
/// Returns the graph, with the execution site of every task filled in, and the schedule.
pub fn plan_workflow(workflow_path: impl AsRef<Path>, sites_path: impl AsRef<Path>, config_path: Option<&Path>) -> Result<(Graph, Schedule)> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => PlannerConfig::default(),
    };
    log::info!("Planner configuration loaded: {:?}", config);

    let mut graph = load_workflow(workflow_path)?;
    let sites = load_sites(sites_path)?;
    log::info!("{} candidate sites loaded.", sites.len());

    let selector = SiteSelector::new(config)?;
    let schedule = selector.map_workflow(&mut graph, &sites)?;

    Ok((graph, schedule))
}
