use crate::domain::catalog::runtime_catalog::RuntimeCatalog;
use crate::domain::config::PlannerConfig;
use crate::domain::graph::Graph;
use crate::domain::scheduler::heft_scheduler::HeftScheduler;
use crate::domain::scheduler::schedule::Schedule;
use crate::domain::site::Site;
use crate::error::Result;

/// Maps the jobs of a workflow to execution sites.
///
/// Runs the HEFT scheduler over the graph and records the chosen site as the
/// execution site of every task.
#[derive(Debug)]
pub struct SiteSelector {
    config: PlannerConfig,
    catalog: Box<dyn RuntimeCatalog>,
}

impl SiteSelector {
    /// Builds the selector with the runtime catalog named in the configuration.
    pub fn new(config: PlannerConfig) -> Result<Self> {
        let catalog = config.catalog_type.get_instance(config.catalog_file.as_deref())?;
        Ok(SiteSelector { config, catalog })
    }

    pub fn with_catalog(config: PlannerConfig, catalog: Box<dyn RuntimeCatalog>) -> Self {
        SiteSelector { config, catalog }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn description(&self) -> &'static str {
        "HEFT based Site Selector"
    }

    pub fn map_workflow(&self, graph: &mut Graph, sites: &[Site]) -> Result<Schedule> {
        log::info!("Mapping workflow {} with {} using the {} runtime catalog.", graph.id(), self.description(), self.catalog.name());

        let schedule = HeftScheduler::new(&self.config, self.catalog.as_ref()).schedule(graph, sites)?;
        log::info!("Makespan of scheduled workflow {} is {}", graph.id(), schedule.makespan());

        for (node_id, assignment) in schedule.iter() {
            if let Some(node) = graph.node_mut(node_id) {
                node.content.execution_site = Some(assignment.site.clone());
            }
        }
        Ok(schedule)
    }
}
