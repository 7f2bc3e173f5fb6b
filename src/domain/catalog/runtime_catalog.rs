use std::fmt::Debug;

use crate::domain::graph::task_profile::TaskProfile;
use crate::domain::utils::id::SiteId;

/// Source of runtime estimates for the tasks of a workflow.
///
/// Implemented by every catalog backend the planner can be configured with,
/// see [`CatalogType`](crate::domain::catalog::catalog_type::CatalogType).
pub trait RuntimeCatalog: Debug + Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Average compute time declared for the task, independent of any site.
    fn declared_average(&self, task: &TaskProfile) -> Option<f64>;

    /// Compute time of the task on `site`, if the catalog has an entry for that site.
    fn site_runtime(&self, task: &TaskProfile, site: &SiteId) -> Option<f64>;
}
