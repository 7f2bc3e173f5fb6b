use crate::domain::catalog::runtime_catalog::RuntimeCatalog;
use crate::domain::graph::task_profile::TaskProfile;
use crate::domain::utils::id::SiteId;

/// Reads runtimes straight from the profiles attached to each task.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileCatalog;

impl RuntimeCatalog for ProfileCatalog {
    fn name(&self) -> &'static str {
        "Profile"
    }

    fn declared_average(&self, task: &TaskProfile) -> Option<f64> {
        task.average_compute_time
    }

    fn site_runtime(&self, task: &TaskProfile, site: &SiteId) -> Option<f64> {
        task.site_runtimes.get(site).copied()
    }
}
