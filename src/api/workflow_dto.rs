use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDto {
    pub id: String,

    pub tasks: Vec<TaskDto>,

    #[serde(default)]
    pub edges: Vec<EdgeDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: String,
    pub name: Option<String>,

    /// Seconds.
    pub average_compute_time: Option<f64>,

    /// Site id -> seconds.
    #[serde(default)]
    pub site_runtimes: BTreeMap<String, f64>,

    pub transformation: Option<String>,
    pub runnable_sites: Option<Vec<String>>,
    pub instance_type: Option<String>,
}

/// `parent` has to finish before `child` starts.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDto {
    pub parent: String,
    pub child: String,
}
