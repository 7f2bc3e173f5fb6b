use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SitesDto {
    pub sites: Vec<SiteDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SiteDto {
    pub id: String,
    pub idle_units: Option<u32>,
    pub total_units: Option<u32>,
    /// MB/s.
    pub bandwidth: Option<f64>,
    pub instance_type: Option<String>,
}
