use serde::{Deserialize, Serialize};

use crate::domain::scheduler::schedule::Schedule;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDto {
    pub workflow: String,
    pub makespan: f64,
    /// In scheduling order.
    pub assignments: Vec<AssignmentDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDto {
    pub node: String,
    pub site: String,
    pub start: f64,
    pub finish: f64,
}

impl From<&Schedule> for ScheduleDto {
    fn from(schedule: &Schedule) -> Self {
        let assignments = schedule
            .order()
            .iter()
            .filter_map(|node| {
                schedule.get(node).map(|a| AssignmentDto { node: node.to_string(), site: a.site.to_string(), start: a.start, finish: a.finish })
            })
            .collect();

        ScheduleDto { workflow: schedule.workflow().to_string(), makespan: schedule.makespan(), assignments }
    }
}
