use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::domain::scheduler::schedule::Schedule;
use crate::domain::utils::id::SiteId;
use crate::error::Result;

/// Load of one site in a finished schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteStatistics {
    pub site: SiteId,
    pub tasks: usize,
    pub busy_time: f64,
    /// Busy time divided by the makespan.
    pub utilization: f64,
}

/// Per-site summary of a schedule, ordered by site id.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleStatistics {
    pub makespan: f64,
    pub sites: Vec<SiteStatistics>,
}

impl ScheduleStatistics {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let makespan = schedule.makespan();
        let mut per_site: BTreeMap<&SiteId, (usize, f64)> = BTreeMap::new();

        for (_, assignment) in schedule.iter() {
            let entry = per_site.entry(&assignment.site).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += assignment.duration();
        }

        let sites = per_site
            .into_iter()
            .map(|(site, (tasks, busy_time))| SiteStatistics {
                site: site.clone(),
                tasks,
                busy_time,
                utilization: if makespan > 0.0 { busy_time / makespan } else { 0.0 },
            })
            .collect();

        ScheduleStatistics { makespan, sites }
    }

    pub fn get(&self, site: &SiteId) -> Option<&SiteStatistics> {
        self.sites.iter().find(|s| &s.site == site)
    }
}

#[derive(Serialize)]
struct ScheduleRow<'a> {
    node: &'a str,
    site: &'a str,
    start: f64,
    finish: f64,
}

/// Writes one CSV row per node, in scheduling order.
pub fn write_schedule_csv<W: Write>(schedule: &Schedule, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for node in schedule.order() {
        if let Some(assignment) = schedule.get(node) {
            csv_writer.serialize(ScheduleRow { node: node.as_str(), site: assignment.site.as_str(), start: assignment.start, finish: assignment.finish })?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}
