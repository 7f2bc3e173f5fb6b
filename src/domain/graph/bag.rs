use std::fmt;

use crate::domain::utils::id::SiteId;

/// Names of the entries a [`SchedulingBag`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BagKey {
    AvgComputeTime,
    DownwardRank,
    UpwardRank,
    StartTime,
    FinishTime,
    ScheduledSite,
}

impl BagKey {
    pub const ALL: [BagKey; 6] =
        [BagKey::AvgComputeTime, BagKey::DownwardRank, BagKey::UpwardRank, BagKey::StartTime, BagKey::FinishTime, BagKey::ScheduledSite];

    pub fn as_str(&self) -> &'static str {
        match self {
            BagKey::AvgComputeTime => "avg-compute-time",
            BagKey::DownwardRank => "downward-rank",
            BagKey::UpwardRank => "upward-rank",
            BagKey::StartTime => "start-time",
            BagKey::FinishTime => "end-time",
            BagKey::ScheduledSite => "scheduled-site",
        }
    }
}

impl fmt::Display for BagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduler scratch state attached to every node.
///
/// Created empty and filled in by the passes that run over the graph:
/// preparation sets the average compute time, ranking sets both ranks and
/// site assignment sets site, start and finish.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulingBag {
    pub avg_compute_time: Option<f64>,
    pub downward_rank: Option<f64>,
    pub upward_rank: Option<f64>,
    pub start_time: Option<f64>,
    pub finish_time: Option<f64>,
    pub scheduled_site: Option<SiteId>,
}

impl SchedulingBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key(&self, key: BagKey) -> bool {
        match key {
            BagKey::AvgComputeTime => self.avg_compute_time.is_some(),
            BagKey::DownwardRank => self.downward_rank.is_some(),
            BagKey::UpwardRank => self.upward_rank.is_some(),
            BagKey::StartTime => self.start_time.is_some(),
            BagKey::FinishTime => self.finish_time.is_some(),
            BagKey::ScheduledSite => self.scheduled_site.is_some(),
        }
    }

    /// Numeric value stored under `key`. The scheduled site is not numeric and always yields `None`.
    pub fn get_value(&self, key: BagKey) -> Option<f64> {
        match key {
            BagKey::AvgComputeTime => self.avg_compute_time,
            BagKey::DownwardRank => self.downward_rank,
            BagKey::UpwardRank => self.upward_rank,
            BagKey::StartTime => self.start_time,
            BagKey::FinishTime => self.finish_time,
            BagKey::ScheduledSite => None,
        }
    }

    /// Sum of both ranks, the length of the longest path running through the node.
    pub fn critical_path_length(&self) -> Option<f64> {
        Some(self.upward_rank? + self.downward_rank?)
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled_site.is_some() && self.finish_time.is_some()
    }

    pub fn clear_assignment(&mut self) {
        self.scheduled_site = None;
        self.start_time = None;
        self.finish_time = None;
    }
}

impl fmt::Display for SchedulingBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for key in BagKey::ALL {
            let rendered = match key {
                BagKey::ScheduledSite => self.scheduled_site.as_ref().map(|site| site.to_string()),
                _ => self.get_value(key).map(|value| value.to_string()),
            };
            if let Some(rendered) = rendered {
                if !first {
                    write!(f, ",")?;
                }
                write!(f, "{}={}", key, rendered)?;
                first = false;
            }
        }
        Ok(())
    }
}
