use std::cmp::Ordering;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::graph::bag::SchedulingBag;
use crate::domain::utils::id::NodeId;
use crate::error::ConversionError;

/// Order in which the list scheduler picks the next ready node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityPolicy {
    /// Descending `rank_up + rank_down`, the length of the longest path through the node.
    #[default]
    CriticalPath,
    /// Descending upward rank (classic HEFT).
    UpwardRank,
    /// Ascending downward rank.
    DownwardRank,
}

impl PriorityPolicy {
    /// `Ordering::Less` if `a` has to be scheduled before `b`. Equal priorities fall back to ascending id.
    pub fn compare(&self, a: (&NodeId, &SchedulingBag), b: (&NodeId, &SchedulingBag)) -> Ordering {
        let (a_id, a_bag) = a;
        let (b_id, b_bag) = b;

        let by_priority = match self {
            PriorityPolicy::CriticalPath => {
                let a_len = a_bag.critical_path_length().unwrap_or(0.0);
                let b_len = b_bag.critical_path_length().unwrap_or(0.0);
                b_len.total_cmp(&a_len)
            }
            PriorityPolicy::UpwardRank => b_bag.upward_rank.unwrap_or(0.0).total_cmp(&a_bag.upward_rank.unwrap_or(0.0)),
            PriorityPolicy::DownwardRank => a_bag.downward_rank.unwrap_or(0.0).total_cmp(&b_bag.downward_rank.unwrap_or(0.0)),
        };

        by_priority.then_with(|| a_id.cmp(b_id))
    }
}

impl FromStr for PriorityPolicy {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Critical-Path" => Ok(PriorityPolicy::CriticalPath),
            "Upward-Rank" => Ok(PriorityPolicy::UpwardRank),
            "Downward-Rank" => Ok(PriorityPolicy::DownwardRank),
            _ => Err(ConversionError::UnknownPriorityPolicy(s.to_string())),
        }
    }
}

/// How a site's timeline accepts new work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelinePolicy {
    /// A task starts no earlier than the last finish on its lane.
    #[default]
    Append,
    /// A task may be placed into an earlier idle gap that is long enough.
    Insertion,
}

impl FromStr for TimelinePolicy {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Append" => Ok(TimelinePolicy::Append),
            "Insertion" => Ok(TimelinePolicy::Insertion),
            _ => Err(ConversionError::UnknownTimelinePolicy(s.to_string())),
        }
    }
}

/// Whether a site's idle units limit how many tasks run on it at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapacityPolicy {
    /// Idle units are reported but every site runs one task at a time.
    #[default]
    Informational,
    /// A site runs up to its idle units in parallel. Sites without idle units are skipped.
    SlotLimited,
}

impl FromStr for CapacityPolicy {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Informational" => Ok(CapacityPolicy::Informational),
            "Slot-Limited" => Ok(CapacityPolicy::SlotLimited),
            _ => Err(ConversionError::UnknownCapacityPolicy(s.to_string())),
        }
    }
}

/// Upper bounds for a single scheduling run. Both are checked between two assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulingBudget {
    pub max_assignments: Option<usize>,
    pub time_limit: Option<Duration>,
}

impl SchedulingBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_assignments.is_none() && self.time_limit.is_none()
    }
}
