use crate::domain::scheduler::scheduler_policy::TimelinePolicy;
use crate::domain::utils::id::SiteId;

/// Busy intervals of one execution lane, sorted by start time.
#[derive(Debug, Clone, Default)]
struct Lane {
    busy: Vec<(f64, f64)>,
}

impl Lane {
    fn available_time(&self) -> f64 {
        self.busy.last().map(|(_, finish)| *finish).unwrap_or(0.0)
    }

    fn earliest_start(&self, ready_time: f64, duration: f64, policy: TimelinePolicy) -> f64 {
        match policy {
            TimelinePolicy::Append => ready_time.max(self.available_time()),
            TimelinePolicy::Insertion => {
                let mut candidate = ready_time;
                for &(start, finish) in &self.busy {
                    if candidate + duration <= start {
                        return candidate;
                    }
                    candidate = candidate.max(finish);
                }
                candidate
            }
        }
    }

    fn book(&mut self, start: f64, finish: f64) {
        let position = self.busy.partition_point(|(s, _)| *s <= start);
        self.busy.insert(position, (start, finish));
    }
}

/// Where a task would run on a site: the lane and the start time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub lane: usize,
    pub start: f64,
}

/// Scheduled load of a single site during one scheduling run.
///
/// A site has one lane per parallel execution unit it offers. Each lane keeps
/// its own list of busy intervals.
#[derive(Debug, Clone)]
pub struct SiteTimeline {
    site: SiteId,
    lanes: Vec<Lane>,
}

impl SiteTimeline {
    pub fn new(site: SiteId, lanes: usize) -> Self {
        SiteTimeline { site, lanes: vec![Lane::default(); lanes.max(1)] }
    }

    pub fn site(&self) -> &SiteId {
        &self.site
    }

    pub fn lanes(&self) -> usize {
        self.lanes.len()
    }

    /// Time at which the least loaded lane becomes free.
    pub fn available_time(&self) -> f64 {
        self.lanes.iter().map(Lane::available_time).fold(f64::INFINITY, f64::min)
    }

    /// Earliest slot for a task that is ready at `ready_time` and runs for `duration`.
    /// Ties go to the lowest lane index.
    pub fn earliest_slot(&self, ready_time: f64, duration: f64, policy: TimelinePolicy) -> Slot {
        let mut best = Slot { lane: 0, start: f64::INFINITY };
        for (lane, timeline) in self.lanes.iter().enumerate() {
            let start = timeline.earliest_start(ready_time, duration, policy);
            if start < best.start {
                best = Slot { lane, start };
            }
        }
        best
    }

    pub fn book(&mut self, slot: Slot, finish: f64) {
        log::trace!("Site {} lane {} busy from {} till {}.", self.site, slot.lane, slot.start, finish);
        self.lanes[slot.lane].book(slot.start, finish);
    }

    pub fn busy_time(&self) -> f64 {
        self.lanes.iter().flat_map(|lane| lane.busy.iter()).map(|(start, finish)| finish - start).sum()
    }
}
