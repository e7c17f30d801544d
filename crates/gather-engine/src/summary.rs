//! Run totals for the harness.

use std::collections::BTreeMap;

use gather_core::{Region, RegionEvents, ScanReport};
use gather_types::TransactionOutcome;
use serde::Serialize;

/// Counters accumulated over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Ticks executed.
    pub ticks: u64,
    /// Passes that started (countdown ran out).
    pub passes: u64,
    /// Nodes harvested.
    pub nodes_harvested: u64,
    /// Corpses skinned.
    pub corpses_skinned: u64,
    /// Attempts refused for lack of bag space.
    pub bag_full: u64,
    /// Attempts abandoned because the target changed.
    pub stale: u64,
    /// Tracking flags set or cleared.
    pub tracking_changes: u64,
    /// Nodes respawned by the region.
    pub respawned: u64,
    /// Corpses removed after decay.
    pub decayed: u64,
    /// Corpses looted by hand.
    pub manual_loots: u64,
    /// Passes stopped early, by reason.
    pub stopped: BTreeMap<String, u64>,
    /// Nodes ready to harvest when the run ended.
    pub ready_nodes: u64,
    /// Nodes still waiting to respawn when the run ended.
    pub depleted_nodes: u64,
    /// Corpses left in the region when the run ended.
    pub corpses_remaining: u64,
}

impl RunSummary {
    /// Fold one tick's report in.
    pub fn record(&mut self, report: &ScanReport) {
        if report.scanned {
            self.passes = self.passes.saturating_add(1);
        }
        if let Some(reason) = report.stopped {
            let count = self.stopped.entry(format!("{reason:?}")).or_default();
            *count = count.saturating_add(1);
        }
        let flips = report
            .tracking
            .set
            .count_ones()
            .saturating_add(report.tracking.cleared.count_ones());
        self.tracking_changes = self.tracking_changes.saturating_add(u64::from(flips));

        if let Some(outcome) = report.node {
            self.record_outcome(outcome, true);
        }
        if let Some(outcome) = report.corpse {
            self.record_outcome(outcome, false);
        }
    }

    /// Fold region changes in.
    pub fn record_events(&mut self, events: &RegionEvents) {
        self.respawned = self.respawned.saturating_add(len_u64(events.respawned.len()));
        self.decayed = self.decayed.saturating_add(len_u64(events.decayed.len()));
    }

    /// Snapshot what is left in `region`.
    pub fn record_region(&mut self, region: &Region) {
        let (ready, depleted) = region
            .nodes()
            .fold((0_u64, 0_u64), |(ready, depleted), node| {
                if node.is_ready() {
                    (ready.saturating_add(1), depleted)
                } else {
                    (ready, depleted.saturating_add(1))
                }
            });
        self.ready_nodes = ready;
        self.depleted_nodes = depleted;
        self.corpses_remaining = len_u64(region.corpses().count());
    }

    /// Count hand loots.
    pub fn record_manual_loots(&mut self, count: usize) {
        self.manual_loots = self.manual_loots.saturating_add(len_u64(count));
    }

    /// Count one tick.
    pub const fn record_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    fn record_outcome(&mut self, outcome: TransactionOutcome, node: bool) {
        let slot = match (outcome, node) {
            (TransactionOutcome::Success, true) => &mut self.nodes_harvested,
            (TransactionOutcome::Success, false) => &mut self.corpses_skinned,
            (TransactionOutcome::BagFull, _) => &mut self.bag_full,
            (TransactionOutcome::StaleState, _) => &mut self.stale,
        };
        *slot = slot.saturating_add(1);
    }
}

fn len_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}
