use std::sync::atomic::{AtomicU64, Ordering};

/// Diagnostic counters for map calls that never surface as errors to callers.
#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    markers_created_total: AtomicU64,
    position_updates_total: AtomicU64,
    coalesced_updates_total: AtomicU64,
    rejected_snapshots_total: AtomicU64,
    map_call_failures_total: AtomicU64,
    discarded_completions_total: AtomicU64,
    icon_refreshes_total: AtomicU64,
    overlays_shown_total: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObservabilitySnapshot {
    pub markers_created_total: u64,
    pub position_updates_total: u64,
    pub coalesced_updates_total: u64,
    pub rejected_snapshots_total: u64,
    pub map_call_failures_total: u64,
    pub discarded_completions_total: u64,
    pub icon_refreshes_total: u64,
    pub overlays_shown_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            markers_created_total: self.markers_created_total.load(Ordering::Relaxed),
            position_updates_total: self.position_updates_total.load(Ordering::Relaxed),
            coalesced_updates_total: self.coalesced_updates_total.load(Ordering::Relaxed),
            rejected_snapshots_total: self.rejected_snapshots_total.load(Ordering::Relaxed),
            map_call_failures_total: self.map_call_failures_total.load(Ordering::Relaxed),
            discarded_completions_total: self
                .discarded_completions_total
                .load(Ordering::Relaxed),
            icon_refreshes_total: self.icon_refreshes_total.load(Ordering::Relaxed),
            overlays_shown_total: self.overlays_shown_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_marker_created(&self) {
        self.markers_created_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_position_update(&self) {
        self.position_updates_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_coalesced_update(&self) {
        self.coalesced_updates_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_snapshot(&self) {
        self.rejected_snapshots_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_map_call_failure(&self) {
        self.map_call_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_discarded_completion(&self) {
        self.discarded_completions_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_icon_refreshes(&self, count: u64) {
        self.icon_refreshes_total.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_overlay_shown(&self) {
        self.overlays_shown_total.fetch_add(1, Ordering::Relaxed);
    }
}
