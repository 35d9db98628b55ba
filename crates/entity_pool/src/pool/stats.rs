//! Pool usage statistics

/// Counters accumulated by an [`ObjectPool`](super::ObjectPool)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Successful acquisitions
    pub acquisitions: u64,
    /// Successful releases
    pub releases: u64,
    /// Instances created on demand during acquisition
    pub growth_events: u64,
    /// Acquisitions that returned nothing
    pub exhaustions: u64,
    /// Dead entries dropped from available queues
    pub discarded_invalid: u64,
    /// Releases of instances the pool did not have in use
    pub ignored_releases: u64,
    /// Completed `initialize` calls
    pub generations: u64,
    /// Instances currently in use across every kind
    pub in_use: usize,
    /// Maximum number of instances in use simultaneously
    pub peak_in_use: usize,
}

impl PoolStats {
    pub(super) fn record_acquire(&mut self, in_use_now: usize) {
        self.acquisitions += 1;
        self.track_in_use(in_use_now);
    }

    pub(super) fn record_release(&mut self, in_use_now: usize) {
        self.releases += 1;
        self.track_in_use(in_use_now);
    }

    pub(super) fn track_in_use(&mut self, in_use_now: usize) {
        self.in_use = in_use_now;
        self.peak_in_use = self.peak_in_use.max(in_use_now);
    }
}
