// Dashboard domain model
use super::stats::{StatsSnapshot, TimeSeriesPair};

/// Everything fetched for one render cycle
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub stats: StatsSnapshot,
    pub history: TimeSeriesPair,
}

impl Dashboard {
    pub fn new(stats: StatsSnapshot, history: TimeSeriesPair) -> Self {
        Self { stats, history }
    }

    pub fn backend_running(&self) -> bool {
        self.stats.success && self.history.success
    }
}
