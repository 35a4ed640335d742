//! Decision and reload counters for engine observability

use parking_lot::RwLock;

/// Engine counters snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineMetrics {
    /// Total number of effective-access evaluations
    pub total_evaluations: u64,

    /// Evaluations where the catalog was visible
    pub visible_decisions: u64,

    /// Evaluations where the catalog was hidden
    pub hidden_decisions: u64,

    /// Successful rule set reloads
    pub reloads: u64,

    /// Reloads rejected because the new document was invalid
    pub rejected_reloads: u64,
}

impl EngineMetrics {
    /// Share of evaluations that made the catalog visible
    pub fn visible_rate(&self) -> f64 {
        if self.total_evaluations == 0 {
            0.0
        } else {
            self.visible_decisions as f64 / self.total_evaluations as f64
        }
    }
}

/// Thread-safe metrics collector
#[derive(Debug, Default)]
pub struct MetricsCollector {
    metrics: RwLock<EngineMetrics>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one evaluation outcome
    pub fn record_evaluation(&self, visible: bool) {
        let mut metrics = self.metrics.write();
        metrics.total_evaluations += 1;
        if visible {
            metrics.visible_decisions += 1;
        } else {
            metrics.hidden_decisions += 1;
        }
    }

    /// Record a reload attempt
    pub fn record_reload(&self, accepted: bool) {
        let mut metrics = self.metrics.write();
        if accepted {
            metrics.reloads += 1;
        } else {
            metrics.rejected_reloads += 1;
        }
    }

    /// Current counters
    pub fn get_metrics(&self) -> EngineMetrics {
        self.metrics.read().clone()
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        *self.metrics.write() = EngineMetrics::default();
    }
}
