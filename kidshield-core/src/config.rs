use crate::error::{ShieldError, ShieldResult};
use serde::{Deserialize, Serialize};

/// Tunables for the safety engine.
///
/// The defaults match the deployed policy; callers override them per
/// environment (e.g. a smaller `max_contexts` for constrained devices).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Rolling window length per user. Oldest messages are evicted FIFO.
    pub context_window: usize,
    /// Minimum window size before escalation triads are evaluated.
    pub escalation_min_messages: usize,
    /// Soft cap on tracked user contexts; exceeding it triggers eviction.
    pub max_contexts: usize,
    /// Contexts idle longer than this are evicted once the cap is hit.
    pub context_ttl_secs: i64,
    /// FIFO cap on retained audit records.
    pub max_log_records: usize,
    /// FIFO cap on the guardian alert feed.
    pub max_alerts: usize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            context_window: 10,
            escalation_min_messages: 3,
            max_contexts: 10_000,
            context_ttl_secs: 7_200,
            max_log_records: 50_000,
            max_alerts: 5_000,
        }
    }
}

impl GuardConfig {
    pub fn validate(&self) -> ShieldResult<()> {
        if self.context_window == 0 {
            return Err(ShieldError::Config("context_window must be at least 1".into()));
        }
        if self.escalation_min_messages == 0 || self.escalation_min_messages > self.context_window {
            return Err(ShieldError::Config(
                "escalation_min_messages must be between 1 and context_window".into(),
            ));
        }
        if self.max_contexts == 0 {
            return Err(ShieldError::Config("max_contexts must be at least 1".into()));
        }
        if self.max_log_records == 0 || self.max_alerts == 0 {
            return Err(ShieldError::Config("record stores must hold at least 1 entry".into()));
        }
        Ok(())
    }
}
