//! Context Tracker — rolling per-user conversation state.
//!
//! Keeps the last N messages per user and derives two signals for the
//! decision engine: escalation trends (worsening sentiment/intent across
//! consecutive messages) and coded-language substitution in the current
//! message. The escalation flag is a monotonic latch: once set for a user it
//! stays set for the lifetime of that context.
//!
//! A single `RwLock` over the context map serializes updates, so two
//! concurrent messages from the same user can never interleave window
//! updates or be observed out of arrival order.

use crate::taxonomy::{CODED_TERMS, ESCALATION_TRIADS};
use kidshield_core::GuardConfig;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Signals derived from a user's recent history for one inbound message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextSignals {
    pub patterns_detected: Vec<String>,
    pub escalation_detected: bool,
}

#[derive(Debug, Clone)]
struct UserSafetyContext {
    window: VecDeque<String>,
    escalation_latched: bool,
    patterns: Vec<String>,
    last_activity: i64,
}

pub struct ContextTracker {
    contexts: RwLock<HashMap<String, UserSafetyContext>>,
    window_len: usize,
    min_messages: usize,
    max_contexts: usize,
    ttl_secs: i64,
    total_updates: AtomicU64,
    total_escalations: AtomicU64,
}

impl ContextTracker {
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            contexts: RwLock::new(HashMap::new()),
            window_len: config.context_window,
            min_messages: config.escalation_min_messages,
            max_contexts: config.max_contexts,
            ttl_secs: config.context_ttl_secs,
            total_updates: AtomicU64::new(0),
            total_escalations: AtomicU64::new(0),
        }
    }

    /// Appends the message to the user's rolling window and reports context
    /// signals. An unknown user_id is not an error; a fresh context is
    /// created silently.
    pub fn update(&self, user_id: &str, message: &str) -> ContextSignals {
        self.total_updates.fetch_add(1, Ordering::Relaxed);
        let lower = message.to_lowercase();
        let now = chrono::Utc::now().timestamp();

        let mut contexts = self.contexts.write();
        if contexts.len() > self.max_contexts {
            let cutoff = now - self.ttl_secs;
            contexts.retain(|_, ctx| ctx.last_activity > cutoff);
        }

        let ctx = contexts.entry(user_id.to_string()).or_insert_with(|| UserSafetyContext {
            window: VecDeque::with_capacity(self.window_len),
            escalation_latched: false,
            patterns: Vec::new(),
            last_activity: now,
        });
        ctx.last_activity = now;

        // The window holds raw messages; matching always lowercases at the
        // point of use.
        ctx.window.push_back(message.to_string());
        while ctx.window.len() > self.window_len {
            ctx.window.pop_front();
        }

        let mut detected = Vec::new();

        // Escalation: concatenate the last 3 messages and fire any triad
        // with >= 2 member phrases present.
        if ctx.window.len() >= self.min_messages {
            let skip = ctx.window.len().saturating_sub(3);
            let blob = ctx
                .window
                .iter()
                .skip(skip)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            for triad in ESCALATION_TRIADS {
                let hits = triad.iter().filter(|phrase| blob.contains(*phrase)).count();
                if hits >= 2 {
                    detected.push("escalation".to_string());
                    if !ctx.escalation_latched {
                        ctx.escalation_latched = true;
                        self.total_escalations.fetch_add(1, Ordering::Relaxed);
                        warn!(user = %user_id, "escalation trend latched");
                    }
                    break;
                }
            }
        }

        // Coded language: substring scan of the current message only.
        for (token, canonical) in CODED_TERMS {
            if lower.contains(token) {
                detected.push(format!("coded_language:{canonical}"));
            }
        }

        ctx.patterns.extend_from_slice(&detected);
        ContextSignals {
            patterns_detected: detected,
            escalation_detected: ctx.escalation_latched,
        }
    }

    /// All pattern labels accumulated for a user so far.
    pub fn patterns_for(&self, user_id: &str) -> Vec<String> {
        self.contexts.read().get(user_id).map(|ctx| ctx.patterns.clone()).unwrap_or_default()
    }

    /// Current rolling-window length for a user.
    pub fn window_len(&self, user_id: &str) -> usize {
        self.contexts.read().get(user_id).map_or(0, |ctx| ctx.window.len())
    }

    /// Copy of a user's rolling window, oldest first, original casing.
    pub fn recent_messages(&self, user_id: &str) -> Vec<String> {
        self.contexts
            .read()
            .get(user_id)
            .map(|ctx| ctx.window.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn active_contexts(&self) -> usize {
        self.contexts.read().len()
    }

    /// Drops one user's context. Callers needing a per-session reset evict
    /// and let the next message recreate the context.
    pub fn reset_user(&self, user_id: &str) {
        self.contexts.write().remove(user_id);
    }

    pub fn total_updates(&self) -> u64 {
        self.total_updates.load(Ordering::Relaxed)
    }

    pub fn total_escalations(&self) -> u64 {
        self.total_escalations.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ContextTracker {
        ContextTracker::new(&GuardConfig::default())
    }

    #[test]
    fn test_window_never_exceeds_bound() {
        let t = tracker();
        for i in 0..25 {
            t.update("kid_1", &format!("message number {i}"));
        }
        assert_eq!(t.window_len("kid_1"), 10);
        assert_eq!(t.total_updates(), 25);
    }

    #[test]
    fn test_unknown_user_silently_created() {
        let t = tracker();
        let signals = t.update("never_seen", "hello there");
        assert!(!signals.escalation_detected);
        assert_eq!(t.active_contexts(), 1);
    }

    #[test]
    fn test_escalation_triad_fires_on_third_message() {
        let t = tracker();
        assert!(!t.update("kid_1", "i'm sad today").escalation_detected);
        assert!(!t.update("kid_1", "now i'm depressed").escalation_detected);
        let third = t.update("kid_1", "nothing helps anymore");
        assert!(third.escalation_detected);
        assert!(third.patterns_detected.contains(&"escalation".to_string()));
    }

    #[test]
    fn test_escalation_latch_never_clears() {
        let t = tracker();
        t.update("kid_1", "maybe i will");
        t.update("kid_1", "probably tomorrow");
        assert!(t.update("kid_1", "who knows").escalation_detected);
        // Benign follow-ups keep the latch set.
        for _ in 0..12 {
            assert!(t.update("kid_1", "what are whales").escalation_detected);
        }
    }

    #[test]
    fn test_window_preserves_original_casing() {
        let t = tracker();
        t.update("kid_1", "Why is the SKY blue?");
        assert_eq!(t.recent_messages("kid_1"), vec!["Why is the SKY blue?".to_string()]);
    }

    #[test]
    fn test_escalation_blob_is_case_insensitive() {
        let t = tracker();
        t.update("kid_1", "I'm SAD");
        t.update("kid_1", "so Depressed now");
        assert!(t.update("kid_1", "whatever").escalation_detected);
    }

    #[test]
    fn test_no_escalation_before_three_messages() {
        let t = tracker();
        assert!(!t.update("kid_1", "maybe probably").escalation_detected);
        assert!(!t.update("kid_1", "definitely").escalation_detected);
    }

    #[test]
    fn test_coded_language_on_current_message() {
        let t = tracker();
        let signals = t.update("kid_1", "my friend said sn0w is cool");
        assert!(signals.patterns_detected.contains(&"coded_language:drugs".to_string()));
        // The next message does not re-report the old token.
        let signals = t.update("kid_1", "ok never mind");
        assert!(signals.patterns_detected.is_empty());
        // But the accumulated history keeps it.
        assert!(t.patterns_for("kid_1").contains(&"coded_language:drugs".to_string()));
    }

    #[test]
    fn test_reset_user_evicts_context() {
        let t = tracker();
        t.update("kid_1", "hello");
        t.reset_user("kid_1");
        assert_eq!(t.active_contexts(), 0);
        assert_eq!(t.window_len("kid_1"), 0);
    }

    #[test]
    fn test_eviction_keeps_map_bounded() {
        let config = GuardConfig { max_contexts: 1, context_ttl_secs: 0, ..GuardConfig::default() };
        let t = ContextTracker::new(&config);
        t.update("kid_a", "hello");
        t.update("kid_b", "hello");
        t.update("kid_c", "hello");
        // Once the cap is exceeded, stale contexts are dropped before the
        // new entry is inserted.
        assert!(t.active_contexts() <= 2);
    }
}
