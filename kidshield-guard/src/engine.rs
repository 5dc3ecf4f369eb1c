//! Decision Engine — merges matcher findings and context signals into one
//! verdict per message.
//!
//! The engine is the component callers invoke. It owns the compiled
//! taxonomy, the per-user context tracker, the audit log, and the guardian
//! alert feed. Evaluation is CPU-bound and infallible per message; the only
//! fallible operations are construction (taxonomy compilation) and profile
//! validation.

use crate::context::ContextTracker;
use crate::matcher::PatternMatcher;
use crate::sanitizer::ResponseSanitizer;
use crate::taxonomy::{Taxonomy, FALLBACK_REDIRECT};
use kidshield_core::{
    hash_message, AuditLog, GuardConfig, LogAction, SafetyAlert, SafetyLogRecord, Severity,
    ShieldError, ShieldResult, UserProfile, UserRole,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Age assumed for adult roles whose profile carries no resolved age.
const ADULT_FALLBACK_AGE: u8 = 18;

/// The complete output of one safety evaluation for one message. Immutable
/// once returned; the caller decides what to persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyVerdict {
    pub is_safe: bool,
    pub issues: BTreeSet<String>,
    pub severity: Severity,
    /// Caring substitute message. Non-empty whenever `is_safe` is false.
    pub redirect: String,
    pub escalation_detected: bool,
}

pub struct GuardrailEngine {
    matcher: PatternMatcher,
    tracker: ContextTracker,
    sanitizer: ResponseSanitizer,
    audit: AuditLog,
    alerts: RwLock<Vec<SafetyAlert>>,
    max_alerts: usize,
}

impl GuardrailEngine {
    pub fn new() -> ShieldResult<Self> {
        Self::with_config(GuardConfig::default())
    }

    pub fn with_config(config: GuardConfig) -> ShieldResult<Self> {
        config.validate()?;
        let taxonomy = Taxonomy::compile()?;
        let sanitizer = ResponseSanitizer::from_taxonomy(&taxonomy);
        Ok(Self {
            matcher: PatternMatcher::new(taxonomy),
            tracker: ContextTracker::new(&config),
            sanitizer,
            audit: AuditLog::new(config.max_log_records),
            alerts: RwLock::new(Vec::new()),
            max_alerts: config.max_alerts,
        })
    }

    /// Primary API: evaluates one message for one user. Never fails; the
    /// worst case for unmatchable input is an all-clear verdict. Mutates
    /// only the per-user rolling context, never conversation records.
    pub fn check_message_safety(
        &self,
        message: &str,
        user_age: u8,
        user_id: &str,
    ) -> SafetyVerdict {
        let mut issues: BTreeSet<String> = BTreeSet::new();
        let mut severity = Severity::Low;
        let mut escalation = false;
        let mut redirect: Option<&'static str> = None;

        // A blank message carries no signal. It is safe and stays out of the
        // rolling window so it cannot dilute the escalation blob.
        if !message.trim().is_empty() {
            // Coded-language labels in `patterns_detected` accumulate on the
            // user's context for guardian surfaces; only the escalation
            // signal enters the verdict from the tracker.
            let signals = self.tracker.update(user_id, message);
            escalation = signals.escalation_detected;
            if escalation {
                issues.insert("escalation".into());
                // The latch cannot be downgraded by anything else below.
                severity = Severity::Critical;
            }

            let findings = self.matcher.evaluate(message, user_age);
            severity = severity.max(findings.severity);
            issues.extend(findings.issues);
            redirect = findings.redirect;
        }

        let is_safe = issues.is_empty();
        let redirect_text = if is_safe {
            String::new()
        } else {
            redirect.unwrap_or(FALLBACK_REDIRECT).to_string()
        };

        self.audit.record(SafetyLogRecord {
            timestamp: chrono::Utc::now(),
            user_id: user_id.to_string(),
            message_hash: hash_message(message),
            issues: issues.iter().cloned().collect(),
            severity,
            action: if is_safe { LogAction::Allowed } else { LogAction::Blocked },
            requires_immediate_attention: severity.requires_immediate_attention(),
        });

        if is_safe {
            debug!(user = %user_id, "message passed safety check");
        } else {
            let joined = issues.iter().cloned().collect::<Vec<_>>().join(", ");
            warn!(
                user = %user_id, severity = %severity, issues = %joined,
                "message blocked by safety check"
            );
            self.push_alert(severity, "Unsafe message intercepted", &joined);
        }

        SafetyVerdict {
            is_safe,
            issues,
            severity,
            redirect: redirect_text,
            escalation_detected: escalation,
        }
    }

    /// Evaluates a message for a resolved identity triple. A child profile
    /// without an age is a configuration failure, never a silent allow;
    /// adult roles without an age evaluate with the adult fallback.
    pub fn check_profile(
        &self,
        message: &str,
        profile: &UserProfile,
    ) -> ShieldResult<SafetyVerdict> {
        let age = match (profile.role, profile.age) {
            (UserRole::Child, None) => {
                return Err(ShieldError::MissingAge { user_id: profile.user_id.clone() });
            }
            (_, Some(age)) => age,
            (_, None) => ADULT_FALLBACK_AGE,
        };
        Ok(self.check_message_safety(message, age, &profile.user_id))
    }

    /// Second public entry point: strips PII from arbitrary text, typically
    /// a generated reply, before it reaches the child.
    pub fn sanitize_response(&self, text: &str) -> String {
        self.sanitizer.sanitize(text)
    }

    fn push_alert(&self, severity: Severity, title: &str, details: &str) {
        let mut alerts = self.alerts.write();
        if alerts.len() >= self.max_alerts {
            alerts.remove(0);
        }
        alerts.push(SafetyAlert {
            timestamp: chrono::Utc::now().timestamp(),
            severity,
            component: "decision_engine".into(),
            title: title.into(),
            details: details.chars().take(256).collect(),
        });
    }

    // ── Query methods ────────────────────────────────────────────────────

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    pub fn alerts(&self) -> Vec<SafetyAlert> {
        self.alerts.read().clone()
    }

    pub fn total_checked(&self) -> u64 {
        self.audit.total_checked()
    }

    pub fn total_blocked(&self) -> u64 {
        self.audit.total_blocked()
    }

    pub fn total_critical(&self) -> u64 {
        self.audit.total_critical()
    }

    pub fn active_contexts(&self) -> usize {
        self.tracker.active_contexts()
    }

    /// Pattern labels (e.g. coded-language hits) accumulated on a user's
    /// context; guardian surfaces read these alongside the audit log.
    pub fn context_patterns(&self, user_id: &str) -> Vec<String> {
        self.tracker.patterns_for(user_id)
    }

    pub fn reset_user(&self, user_id: &str) {
        self.tracker.reset_user(user_id);
    }
}
