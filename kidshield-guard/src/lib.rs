//! # KidShield Guard — real-time content safety for child-directed chat.
//!
//! Inspects a child's message before it is forwarded to a generative model
//! and produces a single [`SafetyVerdict`]: is it safe, which issues were
//! found, how severe they are, and which caring redirect to show instead.
//! Three collaborating pieces:
//!
//! 1. **Pattern Matcher** ([`matcher`]) — classifies one message against the
//!    fixed harm and PII taxonomy with ordered rule evaluation.
//! 2. **Context Tracker** ([`context`]) — bounded rolling window per user;
//!    detects escalation trends and coded-language substitution.
//! 3. **Decision Engine** ([`engine`]) — merges both into the verdict,
//!    resolves severity by max-merge, selects the redirect, and appends a
//!    hash-only audit record for guardian review.
//!
//! The engine never calls the generative backend and never retains raw
//! message content in its audit trail. Identity resolution, conversation
//! storage, and presentation are external collaborators.
//!
//! ```
//! use kidshield_guard::GuardrailEngine;
//!
//! let engine = GuardrailEngine::new().unwrap();
//! let verdict = engine.check_message_safety("why is the sky blue?", 9, "kid_1");
//! assert!(verdict.is_safe);
//!
//! let verdict = engine.check_message_safety("I want to end my life", 9, "kid_1");
//! assert!(!verdict.is_safe);
//! assert!(verdict.severity.requires_immediate_attention());
//! ```

pub mod context;
pub mod engine;
pub mod matcher;
pub mod policy;
pub mod sanitizer;
pub mod taxonomy;

#[cfg(test)]
mod tests;

pub use context::{ContextSignals, ContextTracker};
pub use engine::{GuardrailEngine, SafetyVerdict};
pub use matcher::{Findings, PatternMatcher};
pub use policy::{crisis_resources, severity_guidance, AgeBand, ContentSettings, CrisisResource};
pub use sanitizer::ResponseSanitizer;
pub use taxonomy::{HarmKind, PiiKind, Taxonomy};

pub use kidshield_core::{
    AuditLog, GuardConfig, LogAction, SafetyAlert, SafetyLogRecord, Severity, ShieldError,
    ShieldResult, UserProfile, UserRole,
};
