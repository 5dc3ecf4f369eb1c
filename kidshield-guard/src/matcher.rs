//! Pattern Matcher — classifies a single message against the fixed taxonomy.
//!
//! Evaluation order: PII scan, harm categories in priority order,
//! age-gated topics, boundary probing, then a label-vocabulary severity
//! re-resolution that can only raise the running value. The matcher is
//! stateless; rolling context lives in [`crate::context::ContextTracker`].

use crate::taxonomy::{Taxonomy, YOUTH_REDIRECT};
use kidshield_core::Severity;
use std::collections::BTreeSet;

/// Findings for one message, merged by the decision engine with context
/// signals into the final verdict.
#[derive(Debug, Clone)]
pub struct Findings {
    pub issues: BTreeSet<String>,
    pub severity: Severity,
    pub redirect: Option<&'static str>,
}

impl Findings {
    pub fn safe() -> Self {
        Self { issues: BTreeSet::new(), severity: Severity::Low, redirect: None }
    }
}

pub struct PatternMatcher {
    taxonomy: Taxonomy,
}

impl PatternMatcher {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// Classifies one message. Never fails: an empty or unmatchable message
    /// is simply safe. Matching runs on a lowercased copy; the caller keeps
    /// the original for hashing and sanitization.
    pub fn evaluate(&self, message: &str, user_age: u8) -> Findings {
        let mut findings = Findings::safe();
        if message.trim().is_empty() {
            return findings;
        }
        let lower = message.to_lowercase();

        // PII: all co-occurring types are reported, each at least MEDIUM.
        for (kind, re) in &self.taxonomy.pii {
            if re.is_match(message) {
                findings.issues.insert(format!("pii:{}", kind.label()));
                findings.severity = findings.severity.max(Severity::Medium);
            }
        }

        // Harm categories in priority order. Within a category the first
        // matching pattern wins; scanning then continues with the next
        // category. The redirect kept is the highest-severity matched
        // category's, ties broken by priority order.
        let mut redirect_severity: Option<Severity> = None;
        for category in &self.taxonomy.harm {
            if category.patterns.iter().any(|re| re.is_match(&lower)) {
                findings.issues.insert(format!("concerning:{}", category.kind.label()));
                findings.severity = findings.severity.max(category.severity);
                if redirect_severity.map_or(true, |held| category.severity > held) {
                    redirect_severity = Some(category.severity);
                    findings.redirect = Some(category.redirect);
                }
            }
        }

        // Age-gated topics apply only under 13. The youth redirect never
        // displaces a category redirect already held.
        if user_age < 13 && self.taxonomy.youth.iter().any(|re| re.is_match(&lower)) {
            findings.issues.insert("age_inappropriate".into());
            findings.severity = findings.severity.max(Severity::Medium);
            if findings.redirect.is_none() {
                findings.redirect = Some(YOUTH_REDIRECT);
            }
        }

        // Boundary probing is age-independent and raises to at most MEDIUM.
        if self.taxonomy.boundary.iter().any(|re| re.is_match(&lower)) {
            findings.issues.insert("boundary_testing".into());
            findings.severity = findings.severity.max(Severity::Medium);
        }

        findings.severity = findings.severity.max(resolve_from_labels(&findings.issues));
        findings
    }
}

/// Severity safety net over accumulated issue labels. Raise-only: whatever
/// pattern order produced, self-harm vocabulary ends CRITICAL, drug/violence
/// vocabulary at least HIGH, "inappropriate" at least MEDIUM.
pub(crate) fn resolve_from_labels<'a, I>(issues: I) -> Severity
where
    I: IntoIterator<Item = &'a String>,
{
    let mut severity = Severity::Low;
    for issue in issues {
        if issue.contains("self_harm") || issue.contains("suicide") {
            return Severity::Critical;
        }
        if issue.contains("drugs") || issue.contains("violence") || issue.contains("weapon") {
            severity = severity.max(Severity::High);
        } else if issue.contains("inappropriate") {
            severity = severity.max(Severity::Medium);
        }
    }
    severity
}
