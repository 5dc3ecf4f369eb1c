//! Response Sanitizer — strips PII from outbound text.
//!
//! Applies the same structural PII patterns the matcher uses to arbitrary
//! text (typically generated replies) and substitutes category-tagged
//! placeholders. Idempotent: the placeholders contain nothing the patterns
//! can match, so re-sanitizing is a no-op.

use crate::taxonomy::{compile_pii, PiiKind, Taxonomy};
use kidshield_core::ShieldResult;
use regex::Regex;

pub struct ResponseSanitizer {
    pii: Vec<(PiiKind, Regex)>,
}

impl ResponseSanitizer {
    /// Standalone construction, compiling just the PII tables.
    pub fn new() -> ShieldResult<Self> {
        Ok(Self { pii: compile_pii()? })
    }

    /// Shares the already compiled patterns of an engine taxonomy.
    pub(crate) fn from_taxonomy(taxonomy: &Taxonomy) -> Self {
        Self { pii: taxonomy.pii.clone() }
    }

    /// Replaces every PII match with its category placeholder. All other
    /// characters are left untouched.
    pub fn sanitize(&self, text: &str) -> String {
        let mut sanitized = text.to_string();
        for (kind, re) in &self.pii {
            if re.is_match(&sanitized) {
                sanitized = re.replace_all(&sanitized, kind.placeholder()).into_owned();
            }
        }
        sanitized
    }
}
