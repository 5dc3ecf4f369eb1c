use serde::{Deserialize, Serialize};

/// Ordered risk classification for a single message.
///
/// The order is total: `Critical > High > Medium > Low`. Any merge of
/// severities yields the maximum under this order; no other comparison is
/// defined.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// True iff a guardian should be paged rather than shown a digest entry.
    pub fn requires_immediate_attention(self) -> bool {
        matches!(self, Self::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Child,
    Parent,
    Teacher,
}

/// The resolved identity triple consumed from the auth collaborator.
///
/// `age` may legitimately be absent for adult roles; a child profile without
/// an age is rejected by the engine rather than defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub age: Option<u8>,
    pub role: UserRole,
}

impl UserProfile {
    pub fn child(user_id: impl Into<String>, age: u8) -> Self {
        Self { user_id: user_id.into(), age: Some(age), role: UserRole::Child }
    }

    pub fn is_minor(&self) -> bool {
        self.role == UserRole::Child || self.age.is_some_and(|a| a < 18)
    }
}

/// Guardian-facing alert feed entry, emitted when a message is blocked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyAlert {
    pub timestamp: i64,
    pub severity: Severity,
    pub component: String,
    pub title: String,
    pub details: String,
}
