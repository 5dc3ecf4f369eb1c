//! Age-band policy and crisis resources for guardian-facing surfaces.

use kidshield_core::Severity;
use serde::Serialize;

/// Coarse age bands driving session limits and content level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    Preschool,
    Elementary,
    MiddleSchool,
    HighSchool,
}

impl AgeBand {
    pub fn for_age(age: u8) -> Self {
        match age {
            0..=5 => Self::Preschool,
            6..=8 => Self::Elementary,
            9..=12 => Self::MiddleSchool,
            _ => Self::HighSchool,
        }
    }

    pub fn settings(self) -> ContentSettings {
        match self {
            Self::Preschool => ContentSettings {
                content_level: "preschool",
                max_session_minutes: 15,
                requires_parent_presence: true,
            },
            Self::Elementary => ContentSettings {
                content_level: "elementary",
                max_session_minutes: 30,
                requires_parent_presence: false,
            },
            Self::MiddleSchool => ContentSettings {
                content_level: "middle_school",
                max_session_minutes: 45,
                requires_parent_presence: false,
            },
            Self::HighSchool => ContentSettings {
                content_level: "high_school",
                max_session_minutes: 60,
                requires_parent_presence: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ContentSettings {
    pub content_level: &'static str,
    pub max_session_minutes: u32,
    pub requires_parent_presence: bool,
}

/// Crisis contact information surfaced alongside CRITICAL verdicts.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CrisisResource {
    pub hotline: Option<&'static str>,
    pub text_line: Option<&'static str>,
    pub website: Option<&'static str>,
    pub message: &'static str,
}

const SELF_HARM_RESOURCE: CrisisResource = CrisisResource {
    hotline: Some("988 (Suicide & Crisis Lifeline)"),
    text_line: Some("Text HOME to 741741"),
    website: Some("https://988lifeline.org"),
    message: "Help is available 24/7. You are not alone.",
};

const ABUSE_RESOURCE: CrisisResource = CrisisResource {
    hotline: Some("1-800-4-A-CHILD (1-800-422-4453)"),
    text_line: None,
    website: Some("https://www.childhelp.org"),
    message: "You deserve to be safe and protected.",
};

const GENERAL_RESOURCE: CrisisResource = CrisisResource {
    hotline: None,
    text_line: None,
    website: None,
    message: "Please talk to a trusted adult like a parent, teacher, or school counselor.",
};

/// Looks up crisis resources by issue family; unknown families fall back to
/// the general guidance.
pub fn crisis_resources(issue: &str) -> CrisisResource {
    if issue.contains("self_harm") || issue.contains("suicide") {
        SELF_HARM_RESOURCE
    } else if issue.contains("abuse") {
        ABUSE_RESOURCE
    } else {
        GENERAL_RESOURCE
    }
}

/// Guardian-facing description and recommended action per severity level.
pub fn severity_guidance(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => {
            "Immediate safety risk requiring urgent attention. Check on your child immediately."
        }
        Severity::High => {
            "Serious concern requiring prompt discussion. Have a serious conversation soon."
        }
        Severity::Medium => {
            "Age-inappropriate content or concerning patterns. Monitor and discuss when appropriate."
        }
        Severity::Low => "Minor concern for awareness. Be aware and guide as needed.",
    }
}
