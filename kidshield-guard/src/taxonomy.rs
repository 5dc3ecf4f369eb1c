//! Harm taxonomy — the fixed detection tables the matcher evaluates.
//!
//! Category → severity and category → redirect are static, declared here,
//! and never mutated at runtime. Every structural pattern is compiled once
//! at engine startup; a pattern that fails to compile is a fatal
//! misconfiguration, never a per-message error.

use kidshield_core::{Severity, ShieldError, ShieldResult};
use regex::Regex;
use serde::{Deserialize, Serialize};

// ── PII categories ──────────────────────────────────────────────────────────

/// Structurally detectable personal information. PII is never classified by
/// the harm severity table; policy assigns any hit at least MEDIUM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiKind {
    Email,
    Phone,
    Ssn,
    Address,
}

impl PiiKind {
    pub const ALL: [PiiKind; 4] = [Self::Email, Self::Phone, Self::Ssn, Self::Address];

    pub fn label(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Ssn => "ssn",
            Self::Address => "address",
        }
    }

    /// Placeholder substituted by the sanitizer. None of these contain
    /// digits or '@', so sanitizing is idempotent.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Email => "[EMAIL_REMOVED]",
            Self::Phone => "[PHONE_REMOVED]",
            Self::Ssn => "[SSN_REMOVED]",
            Self::Address => "[ADDRESS_REMOVED]",
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            Self::Email => r"(?i)\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
            Self::Phone => r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b",
            Self::Ssn => r"\b\d{3}-\d{2}-\d{4}\b",
            Self::Address => {
                r"(?i)\b\d+\s+[\w\s]+\s+(street|st|avenue|ave|road|rd|lane|ln|drive|dr)\b"
            }
        }
    }
}

// ── Harm categories ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmKind {
    SelfHarm,
    Drugs,
    Violence,
    InappropriateRequest,
}

impl HarmKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::SelfHarm => "self_harm",
            Self::Drugs => "drugs",
            Self::Violence => "violence",
            Self::InappropriateRequest => "inappropriate_request",
        }
    }
}

pub(crate) struct CategorySpec {
    pub kind: HarmKind,
    pub severity: Severity,
    pub patterns: &'static [&'static str],
    pub redirect: &'static str,
}

/// Categories in fixed priority order. The matcher scans them in this order
/// and stops at the first matching pattern within each category.
pub(crate) const HARM_CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        kind: HarmKind::SelfHarm,
        severity: Severity::Critical,
        patterns: &[
            r"\b(kill|hurt|harm|cut|end)\s*(my)?self\b",
            r"\b(suicide|suicidal|die|death|end\s*my\s*life)\b",
            r"\b(jump|throw|throwing)\s*(myself|me)?\s*(off|out|from)\s*(the|a)?\s*(window|bridge|building|cliff)\b",
            r"\bwant\s*to\s*(die|disappear|not\s*exist)\b",
            r"\b(worthless|hopeless|better\s*off\s*(dead|gone))\b",
            r"\b(overdose|poison|hang|drown)\s*(myself|me)?\b",
            // Coded and euphemistic variants
            r"\bunalive\s*myself\b",
            r"\bsewerslide\b",
            r"\bsu[1!]c[1!]de\b",
        ],
        redirect: "I can see you're going through a really tough time, and I'm concerned \
            about you. You don't have to face this alone. Please talk to a trusted adult \
            like a parent, teacher, or counselor who can help. In the US, you can also \
            call or text 988 to talk to someone right now. You matter, and there are \
            people who want to help. What are some things that usually make you feel a \
            bit better when you're down?",
    },
    CategorySpec {
        kind: HarmKind::Drugs,
        severity: Severity::High,
        patterns: &[
            r"\b(buy|sell|get|score|deal|use)\b.*\b(drug|drugs|cocaine|heroin|meth|marijuana|weed|pills|acid|lsd|ecstasy|molly)\b",
            r"\b(cocaine|heroin|meth|marijuana|weed|cannabis|ecstasy|mdma|lsd|acid|pills|opioid|fentanyl|xanax|adderall)\b",
            r"\b(dealer|dealing|high|stoned|trip|tripping)\b",
            // Leetspeak
            r"\b(sn[0o]w|gr[@a]ss|p[1i]lls|m[0o]lly)\b",
        ],
        redirect: "I understand you're curious, but drugs can be really dangerous, \
            especially for young people whose brains are still developing. They can hurt \
            your body, affect your schoolwork, and get you in serious trouble. Instead, \
            have you thought about fun activities that give you natural excitement? \
            Sports, art, music, or even cool science experiments can give you amazing \
            feelings without the risks. What kind of activities do you enjoy?",
    },
    CategorySpec {
        kind: HarmKind::Violence,
        severity: Severity::High,
        patterns: &[
            r"\b(kill|hurt|harm|beat|attack|stab|shoot|murder)\s+(someone|people|them|him|her|myself)\b",
            r"\b(gun|knife|weapon|bomb|explosive)\s+(to|for)\s+(hurt|kill|attack)\b",
            r"\bplan(ning)?\s+to\s+(hurt|attack|kill)\b",
            r"\b(school|mass)\s+(shooting|violence|attack)\b",
        ],
        redirect: "Violence is never the answer to problems. If you're feeling angry or \
            upset with someone, there are much better ways to handle those feelings. \
            Talking to a counselor, parent, or teacher can help you work through these \
            emotions safely. If someone has hurt you, please tell a trusted adult. \
            What's making you feel this way? Sometimes just talking about our feelings \
            can help a lot.",
    },
    CategorySpec {
        kind: HarmKind::InappropriateRequest,
        severity: Severity::High,
        patterns: &[
            r"\b(show|send|share)\s*(me)?\s*(nude|naked|inappropriate)\b",
            r"\b(sex|sexual|porn)\b",
            r"\bmeet\s*(up|me)\s*(in)?\s*(person|real\s*life|irl)\b",
        ],
        redirect: "That's not something I can help with, and it's important to stay safe \
            online. Remember, never share personal photos or meet up with people you \
            only know online. If someone online is making you uncomfortable or asking \
            for inappropriate things, please tell a trusted adult right away. Let's talk \
            about something else - what are your favorite subjects in school?",
    },
];

// ── Age-gated topics (users under 13) ───────────────────────────────────────

pub(crate) const YOUTH_PATTERNS: &[&str] = &[
    r"\b(dating|boyfriend|girlfriend|romance|kiss)\b",
    r"\b(beer|alcohol|drunk|wine|vodka)\b",
    r"\b(vape|vaping|cigarette|smoking)\b",
];

pub(crate) const YOUTH_REDIRECT: &str =
    "That's a topic for when you're older. Right now, let's focus on fun things kids \
     your age enjoy! What games do you like to play or what are you learning about in \
     school?";

// ── Boundary probing ────────────────────────────────────────────────────────

pub(crate) const BOUNDARY_PATTERNS: &[&str] = &[
    r"what\s*if\s*i\s*(told|said)\s*you",
    r"would\s*you\s*(tell|report|snitch)",
    r"can\s*you\s*keep\s*a\s*secret",
    r"don'?t\s*tell\s*(my|anyone)",
];

// ── Escalation triads ───────────────────────────────────────────────────────

/// Conceptually related phrase groups scanned over the last three messages
/// of a user's window. A triad fires when at least 2 of its 3 members appear
/// anywhere in the concatenated blob.
pub(crate) const ESCALATION_TRIADS: &[[&str; 3]] = &[
    // Intent progression
    ["thinking about", "planning to", "going to"],
    // Mood progression
    ["sad", "depressed", "want to die"],
    // Certainty progression
    ["maybe", "probably", "definitely"],
];

// ── Coded-language substitutions ────────────────────────────────────────────

/// Obfuscated tokens mapped to their canonical harm category. Matched as
/// substrings of the current message only, never over the window.
pub(crate) const CODED_TERMS: &[(&str, &str)] = &[
    ("unalive", "self_harm"),
    ("sewerslide", "suicide"),
    ("su1c1de", "suicide"),
    ("3d", "eating_disorder"),
    ("sn0w", "drugs"),
    ("gr@ss", "drugs"),
    ("p1lls", "drugs"),
];

/// Shown when a verdict is unsafe but no category supplied a redirect
/// (e.g. an escalation-only trigger). An unsafe verdict never goes out with
/// an empty redirect.
pub(crate) const FALLBACK_REDIRECT: &str =
    "Let's pause for a moment. It can really help to talk to a trusted adult like a \
     parent, teacher, or school counselor about what's on your mind. I'm here to help \
     you learn - what would you like to explore together?";

// ── Compiled form ───────────────────────────────────────────────────────────

pub(crate) struct CompiledCategory {
    pub kind: HarmKind,
    pub severity: Severity,
    pub patterns: Vec<Regex>,
    pub redirect: &'static str,
}

/// All detection tables compiled and validated. Built once at engine startup.
pub struct Taxonomy {
    pub(crate) pii: Vec<(PiiKind, Regex)>,
    pub(crate) harm: Vec<CompiledCategory>,
    pub(crate) youth: Vec<Regex>,
    pub(crate) boundary: Vec<Regex>,
}

impl Taxonomy {
    pub fn compile() -> ShieldResult<Self> {
        let mut harm = Vec::with_capacity(HARM_CATEGORIES.len());
        for spec in HARM_CATEGORIES {
            if spec.patterns.is_empty() || spec.redirect.trim().is_empty() {
                return Err(ShieldError::EmptyTaxonomy(spec.kind.label()));
            }
            let patterns = spec
                .patterns
                .iter()
                .copied()
                .map(compile_one)
                .collect::<ShieldResult<Vec<_>>>()?;
            harm.push(CompiledCategory {
                kind: spec.kind,
                severity: spec.severity,
                patterns,
                redirect: spec.redirect,
            });
        }

        Ok(Self {
            pii: compile_pii()?,
            harm,
            youth: YOUTH_PATTERNS
                .iter()
                .copied()
                .map(compile_one)
                .collect::<ShieldResult<_>>()?,
            boundary: BOUNDARY_PATTERNS
                .iter()
                .copied()
                .map(compile_one)
                .collect::<ShieldResult<_>>()?,
        })
    }
}

pub(crate) fn compile_pii() -> ShieldResult<Vec<(PiiKind, Regex)>> {
    PiiKind::ALL.iter().map(|&kind| Ok((kind, compile_one(kind.pattern())?))).collect()
}

fn compile_one(pattern: &str) -> ShieldResult<Regex> {
    Regex::new(pattern).map_err(|source| ShieldError::Taxonomy { pattern: pattern.into(), source })
}
