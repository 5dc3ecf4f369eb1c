//! Audit trail for safety evaluations.
//!
//! Every evaluated message produces exactly one record — allowed or blocked —
//! so guardian dashboards can audit baselines and false negatives, not just
//! violations. Records carry a content hash, never the raw message.

use crate::types::Severity;
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lowercase-hex MD5 digest of the message text. The audit log must not
/// retain content, only something stable enough to correlate records.
pub fn hash_message(message: &str) -> String {
    let digest = Md5::digest(message.as_bytes());
    let mut out = String::with_capacity(32);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    Allowed,
    Blocked,
}

/// One audit entry per evaluated message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyLogRecord {
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub message_hash: String,
    pub issues: Vec<String>,
    pub severity: Severity,
    pub action: LogAction,
    pub requires_immediate_attention: bool,
}

/// Bounded in-memory record store. Appends are concurrent-safe; no ordering
/// is guaranteed across different users.
pub struct AuditLog {
    records: RwLock<Vec<SafetyLogRecord>>,
    max_records: usize,
    total_checked: AtomicU64,
    total_blocked: AtomicU64,
    total_critical: AtomicU64,
}

impl AuditLog {
    pub fn new(max_records: usize) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            max_records,
            total_checked: AtomicU64::new(0),
            total_blocked: AtomicU64::new(0),
            total_critical: AtomicU64::new(0),
        }
    }

    pub fn record(&self, record: SafetyLogRecord) {
        self.total_checked.fetch_add(1, Ordering::Relaxed);
        if record.action == LogAction::Blocked {
            self.total_blocked.fetch_add(1, Ordering::Relaxed);
        }
        if record.requires_immediate_attention {
            self.total_critical.fetch_add(1, Ordering::Relaxed);
        }
        let mut records = self.records.write();
        if records.len() >= self.max_records {
            records.remove(0);
        }
        records.push(record);
    }

    pub fn records(&self) -> Vec<SafetyLogRecord> {
        self.records.read().clone()
    }

    pub fn for_user(&self, user_id: &str) -> Vec<SafetyLogRecord> {
        self.records.read().iter().filter(|r| r.user_id == user_id).cloned().collect()
    }

    /// Records a guardian must see right away (CRITICAL severity).
    pub fn requiring_attention(&self) -> Vec<SafetyLogRecord> {
        self.records.read().iter().filter(|r| r.requires_immediate_attention).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn total_checked(&self) -> u64 {
        self.total_checked.load(Ordering::Relaxed)
    }

    pub fn total_blocked(&self) -> u64 {
        self.total_blocked.load(Ordering::Relaxed)
    }

    pub fn total_critical(&self) -> u64 {
        self.total_critical.load(Ordering::Relaxed)
    }
}
