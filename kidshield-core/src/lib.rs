//! # KidShield Core — shared foundation for the safety engine.
//!
//! Everything the guard crate needs that is not detection logic lives here:
//!
//! - **Severity model** — the ordered `LOW < MEDIUM < HIGH < CRITICAL`
//!   classification; merging severities is always `max` under this order.
//! - **Identity types** — the resolved `(user_id, age, role)` triple handed
//!   over by the auth collaborator, plus guardian-facing alerts.
//! - **Errors** — taxonomy and configuration failures are fatal at startup;
//!   per-message evaluation never fails.
//! - **Config** — window lengths, context eviction, store caps.
//! - **Audit log** — bounded, hash-only record store; one record per
//!   evaluated message whether it was blocked or allowed.

pub mod audit;
pub mod config;
pub mod error;
pub mod types;

pub use audit::{hash_message, AuditLog, LogAction, SafetyLogRecord};
pub use config::GuardConfig;
pub use error::{ShieldError, ShieldResult};
pub use types::{SafetyAlert, Severity, UserProfile, UserRole};
