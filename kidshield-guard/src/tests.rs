#[cfg(test)]
mod tests {
    use crate::engine::GuardrailEngine;
    use kidshield_core::{GuardConfig, LogAction, Severity, ShieldError, UserProfile, UserRole};

    fn engine() -> GuardrailEngine {
        GuardrailEngine::new().unwrap()
    }

    #[test]
    fn test_benign_message_verdict() {
        let engine = engine();
        let verdict = engine.check_message_safety("why is the sky blue?", 9, "kid_1");
        assert!(verdict.is_safe);
        assert!(verdict.issues.is_empty());
        assert_eq!(verdict.severity, Severity::Low);
        assert!(verdict.redirect.is_empty());
        assert!(!verdict.escalation_detected);
    }

    #[test]
    fn test_self_harm_phrase_is_critical_and_unsafe() {
        let engine = engine();
        let verdict = engine.check_message_safety("I want to end my life", 12, "kid_1");
        assert!(!verdict.is_safe);
        assert_eq!(verdict.severity, Severity::Critical);
        assert!(verdict.issues.contains("concerning:self_harm"));
        assert!(verdict.redirect.contains("988"));
    }

    #[test]
    fn test_empty_message_is_safe_and_skips_window() {
        let engine = engine();
        let verdict = engine.check_message_safety("   ", 9, "kid_1");
        assert!(verdict.is_safe);
        assert_eq!(verdict.severity, Severity::Low);
        assert_eq!(engine.active_contexts(), 0);
        // But it still produced an audit record.
        assert_eq!(engine.total_checked(), 1);
    }

    #[test]
    fn test_escalation_sequence_forces_critical() {
        let engine = engine();
        assert!(engine.check_message_safety("i'm sad", 11, "kid_1").is_safe);
        let second = engine.check_message_safety("i'm depressed", 11, "kid_1");
        assert!(!second.escalation_detected);
        let third = engine.check_message_safety("i want to die", 11, "kid_1");
        assert!(third.escalation_detected);
        assert_eq!(third.severity, Severity::Critical);
        assert!(third.issues.contains("escalation"));
        assert!(!third.is_safe);
    }

    #[test]
    fn test_escalation_only_trigger_gets_fallback_redirect() {
        let engine = engine();
        // Each message is individually benign; only the certainty triad
        // fires across the window.
        assert!(engine.check_message_safety("maybe we could play a game", 10, "kid_1").is_safe);
        assert!(engine.check_message_safety("probably tomorrow", 10, "kid_1").is_safe);
        let third = engine.check_message_safety("we will see", 10, "kid_1");
        assert!(third.escalation_detected);
        assert!(!third.is_safe);
        assert_eq!(third.severity, Severity::Critical);
        // No category matched, so the verdict carries the fallback redirect.
        assert!(!third.redirect.is_empty());
        assert!(third.redirect.contains("trusted adult"));
    }

    #[test]
    fn test_escalation_latch_survives_benign_messages() {
        let engine = engine();
        engine.check_message_safety("maybe later", 10, "kid_1");
        engine.check_message_safety("probably not", 10, "kid_1");
        assert!(engine.check_message_safety("hmm", 10, "kid_1").escalation_detected);
        let after = engine.check_message_safety("what do whales eat", 10, "kid_1");
        assert!(after.escalation_detected);
        assert!(!after.is_safe);
    }

    #[test]
    fn test_coded_token_alone_does_not_block() {
        let engine = engine();
        // A bare coded token is a context signal, not a verdict issue: the
        // message stays safe while the label accumulates on the user's
        // context for guardian review.
        let verdict = engine.check_message_safety("i made a 3d model in art class", 10, "kid_1");
        assert!(verdict.is_safe);
        assert_eq!(verdict.severity, Severity::Low);
        assert!(verdict.redirect.is_empty());

        let verdict = engine.check_message_safety("kids at school say unalive a lot", 13, "kid_1");
        assert!(verdict.is_safe);
        assert!(!verdict.issues.iter().any(|i| i.starts_with("coded_language:")));

        let patterns = engine.context_patterns("kid_1");
        assert!(patterns.contains(&"coded_language:eating_disorder".to_string()));
        assert!(patterns.contains(&"coded_language:self_harm".to_string()));
    }

    #[test]
    fn test_coded_spelling_still_caught_by_matcher() {
        let engine = engine();
        // Obfuscated spellings with real harm intent are matcher patterns,
        // so they block on their own merits.
        let verdict = engine.check_message_safety("thinking about su1c1de", 13, "kid_1");
        assert!(!verdict.is_safe);
        assert_eq!(verdict.severity, Severity::Critical);
        assert!(verdict.issues.contains("concerning:self_harm"));
    }

    #[test]
    fn test_phone_pii_verdict_and_sanitize() {
        let engine = engine();
        let verdict = engine.check_message_safety("call me at 555-123-4567", 11, "kid_1");
        assert!(verdict.issues.contains("pii:phone"));
        assert!(verdict.severity >= Severity::Medium);

        let sanitized = engine.sanitize_response("call me at 555-123-4567");
        assert_eq!(sanitized, "call me at [PHONE_REMOVED]");
        assert_eq!(engine.sanitize_response(&sanitized), sanitized);
    }

    #[test]
    fn test_age_gate_depends_on_age() {
        let engine = engine();
        let young = engine.check_message_safety("do you have a boyfriend", 10, "kid_1");
        assert!(young.issues.contains("age_inappropriate"));
        assert!(young.severity >= Severity::Medium);

        let older = engine.check_message_safety("do you have a boyfriend", 16, "teen_1");
        assert!(!older.issues.contains("age_inappropriate"));
        assert!(older.is_safe);
    }

    #[test]
    fn test_audit_records_safe_and_unsafe() {
        let engine = engine();
        engine.check_message_safety("what do pandas eat", 9, "kid_1");
        engine.check_message_safety("where can i buy weed", 15, "kid_2");

        assert_eq!(engine.total_checked(), 2);
        assert_eq!(engine.total_blocked(), 1);
        let records = engine.audit().records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].action, LogAction::Allowed);
        assert_eq!(records[1].action, LogAction::Blocked);
        // Hash only, never content.
        for record in &records {
            assert_eq!(record.message_hash.len(), 32);
            assert!(!record.message_hash.contains("weed"));
        }
    }

    #[test]
    fn test_critical_record_flags_attention() {
        let engine = engine();
        engine.check_message_safety("I want to end my life", 12, "kid_1");
        let urgent = engine.audit().requiring_attention();
        assert_eq!(urgent.len(), 1);
        assert!(urgent[0].requires_immediate_attention);
        assert_eq!(engine.total_critical(), 1);
    }

    #[test]
    fn test_alert_feed_populated_on_block() {
        let engine = engine();
        engine.check_message_safety("where can i buy weed", 15, "kid_1");
        let alerts = engine.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::High);
        assert!(alerts[0].details.contains("concerning:drugs"));
    }

    #[test]
    fn test_child_profile_requires_age() {
        let engine = engine();
        let profile =
            UserProfile { user_id: "kid_1".into(), age: None, role: UserRole::Child };
        let err = engine.check_profile("hello", &profile).unwrap_err();
        assert!(matches!(err, ShieldError::MissingAge { .. }));

        let parent =
            UserProfile { user_id: "parent_1".into(), age: None, role: UserRole::Parent };
        assert!(engine.check_profile("hello", &parent).is_ok());
    }

    #[test]
    fn test_window_stays_bounded_through_engine() {
        let engine = GuardrailEngine::with_config(GuardConfig::default()).unwrap();
        for i in 0..30 {
            engine.check_message_safety(&format!("tell me fact number {i}"), 9, "kid_1");
        }
        assert_eq!(engine.active_contexts(), 1);
        assert_eq!(engine.total_checked(), 30);
    }

    #[test]
    fn test_reset_user_allows_fresh_window() {
        let engine = engine();
        engine.check_message_safety("maybe", 10, "kid_1");
        engine.check_message_safety("probably", 10, "kid_1");
        assert!(engine.check_message_safety("ok", 10, "kid_1").escalation_detected);

        engine.reset_user("kid_1");
        assert!(!engine.check_message_safety("hello again", 10, "kid_1").escalation_detected);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = GuardConfig { context_window: 0, ..GuardConfig::default() };
        assert!(matches!(
            GuardrailEngine::with_config(config),
            Err(ShieldError::Config(_))
        ));
    }

    #[test]
    fn test_verdict_serializes_for_collaborators() {
        let engine = engine();
        let verdict = engine.check_message_safety("I want to end my life", 12, "kid_1");
        let json = serde_json::to_string(&verdict).unwrap();
        assert!(json.contains("\"CRITICAL\""));
        assert!(json.contains("concerning:self_harm"));
    }
}
