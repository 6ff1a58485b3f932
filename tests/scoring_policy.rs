use proptest::prelude::*;
use vote_core::policy::{ConfigError, HotScorePolicy, ScoringConfig, ScoringPolicy, VoteRange};

fn wide_policy(unit: f64) -> HotScorePolicy {
    let mut config = ScoringConfig::v0();
    config.score_per_vote_unit = unit;
    config.vote_range = VoteRange { min: -5, max: 5 };
    HotScorePolicy::new(config).unwrap()
}

#[test]
fn unit_transitions_match_default_weights() {
    let policy = HotScorePolicy::default();

    assert_eq!(policy.delta(0, 1), 432.0);
    assert_eq!(policy.delta(1, 0), -432.0);
    assert_eq!(policy.delta(0, -1), -432.0);
    assert_eq!(policy.delta(-1, 0), 432.0);
    assert_eq!(policy.delta(-1, 1), 864.0);
    assert_eq!(policy.delta(1, -1), -864.0);
}

#[test]
fn default_range_accepts_only_unit_votes() {
    let policy = HotScorePolicy::default();
    for v in [-1, 0, 1] {
        assert!(policy.accepts(v));
    }
    for v in [i8::MIN, -2, 2, i8::MAX] {
        assert!(!policy.accepts(v));
    }
}

#[test]
fn extreme_values_do_not_overflow() {
    let mut config = ScoringConfig::v0();
    config.vote_range = VoteRange { min: i8::MIN, max: i8::MAX };
    let policy = HotScorePolicy::new(config).unwrap();

    assert_eq!(policy.delta(i8::MIN, i8::MAX), 255.0 * 432.0);
    assert_eq!(policy.delta(i8::MAX, i8::MIN), -255.0 * 432.0);
}

proptest! {
    #[test]
    fn delta_is_antisymmetric(a in -5i8..=5, b in -5i8..=5, unit in 1.0f64..10_000.0) {
        prop_assume!(a != b);
        let policy = wide_policy(unit);
        prop_assert_eq!(policy.delta(a, b), -policy.delta(b, a));
    }

    #[test]
    fn delta_sign_follows_direction(a in -5i8..=5, b in -5i8..=5) {
        prop_assume!(a != b);
        let policy = wide_policy(432.0);
        let delta = policy.delta(a, b);
        prop_assert_eq!(delta > 0.0, b > a);
        prop_assert_eq!(delta.abs(), f64::from((i16::from(b) - i16::from(a)).abs()) * 432.0);
    }

    #[test]
    fn eligibility_is_monotonic(created in 0i64..2_000_000_000, age in 0i64..10_000_000) {
        let policy = HotScorePolicy::default();
        let window = policy.config().voting_window_seconds;
        let now = created + age;
        prop_assert_eq!(policy.eligible(now, created), age <= window);
        if !policy.eligible(now, created) {
            prop_assert!(!policy.eligible(now + 1, created));
        }
    }
}

#[test]
fn config_defaults_are_explicit() {
    let config = ScoringConfig::default();
    assert_eq!(config, ScoringConfig::v0());
    assert_eq!(config.voting_window_seconds, 604_800);
    assert_eq!(config.score_per_vote_unit, 432.0);
    assert_eq!(config.vote_range, VoteRange { min: -1, max: 1 });
    config.validate().unwrap();
}

#[test]
fn config_overrides_fill_missing_fields_from_defaults() {
    let config = ScoringConfig::from_json_str(r#"{ "voting_window_seconds": 3600 }"#).unwrap();
    assert_eq!(config.voting_window_seconds, 3600);
    assert_eq!(config.score_per_vote_unit, 432.0);
    assert_eq!(config.max_commit_attempts, ScoringConfig::v0().max_commit_attempts);
}

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scoring.json");
    std::fs::write(&path, r#"{ "score_per_vote_unit": 100.0, "vote_range": { "min": -2, "max": 2 } }"#).unwrap();

    let config = ScoringConfig::load(&path).unwrap();
    assert_eq!(config.score_per_vote_unit, 100.0);
    assert!(config.vote_range.contains(-2));

    let missing = ScoringConfig::load(&dir.path().join("absent.json"));
    assert!(matches!(missing, Err(ConfigError::Io(_))));
}

#[test]
fn invalid_configs_are_rejected() {
    let cases = [
        r#"{ "voting_window_seconds": 0 }"#,
        r#"{ "score_per_vote_unit": -1.0 }"#,
        r#"{ "vote_range": { "min": 1, "max": 3 } }"#,
        r#"{ "vote_range": { "min": 1, "max": -1 } }"#,
        r#"{ "max_commit_attempts": 0 }"#,
        r#"{ "lock_shards": 0 }"#,
    ];
    for raw in cases {
        assert!(ScoringConfig::from_json_str(raw).is_err(), "accepted {raw}");
    }

    let mut config = ScoringConfig::v0();
    config.score_per_vote_unit = f64::NAN;
    assert!(matches!(HotScorePolicy::new(config), Err(ConfigError::InvalidScoreUnit(_))));

    assert!(matches!(
        ScoringConfig::from_json_str("not json"),
        Err(ConfigError::Serialization(_))
    ));
}
