use crate::policy::config::{ConfigError, ScoringConfig};

pub trait ScoringPolicy {
    fn config(&self) -> &ScoringConfig;

    fn delta(&self, old_value: i8, new_value: i8) -> f64;

    /// A post stays open for voting up to and including the last second of
    /// its window. Once closed it never reopens.
    fn eligible(&self, now: i64, created_at: i64) -> bool {
        now.saturating_sub(created_at) <= self.config().voting_window_seconds
    }

    fn accepts(&self, value: i8) -> bool {
        self.config().vote_range.contains(value)
    }
}

/// v0: linear delta scoring
/// delta(old, new) := (new - old) * score_per_vote_unit
#[derive(Debug, Clone)]
pub struct HotScorePolicy {
    config: ScoringConfig,
}

impl HotScorePolicy {
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Default for HotScorePolicy {
    fn default() -> Self {
        Self {
            config: ScoringConfig::v0(),
        }
    }
}

impl ScoringPolicy for HotScorePolicy {
    fn config(&self) -> &ScoringConfig {
        &self.config
    }

    fn delta(&self, old_value: i8, new_value: i8) -> f64 {
        debug_assert_ne!(old_value, new_value, "repeated votes are rejected before scoring");

        // Widen before subtracting: -128 - 127 does not fit in i8.
        let diff = i16::from(new_value) - i16::from(old_value);
        let direction = f64::from(diff.signum());
        direction * f64::from(diff.abs()) * self.config.score_per_vote_unit
    }
}
