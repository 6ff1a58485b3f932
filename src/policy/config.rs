use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ONE_WEEK_IN_SECONDS: i64 = 7 * 24 * 3600;
pub const DEFAULT_SCORE_PER_VOTE: f64 = 432.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Voting window must be positive, got {0}")]
    InvalidWindow(i64),
    #[error("Score per vote unit must be finite and positive, got {0}")]
    InvalidScoreUnit(f64),
    #[error("Vote range {min}..={max} must be ordered and contain 0")]
    InvalidVoteRange { min: i8, max: i8 },
    #[error("At least one commit attempt is required")]
    NoCommitAttempts,
    #[error("At least one lock shard is required")]
    NoLockShards,
}

/// Inclusive range of legal vote magnitudes. Zero always means "no vote".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRange {
    pub min: i8,
    pub max: i8,
}

impl VoteRange {
    pub fn contains(&self, value: i8) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for VoteRange {
    fn default() -> Self {
        Self { min: -1, max: 1 }
    }
}

// Key point:
// Serializable
// Comparable
// Explicit defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub voting_window_seconds: i64,
    pub score_per_vote_unit: f64,
    pub vote_range: VoteRange,
    pub max_commit_attempts: u32,
    pub lock_shards: usize,
}

impl ScoringConfig {
    pub fn v0() -> Self {
        Self {
            voting_window_seconds: ONE_WEEK_IN_SECONDS,
            score_per_vote_unit: DEFAULT_SCORE_PER_VOTE,
            vote_range: VoteRange::default(),
            max_commit_attempts: 3,
            lock_shards: 64,
        }
    }

    /// Parse overrides from JSON. Fields left out keep their `v0` value.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: ScoringConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.voting_window_seconds <= 0 {
            return Err(ConfigError::InvalidWindow(self.voting_window_seconds));
        }
        if !self.score_per_vote_unit.is_finite() || self.score_per_vote_unit <= 0.0 {
            return Err(ConfigError::InvalidScoreUnit(self.score_per_vote_unit));
        }
        let VoteRange { min, max } = self.vote_range;
        if min > max || !self.vote_range.contains(0) {
            return Err(ConfigError::InvalidVoteRange { min, max });
        }
        if self.max_commit_attempts == 0 {
            return Err(ConfigError::NoCommitAttempts);
        }
        if self.lock_shards == 0 {
            return Err(ConfigError::NoLockShards);
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::v0()
    }
}
