use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(u64);

impl PostId {
    pub const fn new(raw: u64) -> Self {
        PostId(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for PostId {
    fn from(raw: u64) -> Self {
        PostId(raw)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommunityId(u64);

impl CommunityId {
    pub const fn new(raw: u64) -> Self {
        CommunityId(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for CommunityId {
    fn from(raw: u64) -> Self {
        CommunityId(raw)
    }
}

impl fmt::Display for CommunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoterIdError {
    #[error("Voter id must not be empty")]
    Empty,
    #[error("Voter id must not contain whitespace: {0:?}")]
    Whitespace(String),
}

/// Opaque identity of the user casting a vote, as issued by the auth layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(String);

impl VoterId {
    pub fn new(raw: impl Into<String>) -> Result<Self, VoterIdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(VoterIdError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(VoterIdError::Whitespace(raw));
        }
        Ok(VoterId(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
