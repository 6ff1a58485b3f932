use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::policy::ScoringConfig;

pub const BOARD_FILE: &str = "board.json";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SnapshotManifest {
    pub snapshot_version: String,
    pub config: ScoringConfig,
    pub created_at: DateTime<Utc>, // informational only
    pub post_count: usize,
    pub vote_count: usize,
    pub board_file: String,
}

/// Content hash version of the serialized board.
pub fn content_version(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);

    let hash = hasher.finalize();
    format!("sha256:{}", hex::encode(hash))
}
