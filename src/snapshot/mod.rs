pub mod board;
pub mod manifest;
pub mod reader;
pub mod writer;

use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;
use crate::types::identifiers::{PostId, VoterId};

pub use board::{BoardSnapshot, PostEntry, VoteEntry};
pub use manifest::SnapshotManifest;
pub use reader::{LoadedSnapshot, SnapshotReader};
pub use writer::SnapshotWriter;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Output directory already exists: {0}")]
    OutputExists(PathBuf),
    #[error("Duplicate post: {0}")]
    DuplicatePost(PostId),
    #[error("Duplicate vote by {voter} on post {post}")]
    DuplicateVote { post: PostId, voter: VoterId },
    #[error("Vote references unknown post: {0}")]
    UnknownPost(PostId),
    #[error("Illegal vote value {value} by {voter} on post {post}")]
    InvalidVote { post: PostId, voter: VoterId, value: i8 },
    #[error("Score mismatch for post {post}: votes imply {expected}, snapshot says {found}")]
    ScoreMismatch { post: PostId, expected: f64, found: f64 },
    #[error("Snapshot version mismatch: manifest says {expected}, content hashes to {found}")]
    VersionMismatch { expected: String, found: String },
    #[error("Manifest counts disagree with content: {posts} posts, {votes} votes")]
    CountMismatch { posts: usize, votes: usize },
    #[error("Invalid version format: {0}")]
    InvalidVersionFormat(String),
}
