pub mod ledger;
pub mod memory;
pub mod ordered;
pub mod registry;

use thiserror::Error;

use crate::snapshot::BoardSnapshot;
use crate::types::identifiers::{CommunityId, PostId, VoterId};
use crate::types::ranking::{Order, Ranking, ScoredPost, TimedPost};

pub use ledger::VoteLedger;
pub use memory::MemoryVoteStore;
pub use ordered::{IndexError, OrderedIndex};
pub use registry::PostRegistry;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Post already exists: {0}")]
    AlreadyExists(PostId),
    #[error("Post not found: {0}")]
    NotFound(PostId),
    #[error("Vote by {voter} on post {post} changed concurrently: expected {expected}, found {found}")]
    Conflict {
        post: PostId,
        voter: VoterId,
        expected: i8,
        found: i8,
    },
    #[error("Score for post {post} would become non-finite: {score}")]
    InvalidScore { post: PostId, score: f64 },
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn from_index(post: PostId, err: IndexError) -> Self {
        match err {
            IndexError::AlreadyExists => StoreError::AlreadyExists(post),
            IndexError::NotFound => StoreError::NotFound(post),
            IndexError::NonFiniteScore(score) => StoreError::InvalidScore { post, score },
        }
    }
}

/// Everything written when a post is created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub post: PostId,
    pub community: CommunityId,
    pub created_at: i64,
    pub initial_score: f64,
}

/// One vote transition, applied to the score index and the ledger together.
///
/// `expected_prior` is the ledger value the delta was computed from. A store
/// must refuse the commit with [`StoreError::Conflict`] if the ledger no
/// longer holds that value.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteCommit {
    pub post: PostId,
    pub voter: VoterId,
    pub expected_prior: i8,
    pub value: i8,
    pub delta: f64,
}

/// Storage backend for posts, scores and votes.
///
/// `create_post` and `commit_vote` are all-or-nothing: after an error no
/// part of the write is observable.
pub trait VoteStore: Send + Sync {
    fn create_post(&self, post: &NewPost) -> Result<(), StoreError>;

    /// Apply `commit.delta` to the post's score and record `commit.value`
    /// for the voter. Returns the new score.
    fn commit_vote(&self, commit: &VoteCommit) -> Result<f64, StoreError>;

    fn creation_time(&self, post: PostId) -> Result<i64, StoreError>;

    fn community_of(&self, post: PostId) -> Result<CommunityId, StoreError>;

    fn score_of(&self, post: PostId) -> Result<f64, StoreError>;

    fn prior_vote(&self, post: PostId, voter: &VoterId) -> Result<i8, StoreError>;

    fn vote_count(&self, post: PostId) -> Result<usize, StoreError>;

    fn range_by_score(
        &self,
        min: f64,
        max: f64,
        order: Order,
    ) -> Result<Ranking<ScoredPost>, StoreError>;

    fn range_by_time(
        &self,
        min: i64,
        max: i64,
        order: Order,
    ) -> Result<Ranking<TimedPost>, StoreError>;

    /// Members of `community`, ordered by score.
    fn community_by_score(
        &self,
        community: CommunityId,
        order: Order,
    ) -> Result<Ranking<ScoredPost>, StoreError>;

    fn snapshot(&self) -> Result<BoardSnapshot, StoreError>;
}
