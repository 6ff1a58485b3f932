use thiserror::Error;

use crate::store::StoreError;
use crate::types::identifiers::PostId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoteError {
    #[error("Post already exists: {0}")]
    AlreadyExists(PostId),

    #[error("Post not found: {0}")]
    NotFound(PostId),

    #[error("Voting window for post {post} has closed ({age}s since creation, window is {window}s)")]
    VoteWindowExpired { post: PostId, age: i64, window: i64 },

    #[error("Repeated vote of {value} on post {post}")]
    DuplicateVote { post: PostId, value: i8 },

    #[error("Vote value {value} outside legal range {min}..={max}")]
    InvalidVote { value: i8, min: i8, max: i8 },

    #[error("Storage failure: {0}")]
    StorageFailure(StoreError),
}

impl VoteError {
    /// Business rejection: terminal, meant to be shown to the end user.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            VoteError::VoteWindowExpired { .. }
                | VoteError::DuplicateVote { .. }
                | VoteError::InvalidVote { .. }
        )
    }

    /// Infrastructure failure: nothing was written, the whole attempt may be
    /// resubmitted.
    pub fn is_retryable(&self) -> bool {
        matches!(self, VoteError::StorageFailure(_))
    }
}

impl From<StoreError> for VoteError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(post) => VoteError::AlreadyExists(post),
            StoreError::NotFound(post) => VoteError::NotFound(post),
            other => VoteError::StorageFailure(other),
        }
    }
}
