pub mod error;
pub mod locks;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::policy::{Clock, ConfigError, HotScorePolicy, ScoringConfig, ScoringPolicy, SystemClock};
use crate::snapshot::{BoardSnapshot, SnapshotError, SnapshotManifest, SnapshotWriter};
use crate::store::{NewPost, StoreError, VoteCommit, VoteStore};
use crate::types::identifiers::{CommunityId, PostId, VoterId};
use crate::types::ranking::{Order, Ranking, ScoredPost, TimedPost, VoteOutcome};

pub use error::VoteError;
pub use locks::PostLocks;

/// Entry point for the surrounding system: registers posts, accepts votes
/// and answers ranking queries.
///
/// The coordinator is the only writer of scores and votes. Every vote goes
/// through `cast_vote`, which holds the post's lock shard from the
/// eligibility check to the commit.
pub struct VoteCoordinator<S, P = HotScorePolicy, C = SystemClock> {
    store: Arc<S>,
    policy: P,
    clock: C,
    locks: PostLocks,
}

impl<S: VoteStore> VoteCoordinator<S> {
    pub fn from_config(store: Arc<S>, config: ScoringConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(store, HotScorePolicy::new(config)?, SystemClock))
    }
}

impl<S, P, C> VoteCoordinator<S, P, C>
where
    S: VoteStore,
    P: ScoringPolicy,
    C: Clock,
{
    pub fn new(store: Arc<S>, policy: P, clock: C) -> Self {
        let locks = PostLocks::new(policy.config().lock_shards);
        Self {
            store,
            policy,
            clock,
            locks,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        self.policy.config()
    }

    /// Register a post created now. Its score is seeded with the creation
    /// timestamp so fresh posts rank by recency until votes arrive.
    pub fn register_post(&self, post: PostId, community: CommunityId) -> Result<(), VoteError> {
        let created_at = self.clock.now();
        let new = NewPost {
            post,
            community,
            created_at,
            initial_score: created_at as f64,
        };

        if let Err(err) = self.store.create_post(&new) {
            let err = VoteError::from(err);
            if err.is_retryable() {
                warn!(post = %post, error = %err, "post registration failed");
            }
            return Err(err);
        }

        info!(post = %post, community = %community, created_at, "registered post");
        Ok(())
    }

    pub fn cast_vote(
        &self,
        voter: &VoterId,
        post: PostId,
        value: i8,
    ) -> Result<VoteOutcome, VoteError> {
        // 0. Received: reject values outside the legal range before touching storage
        if !self.policy.accepts(value) {
            let range = self.policy.config().vote_range;
            debug!(post = %post, voter = %voter, value, "vote rejected: illegal value");
            return Err(VoteError::InvalidVote {
                value,
                min: range.min,
                max: range.max,
            });
        }

        let _guard = self.locks.lock(post);

        let max_attempts = self.policy.config().max_commit_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.attempt_vote(voter, post, value) {
                Ok(outcome) => return Ok(outcome),
                Err(VoteError::StorageFailure(StoreError::Conflict { found, .. }))
                    if attempt < max_attempts =>
                {
                    warn!(post = %post, voter = %voter, attempt, found, "vote commit conflicted, retrying");
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_retryable() {
                        warn!(post = %post, voter = %voter, attempt, error = %err, "vote commit failed");
                    } else {
                        debug!(post = %post, voter = %voter, value, error = %err, "vote rejected");
                    }
                    return Err(err);
                }
            }
        }
    }

    // Runs steps 1-4 against the store's current state. Each attempt reads
    // the prior vote afresh, so a retry never reuses a stale delta.
    fn attempt_vote(
        &self,
        voter: &VoterId,
        post: PostId,
        value: i8,
    ) -> Result<VoteOutcome, VoteError> {
        // 1. Eligibility
        let created_at = self.store.creation_time(post)?;
        let now = self.clock.now();
        if !self.policy.eligible(now, created_at) {
            return Err(VoteError::VoteWindowExpired {
                post,
                age: now.saturating_sub(created_at),
                window: self.policy.config().voting_window_seconds,
            });
        }

        // 2. Non-repetition (absence and zero are the same "no vote")
        let previous = self.store.prior_vote(post, voter)?;
        if previous == value {
            return Err(VoteError::DuplicateVote { post, value });
        }

        // 3. Delta
        let delta = self.policy.delta(previous, value);

        // 4. Commit score and ledger together
        let score = self.store.commit_vote(&VoteCommit {
            post,
            voter: voter.clone(),
            expected_prior: previous,
            value,
            delta,
        })?;

        debug!(post = %post, voter = %voter, previous, value, delta, score, "vote committed");

        Ok(VoteOutcome {
            post,
            previous,
            value,
            delta,
            score,
        })
    }

    pub fn get_score(&self, post: PostId) -> Result<f64, VoteError> {
        Ok(self.store.score_of(post)?)
    }

    /// The voter's current vote on `post`; 0 when they have none.
    pub fn vote_of(&self, voter: &VoterId, post: PostId) -> Result<i8, VoteError> {
        Ok(self.store.prior_vote(post, voter)?)
    }

    pub fn vote_count(&self, post: PostId) -> Result<usize, VoteError> {
        Ok(self.store.vote_count(post)?)
    }

    pub fn community_of(&self, post: PostId) -> Result<CommunityId, VoteError> {
        Ok(self.store.community_of(post)?)
    }

    pub fn list_posts_by_score(
        &self,
        min: f64,
        max: f64,
        descending: bool,
    ) -> Result<Ranking<ScoredPost>, VoteError> {
        Ok(self
            .store
            .range_by_score(min, max, Order::from_descending(descending))?)
    }

    pub fn list_posts_by_time(
        &self,
        min: i64,
        max: i64,
        descending: bool,
    ) -> Result<Ranking<TimedPost>, VoteError> {
        Ok(self
            .store
            .range_by_time(min, max, Order::from_descending(descending))?)
    }

    pub fn list_community_posts_by_score(
        &self,
        community: CommunityId,
        descending: bool,
    ) -> Result<Ranking<ScoredPost>, VoteError> {
        Ok(self
            .store
            .community_by_score(community, Order::from_descending(descending))?)
    }

    pub fn snapshot(&self) -> Result<BoardSnapshot, VoteError> {
        Ok(self.store.snapshot()?)
    }

    pub fn write_snapshot(&self, output_dir: &Path) -> Result<SnapshotManifest, SnapshotError> {
        let board = self.store.snapshot()?;
        SnapshotWriter::new(self.policy.config().clone()).write(board, output_dir)
    }
}
