//! In-memory store (does not persist across restarts; see `snapshot`).

use std::cmp::Ordering;

use parking_lot::RwLock;

use crate::snapshot::{BoardSnapshot, PostEntry, VoteEntry};
use crate::store::{NewPost, PostRegistry, StoreError, VoteCommit, VoteLedger, VoteStore};
use crate::store::ordered::OrderedIndex;
use crate::types::identifiers::{CommunityId, PostId, VoterId};
use crate::types::ranking::{Order, Ranking, ScoredPost, TimedPost};

#[derive(Debug, Default)]
struct BoardState {
    registry: PostRegistry,
    scores: OrderedIndex<PostId>,
    ledger: VoteLedger,
}

impl BoardState {
    fn require(&self, post: PostId) -> Result<(), StoreError> {
        if self.registry.contains(post) {
            Ok(())
        } else {
            Err(StoreError::NotFound(post))
        }
    }
}

/// All indexes live behind one lock, so a commit is visible to readers
/// either entirely or not at all.
#[derive(Debug, Default)]
pub struct MemoryVoteStore {
    state: RwLock<BoardState>,
}

impl MemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot. The snapshot is trusted to be
    /// internally consistent; use `SnapshotReader` to verify one from disk.
    pub fn from_snapshot(board: &BoardSnapshot) -> Result<Self, StoreError> {
        let mut state = BoardState::default();

        for entry in &board.posts {
            if state.registry.contains(entry.id) {
                return Err(StoreError::AlreadyExists(entry.id));
            }
            state
                .scores
                .register(entry.id, entry.score)
                .map_err(|e| StoreError::from_index(entry.id, e))?;
            state
                .registry
                .register(entry.id, entry.community, entry.created_at)
                .map_err(|e| StoreError::from_index(entry.id, e))?;
        }

        for vote in &board.votes {
            state.require(vote.post)?;
            if vote.value == 0 {
                return Err(StoreError::InvalidRecord(format!(
                    "zero vote stored for {} on post {}",
                    vote.voter, vote.post
                )));
            }
            if state.ledger.prior_vote(vote.post, &vote.voter) != 0 {
                return Err(StoreError::InvalidRecord(format!(
                    "duplicate vote for {} on post {}",
                    vote.voter, vote.post
                )));
            }
            state.ledger.set_vote(vote.post, &vote.voter, vote.value);
        }

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    pub fn post_count(&self) -> usize {
        self.state.read().registry.len()
    }
}

impl VoteStore for MemoryVoteStore {
    fn create_post(&self, new: &NewPost) -> Result<(), StoreError> {
        let mut state = self.state.write();
        if state.registry.contains(new.post) || state.scores.contains(&new.post) {
            return Err(StoreError::AlreadyExists(new.post));
        }
        if !new.initial_score.is_finite() {
            return Err(StoreError::InvalidScore {
                post: new.post,
                score: new.initial_score,
            });
        }

        // Both registrations are checked above and cannot fail past this point.
        state
            .scores
            .register(new.post, new.initial_score)
            .map_err(|e| StoreError::from_index(new.post, e))?;
        state
            .registry
            .register(new.post, new.community, new.created_at)
            .map_err(|e| StoreError::from_index(new.post, e))?;
        Ok(())
    }

    fn commit_vote(&self, commit: &VoteCommit) -> Result<f64, StoreError> {
        let mut state = self.state.write();
        state.require(commit.post)?;

        let found = state.ledger.prior_vote(commit.post, &commit.voter);
        if found != commit.expected_prior {
            return Err(StoreError::Conflict {
                post: commit.post,
                voter: commit.voter.clone(),
                expected: commit.expected_prior,
                found,
            });
        }

        // The score update is the only fallible step, so it goes first.
        let score = state
            .scores
            .increment_by(&commit.post, commit.delta)
            .map_err(|e| StoreError::from_index(commit.post, e))?;
        state.ledger.set_vote(commit.post, &commit.voter, commit.value);
        Ok(score)
    }

    fn creation_time(&self, post: PostId) -> Result<i64, StoreError> {
        self.state
            .read()
            .registry
            .creation_time_of(post)
            .ok_or(StoreError::NotFound(post))
    }

    fn community_of(&self, post: PostId) -> Result<CommunityId, StoreError> {
        self.state
            .read()
            .registry
            .community_of(post)
            .ok_or(StoreError::NotFound(post))
    }

    fn score_of(&self, post: PostId) -> Result<f64, StoreError> {
        self.state
            .read()
            .scores
            .score_of(&post)
            .ok_or(StoreError::NotFound(post))
    }

    fn prior_vote(&self, post: PostId, voter: &VoterId) -> Result<i8, StoreError> {
        let state = self.state.read();
        state.require(post)?;
        Ok(state.ledger.prior_vote(post, voter))
    }

    fn vote_count(&self, post: PostId) -> Result<usize, StoreError> {
        let state = self.state.read();
        state.require(post)?;
        Ok(state.ledger.vote_count(post))
    }

    fn range_by_score(
        &self,
        min: f64,
        max: f64,
        order: Order,
    ) -> Result<Ranking<ScoredPost>, StoreError> {
        let state = self.state.read();
        let entries = state
            .scores
            .range(min, max, order)
            .map(|(post, score)| ScoredPost { post, score })
            .collect();
        Ok(Ranking::new(entries))
    }

    fn range_by_time(
        &self,
        min: i64,
        max: i64,
        order: Order,
    ) -> Result<Ranking<TimedPost>, StoreError> {
        let state = self.state.read();
        let entries = state
            .registry
            .by_time()
            .range(min as f64, max as f64, order)
            .map(|(post, created_at)| TimedPost {
                post,
                created_at: created_at as i64,
            })
            .collect();
        Ok(Ranking::new(entries))
    }

    fn community_by_score(
        &self,
        community: CommunityId,
        order: Order,
    ) -> Result<Ranking<ScoredPost>, StoreError> {
        let state = self.state.read();
        let mut entries: Vec<ScoredPost> = state
            .registry
            .members(community)
            .filter_map(|post| {
                state
                    .scores
                    .score_of(&post)
                    .map(|score| ScoredPost { post, score })
            })
            .collect();

        // Same tie-break as the score index: ties ordered by post id.
        entries.sort_by(|a, b| {
            let cmp = a
                .score
                .partial_cmp(&b.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.post.cmp(&b.post));
            match order {
                Order::Ascending => cmp,
                Order::Descending => cmp.reverse(),
            }
        });

        Ok(Ranking::new(entries))
    }

    fn snapshot(&self) -> Result<BoardSnapshot, StoreError> {
        let state = self.state.read();

        let mut posts = Vec::with_capacity(state.registry.len());
        for (post, score) in state.scores.iter() {
            let post = *post;
            let created_at = state
                .registry
                .creation_time_of(post)
                .ok_or(StoreError::NotFound(post))?;
            let community = state
                .registry
                .community_of(post)
                .ok_or(StoreError::NotFound(post))?;
            posts.push(PostEntry {
                id: post,
                community,
                created_at,
                score,
            });
        }

        let votes = state
            .ledger
            .iter()
            .map(|(post, voter, value)| VoteEntry {
                post,
                voter: voter.clone(),
                value,
            })
            .collect();

        Ok(BoardSnapshot { posts, votes })
    }
}
