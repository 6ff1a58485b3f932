use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::policy::ScoringConfig;
use crate::snapshot::SnapshotError;
use crate::types::identifiers::{CommunityId, PostId, VoterId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostEntry {
    pub id: PostId,
    pub community: CommunityId,
    pub created_at: i64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteEntry {
    pub post: PostId,
    pub voter: VoterId,
    pub value: i8,
}

/// Full logical content of a store: the time index and score index (as
/// `posts`) and the composite-keyed ledger (as `votes`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub posts: Vec<PostEntry>,
    pub votes: Vec<VoteEntry>,
}

impl BoardSnapshot {
    /// Order posts by id and votes by (post, voter).
    pub fn sort(&mut self) {
        self.posts.sort_by(|a, b| a.id.cmp(&b.id));
        self.votes
            .sort_by(|a, b| (a.post, &a.voter).cmp(&(b.post, &b.voter)));
    }

    /// Check that every vote is legal and unique, and that every score
    /// equals its creation seed plus the recorded votes times the unit.
    /// Input order does not matter.
    pub fn verify(&self, config: &ScoringConfig) -> Result<(), SnapshotError> {
        let mut seen_posts = BTreeSet::new();
        for post in &self.posts {
            if !seen_posts.insert(post.id) {
                return Err(SnapshotError::DuplicatePost(post.id));
            }
        }
        let mut seen_votes = BTreeSet::new();
        for vote in &self.votes {
            if !seen_votes.insert((vote.post, &vote.voter)) {
                return Err(SnapshotError::DuplicateVote {
                    post: vote.post,
                    voter: vote.voter.clone(),
                });
            }
        }

        let mut tallies: BTreeMap<PostId, i64> =
            self.posts.iter().map(|p| (p.id, 0)).collect();

        for vote in &self.votes {
            if vote.value == 0 || !config.vote_range.contains(vote.value) {
                return Err(SnapshotError::InvalidVote {
                    post: vote.post,
                    voter: vote.voter.clone(),
                    value: vote.value,
                });
            }
            let tally = tallies
                .get_mut(&vote.post)
                .ok_or(SnapshotError::UnknownPost(vote.post))?;
            *tally += i64::from(vote.value);
        }

        for post in &self.posts {
            let tally = tallies.get(&post.id).copied().unwrap_or(0);
            let expected = post.created_at as f64 + tally as f64 * config.score_per_vote_unit;
            // Sized to the vote unit: the timestamp seed must not widen it.
            let tolerance =
                1e-6 * config.score_per_vote_unit + 4.0 * f64::EPSILON * expected.abs();
            if (post.score - expected).abs() > tolerance {
                return Err(SnapshotError::ScoreMismatch {
                    post: post.id,
                    expected,
                    found: post.score,
                });
            }
        }

        Ok(())
    }
}
