use std::collections::BTreeMap;

use crate::types::identifiers::{PostId, VoterId};

/// Per-post record of who voted what.
///
/// A stored value is never zero: a zero vote is represented by the absence
/// of the record, so `prior_vote` returns 0 for both.
#[derive(Debug, Clone, Default)]
pub struct VoteLedger {
    posts: BTreeMap<PostId, BTreeMap<VoterId, i8>>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prior_vote(&self, post: PostId, voter: &VoterId) -> i8 {
        self.posts
            .get(&post)
            .and_then(|votes| votes.get(voter))
            .copied()
            .unwrap_or(0)
    }

    pub fn set_vote(&mut self, post: PostId, voter: &VoterId, value: i8) {
        if value == 0 {
            let emptied = match self.posts.get_mut(&post) {
                Some(votes) => {
                    votes.remove(voter);
                    votes.is_empty()
                }
                None => false,
            };
            if emptied {
                self.posts.remove(&post);
            }
        } else {
            self.posts
                .entry(post)
                .or_default()
                .insert(voter.clone(), value);
        }
    }

    pub fn vote_count(&self, post: PostId) -> usize {
        self.posts.get(&post).map_or(0, BTreeMap::len)
    }

    /// Sum of recorded magnitudes for `post`.
    pub fn tally(&self, post: PostId) -> i64 {
        self.posts
            .get(&post)
            .map_or(0, |votes| votes.values().map(|v| i64::from(*v)).sum())
    }

    /// All records, ordered by (post, voter).
    pub fn iter(&self) -> impl Iterator<Item = (PostId, &VoterId, i8)> + '_ {
        self.posts
            .iter()
            .flat_map(|(post, votes)| votes.iter().map(move |(voter, value)| (*post, voter, *value)))
    }
}
