use std::collections::{BTreeMap, BTreeSet};

use crate::store::ordered::{IndexError, OrderedIndex};
use crate::types::identifiers::{CommunityId, PostId};

/// Creation time and community membership of every known post.
///
/// The time index doubles as the "posts by creation time" ordering.
#[derive(Debug, Clone, Default)]
pub struct PostRegistry {
    created: OrderedIndex<PostId>,
    community_of: BTreeMap<PostId, CommunityId>,
    members: BTreeMap<CommunityId, BTreeSet<PostId>>,
}

impl PostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        post: PostId,
        community: CommunityId,
        created_at: i64,
    ) -> Result<(), IndexError> {
        // i64 seconds are exact in f64 for any realistic timestamp.
        self.created.register(post, created_at as f64)?;
        self.community_of.insert(post, community);
        self.members.entry(community).or_default().insert(post);
        Ok(())
    }

    pub fn contains(&self, post: PostId) -> bool {
        self.created.contains(&post)
    }

    pub fn creation_time_of(&self, post: PostId) -> Option<i64> {
        self.created.score_of(&post).map(|t| t as i64)
    }

    pub fn community_of(&self, post: PostId) -> Option<CommunityId> {
        self.community_of.get(&post).copied()
    }

    pub fn members(&self, community: CommunityId) -> impl Iterator<Item = PostId> + '_ {
        self.members
            .get(&community)
            .into_iter()
            .flat_map(|posts| posts.iter().copied())
    }

    pub fn by_time(&self) -> &OrderedIndex<PostId> {
        &self.created
    }

    pub fn len(&self) -> usize {
        self.created.len()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }
}
