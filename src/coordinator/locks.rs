use parking_lot::{Mutex, MutexGuard};

use crate::types::identifiers::PostId;

/// Sharded mutual exclusion keyed by post id.
///
/// Votes on the same post always map to the same shard and serialize; votes
/// on posts in different shards never wait on each other.
#[derive(Debug)]
pub struct PostLocks {
    shards: Vec<Mutex<()>>,
}

impl PostLocks {
    pub fn new(shards: usize) -> Self {
        let shards = (0..shards.max(1)).map(|_| Mutex::new(())).collect();
        Self { shards }
    }

    pub fn shard_of(&self, post: PostId) -> usize {
        (post.get() % self.shards.len() as u64) as usize
    }

    pub fn lock(&self, post: PostId) -> MutexGuard<'_, ()> {
        self.shards[self.shard_of(post)].lock()
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }
}
