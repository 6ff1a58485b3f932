//! Vote scoring and ranking core for community posts.
//!
//! `vote-core` keeps one vote per (post, voter), turns vote transitions into
//! score deltas, and maintains posts ordered by creation time and by hot
//! score. Score and ledger are only ever written together, through
//! [`coordinator::VoteCoordinator`].

pub mod coordinator;
pub mod policy;
pub mod snapshot;
pub mod store;
pub mod types;

pub use coordinator::{VoteCoordinator, VoteError};
pub use policy::{Clock, HotScorePolicy, ManualClock, ScoringConfig, ScoringPolicy, SystemClock};
pub use store::{MemoryVoteStore, StoreError, VoteStore};
pub use types::{CommunityId, Order, PostId, Ranking, ScoredPost, TimedPost, VoteOutcome, VoterId};
