pub mod identifiers;
pub mod ranking;

pub use identifiers::{CommunityId, PostId, VoterId, VoterIdError};
pub use ranking::{Order, Ranking, ScoredPost, TimedPost, VoteOutcome};
