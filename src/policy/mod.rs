pub mod clock;
pub mod config;
pub mod scoring;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ScoringConfig, VoteRange};
pub use scoring::{HotScorePolicy, ScoringPolicy};
