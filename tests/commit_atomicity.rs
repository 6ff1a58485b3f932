use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vote_core::coordinator::{VoteCoordinator, VoteError};
use vote_core::policy::{HotScorePolicy, ManualClock, ScoringConfig};
use vote_core::snapshot::BoardSnapshot;
use vote_core::store::{MemoryVoteStore, NewPost, StoreError, VoteCommit, VoteStore};
use vote_core::types::{CommunityId, Order, PostId, Ranking, ScoredPost, TimedPost, VoterId};

const CREATED: i64 = 1_700_000_000;

/// What a wrapped store does on `commit_vote` before delegating.
enum Fault {
    /// Fail without writing anything.
    Unavailable,
    /// Report a conflict without writing anything.
    Conflict,
    /// Let another writer flip the voter to this value first.
    Interleave(i8),
}

/// Delegates to a real store, injecting `fault` into the first
/// `remaining` commits.
struct FaultyStore {
    inner: MemoryVoteStore,
    fault: Fault,
    remaining: AtomicUsize,
    commits: AtomicUsize,
}

impl FaultyStore {
    fn new(fault: Fault, times: usize) -> Self {
        Self {
            inner: MemoryVoteStore::new(),
            fault,
            remaining: AtomicUsize::new(times),
            commits: AtomicUsize::new(0),
        }
    }

    fn take_fault(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl VoteStore for FaultyStore {
    fn create_post(&self, post: &NewPost) -> Result<(), StoreError> {
        self.inner.create_post(post)
    }

    fn commit_vote(&self, commit: &VoteCommit) -> Result<f64, StoreError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        if self.take_fault() {
            match self.fault {
                Fault::Unavailable => {
                    return Err(StoreError::Unavailable("connection reset".into()));
                }
                Fault::Conflict => {
                    return Err(StoreError::Conflict {
                        post: commit.post,
                        voter: commit.voter.clone(),
                        expected: commit.expected_prior,
                        found: commit.expected_prior,
                    });
                }
                Fault::Interleave(value) => {
                    let current = self.inner.prior_vote(commit.post, &commit.voter)?;
                    self.inner.commit_vote(&VoteCommit {
                        post: commit.post,
                        voter: commit.voter.clone(),
                        expected_prior: current,
                        value,
                        delta: f64::from(value - current) * 432.0,
                    })?;
                }
            }
        }
        self.inner.commit_vote(commit)
    }

    fn creation_time(&self, post: PostId) -> Result<i64, StoreError> {
        self.inner.creation_time(post)
    }

    fn community_of(&self, post: PostId) -> Result<CommunityId, StoreError> {
        self.inner.community_of(post)
    }

    fn score_of(&self, post: PostId) -> Result<f64, StoreError> {
        self.inner.score_of(post)
    }

    fn prior_vote(&self, post: PostId, voter: &VoterId) -> Result<i8, StoreError> {
        self.inner.prior_vote(post, voter)
    }

    fn vote_count(&self, post: PostId) -> Result<usize, StoreError> {
        self.inner.vote_count(post)
    }

    fn range_by_score(&self, min: f64, max: f64, order: Order) -> Result<Ranking<ScoredPost>, StoreError> {
        self.inner.range_by_score(min, max, order)
    }

    fn range_by_time(&self, min: i64, max: i64, order: Order) -> Result<Ranking<TimedPost>, StoreError> {
        self.inner.range_by_time(min, max, order)
    }

    fn community_by_score(&self, community: CommunityId, order: Order) -> Result<Ranking<ScoredPost>, StoreError> {
        self.inner.community_by_score(community, order)
    }

    fn snapshot(&self) -> Result<BoardSnapshot, StoreError> {
        self.inner.snapshot()
    }
}

fn make_coordinator(
    store: FaultyStore,
) -> (VoteCoordinator<FaultyStore, HotScorePolicy, ManualClock>, Arc<FaultyStore>) {
    let store = Arc::new(store);
    let policy = HotScorePolicy::new(ScoringConfig::v0()).unwrap();
    let coordinator = VoteCoordinator::new(Arc::clone(&store), policy, ManualClock::new(CREATED));
    coordinator.register_post(PostId::new(1), CommunityId::new(1)).unwrap();
    (coordinator, store)
}

fn voter(s: &str) -> VoterId {
    VoterId::new(s).unwrap()
}

#[test]
fn storage_failure_leaves_no_partial_write() {
    let (coordinator, _store) = make_coordinator(FaultyStore::new(Fault::Unavailable, 1));
    let post = PostId::new(1);
    let u = voter("u");
    let before = coordinator.snapshot().unwrap();

    let err = coordinator.cast_vote(&u, post, 1).unwrap_err();
    assert!(matches!(err, VoteError::StorageFailure(StoreError::Unavailable(_))));
    assert!(err.is_retryable());
    assert!(!err.is_rejection());

    assert_eq!(coordinator.snapshot().unwrap(), before);
    assert_eq!(coordinator.get_score(post).unwrap(), CREATED as f64);
    assert_eq!(coordinator.vote_of(&u, post).unwrap(), 0);

    // Resubmitting the whole attempt applies the vote exactly once
    coordinator.cast_vote(&u, post, 1).unwrap();
    assert_eq!(coordinator.get_score(post).unwrap(), CREATED as f64 + 432.0);
    assert_eq!(coordinator.vote_count(post).unwrap(), 1);
}

#[test]
fn interleaved_writer_forces_delta_recompute() {
    let (coordinator, store) = make_coordinator(FaultyStore::new(Fault::Interleave(-1), 1));
    let post = PostId::new(1);
    let u = voter("u");

    let outcome = coordinator.cast_vote(&u, post, 1).unwrap();

    // The first commit (computed from "no vote") conflicted; the retry saw -1
    assert_eq!(outcome.previous, -1);
    assert_eq!(outcome.delta, 864.0);
    assert_eq!(coordinator.get_score(post).unwrap(), CREATED as f64 + 432.0);
    assert_eq!(coordinator.vote_of(&u, post).unwrap(), 1);
    assert_eq!(store.commits.load(Ordering::SeqCst), 2);
}

#[test]
fn persistent_conflicts_give_up_after_configured_attempts() {
    let (coordinator, store) = make_coordinator(FaultyStore::new(Fault::Conflict, usize::MAX));
    let post = PostId::new(1);
    let u = voter("u");

    let err = coordinator.cast_vote(&u, post, -1).unwrap_err();
    assert!(matches!(err, VoteError::StorageFailure(StoreError::Conflict { .. })));
    assert!(err.is_retryable());

    let attempts = ScoringConfig::v0().max_commit_attempts as usize;
    assert_eq!(store.commits.load(Ordering::SeqCst), attempts);
    assert_eq!(coordinator.get_score(post).unwrap(), CREATED as f64);
}

#[test]
fn memory_store_refuses_stale_commits() {
    let store = MemoryVoteStore::new();
    let post = PostId::new(1);
    store
        .create_post(&NewPost {
            post,
            community: CommunityId::new(1),
            created_at: 0,
            initial_score: 0.0,
        })
        .unwrap();
    let u = voter("u");

    store
        .commit_vote(&VoteCommit { post, voter: u.clone(), expected_prior: 0, value: 1, delta: 432.0 })
        .unwrap();

    let stale = store.commit_vote(&VoteCommit { post, voter: u.clone(), expected_prior: 0, value: -1, delta: -432.0 });
    assert_eq!(
        stale,
        Err(StoreError::Conflict { post, voter: u.clone(), expected: 0, found: 1 })
    );
    assert_eq!(store.score_of(post).unwrap(), 432.0);
    assert_eq!(store.prior_vote(post, &u).unwrap(), 1);
}

#[test]
fn memory_store_rejects_non_finite_scores_atomically() {
    let store = MemoryVoteStore::new();
    let post = PostId::new(1);
    store
        .create_post(&NewPost {
            post,
            community: CommunityId::new(1),
            created_at: 0,
            initial_score: f64::MAX,
        })
        .unwrap();
    let u = voter("u");

    let overflow = store.commit_vote(&VoteCommit { post, voter: u.clone(), expected_prior: 0, value: 1, delta: f64::MAX });
    assert!(matches!(overflow, Err(StoreError::InvalidScore { .. })));
    assert_eq!(store.prior_vote(post, &u).unwrap(), 0, "ledger untouched when score update fails");
    assert_eq!(store.score_of(post).unwrap(), f64::MAX);
}
