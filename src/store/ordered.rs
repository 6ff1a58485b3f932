use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::types::ranking::Order;

/// Total order over finite scores. NaN never enters an index.
#[derive(Debug, Clone, Copy)]
struct ScoreKey(f64);

impl PartialEq for ScoreKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoreKey {}

impl PartialOrd for ScoreKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoreKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

// Folds -0.0 into 0.0 so that total_cmp agrees with numeric comparison.
fn normalize(score: f64) -> f64 {
    score + 0.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndexError {
    AlreadyExists,
    NotFound,
    NonFiniteScore(f64),
}

/// Ordered key→score index.
///
/// Keys map to exactly one score; scores map to the (ordered) set of keys
/// holding them, so ties come out ordered by key.
#[derive(Debug, Clone)]
pub struct OrderedIndex<K: Ord + Clone> {
    scores: BTreeMap<K, f64>,
    by_score: BTreeMap<ScoreKey, BTreeSet<K>>,
}

impl<K: Ord + Clone> Default for OrderedIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone> OrderedIndex<K> {
    pub fn new() -> Self {
        Self {
            scores: BTreeMap::new(),
            by_score: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, key: K, initial: f64) -> Result<(), IndexError> {
        if !initial.is_finite() {
            return Err(IndexError::NonFiniteScore(initial));
        }
        let initial = normalize(initial);
        if self.scores.contains_key(&key) {
            return Err(IndexError::AlreadyExists);
        }
        self.by_score
            .entry(ScoreKey(initial))
            .or_default()
            .insert(key.clone());
        self.scores.insert(key, initial);
        Ok(())
    }

    /// Add `delta` to the score of `key` and return the new score.
    pub fn increment_by(&mut self, key: &K, delta: f64) -> Result<f64, IndexError> {
        let current = *self.scores.get(key).ok_or(IndexError::NotFound)?;
        let updated = normalize(current + delta);
        if !updated.is_finite() {
            return Err(IndexError::NonFiniteScore(updated));
        }

        self.unlink(key, current);
        self.by_score
            .entry(ScoreKey(updated))
            .or_default()
            .insert(key.clone());
        self.scores.insert(key.clone(), updated);
        Ok(updated)
    }

    pub fn score_of(&self, key: &K) -> Option<f64> {
        self.scores.get(key).copied()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.scores.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Entries with `min <= score <= max`, lazily, in the requested order.
    /// An inverted or NaN bound yields nothing.
    pub fn range(&self, min: f64, max: f64, order: Order) -> Box<dyn Iterator<Item = (K, f64)> + '_> {
        if min.is_nan() || max.is_nan() || min > max {
            return Box::new(std::iter::empty());
        }

        let buckets = self
            .by_score
            .range(ScoreKey(normalize(min))..=ScoreKey(normalize(max)));
        match order {
            Order::Ascending => Box::new(
                buckets.flat_map(|(score, keys)| keys.iter().map(move |k| (k.clone(), score.0))),
            ),
            Order::Descending => Box::new(
                buckets
                    .rev()
                    .flat_map(|(score, keys)| keys.iter().rev().map(move |k| (k.clone(), score.0))),
            ),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> + '_ {
        self.scores.iter().map(|(k, s)| (k, *s))
    }

    fn unlink(&mut self, key: &K, score: f64) {
        let bucket_key = ScoreKey(score);
        let emptied = match self.by_score.get_mut(&bucket_key) {
            Some(keys) => {
                keys.remove(key);
                keys.is_empty()
            }
            None => false,
        };
        if emptied {
            self.by_score.remove(&bucket_key);
        }
    }
}
