use serde::{Deserialize, Serialize};

use crate::types::identifiers::PostId;

/// Direction of a range query over an ordered index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            Order::Descending
        } else {
            Order::Ascending
        }
    }
}

/// A post together with its current hot score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredPost {
    pub post: PostId,
    pub score: f64,
}

/// A post together with its creation timestamp (unix seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedPost {
    pub post: PostId,
    pub created_at: i64,
}

/// An ordered, finite result of a range query.
///
/// The entries are captured under a single consistent read of the store, so
/// iterating twice yields the same sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ranking<T> {
    entries: Vec<T>,
}

impl<T> Ranking<T> {
    pub fn new(entries: Vec<T>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }
}

impl<T> Default for Ranking<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> IntoIterator for Ranking<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Ranking<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// What a committed vote changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub post: PostId,
    pub previous: i8,
    pub value: i8,
    pub delta: f64,
    pub score: f64,
}
