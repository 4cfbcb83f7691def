use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque identifier of a ranked entity (a user or a post)
pub type ActorId = i64;

/// Identifier of a tag attached to a post
pub type TagId = i64;

/// A recorded "like": `actor` performed the affinity action on `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AffinityAction {
    pub actor: ActorId,
    pub target: ActorId,
}

/// A scored recommendation entry, produced by scorers and never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: ActorId,
    pub score: i64,
}

impl Candidate {
    pub fn new(id: ActorId, score: i64) -> Self {
        Self { id, score }
    }
}

/// Accumulates integer scores per id while remembering the order ids were first seen.
///
/// Ranking sorts by descending score; ties keep first-seen order, so the output is
/// fully determined by the order scores were added.
#[derive(Debug, Default, Clone)]
pub struct ScoreBoard {
    entries: Vec<Candidate>,
    index: HashMap<ActorId, usize>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the score of `id`, registering it on first sight
    pub fn add(&mut self, id: ActorId, amount: i64) {
        match self.index.get(&id) {
            Some(&pos) => {
                let entry = &mut self.entries[pos];
                entry.score = entry.score.saturating_add(amount);
            }
            None => {
                self.index.insert(id, self.entries.len());
                self.entries.push(Candidate::new(id, amount));
            }
        }
    }

    /// Counts one occurrence of every id in `ids`
    pub fn count<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ActorId>,
    {
        let mut board = Self::new();
        for id in ids {
            board.add(id, 1);
        }
        board
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn score(&self, id: ActorId) -> Option<i64> {
        self.index.get(&id).map(|&pos| self.entries[pos].score)
    }

    /// Highest scores first, truncated to `limit`
    pub fn ranked(self, limit: usize) -> Vec<Candidate> {
        let mut entries = self.entries;
        // sort_by is stable, which preserves first-seen order among equal scores
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        entries
    }
}

/// Strips scores, keeping the ranked order
pub fn candidate_ids(candidates: &[Candidate]) -> Vec<ActorId> {
    candidates.iter().map(|c| c.id).collect()
}
