use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use super::signals::Signal;
use crate::{
    error::AppResult,
    models::{ActorId, Candidate, ScoreBoard},
};

/// Integer weights used when merging signals into a single ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScoringWeights {
    pub primary_weight: i64,
    pub secondary_weight: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            primary_weight: 2,
            secondary_weight: 1,
        }
    }
}

/// Additive weighted merge of one primary signal and any number of secondary signals
pub struct CombinedScorer {
    primary: Arc<dyn Signal>,
    secondary: Vec<Arc<dyn Signal>>,
    weights: ScoringWeights,
    limit: usize,
}

impl CombinedScorer {
    pub fn new(
        primary: Arc<dyn Signal>,
        secondary: Vec<Arc<dyn Signal>>,
        weights: ScoringWeights,
        limit: usize,
    ) -> Self {
        Self {
            primary,
            secondary,
            weights,
            limit,
        }
    }

    /// Computes every signal for `user_id` and merges them
    pub async fn score(&self, user_id: ActorId) -> AppResult<Vec<Candidate>> {
        let primary = self.primary.score(user_id).await?;

        let mut secondary = Vec::with_capacity(self.secondary.len());
        for signal in &self.secondary {
            secondary.push(signal.score(user_id).await?);
        }

        let secondary: Vec<&[Candidate]> = secondary.iter().map(Vec::as_slice).collect();
        Ok(self.merge(&primary, &secondary))
    }

    /// Merges already computed signal outputs
    ///
    /// A candidate present in several inputs accumulates `score * weight` from each of them,
    /// saturating at `i64::MAX`.
    /// Ties in the merged score keep the order candidates were first met, primary first.
    pub fn merge(&self, primary: &[Candidate], secondary: &[&[Candidate]]) -> Vec<Candidate> {
        let mut board = ScoreBoard::new();

        for candidate in primary {
            let weighted = candidate.score.saturating_mul(self.weights.primary_weight);
            board.add(candidate.id, weighted);
        }
        for candidates in secondary {
            for candidate in candidates.iter() {
                let weighted = candidate.score.saturating_mul(self.weights.secondary_weight);
                board.add(candidate.id, weighted);
            }
        }

        debug!(
            primary = self.primary.name(),
            merged = board.len(),
            limit = self.limit,
            "Signals merged"
        );

        board.ranked(self.limit)
    }
}
