use std::sync::Arc;

use tracing::debug;

use super::{
    combined::{CombinedScorer, ScoringWeights},
    signals::{AffinitySignal, CollaborativeSignal, FriendExpansionScorer, Signal, Subject},
    source::{GraphSource, SocialGraph},
};
use crate::{
    error::AppResult,
    models::{candidate_ids, ActorId, Candidate},
};

/// Per-signal output sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationLimits {
    pub friend_expansion_cap: usize,
    pub user_likes: usize,
    pub user_tags: usize,
    pub user_combined: usize,
    pub post_likes: usize,
    pub post_tags: usize,
    pub post_combined: usize,
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        Self {
            friend_expansion_cap: 15,
            user_likes: 10,
            user_tags: 15,
            user_combined: 15,
            post_likes: 10,
            post_tags: 10,
            post_combined: 10,
        }
    }
}

/// Ranked id lists produced by one pipeline run, one per source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rankings {
    pub direct: Vec<ActorId>,
    pub likes: Vec<ActorId>,
    pub tags: Vec<ActorId>,
    pub combined: Vec<ActorId>,
}

/// The scoring pipeline shared by user and post recommendations
///
/// A pipeline is a set of signals `{direct, collaborative, affinity}` plus the combined
/// view over them. The direct signal is primary when present; otherwise the collaborative
/// signal takes its place.
pub struct Pipeline {
    subject: Subject,
    direct: Option<Arc<dyn Signal>>,
    collaborative: Arc<dyn Signal>,
    affinity: Arc<dyn Signal>,
    combined: CombinedScorer,
}

impl Pipeline {
    pub fn new(
        subject: Subject,
        direct: Option<Arc<dyn Signal>>,
        collaborative: Arc<dyn Signal>,
        affinity: Arc<dyn Signal>,
        weights: ScoringWeights,
        combined_limit: usize,
    ) -> Self {
        let combined = match &direct {
            Some(direct) => CombinedScorer::new(
                direct.clone(),
                vec![collaborative.clone(), affinity.clone()],
                weights,
                combined_limit,
            ),
            None => CombinedScorer::new(
                collaborative.clone(),
                vec![affinity.clone()],
                weights,
                combined_limit,
            ),
        };

        Self {
            subject,
            direct,
            collaborative,
            affinity,
            combined,
        }
    }

    pub fn for_users(
        graph: Arc<dyn SocialGraph>,
        weights: ScoringWeights,
        limits: RecommendationLimits,
    ) -> Self {
        let friends = FriendExpansionScorer::new(
            GraphSource::new(graph.clone()),
            limits.friend_expansion_cap,
        );

        Self::new(
            Subject::Users,
            Some(Arc::new(friends) as Arc<dyn Signal>),
            Arc::new(CollaborativeSignal::new(
                graph.clone(),
                Subject::Users,
                limits.user_likes,
            )),
            Arc::new(AffinitySignal::new(graph, Subject::Users, limits.user_tags)),
            weights,
            limits.user_combined,
        )
    }

    pub fn for_posts(
        graph: Arc<dyn SocialGraph>,
        weights: ScoringWeights,
        limits: RecommendationLimits,
    ) -> Self {
        Self::new(
            Subject::Posts,
            None,
            Arc::new(CollaborativeSignal::new(
                graph.clone(),
                Subject::Posts,
                limits.post_likes,
            )),
            Arc::new(AffinitySignal::new(graph, Subject::Posts, limits.post_tags)),
            weights,
            limits.post_combined,
        )
    }

    /// Computes each signal once, in order, then merges them
    ///
    /// Signals are pure reads, so their order has no effect on the result; only the
    /// merge needs every input in hand.
    pub async fn rankings(&self, user_id: ActorId) -> AppResult<Rankings> {
        let direct = match &self.direct {
            Some(signal) => signal.score(user_id).await?,
            None => Vec::new(),
        };
        let likes = self.collaborative.score(user_id).await?;
        let tags = self.affinity.score(user_id).await?;

        let combined = if self.direct.is_some() {
            self.combined
                .merge(&direct, &[likes.as_slice(), tags.as_slice()])
        } else {
            self.combined.merge(&likes, &[tags.as_slice()])
        };

        debug!(
            user_id,
            subject = ?self.subject,
            direct = direct.len(),
            likes = likes.len(),
            tags = tags.len(),
            combined = combined.len(),
            "Pipeline rankings computed"
        );

        Ok(Rankings {
            direct: candidate_ids(&direct),
            likes: candidate_ids(&likes),
            tags: candidate_ids(&tags),
            combined: candidate_ids(&combined),
        })
    }

    /// The combined ranking with scores, computed from scratch
    pub async fn combined_scores(&self, user_id: ActorId) -> AppResult<Vec<Candidate>> {
        self.combined.score(user_id).await
    }
}
