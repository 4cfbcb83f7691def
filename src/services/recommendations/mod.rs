//! Recommendation engine suggesting users and posts to a given user.
//!
//! Three scoring strategies feed every request: friend-graph expansion, "liked together"
//! collaborative counts and shared-tag affinity. Their outputs are merged with fixed integer
//! weights and then selected into a final de-duplicated list, either by per-source quotas
//! (users, whole post list) or by round-robin batches (paginated post feed).
//!
//! Everything is computed fresh per request from read-only queries; nothing is cached.
use std::sync::Arc;

use tracing::instrument;

use crate::{error::AppResult, models::ActorId};

pub mod combined;
pub mod interleave;
pub mod pipeline;
pub mod selector;
pub mod signals;
pub mod source;

pub use combined::{CombinedScorer, ScoringWeights};
pub use interleave::BatchInterleaver;
pub use pipeline::{Pipeline, Rankings, RecommendationLimits};
pub use selector::{Quota, QuotaSelector, QuotaStep};
pub use signals::{AffinitySignal, CollaborativeSignal, FriendExpansionScorer, Signal, Subject};
pub use source::{GraphSource, SocialGraph};

pub const DEFAULT_USER_TOP_N: usize = 15;
pub const DEFAULT_POST_BATCH_SIZE: usize = 20;

/// Entry points used by the profile and feed layers
pub struct Recommender {
    users: Pipeline,
    posts: Pipeline,
}

impl Recommender {
    pub fn new(
        graph: Arc<dyn SocialGraph>,
        weights: ScoringWeights,
        limits: RecommendationLimits,
    ) -> Self {
        Self {
            users: Pipeline::for_users(graph.clone(), weights, limits),
            posts: Pipeline::for_posts(graph, weights, limits),
        }
    }

    /// Users to suggest to `user_id`, selected by per-source quotas
    #[instrument(skip(self))]
    pub async fn recommend_users(&self, user_id: ActorId, top_n: usize) -> AppResult<Vec<ActorId>> {
        let rankings = self.users.rankings(user_id).await?;

        let picked = QuotaSelector::pick_top(
            &rankings.direct,
            &rankings.likes,
            &rankings.tags,
            &rankings.combined,
            top_n,
        );

        tracing::info!(
            friends = rankings.direct.len(),
            likes = rankings.likes.len(),
            tags = rankings.tags.len(),
            combined = rankings.combined.len(),
            picked = picked.len(),
            "User recommendations selected"
        );

        Ok(picked)
    }

    /// Post feed as lazy batches interleaving combined, likes and tags rankings
    #[instrument(skip(self))]
    pub async fn recommend_posts(
        &self,
        user_id: ActorId,
        batch_size: usize,
        limit: Option<usize>,
    ) -> AppResult<BatchInterleaver> {
        let rankings = self.posts.rankings(user_id).await?;

        tracing::info!(
            likes = rankings.likes.len(),
            tags = rankings.tags.len(),
            combined = rankings.combined.len(),
            "Post feed prepared"
        );

        Ok(BatchInterleaver::new(
            vec![rankings.combined, rankings.likes, rankings.tags],
            batch_size,
            limit,
        ))
    }

    /// Whole post list in one go: likes, then tags, then combined
    #[instrument(skip(self))]
    pub async fn recommend_posts_all(
        &self,
        user_id: ActorId,
        limit: Option<usize>,
    ) -> AppResult<Vec<ActorId>> {
        let rankings = self.posts.rankings(user_id).await?;

        let ordered =
            QuotaSelector::order_all(&rankings.likes, &rankings.tags, &rankings.combined, limit);

        tracing::info!(posts = ordered.len(), "Post recommendations ordered");

        Ok(ordered)
    }
}
