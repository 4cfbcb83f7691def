//! Read-only access to the persisted social graph.
//!
//! The recommendation core never talks to storage directly. Every scorer receives a
//! [`SocialGraph`] at construction and issues only the idempotent reads below, so any
//! backend (PostgreSQL, in-memory fixtures, mocks) can be plugged in.
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{ActorId, AffinityAction, TagId},
};

/// Data-source capability consumed by the recommendation core
///
/// No operation validates that an actor exists: unknown ids simply yield empty results.
/// The only failure surfaced is the backend itself failing, which callers propagate as-is.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SocialGraph: Send + Sync {
    /// Actors directly connected to `actor` (set semantics)
    async fn get_direct_connections(&self, actor: ActorId) -> AppResult<Vec<ActorId>>;

    /// Connections of `actor`'s direct connections, excluding `actor` itself
    ///
    /// Returns a multiset: a candidate appears once per direct connection that reaches it.
    /// The default implementation expands [`SocialGraph::get_direct_connections`]; backends
    /// with a join available should override it.
    async fn get_second_degree_connections(&self, actor: ActorId) -> AppResult<Vec<ActorId>> {
        let mut reached = Vec::new();
        for friend in self.get_direct_connections(actor).await? {
            let connections = self.get_direct_connections(friend).await?;
            reached.extend(connections.into_iter().filter(|&id| id != actor));
        }
        Ok(reached)
    }

    /// Targets `actor` performed the affinity action on (set semantics)
    async fn get_affinity_targets(&self, actor: ActorId) -> AppResult<Vec<ActorId>>;

    /// Every affinity action recorded against any of `targets`
    async fn get_affinity_actions(&self, targets: &[ActorId]) -> AppResult<Vec<AffinityAction>>;

    /// Tags attached to any of `targets`, once per (target, tag) pair
    async fn get_tags_for_targets(&self, targets: &[ActorId]) -> AppResult<Vec<TagId>>;

    /// Targets carrying any of `tags`, once per matching (target, tag) pair
    async fn get_targets_by_tag(&self, tags: &[TagId]) -> AppResult<Vec<ActorId>>;
}

/// First- and second-degree view over the friendship relation
#[derive(Clone)]
pub struct GraphSource {
    graph: Arc<dyn SocialGraph>,
}

impl GraphSource {
    pub fn new(graph: Arc<dyn SocialGraph>) -> Self {
        Self { graph }
    }

    pub async fn direct(&self, user_id: ActorId) -> AppResult<Vec<ActorId>> {
        self.graph.get_direct_connections(user_id).await
    }

    pub async fn second_degree(&self, user_id: ActorId) -> AppResult<Vec<ActorId>> {
        self.graph.get_second_degree_connections(user_id).await
    }
}

/// Removes repeated ids while keeping first occurrences in place
pub(crate) fn distinct(ids: impl IntoIterator<Item = ActorId>) -> Vec<ActorId> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryGraph;

    #[tokio::test]
    async fn test_second_degree_keeps_multiplicity() {
        // 1 - 2, 1 - 3, 2 - 4, 3 - 4, 3 - 5
        let graph = MemoryGraph::new()
            .with_friendship(1, 2)
            .with_friendship(1, 3)
            .with_friendship(2, 4)
            .with_friendship(3, 4)
            .with_friendship(3, 5);
        let source = GraphSource::new(Arc::new(graph));

        let mut reached = source.second_degree(1).await.unwrap();
        reached.sort_unstable();

        assert_eq!(reached, vec![4, 4, 5]);
    }

    #[tokio::test]
    async fn test_unknown_user_has_no_connections() {
        let source = GraphSource::new(Arc::new(MemoryGraph::new()));

        assert!(source.direct(99).await.unwrap().is_empty());
        assert!(source.second_degree(99).await.unwrap().is_empty());
    }

    #[test]
    fn test_distinct_preserves_first_occurrence() {
        assert_eq!(distinct(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
