use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::source::{distinct, GraphSource, SocialGraph};
use crate::{
    error::AppResult,
    models::{ActorId, Candidate, ScoreBoard},
};

/// Which kind of entity a pipeline ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Users,
    Posts,
}

/// A single scoring strategy producing ranked candidates for a user
#[async_trait::async_trait]
pub trait Signal: Send + Sync {
    /// Ranked candidates, highest score first
    async fn score(&self, user_id: ActorId) -> AppResult<Vec<Candidate>>;

    /// Signal name for logging
    fn name(&self) -> &'static str;
}

/// Friend-of-friend candidates ranked by mutual connection count
pub struct FriendExpansionScorer {
    source: GraphSource,
    cap: usize,
}

impl FriendExpansionScorer {
    pub fn new(source: GraphSource, cap: usize) -> Self {
        Self { source, cap }
    }
}

#[async_trait::async_trait]
impl Signal for FriendExpansionScorer {
    async fn score(&self, user_id: ActorId) -> AppResult<Vec<Candidate>> {
        let direct: HashSet<ActorId> = self.source.direct(user_id).await?.into_iter().collect();
        let reached = self.source.second_degree(user_id).await?;

        let board = ScoreBoard::count(
            reached
                .into_iter()
                .filter(|id| *id != user_id && !direct.contains(id)),
        );

        debug!(
            user_id,
            direct = direct.len(),
            candidates = board.len(),
            "Friend expansion scored"
        );

        Ok(board.ranked(self.cap))
    }

    fn name(&self) -> &'static str {
        "friends"
    }
}

/// "Liked together" signal
///
/// For users, ranks other actors by how many of the user's liked targets they also liked.
/// For posts, ranks the user's liked targets by how many other actors liked them too.
pub struct CollaborativeSignal {
    graph: Arc<dyn SocialGraph>,
    subject: Subject,
    limit: usize,
}

impl CollaborativeSignal {
    pub fn new(graph: Arc<dyn SocialGraph>, subject: Subject, limit: usize) -> Self {
        Self {
            graph,
            subject,
            limit,
        }
    }
}

#[async_trait::async_trait]
impl Signal for CollaborativeSignal {
    async fn score(&self, user_id: ActorId) -> AppResult<Vec<Candidate>> {
        let liked = self.graph.get_affinity_targets(user_id).await?;
        if liked.is_empty() {
            return Ok(Vec::new());
        }

        let actions = self.graph.get_affinity_actions(&liked).await?;
        let others = actions.into_iter().filter(|action| action.actor != user_id);

        let board = match self.subject {
            Subject::Users => ScoreBoard::count(others.map(|action| action.actor)),
            Subject::Posts => ScoreBoard::count(others.map(|action| action.target)),
        };

        debug!(
            user_id,
            subject = ?self.subject,
            liked = liked.len(),
            candidates = board.len(),
            "Collaborative signal scored"
        );

        Ok(board.ranked(self.limit))
    }

    fn name(&self) -> &'static str {
        "likes"
    }
}

/// Shared-tag signal over the tags of the user's liked targets
///
/// Posts carrying those tags are scored by the number of matching tags, skipping posts the
/// user already liked. Users are scored by likes on those posts, each like weighted by the
/// post's matching tag count; friendship plays no part in this signal.
pub struct AffinitySignal {
    graph: Arc<dyn SocialGraph>,
    subject: Subject,
    limit: usize,
}

impl AffinitySignal {
    pub fn new(graph: Arc<dyn SocialGraph>, subject: Subject, limit: usize) -> Self {
        Self {
            graph,
            subject,
            limit,
        }
    }
}

#[async_trait::async_trait]
impl Signal for AffinitySignal {
    async fn score(&self, user_id: ActorId) -> AppResult<Vec<Candidate>> {
        let liked = self.graph.get_affinity_targets(user_id).await?;
        if liked.is_empty() {
            return Ok(Vec::new());
        }

        let tags = distinct(self.graph.get_tags_for_targets(&liked).await?);
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let matches = self.graph.get_targets_by_tag(&tags).await?;

        let board = match self.subject {
            Subject::Posts => {
                let liked: HashSet<ActorId> = liked.into_iter().collect();
                ScoreBoard::count(matches.into_iter().filter(|id| !liked.contains(id)))
            }
            Subject::Users => {
                let overlap = ScoreBoard::count(matches.iter().copied());
                let targets = distinct(matches);
                let actions = self.graph.get_affinity_actions(&targets).await?;

                let mut board = ScoreBoard::new();
                for action in actions.into_iter().filter(|a| a.actor != user_id) {
                    board.add(action.actor, overlap.score(action.target).unwrap_or(0));
                }
                board
            }
        };

        debug!(
            user_id,
            subject = ?self.subject,
            tags = tags.len(),
            candidates = board.len(),
            "Affinity signal scored"
        );

        Ok(board.ranked(self.limit))
    }

    fn name(&self) -> &'static str {
        "tags"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryGraph;

    /// Users 1-4 liking posts 100-102; tags 10 and 11 spread over posts 100-103
    fn liking_graph() -> Arc<dyn SocialGraph> {
        Arc::new(
            MemoryGraph::new()
                .with_like(1, 100)
                .with_like(1, 101)
                .with_like(2, 100)
                .with_like(2, 101)
                .with_like(3, 100)
                .with_like(4, 102)
                .with_post_tag(100, 10)
                .with_post_tag(101, 11)
                .with_post_tag(102, 10)
                .with_post_tag(102, 11)
                .with_post_tag(103, 11),
        )
    }

    #[tokio::test]
    async fn test_friend_expansion_excludes_friends_and_self() {
        let graph = MemoryGraph::new()
            .with_friendship(1, 2)
            .with_friendship(1, 3)
            .with_friendship(2, 4)
            .with_friendship(2, 3)
            .with_friendship(3, 4)
            .with_friendship(3, 5);
        let scorer = FriendExpansionScorer::new(GraphSource::new(Arc::new(graph)), 15);

        let ranked = scorer.score(1).await.unwrap();

        assert_eq!(ranked, vec![Candidate::new(4, 2), Candidate::new(5, 1)]);
    }

    #[tokio::test]
    async fn test_friend_expansion_respects_cap() {
        let graph = MemoryGraph::new()
            .with_friendship(1, 2)
            .with_friendship(2, 3)
            .with_friendship(2, 4)
            .with_friendship(2, 5);
        let scorer = FriendExpansionScorer::new(GraphSource::new(Arc::new(graph)), 2);

        let ranked = scorer.score(1).await.unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0], Candidate::new(3, 1));
    }

    #[tokio::test]
    async fn test_friend_expansion_ties_follow_friend_order() {
        let graph = MemoryGraph::new()
            .with_friendship(1, 3)
            .with_friendship(1, 2)
            .with_friendship(3, 9)
            .with_friendship(2, 8);
        let scorer = FriendExpansionScorer::new(GraphSource::new(Arc::new(graph)), 15);

        let ranked = scorer.score(1).await.unwrap();

        assert_eq!(ranked, vec![Candidate::new(9, 1), Candidate::new(8, 1)]);
    }

    #[tokio::test]
    async fn test_collaborative_users_counts_shared_likes() {
        let signal = CollaborativeSignal::new(liking_graph(), Subject::Users, 10);

        let ranked = signal.score(1).await.unwrap();

        assert_eq!(ranked, vec![Candidate::new(2, 2), Candidate::new(3, 1)]);
    }

    #[tokio::test]
    async fn test_collaborative_posts_counts_other_likers() {
        let signal = CollaborativeSignal::new(liking_graph(), Subject::Posts, 10);

        let ranked = signal.score(1).await.unwrap();

        assert_eq!(ranked, vec![Candidate::new(100, 2), Candidate::new(101, 1)]);
    }

    #[tokio::test]
    async fn test_collaborative_without_likes_is_empty() {
        let signal = CollaborativeSignal::new(liking_graph(), Subject::Users, 10);
        assert!(signal.score(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_affinity_posts_skip_liked_posts() {
        let signal = AffinitySignal::new(liking_graph(), Subject::Posts, 10);

        let ranked = signal.score(1).await.unwrap();

        assert_eq!(ranked, vec![Candidate::new(102, 2), Candidate::new(103, 1)]);
    }

    #[tokio::test]
    async fn test_affinity_users_weight_likes_by_tag_overlap() {
        let signal = AffinitySignal::new(liking_graph(), Subject::Users, 15);

        let ranked = signal.score(1).await.unwrap();

        // user 4 liked only post 102, which matches both tags
        assert_eq!(
            ranked,
            vec![
                Candidate::new(2, 2),
                Candidate::new(4, 2),
                Candidate::new(3, 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_affinity_users_keep_existing_friends() {
        let graph = MemoryGraph::new()
            .with_friendship(1, 2)
            .with_like(1, 100)
            .with_like(2, 101)
            .with_post_tag(100, 10)
            .with_post_tag(101, 10);
        let signal = AffinitySignal::new(Arc::new(graph), Subject::Users, 15);

        let ranked = signal.score(1).await.unwrap();

        assert_eq!(ranked, vec![Candidate::new(2, 1)]);
    }

    #[tokio::test]
    async fn test_affinity_without_tags_is_empty() {
        let graph = Arc::new(MemoryGraph::new().with_like(1, 100).with_like(2, 100));
        let signal = AffinitySignal::new(graph, Subject::Posts, 10);

        assert!(signal.score(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_affinity_limit_truncates() {
        let signal = AffinitySignal::new(liking_graph(), Subject::Users, 1);

        let ranked = signal.score(1).await.unwrap();

        assert_eq!(ranked, vec![Candidate::new(2, 2)]);
    }
}
