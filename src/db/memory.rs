use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{ActorId, AffinityAction, TagId},
    services::recommendations::SocialGraph,
};

/// Social graph held in memory
///
/// Rows are kept in insertion order and every query answers in that order, so rankings
/// over a `MemoryGraph` are fully reproducible.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    friendships: Vec<(ActorId, ActorId)>,
    likes: Vec<AffinityAction>,
    post_tags: Vec<(ActorId, TagId)>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a friendship in both directions
    pub fn with_friendship(mut self, user: ActorId, friend: ActorId) -> Self {
        self.friendships.push((user, friend));
        self.friendships.push((friend, user));
        self
    }

    pub fn with_like(mut self, user: ActorId, post: ActorId) -> Self {
        self.likes.push(AffinityAction {
            actor: user,
            target: post,
        });
        self
    }

    pub fn with_post_tag(mut self, post: ActorId, tag: TagId) -> Self {
        self.post_tags.push((post, tag));
        self
    }
}

#[async_trait::async_trait]
impl SocialGraph for MemoryGraph {
    async fn get_direct_connections(&self, actor: ActorId) -> AppResult<Vec<ActorId>> {
        let mut seen = HashSet::new();
        Ok(self
            .friendships
            .iter()
            .filter(|(user, _)| *user == actor)
            .map(|(_, friend)| *friend)
            .filter(|friend| seen.insert(*friend))
            .collect())
    }

    async fn get_affinity_targets(&self, actor: ActorId) -> AppResult<Vec<ActorId>> {
        let mut seen = HashSet::new();
        Ok(self
            .likes
            .iter()
            .filter(|like| like.actor == actor)
            .map(|like| like.target)
            .filter(|post| seen.insert(*post))
            .collect())
    }

    async fn get_affinity_actions(&self, targets: &[ActorId]) -> AppResult<Vec<AffinityAction>> {
        Ok(self
            .likes
            .iter()
            .filter(|like| targets.contains(&like.target))
            .copied()
            .collect())
    }

    async fn get_tags_for_targets(&self, targets: &[ActorId]) -> AppResult<Vec<TagId>> {
        Ok(self
            .post_tags
            .iter()
            .filter(|(post, _)| targets.contains(post))
            .map(|(_, tag)| *tag)
            .collect())
    }

    async fn get_targets_by_tag(&self, tags: &[TagId]) -> AppResult<Vec<ActorId>> {
        Ok(self
            .post_tags
            .iter()
            .filter(|(_, tag)| tags.contains(tag))
            .map(|(post, _)| *post)
            .collect())
    }
}
