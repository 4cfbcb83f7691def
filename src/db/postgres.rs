use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    error::AppResult,
    models::{ActorId, AffinityAction, TagId},
    services::recommendations::SocialGraph,
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Social graph backed by the `friendship`, `likes` and `post_tags` tables
///
/// Rows come back ordered by their natural keys, and scorers keep first-seen order on
/// equal scores. Friend expansion ties therefore follow the intermediate friend id and
/// collaborative ties follow the liked post id, not the candidate's own id.
#[derive(Clone)]
pub struct PgSocialGraph {
    pool: PgPool,
}

impl PgSocialGraph {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SocialGraph for PgSocialGraph {
    async fn get_direct_connections(&self, actor: ActorId) -> AppResult<Vec<ActorId>> {
        let friends = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT friend_id::BIGINT
            FROM friendship
            WHERE user_id = $1
            ORDER BY friend_id
            "#,
        )
        .bind(actor)
        .fetch_all(&self.pool)
        .await?;

        Ok(friends)
    }

    async fn get_second_degree_connections(&self, actor: ActorId) -> AppResult<Vec<ActorId>> {
        let reached = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT f2.friend_id::BIGINT
            FROM friendship f1
            JOIN friendship f2 ON f1.friend_id = f2.user_id
            WHERE f1.user_id = $1 AND f2.friend_id <> $1
            ORDER BY f1.friend_id, f2.friend_id
            "#,
        )
        .bind(actor)
        .fetch_all(&self.pool)
        .await?;

        Ok(reached)
    }

    async fn get_affinity_targets(&self, actor: ActorId) -> AppResult<Vec<ActorId>> {
        let posts = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT post_id::BIGINT
            FROM likes
            WHERE user_id = $1
            ORDER BY post_id
            "#,
        )
        .bind(actor)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn get_affinity_actions(&self, targets: &[ActorId]) -> AppResult<Vec<AffinityAction>> {
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT user_id::BIGINT, post_id::BIGINT
            FROM likes
            WHERE post_id = ANY($1)
            ORDER BY post_id, user_id
            "#,
        )
        .bind(targets)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(actor, target)| AffinityAction { actor, target })
            .collect())
    }

    async fn get_tags_for_targets(&self, targets: &[ActorId]) -> AppResult<Vec<TagId>> {
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let tags = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT tag_id::BIGINT
            FROM post_tags
            WHERE post_id = ANY($1)
            ORDER BY post_id, tag_id
            "#,
        )
        .bind(targets)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    async fn get_targets_by_tag(&self, tags: &[TagId]) -> AppResult<Vec<ActorId>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let posts = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT post_id::BIGINT
            FROM post_tags
            WHERE tag_id = ANY($1)
            ORDER BY post_id, tag_id
            "#,
        )
        .bind(tags)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }
}
