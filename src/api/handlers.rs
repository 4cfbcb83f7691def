use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::ActorId,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct UserRecommendationQuery {
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserRecommendationResponse {
    pub user_id: ActorId,
    pub recommendations: Vec<ActorId>,
}

#[derive(Debug, Deserialize)]
pub struct PostFeedQuery {
    pub batch_size: Option<usize>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub page: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostFeedResponse {
    pub user_id: ActorId,
    pub page: usize,
    pub posts: Vec<ActorId>,
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostListResponse {
    pub user_id: ActorId,
    pub posts: Vec<ActorId>,
}

fn require_positive(name: &str, value: usize) -> AppResult<usize> {
    if value == 0 {
        return Err(AppError::InvalidInput(format!("{} must be positive", name)));
    }
    Ok(value)
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Users to suggest on a profile page
pub async fn recommend_users(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<ActorId>,
    Query(params): Query<UserRecommendationQuery>,
) -> AppResult<Json<UserRecommendationResponse>> {
    let top_n = require_positive("top_n", params.top_n.unwrap_or(state.defaults.user_top_n))?;

    tracing::info!(
        request_id = %request_id,
        user_id,
        top_n,
        "Processing user recommendation request"
    );

    let recommendations = state.recommender.recommend_users(user_id, top_n).await?;

    Ok(Json(UserRecommendationResponse {
        user_id,
        recommendations,
    }))
}

/// One page of the post feed
///
/// Every call rebuilds the interleaved feed from scratch and skips to the requested page.
pub async fn recommend_posts(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<ActorId>,
    Query(params): Query<PostFeedQuery>,
) -> AppResult<Json<PostFeedResponse>> {
    let batch_size = require_positive(
        "batch_size",
        params.batch_size.unwrap_or(state.defaults.post_batch_size),
    )?;

    tracing::info!(
        request_id = %request_id,
        user_id,
        batch_size,
        limit = ?params.limit,
        page = params.page,
        "Processing post feed request"
    );

    let mut batches = state
        .recommender
        .recommend_posts(user_id, batch_size, params.limit)
        .await?
        .skip(params.page);

    let posts = batches.next().unwrap_or_default();
    let has_more = batches.next().is_some();

    Ok(Json(PostFeedResponse {
        user_id,
        page: params.page,
        posts,
        has_more,
    }))
}

/// Full ordered post list, optionally limited
pub async fn recommend_posts_all(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<ActorId>,
    Query(params): Query<PostListQuery>,
) -> AppResult<Json<PostListResponse>> {
    tracing::info!(
        request_id = %request_id,
        user_id,
        limit = ?params.limit,
        "Processing post list request"
    );

    let posts = state
        .recommender
        .recommend_posts_all(user_id, params.limit)
        .await?;

    Ok(Json(PostListResponse { user_id, posts }))
}
