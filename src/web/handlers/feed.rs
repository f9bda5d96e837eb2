//! Feed handlers for the REST API.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::library::LibraryService;
use crate::web::dto::{ApiPath, ApiQuery, ApiResponse, FeedQuery, VideoResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;
use crate::youtube::Video;

type FeedResult = Result<Json<ApiResponse<Vec<VideoResponse>>>, ApiError>;

fn feed_response(videos: Vec<Video>) -> Json<ApiResponse<Vec<VideoResponse>>> {
    Json(ApiResponse::new(
        videos.into_iter().map(VideoResponse::from).collect(),
    ))
}

/// GET /api/feed?channelIds=a,b - Merged feed for an explicit channel set.
pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiQuery(query): ApiQuery<FeedQuery>,
) -> FeedResult {
    let ids = query.ids();
    if ids.is_empty() {
        return Err(ApiError::invalid("channelIds is required"));
    }

    let videos = state.feeds.videos_for(&ids).await?;
    Ok(feed_response(videos))
}

/// GET /api/categories/:id/feed - Merged feed of a category's channels.
pub async fn category_feed(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> FeedResult {
    let ids = LibraryService::new(state.db.pool(), user.user_id())
        .category_channel_ids(id)
        .await?;

    let videos = state.feeds.videos_for_optional(&ids).await?;
    Ok(feed_response(videos))
}

/// GET /api/feed/uncategorized - Merged feed of channels without a category.
pub async fn uncategorized_feed(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> FeedResult {
    let ids = LibraryService::new(state.db.pool(), user.user_id())
        .uncategorized_channel_ids()
        .await?;

    let videos = state.feeds.videos_for_optional(&ids).await?;
    Ok(feed_response(videos))
}

/// POST /api/feed/refresh - Drop every cached feed.
pub async fn refresh_feed(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> StatusCode {
    state.feeds.invalidate().await;
    StatusCode::NO_CONTENT
}
