//! Channel handlers for the REST API.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::library::{LibraryService, NewChannel};
use crate::web::dto::{AddChannelRequest, ApiPath, ApiResponse, ChannelResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;
use crate::youtube::looks_like_channel_url;
use crate::ShelfError;

/// GET /api/channels - List the user's channels.
pub async fn list_channels(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<ChannelResponse>>>, ApiError> {
    let channels = LibraryService::new(state.db.pool(), user.user_id())
        .list_channels()
        .await?;

    let responses = channels.into_iter().map(ChannelResponse::from).collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// POST /api/channels - Resolve and add a channel.
pub async fn add_channel(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<AddChannelRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ChannelResponse>>), ApiError> {
    let input = req.url.trim();

    // Bare handles like "@name" go straight to the resolver
    if input.starts_with("http") && !looks_like_channel_url(input) {
        return Err(ApiError::invalid("Not a YouTube channel URL"));
    }

    let resolved = state
        .resolver
        .resolve(input)
        .await
        .map_err(ShelfError::from)?;

    let channel = LibraryService::new(state.db.pool(), user.user_id())
        .add_channel(&NewChannel::from(resolved), req.category_id)
        .await?;

    state.feeds.invalidate().await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(ChannelResponse::from(channel))),
    ))
}

/// DELETE /api/channels/:channel_id - Remove a channel.
pub async fn remove_channel(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(channel_id): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    LibraryService::new(state.db.pool(), user.user_id())
        .remove_channel(&channel_id)
        .await?;

    state.feeds.invalidate().await;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/channels/:channel_id/category - Take a channel out of its category.
pub async fn unassign_channel(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(channel_id): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    LibraryService::new(state.db.pool(), user.user_id())
        .unassign(&channel_id)
        .await?;

    state.feeds.invalidate().await;
    Ok(StatusCode::NO_CONTENT)
}
