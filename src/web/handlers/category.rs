//! Category handlers for the REST API.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::library::LibraryService;
use crate::web::dto::{
    ApiPath, ApiResponse, CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /api/categories - List categories with their channel IDs.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<CategoryResponse>>>, ApiError> {
    let categories = LibraryService::new(state.db.pool(), user.user_id())
        .list_categories()
        .await?;

    let responses = categories.into_iter().map(CategoryResponse::from).collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// POST /api/categories - Create a category.
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), ApiError> {
    let category = LibraryService::new(state.db.pool(), user.user_id())
        .create_category(&req.name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(CategoryResponse::from(category))),
    ))
}

/// PATCH /api/categories/:id - Rename a category.
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(req): ValidatedJson<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<CategoryResponse>>, ApiError> {
    let category = LibraryService::new(state.db.pool(), user.user_id())
        .rename_category(id, &req.name)
        .await?;

    Ok(Json(ApiResponse::new(CategoryResponse::from(category))))
}

/// DELETE /api/categories/:id - Delete a category. Its channels are kept.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    LibraryService::new(state.db.pool(), user.user_id())
        .delete_category(id)
        .await?;

    state.feeds.invalidate().await;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/categories/:id/channels/:channel_id - Move a channel into a category.
pub async fn assign_channel(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath((id, channel_id)): ApiPath<(i64, String)>,
) -> Result<StatusCode, ApiError> {
    LibraryService::new(state.db.pool(), user.user_id())
        .assign(id, &channel_id)
        .await?;

    state.feeds.invalidate().await;
    Ok(StatusCode::NO_CONTENT)
}
