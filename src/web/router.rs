//! Router configuration for the REST API.

use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    add_channel, assign_channel, category_feed, create_category, delete_category, get_feed,
    list_categories, list_channels, refresh_feed, remove_channel, unassign_channel,
    uncategorized_feed, update_category, AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    let channel_routes = Router::new()
        .route("/", get(list_channels).post(add_channel))
        .route("/:channel_id", delete(remove_channel))
        .route("/:channel_id/category", delete(unassign_channel));

    let category_routes = Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", patch(update_category).delete(delete_category))
        .route("/:id/channels/:channel_id", put(assign_channel))
        .route("/:id/feed", get(category_feed));

    let feed_routes = Router::new()
        .route("/", get(get_feed))
        .route("/uncategorized", get(uncategorized_feed))
        .route("/refresh", post(refresh_feed));

    let api_routes = Router::new()
        .nest("/channels", channel_routes)
        .nest("/categories", category_routes)
        .nest("/feed", feed_routes);

    let jwt_state_for_middleware = jwt_state.clone();

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
