pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::skills::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Boards
        .route("/api/v1/boards", post(handlers::handle_create_board))
        .route(
            "/api/v1/boards/:id",
            get(handlers::handle_get_board).delete(handlers::handle_delete_board),
        )
        .route(
            "/api/v1/boards/:id/generate",
            post(handlers::handle_generate),
        )
        .route(
            "/api/v1/boards/:id/selection",
            get(handlers::handle_selection),
        )
        .route("/api/v1/boards/:id/mirror", get(handlers::handle_mirror))
        // Recommended pool
        .route(
            "/api/v1/boards/:id/recommended",
            delete(handlers::handle_clear_recommended).patch(handlers::handle_edit),
        )
        .route(
            "/api/v1/boards/:id/recommended/toggle",
            post(handlers::handle_toggle),
        )
        .route(
            "/api/v1/boards/:id/recommended/selected",
            delete(handlers::handle_remove_selected),
        )
        // Custom pool
        .route("/api/v1/boards/:id/custom", post(handlers::handle_add_custom))
        .route(
            "/api/v1/boards/:id/custom/:skill_id",
            delete(handlers::handle_remove_custom),
        )
        .with_state(state)
}
