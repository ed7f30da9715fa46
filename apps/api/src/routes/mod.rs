pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::document::handlers;
use crate::state::AppState;
use crate::templates::handlers as template_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Template Registry
        .route(
            "/api/v1/templates",
            get(template_handlers::handle_list_templates),
        )
        .route(
            "/api/v1/templates/:id",
            get(template_handlers::handle_get_template),
        )
        // Document sessions
        .route(
            "/api/v1/cover-letters/:id",
            put(handlers::handle_load)
                .get(handlers::handle_get)
                .delete(handlers::handle_close),
        )
        .route("/api/v1/cover-letters/:id/audit", get(handlers::handle_audit))
        .route(
            "/api/v1/cover-letters/:id/changes",
            get(handlers::handle_changes),
        )
        .route(
            "/api/v1/cover-letters/:id/selection",
            put(handlers::handle_select),
        )
        .route("/api/v1/cover-letters/:id/mode", put(handlers::handle_set_mode))
        // Blocks
        .route(
            "/api/v1/cover-letters/:id/blocks",
            post(handlers::handle_add_block),
        )
        .route(
            "/api/v1/cover-letters/:id/blocks/:block_id",
            patch(handlers::handle_update_block).delete(handlers::handle_remove_block),
        )
        .route(
            "/api/v1/cover-letters/:id/blocks/:block_id/layout",
            patch(handlers::handle_update_layout),
        )
        .route(
            "/api/v1/cover-letters/:id/blocks/:block_id/duplicate",
            post(handlers::handle_duplicate_block),
        )
        .route(
            "/api/v1/cover-letters/:id/blocks/:block_id/move",
            post(handlers::handle_move_block),
        )
        .route(
            "/api/v1/cover-letters/:id/blocks/:block_id/resize",
            post(handlers::handle_resize_block),
        )
        .route(
            "/api/v1/cover-letters/:id/reorder",
            post(handlers::handle_reorder),
        )
        // Templates and layout
        .route(
            "/api/v1/cover-letters/:id/template",
            post(handlers::handle_apply_template),
        )
        .route(
            "/api/v1/cover-letters/:id/structure",
            put(handlers::handle_update_structure),
        )
        .route(
            "/api/v1/cover-letters/:id/layout/regenerate",
            post(handlers::handle_regenerate_layout),
        )
        .route("/api/v1/cover-letters/:id/reset", post(handlers::handle_reset))
        .with_state(state)
}
