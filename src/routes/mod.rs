//! HTTP routes and router assembly

pub mod health;
pub mod upload;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
///
/// Static assets (the landing page) come from the configured public
/// directory as the fallback service, so GET / serves index.html.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_dir = state.config().server.public_dir.clone();

    Router::new()
        .merge(health::router())
        .merge(upload::router())
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
