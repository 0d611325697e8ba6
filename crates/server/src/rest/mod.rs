pub mod calculate;
pub mod chat;
pub mod health;
pub mod search;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the REST API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/calculate_sentence", post(calculate::calculate_sentence))
        .route("/search_guidelines", post(search::search_guidelines))
        .route("/chat_turn", post(chat::chat_turn))
        .route("/openapi.json", get(crate::openapi::openapi_json))
}

/// The full application: router, permissive CORS (answers preflight
/// OPTIONS), and request tracing.
pub fn app(state: AppState) -> Router {
    api_router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
