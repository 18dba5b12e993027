//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::config::MAX_REPORT_BYTES;

/// Build the API router over a shared context.
pub fn api_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/catalog", get(endpoints::catalog::list))
        .route("/extract", post(endpoints::extract::run))
        .route("/reports", post(endpoints::reports::upload))
        .route("/reports/:report_id/markers", get(endpoints::reports::markers))
        .route("/users/:user_id/markers", get(endpoints::markers::history))
        .route("/users/:user_id/markers/latest", get(endpoints::markers::latest))
        .with_state(ctx);

    // Base64 inflates uploads by a third; the decoded size is checked per request.
    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_REPORT_BYTES * 2))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
