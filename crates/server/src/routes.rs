//! Router assembly.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use kaede_core::{Catalog, Sleeper, Transport};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Builds the API router over a shared catalog.
pub fn router<T, S>(catalog: Arc<Catalog<T, S>>) -> Router
where
    T: Transport + 'static,
    S: Sleeper + 'static,
{
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/home", get(handlers::home::<T, S>))
        .route("/api/complete", get(handlers::complete_redirect))
        .route("/api/complete/page/{page}", get(handlers::complete_page::<T, S>))
        .route("/api/ongoing", get(handlers::ongoing_redirect))
        .route("/api/ongoing/page/{page}", get(handlers::ongoing_page::<T, S>))
        .route("/api/anime-list", get(handlers::anime_list::<T, S>))
        .route("/api/search/{query}", get(handlers::search::<T, S>))
        .fallback(handlers::not_found)
        .with_state(catalog)
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
