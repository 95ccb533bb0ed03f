//! Route handlers.
//!
//! Every handler runs one pipeline call and wraps the outcome in an
//! [`Envelope`]. Pipeline errors become HTTP 500 with the error text under
//! `meta.error`; nothing is retried above the fetcher.

use std::any::Any;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use kaede_core::formatters::responses;
use kaede_core::{CardKind, Catalog, Envelope, KaedeError, Sleeper, Transport, parse_page};
use serde::Serialize;
use serde_json::json;

/// Shared pipeline handle.
pub type SharedCatalog<T, S> = State<Arc<Catalog<T, S>>>;

fn success<T: Serialize>(envelope: Envelope<T>) -> Response {
    (StatusCode::OK, Json(envelope)).into_response()
}

fn failure(envelope: Envelope<()>, err: &KaedeError) -> Response {
    tracing::error!("{}: {}", envelope.message, err);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(envelope)).into_response()
}

fn redirect_to(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// `GET /`
pub async fn index() -> Response {
    Json(json!({
        "message": "Welcome To Unofficial Otakudesu REST API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "home": "/api/home",
            "complete": "/api/complete/page/:page",
            "ongoing": "/api/ongoing/page/:page",
            "animeList": "/api/anime-list",
            "search": "/api/search/:query",
        },
    }))
    .into_response()
}

/// `GET /api/home`
pub async fn home<T: Transport, S: Sleeper>(State(catalog): SharedCatalog<T, S>) -> Response {
    match catalog.home().await {
        Ok(lists) => success(responses::home(lists, &catalog.home_url())),
        Err(err) => failure(Envelope::error("Failed to fetch homepage data", &err), &err),
    }
}

/// `GET /api/complete`
pub async fn complete_redirect() -> Response {
    redirect_to("/api/complete/page/1")
}

/// `GET /api/ongoing`
pub async fn ongoing_redirect() -> Response {
    redirect_to("/api/ongoing/page/1")
}

async fn listing<T: Transport, S: Sleeper>(catalog: &Catalog<T, S>, kind: CardKind, raw_page: &str) -> Response {
    let page = parse_page(raw_page);

    match catalog.listing(kind, page).await {
        Ok(cards) => success(responses::listing(kind, cards, page, &catalog.listing_url(kind, page))),
        Err(err) => failure(Envelope::error(responses::listing_error_message(kind), &err), &err),
    }
}

/// `GET /api/complete/page/{page}`
pub async fn complete_page<T: Transport, S: Sleeper>(
    State(catalog): SharedCatalog<T, S>, Path(page): Path<String>,
) -> Response {
    listing(&catalog, CardKind::Complete, &page).await
}

/// `GET /api/ongoing/page/{page}`
pub async fn ongoing_page<T: Transport, S: Sleeper>(
    State(catalog): SharedCatalog<T, S>, Path(page): Path<String>,
) -> Response {
    listing(&catalog, CardKind::Ongoing, &page).await
}

/// `GET /api/anime-list`
pub async fn anime_list<T: Transport, S: Sleeper>(State(catalog): SharedCatalog<T, S>) -> Response {
    match catalog.anime_list().await {
        Ok(entries) => success(responses::anime_list(entries, &catalog.anime_list_url())),
        Err(err) => failure(
            Envelope::error("Failed to fetch anime list", &err).with_meta("tip", "Try again in a few moments"),
            &err,
        ),
    }
}

/// `GET /api/search/{query}`
pub async fn search<T: Transport, S: Sleeper>(
    State(catalog): SharedCatalog<T, S>, Path(query): Path<String>,
) -> Response {
    match catalog.search(&query).await {
        Ok(found) => success(responses::search(found)),
        Err(err) => failure(
            Envelope::error("Failed to search anime", &err)
                .with_meta("query", kaede_core::aggregate::normalize_query(&query)),
            &err,
        ),
    }
}

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "not found",
            "message": "Endpoint not found. See GET / for the list of available endpoints",
        })),
    )
        .into_response()
}

/// Turns a handler panic into a JSON 500.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Internal server error".to_string()
    };

    tracing::error!("handler panicked: {}", message);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "status": "error", "message": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_panic_with_str_payload() {
        let response = panic_response(Box::new("index out of bounds"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "index out of bounds");
    }

    #[tokio::test]
    async fn test_panic_with_string_payload() {
        let response = panic_response(Box::new(format!("bad page {}", 7)));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "bad page 7");
    }

    #[tokio::test]
    async fn test_panic_with_opaque_payload() {
        let json = body_json(panic_response(Box::new(42u8))).await;
        assert_eq!(json["message"], "Internal server error");
    }
}
