use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Json, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use common::types::Health;
use service::BeerStore;

pub mod beers;

/// Shared handler state: the one store instance built at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BeerStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn BeerStore>) -> Self {
        Self { store }
    }
}

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Unsupported methods and unknown paths both answer 404. Beer routes also
/// register it for HEAD, which axum would otherwise serve from the GET handler.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let beer_routes = Router::new()
        .route("/beers", get(beers::list_beers).head(not_found).fallback(not_found))
        .route(
            "/beers/",
            get(beers::missing_name)
                .put(beers::missing_name)
                .delete(beers::missing_name)
                .head(not_found)
                .fallback(not_found),
        )
        .route(
            "/beers/:name",
            get(beers::get_beer)
                .put(beers::put_beer)
                .delete(beers::delete_beer)
                .head(not_found)
                .fallback(not_found),
        );

    Router::new()
        .route("/health", get(health))
        .merge(beer_routes)
        .fallback(not_found)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
