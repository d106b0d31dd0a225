use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod recommendations;
pub mod state;

pub use state::AppState;

/// Creates the application router with all routes
///
/// Every request gets a request ID and a tracing span; CORS is layered on by
/// the caller since allowed origins are deployment configuration.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum::middleware::from_fn(request_id_middleware))
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/recommendations/places/nearby",
            get(recommendations::nearby_places),
        )
        .route(
            "/recommendations/places/:place_id",
            get(recommendations::place_details),
        )
        .route("/recommendations/restaurants", get(recommendations::restaurants))
        .route("/recommendations/activities", get(recommendations::activities))
        .route("/recommendations/weather", get(recommendations::weather))
        .route(
            "/recommendations/personalized",
            post(recommendations::personalized),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "barabula-api",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
