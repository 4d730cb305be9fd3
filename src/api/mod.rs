//! API layer - HTTP handlers and routing
//!
//! This module contains the HTTP endpoints of the Jadwal service:
//! - Session status endpoints (single and batch)
//! - CSV report export
//! - Site info

pub mod common;
pub mod middleware;
pub mod reports;
pub mod responses;
pub mod site;
pub mod status;


use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use middleware::{ApiError, AppState, RequestStats, NO_CACHE};

/// Build the main API router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .route("/status", get(status::get_status))
        .route("/status/batch", post(status::batch_status))
        .route("/reports/sessions.csv", post(reports::sessions_csv))
        .route("/site/info", get(site::get_site_info))
        // Every response here depends on the current instant
        .route_layer(axum_middleware::from_fn(middleware::no_store_headers))
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(_) => {
            tracing::warn!("Invalid CORS origin '{}', allowing any origin", cors_origin);
            CorsLayer::new().allow_origin(Any)
        }
    }
    .allow_methods([Method::GET, Method::POST])
    .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .nest("/api/v1", build_api_router())
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // Request stats middleware (outermost layer, runs for all requests)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::request_stats_middleware,
        ))
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::not_found("No such endpoint")
}
