// src/router.rs

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{routes, AppState};

/// Reporting routes, mounted both at the root and under `/api`.
fn api() -> Router<AppState> {
    Router::new()
        // students
        .route("/students", get(routes::students::list_students))
        .route("/students/options", get(routes::students::filter_options))
        // stats
        .route("/stats/summary", get(routes::stats::get_summary))
        .route("/stats/charts", get(routes::stats::get_charts))
}

pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(routes::health::banner))
        .route("/health", get(routes::health::health))
        .merge(api())
        .nest("/api", api())
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Any origin when `origins` is empty, otherwise only the listed ones.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
