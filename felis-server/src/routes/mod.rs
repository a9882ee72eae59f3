use axum::{Router, http::HeaderValue, routing::get};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, infra::app_state::AppState};

/// Catalog and account routes, without state or middleware.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/breeds", get(handlers::list_breeds_handler))
        .route("/breeds/search", get(handlers::search_breeds_handler))
        .route("/breeds/{breed_id}", get(handlers::get_breed_handler))
        .route("/imagesbybreedid", get(handlers::images_by_breed_handler))
        .route(
            "/login",
            get(handlers::login_query_handler).post(handlers::login_json_handler),
        )
        .route(
            "/register",
            get(handlers::register_query_handler).post(handlers::register_json_handler),
        )
}

/// Build the complete application router.
pub fn create_app(state: AppState) -> Router {
    let cors_layer = cors_layer(&state.config().cors_allowed_origins);

    Router::new()
        .route("/ping", get(handlers::ping_handler))
        .route("/health", get(handlers::health_handler))
        .merge(api_routes())
        // Outer to inner: tracing, then CORS
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
