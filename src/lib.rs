pub mod analytics;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod session;
pub mod state;

#[cfg(test)]
pub mod testing;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::state::AppState;

/// Full application router: API routes, guarded page routes, CORS and tracing.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Public
        .route("/", get(handlers::service::root))
        .route("/health", get(handlers::service::health))
        // JSON API
        .merge(auth_routes())
        .merge(connection_routes())
        .merge(analytics_routes())
        // Pages behind the route guard
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .fallback(handlers::service::not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::route_guard,
        ))
        .with_state(state)
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/auth/signin", post(auth::signin))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/signout", post(auth::signout))
}

fn connection_routes() -> Router<AppState> {
    use handlers::connections;

    Router::new()
        .route(
            "/api/connections",
            get(connections::list).delete(connections::delete_by_query),
        )
        .route(
            "/api/connections/:id",
            post(connections::action).delete(connections::delete_by_path),
        )
}

fn analytics_routes() -> Router<AppState> {
    use handlers::analytics;

    Router::new()
        .route("/api/analytics/summary", get(analytics::summary))
        .route("/api/analytics/historical", get(analytics::historical))
        .route("/api/analytics/platforms", get(analytics::platforms))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.is_development() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
