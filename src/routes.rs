use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use http::{HeaderValue, Method, header};
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    error::{AppError, Result},
    handlers, middleware_layer,
    state::AppState,
};

/// Request bodies larger than this are rejected before parsing.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Builds the full application router.
///
/// Credential routes are rate limited per client IP when
/// `config.rate_limit_auth` is set, which requires the server to be started
/// with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn build_router(state: AppState) -> Result<Router> {
    let mut auth_routes = Router::new()
        .route("/signin", post(handlers::auth::sign_in))
        .route("/signup", post(handlers::auth::sign_up))
        .route("/refresh", post(handlers::auth::refresh))
        .with_state(state.clone());

    if state.config.rate_limit_auth {
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_second(2)
                .burst_size(10)
                .use_headers()
                .finish()
                .ok_or_else(|| AppError::Configuration("Invalid rate limit settings".to_string()))?,
        );
        auth_routes = auth_routes.layer(tower_governor::GovernorLayer::new(governor_conf));
    }

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/recipes", get(handlers::recipes::list_recipes))
        .route("/recipes/search", get(handlers::recipes::search_recipes))
        .route("/recipes/{id}", get(handlers::recipes::get_recipe))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/recipes", post(handlers::recipes::create_recipe))
        .route(
            "/recipes/{id}",
            axum::routing::put(handlers::recipes::update_recipe)
                .delete(handlers::recipes::delete_recipe),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    let app = Router::new()
        .merge(auth_routes)
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(state.config.cors_origin.as_deref())?);

    Ok(app)
}

fn cors_layer(origin: Option<&str>) -> Result<CorsLayer> {
    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(86400));

    if let Some(origin) = origin {
        let origin: HeaderValue = origin
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid CORS_ORIGIN: {}", origin)))?;
        cors = cors.allow_origin(origin);
    }

    Ok(cors)
}
