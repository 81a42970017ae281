use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reviewlens_common::Config;

mod cache;
mod rest;
mod sources;
mod state;
mod summary;

use state::AppState;

/// Every route, with CORS, no-store headers and request tracing.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        // Sources
        .route("/api/reviews/hostaway", get(rest::reviews::api_hostaway_reviews))
        .route("/api/reviews/google", get(rest::reviews::api_google_reviews))
        .route("/api/reviews/google/all", get(rest::reviews::api_google_all_reviews))
        .route("/api/reviews/approved", get(rest::reviews::api_approved_reviews))
        // Moderation
        .route(
            "/api/reviews/approve",
            get(rest::approvals::api_approve_usage)
                .post(rest::approvals::api_approve)
                .delete(rest::approvals::api_clear_approval),
        )
        .route("/api/reviews/approvals", get(rest::approvals::api_approvals))
        // Analytics
        .route("/api/dashboard", get(rest::dashboard::api_dashboard))
        .route("/api/insights/issues", get(rest::insights::api_issues))
        .route("/api/insights/summary", post(rest::insights::api_summary))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Review data changes with every moderation decision
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(CompressionLayer::new())
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("reviewlens=info".parse()?))
        .init();

    let config = Config::from_env()?;
    config.log_redacted();

    let state = Arc::new(AppState::from_config(&config).await?);
    let app = app(state);

    let addr = format!("{}:{}", config.api_host, config.api_port);
    info!("ReviewLens API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
