pub mod auth;
pub mod error;
pub mod routes;
pub mod scheduler;
pub mod state;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::AdminAuth;
use crate::state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let auth = Arc::new(AdminAuth::new(app_state.config.server.admin_token.clone()));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin = Router::new()
        .route("/api/admin/distribute", post(routes::distribution::distribute))
        .route("/api/assignments", get(routes::assignments::list_active))
        .route_layer(middleware::from_fn_with_state(
            auth,
            auth::admin_auth_middleware,
        ));

    Router::new()
        .route("/api/health", get(routes::health::health))
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the HTTP server and the monthly scheduler on a pre-bound listener.
///
/// Accepting a bound `TcpListener` lets the caller read the actual port
/// first (useful when `port = 0` and the OS picks a free port).
pub async fn serve_on(app_state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();

    if app_state.config.server.admin_token.is_none() {
        tracing::warn!("no admin token configured: admin routes are open to any caller");
    }
    let scheduler = scheduler::spawn_monthly_distribution(app_state.clone());
    let app = build_router(app_state);

    tracing::info!("telesales server listening on http://localhost:{actual_port}");
    let served = axum::serve(listener, app).await;

    if let Some(handle) = scheduler {
        handle.abort();
    }
    served?;
    Ok(())
}

/// Bind `0.0.0.0:port` and serve.
pub async fn serve(app_state: AppState, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, listener).await
}
