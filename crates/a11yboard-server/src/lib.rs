//! a11yboard-server: Axum host for the dashboard frontend.
//!
//! Serves the embedded Leptos bundle and tells it where the backend API
//! lives. The backend itself is a separate service.

pub mod api;
pub mod state;

use std::net::SocketAddr;

use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::state::AppState;

pub use state::ServerConfig;

/// `/api/*` JSON routes, everything else from the embedded bundle.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD]);

    Router::new()
        .nest("/api", api::router())
        .fallback(api::serve_frontend)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind `host:port` and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let backend = config.dashboard.server_url.clone();
    let app = build_router(AppState::new(config.dashboard));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, %backend, "a11yboard dashboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutting down");
            }
        })
        .await?;
    Ok(())
}
