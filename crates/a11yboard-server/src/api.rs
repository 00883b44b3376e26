//! REST handlers for a11yboard-server.

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::state::AppState;

// ─── Router ──────────────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new().route("/config", get(get_config))
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// Settings the frontend needs before it can talk to the backend.
#[derive(Debug, Serialize)]
pub struct FrontendConfig {
    pub server_url: String,
    pub project: Option<String>,
    pub page_size: u32,
    pub version: &'static str,
}

async fn get_config(State(state): State<AppState>) -> Json<FrontendConfig> {
    let dashboard = &state.dashboard;
    Json(FrontendConfig {
        server_url: dashboard.server_url.clone(),
        project: dashboard.project.clone(),
        page_size: dashboard.page_size,
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ─── Frontend (embedded) ─────────────────────────────────────────────────────

const INDEX: &str = "index.html";

#[derive(rust_embed::Embed)]
#[folder = "../../frontend/dist"]
#[exclude = "*.map"]
struct Assets;

/// Serve a file of the embedded bundle. Paths that are not files are
/// client-side routes and get `index.html`.
pub async fn serve_frontend(uri: Uri) -> Response {
    let requested = uri.path().trim_start_matches('/');
    asset(requested)
        .or_else(|| asset(INDEX))
        .unwrap_or_else(|| (StatusCode::NOT_FOUND, "dashboard bundle missing").into_response())
}

fn asset(path: &str) -> Option<Response> {
    let file = Assets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    // Trunk hashes bundle file names; only the entry page must be revalidated.
    let cache = if path == INDEX {
        "no-cache"
    } else {
        "public, max-age=31536000, immutable"
    };
    let headers = [
        (header::CONTENT_TYPE, mime.to_string()),
        (header::CACHE_CONTROL, cache.to_string()),
    ];
    Some((headers, file.data.into_owned()).into_response())
}
