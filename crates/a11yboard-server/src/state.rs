//! Shared application state for the Axum server.

use std::sync::Arc;

use a11yboard_core::DashboardConfig;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(dashboard: DashboardConfig) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }
}

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Handed to the frontend through `/api/config`.
    pub dashboard: DashboardConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            dashboard: DashboardConfig::default(),
        }
    }
}
