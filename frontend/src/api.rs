use a11yboard_core::client::{check_status, ApiUrls, ArtifactOwner};
use a11yboard_core::models::ArtifactList;
use a11yboard_core::{
    Artifact, ArtifactContent, Backend, DashboardConfig, Result, ResultsPage, ResultsQuery, Run,
    ViewError,
};
use gloo_net::http::{Request, Response};
use serde_json::Value;

/// Dashboard settings served by a11yboard-server; defaults when unavailable.
pub async fn fetch_config() -> DashboardConfig {
    match try_fetch_config().await {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Using default dashboard config: {}", e);
            DashboardConfig::default()
        }
    }
}

async fn try_fetch_config() -> Result<DashboardConfig> {
    let resp = send("/api/config").await?;
    let text = resp.text().await.map_err(|e| ViewError::Network(e.to_string()))?;
    Ok(serde_json::from_str(&text)?)
}

async fn send(url: &str) -> Result<Response> {
    log::debug!("GET {}", url);
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| ViewError::Network(e.to_string()))?;
    check_status(resp.status(), url)?;
    Ok(resp)
}

/// Backend API over the browser's `fetch`.
#[derive(Clone)]
pub struct GlooBackend {
    urls: ApiUrls,
    project: Option<String>,
}

impl GlooBackend {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            urls: ApiUrls::new(config.server_url.clone()),
            project: config.project.clone(),
        }
    }

    pub fn urls(&self) -> &ApiUrls {
        &self.urls
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let text = send(url)
            .await?
            .text()
            .await
            .map_err(|e| ViewError::Network(e.to_string()))?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl Backend for GlooBackend {
    async fn get_run(&self, id: &str) -> Result<Run> {
        self.get_json(&self.urls.run(id)).await
    }

    async fn list_artifacts(&self, owner: ArtifactOwner<'_>) -> Result<Vec<Artifact>> {
        let list: ArtifactList = self.get_json(&self.urls.artifacts(owner)).await?;
        Ok(list.artifacts)
    }

    async fn view_artifact(&self, id: &str) -> Result<ArtifactContent> {
        let resp = send(&self.urls.artifact_view(id)).await?;
        let content_type = resp.headers().get("content-type").unwrap_or_default();
        let bytes = resp
            .binary()
            .await
            .map_err(|e| ViewError::Network(e.to_string()))?;
        Ok(ArtifactContent {
            content_type,
            bytes,
        })
    }

    async fn list_results(&self, query: &ResultsQuery) -> Result<ResultsPage> {
        self.get_json(&self.urls.results(query)).await
    }

    async fn get_widget(&self, name: &str, params: &[(String, String)]) -> Result<Value> {
        self.get_json(&self.urls.widget(name, params, self.project.as_deref()))
            .await
    }
}
