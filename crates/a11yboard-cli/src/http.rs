//! `Backend` over `reqwest` for native callers.

use a11yboard_core::client::{check_status, ApiUrls, ArtifactOwner};
use a11yboard_core::models::ArtifactList;
use a11yboard_core::{
    Artifact, ArtifactContent, Backend, DashboardConfig, ResultsPage, ResultsQuery, Run, ViewError,
};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tracing::debug;

type Result<T> = a11yboard_core::Result<T>;

pub struct HttpBackend {
    client: reqwest::Client,
    urls: ApiUrls,
    project: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            urls: ApiUrls::new(config.server_url.clone()),
            project: config.project.clone(),
        }
    }

    pub fn urls(&self) -> &ApiUrls {
        &self.urls
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ViewError::Network(e.to_string()))?;
        check_status(resp.status().as_u16(), url)?;
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let text = self
            .send(url)
            .await?
            .text()
            .await
            .map_err(|e| ViewError::Network(e.to_string()))?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl Backend for HttpBackend {
    async fn get_run(&self, id: &str) -> Result<Run> {
        self.get_json(&self.urls.run(id)).await
    }

    async fn list_artifacts(&self, owner: ArtifactOwner<'_>) -> Result<Vec<Artifact>> {
        let list: ArtifactList = self.get_json(&self.urls.artifacts(owner)).await?;
        Ok(list.artifacts)
    }

    async fn view_artifact(&self, id: &str) -> Result<ArtifactContent> {
        let resp = self.send(&self.urls.artifact_view(id)).await?;
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ViewError::Network(e.to_string()))?;
        Ok(ArtifactContent {
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    async fn list_results(&self, query: &ResultsQuery) -> Result<ResultsPage> {
        self.get_json(&self.urls.results(query)).await
    }

    async fn get_widget(&self, name: &str, params: &[(String, String)]) -> Result<serde_json::Value> {
        self.get_json(&self.urls.widget(name, params, self.project.as_deref()))
            .await
    }
}
