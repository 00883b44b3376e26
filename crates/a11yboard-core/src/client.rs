//! Backend API surface: URL construction and the `Backend` trait that
//! executors implement over their HTTP client of choice.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};
use crate::filter::{Filter, FilterOp};
use crate::models::{Artifact, ArtifactContent, ResultsPage, Run};
use crate::query::QueryState;

/// Marker that scopes the results table to accessibility tests.
pub const ACCESSIBILITY_MARKER: &str = "accessibility";

/// Parameters of a `GET /result` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsQuery {
    pub filters: Vec<Filter>,
    pub page: u32,
    pub page_size: u32,
}

impl ResultsQuery {
    /// Results of `run_id` carrying the accessibility marker, further
    /// scoped by the URL filters, at the state's page.
    pub fn for_run(run_id: &str, state: &QueryState) -> Self {
        let mut filters = vec![
            Filter::new("run_id", FilterOp::Eq, run_id),
            Filter::new("metadata.markers", FilterOp::In, ACCESSIBILITY_MARKER),
        ];
        filters.extend(
            state
                .scoping_filters()
                .filter(|f| f.field != "run_id" && f.field != "metadata.markers")
                .cloned(),
        );
        Self {
            filters,
            page: state.page,
            page_size: state.page_size,
        }
    }

    /// Every URL filter as-is, unscoped by run or marker. Backs the general
    /// results page.
    pub fn from_state(state: &QueryState) -> Self {
        Self {
            filters: state.filters.values().cloned().collect(),
            page: state.page,
            page_size: state.page_size,
        }
    }

    /// Query parameters: one `filter` per filter, then `page` and `pageSize`.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|f| ("filter".to_string(), f.to_api()))
            .collect();
        params.push(("page".to_string(), self.page.to_string()));
        params.push(("pageSize".to_string(), self.page_size.to_string()));
        params
    }
}

/// What an artifact list is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactOwner<'a> {
    Run(&'a str),
    Result(&'a str),
}

impl ArtifactOwner<'_> {
    fn param(&self) -> (&'static str, &str) {
        match self {
            ArtifactOwner::Run(id) => ("runId", *id),
            ArtifactOwner::Result(id) => ("resultId", *id),
        }
    }
}

/// Builds backend URLs from a base such as `http://host/api`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiUrls {
    base: String,
}

impl ApiUrls {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn run(&self, id: &str) -> String {
        format!("{}/run/{}", self.base, encode_segment(id))
    }

    pub fn artifacts(&self, owner: ArtifactOwner<'_>) -> String {
        let (key, value) = owner.param();
        with_query(format!("{}/artifact", self.base), [(key, value)])
    }

    pub fn artifact_view(&self, id: &str) -> String {
        format!("{}/artifact/{}/view", self.base, encode_segment(id))
    }

    pub fn artifact_download(&self, id: &str) -> String {
        format!("{}/artifact/{}/download", self.base, encode_segment(id))
    }

    pub fn results(&self, query: &ResultsQuery) -> String {
        let params = query.to_params();
        with_query(
            format!("{}/result", self.base),
            params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    /// Widget URL. A configured `project` replaces any caller-supplied one.
    pub fn widget(&self, name: &str, params: &[(String, String)], project: Option<&str>) -> String {
        let params = params
            .iter()
            .filter(|(k, _)| project.is_none() || k != "project")
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(project.map(|p| ("project", p)));
        with_query(format!("{}/widget/{}", self.base, encode_segment(name)), params)
    }
}

fn with_query<'a>(path: String, params: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    if query.is_empty() {
        path
    } else {
        format!("{}?{}", path, query)
    }
}

fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Check an HTTP status the way every fetch does.
pub fn check_status(status: u16, url: &str) -> Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(ViewError::Http {
            status,
            url: url.to_string(),
        })
    }
}

/// The backend endpoints the view consumes.
///
/// Futures are not required to be `Send`: the browser executor is
/// single-threaded.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn get_run(&self, id: &str) -> Result<Run>;

    async fn list_artifacts(&self, owner: ArtifactOwner<'_>) -> Result<Vec<Artifact>>;

    async fn view_artifact(&self, id: &str) -> Result<ArtifactContent>;

    async fn list_results(&self, query: &ResultsQuery) -> Result<ResultsPage>;

    /// Legacy aggregate endpoint, no longer used by the view itself.
    async fn get_widget(&self, name: &str, params: &[(String, String)]) -> Result<serde_json::Value>;
}
