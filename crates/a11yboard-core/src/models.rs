//! Data models for the records served by the backend API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Summary counts attached to a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    #[serde(default)]
    pub failures: u64,
    #[serde(default)]
    pub errors: u64,
    #[serde(default)]
    pub skips: u64,
    #[serde(default)]
    pub xfailures: u64,
    #[serde(default)]
    pub xpasses: u64,
    #[serde(default)]
    pub tests: u64,
}

/// Accessibility scan counts stored under `metadata.accessibility_data`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessibilityData {
    #[serde(default)]
    pub passes: u64,
    #[serde(default)]
    pub violations: u64,
}

/// Run metadata. Only the accessibility block is typed; everything else is
/// kept verbatim so the run object can be shown unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_data: Option<AccessibilityData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One execution of a test suite.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Run {
    pub id: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub summary: RunSummary,
    #[serde(default)]
    pub metadata: RunMetadata,
    /// Artifacts attached by the view after loading.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Run {
    /// Accessibility counts, zero when the run carries none.
    pub fn accessibility(&self) -> AccessibilityData {
        self.metadata.accessibility_data.unwrap_or_default()
    }

    /// The run as a JSON value, as shown in the run-object tab.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// One test's outcome within a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TestResult {
    pub id: String,
    #[serde(default)]
    pub test_id: String,
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Server-side pagination block.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

/// Response of `GET /result`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultsPage {
    #[serde(default)]
    pub results: Vec<TestResult>,
    pub pagination: Pagination,
}

/// A file attached to a run or result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    pub id: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_id: Option<String>,
}

/// Response of `GET /artifact`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtifactList {
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

/// Raw body of `GET /artifact/{id}/view`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactContent {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_keeps_unknown_fields() {
        let raw = serde_json::json!({
            "id": "r1",
            "duration": 12.5,
            "component": "ui",
            "summary": {"tests": 4, "failures": 1},
            "metadata": {"accessibility_data": {"passes": 3, "violations": 1}, "jenkins": {"build": 7}}
        });
        let run: Run = serde_json::from_value(raw).unwrap();
        assert_eq!(run.summary.tests, 4);
        assert_eq!(run.summary.skips, 0);
        assert_eq!(run.accessibility(), AccessibilityData { passes: 3, violations: 1 });

        let value = run.to_value();
        assert_eq!(value["component"], "ui");
        assert_eq!(value["metadata"]["jenkins"]["build"], 7);
        assert_eq!(value["metadata"]["accessibility_data"]["violations"], 1);
    }

    #[test]
    fn test_run_without_metadata_defaults_to_zero() {
        let run: Run = serde_json::from_str(r#"{"id": "r2"}"#).unwrap();
        assert_eq!(run.accessibility(), AccessibilityData::default());
        assert_eq!(run.summary, RunSummary::default());
    }

    #[test]
    fn test_results_page_camel_case_pagination() {
        let page: ResultsPage = serde_json::from_str(
            r#"{"results": [{"id": "a", "test_id": "t", "result": "passed"}],
                "pagination": {"page": 2, "pageSize": 20, "totalItems": 45, "totalPages": 3}}"#,
        )
        .unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.page_size, 20);
    }
}
