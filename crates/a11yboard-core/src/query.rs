//! URL query-string state: `page`, `pageSize` and filter pairs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, ViewError};
use crate::filter::{Filter, FilterOp};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Filter field carrying the id of the run being viewed.
pub const RUN_LIST_FIELD: &str = "run_list";

/// Route of the general results page.
pub const RESULTS_PATH: &str = "/results";

/// Link to every result of `run_id` on the general results page.
pub fn all_results_href(run_id: &str) -> String {
    let id: String = url::form_urlencoded::byte_serialize(run_id.as_bytes()).collect();
    format!("{}?run_id[eq]={}", RESULTS_PATH, id)
}

/// View state persisted in the URL query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub page: u32,
    pub page_size: u32,
    /// Filters keyed by field. A later pair for the same field wins.
    pub filters: BTreeMap<String, Filter>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            filters: BTreeMap::new(),
        }
    }
}

impl QueryState {
    /// State that opens the view for `run_id` with default paging.
    pub fn for_run(run_id: &str) -> Self {
        let mut state = QueryState::default();
        state.filters.insert(
            RUN_LIST_FIELD.to_string(),
            Filter::new(RUN_LIST_FIELD, FilterOp::Eq, run_id),
        );
        state
    }

    /// Parse a search string (with or without the leading `?`).
    ///
    /// Malformed or zero `page`/`pageSize` values fall back to the defaults;
    /// filters with an unknown operator are dropped. Both are logged.
    pub fn parse(search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        let mut state = QueryState::default();

        for (key, value) in url::form_urlencoded::parse(search.as_bytes()) {
            match &*key {
                "page" => state.page = parse_positive(&key, &value, DEFAULT_PAGE),
                "pageSize" => state.page_size = parse_positive(&key, &value, DEFAULT_PAGE_SIZE),
                _ => match Filter::from_query_pair(&key, &value) {
                    Ok(filter) => {
                        state.filters.insert(filter.field.clone(), filter);
                    }
                    Err(e) => warn!("Ignoring query parameter '{}': {}", key, e),
                },
            }
        }
        state
    }

    /// Serialize back to a search string without the leading `?`.
    pub fn to_search(&self) -> String {
        let mut out = url::form_urlencoded::Serializer::new(String::new());
        out.append_pair("page", &self.page.to_string());
        out.append_pair("pageSize", &self.page_size.to_string());
        for filter in self.filters.values() {
            out.append_pair(&filter.query_key(), &filter.value);
        }
        out.finish()
    }

    /// Id of the run being viewed, taken from the `run_list` filter.
    pub fn run_id(&self) -> Result<&str> {
        self.filters
            .get(RUN_LIST_FIELD)
            .map(|f| f.value.as_str())
            .filter(|v| !v.is_empty())
            .ok_or(ViewError::MissingRunId)
    }

    /// Filters that further scope the results table (all but `run_list`).
    pub fn scoping_filters(&self) -> impl Iterator<Item = &Filter> {
        self.filters.values().filter(|f| f.field != RUN_LIST_FIELD)
    }
}

fn parse_positive(key: &str, value: &str, default: u32) -> u32 {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => {
            warn!("Malformed '{}' value '{}', using {}", key, value, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_results_href() {
        assert_eq!(all_results_href("r1"), "/results?run_id[eq]=r1");
        let href = all_results_href("r 1&x");
        assert_eq!(href, "/results?run_id[eq]=r+1%26x");

        let search = href.split_once('?').map(|(_, q)| q).unwrap();
        let state = QueryState::parse(search);
        assert_eq!(state.filters["run_id"], Filter::new("run_id", FilterOp::Eq, "r 1&x"));
    }

    #[test]
    fn test_parse_page_and_filters() {
        let q = QueryState::parse("?page=3&pageSize=50&run_list=abc&result[ne]=passed");
        assert_eq!(q.page, 3);
        assert_eq!(q.page_size, 50);
        assert_eq!(q.run_id().unwrap(), "abc");
        assert_eq!(q.filters["result"], Filter::new("result", FilterOp::Ne, "passed"));
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let q = QueryState::parse("");
        assert_eq!(q, QueryState::default());
        assert!(matches!(q.run_id(), Err(ViewError::MissingRunId)));
    }

    #[test]
    fn test_malformed_integers_fall_back() {
        let q = QueryState::parse("page=abc&pageSize=0&run_list=r");
        assert_eq!(q.page, DEFAULT_PAGE);
        assert_eq!(q.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_percent_decoding() {
        let q = QueryState::parse("run_list=r%201&metadata.title%5Bregex%5D=a%2Bb");
        assert_eq!(q.run_id().unwrap(), "r 1");
        assert_eq!(q.filters["metadata.title"].op, FilterOp::Regex);
        assert_eq!(q.filters["metadata.title"].value, "a+b");
    }

    #[test]
    fn test_unknown_operator_is_dropped() {
        let q = QueryState::parse("run_list=r&env[near]=ci");
        assert!(!q.filters.contains_key("env"));
        assert_eq!(q.filters.len(), 1);
    }

    #[test]
    fn test_to_search_parses_back() {
        let q = QueryState::parse("run_list=r1&pageSize=10&duration[gt]=1.5&page=2");
        let again = QueryState::parse(&q.to_search());
        assert_eq!(again, q);
    }

    #[test]
    fn test_for_run_escapes_the_id() {
        let q = QueryState::for_run("a&b=c");
        assert_eq!(QueryState::parse(&q.to_search()).run_id().unwrap(), "a&b=c");
    }

    #[test]
    fn test_scoping_filters_skip_run_list() {
        let q = QueryState::parse("run_list=r1&env=ci");
        let fields: Vec<_> = q.scoping_filters().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["env"]);
    }
}
