//! Tab state machine, driven by tab clicks and by history (hash) navigation.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const OVERVIEW: &str = "overview";
pub const RUN_OBJECT: &str = "run-object";
pub const RESULTS_LIST: &str = "results-list";
/// Artifact tab keys are `artifact-<id>` so an id can never shadow a
/// built-in tab.
pub const ARTIFACT_PREFIX: &str = "artifact-";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tab {
    #[default]
    Overview,
    RunObject,
    ResultsList,
    /// One tab per loaded artifact, keyed by artifact id.
    Artifact(String),
}

impl Tab {
    /// Tab named by a URL hash (`#results-list`, `results-list` or empty).
    /// Unknown keys fall back to the overview.
    pub fn from_hash(hash: &str) -> Self {
        let key = hash.strip_prefix('#').unwrap_or(hash);
        match key {
            "" | OVERVIEW => Tab::Overview,
            RUN_OBJECT => Tab::RunObject,
            RESULTS_LIST => Tab::ResultsList,
            other => match other.strip_prefix(ARTIFACT_PREFIX) {
                Some(id) if !id.is_empty() => Tab::Artifact(id.to_string()),
                _ => {
                    debug!("Unknown tab hash {:?}, showing overview", hash);
                    Tab::Overview
                }
            },
        }
    }

    pub fn key(&self) -> Cow<'_, str> {
        match self {
            Tab::Overview => Cow::Borrowed(OVERVIEW),
            Tab::RunObject => Cow::Borrowed(RUN_OBJECT),
            Tab::ResultsList => Cow::Borrowed(RESULTS_LIST),
            Tab::Artifact(id) => Cow::Owned(format!("{}{}", ARTIFACT_PREFIX, id)),
        }
    }

    pub fn to_hash(&self) -> String {
        format!("#{}", self.key())
    }

    /// Data load to run when this tab becomes active.
    pub fn on_enter(&self) -> TabLoad {
        match self {
            Tab::Overview => TabLoad::RecomputePie,
            Tab::ResultsList => TabLoad::FetchResults,
            Tab::RunObject | Tab::Artifact(_) => TabLoad::Nothing,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabLoad {
    RecomputePie,
    FetchResults,
    Nothing,
}

/// Outcome of a tab click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Hash to push onto the browser history, if any.
    pub push_hash: Option<String>,
    pub load: TabLoad,
}

#[derive(Debug, Clone, Default)]
pub struct TabController {
    active: Tab,
}

impl TabController {
    pub fn new(initial: Tab) -> Self {
        Self { active: initial }
    }

    /// Controller whose initial tab comes from the page's hash.
    pub fn from_hash(hash: &str) -> Self {
        Self::new(Tab::from_hash(hash))
    }

    pub fn active(&self) -> &Tab {
        &self.active
    }

    /// User clicked a tab. Re-clicking the active tab reloads its data but
    /// does not push a duplicate history entry.
    pub fn select(&mut self, tab: Tab) -> Transition {
        let push_hash = (tab != self.active).then(|| tab.to_hash());
        debug!("Tab selected: {} (was {})", tab, self.active);
        let load = tab.on_enter();
        self.active = tab;
        Transition { push_hash, load }
    }

    /// Browser history moved to `hash`. Returns the load to run, or `None`
    /// when the tab did not change.
    pub fn navigate(&mut self, hash: &str) -> Option<TabLoad> {
        let tab = Tab::from_hash(hash);
        if tab == self.active {
            return None;
        }
        debug!("History navigated to tab {}", tab);
        let load = tab.on_enter();
        self.active = tab;
        Some(load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_round_trip() {
        for tab in [
            Tab::Overview,
            Tab::RunObject,
            Tab::ResultsList,
            Tab::Artifact("a1".to_string()),
        ] {
            assert_eq!(Tab::from_hash(&tab.to_hash()), tab);
        }
        assert_eq!(Tab::from_hash(""), Tab::Overview);
        assert_eq!(Tab::from_hash("#"), Tab::Overview);
    }

    #[test]
    fn test_artifact_ids_do_not_shadow_builtin_tabs() {
        for id in [OVERVIEW, RUN_OBJECT, RESULTS_LIST, "artifact-x", ""] {
            let tab = Tab::Artifact(id.to_string());
            assert_eq!(tab.to_hash(), format!("#artifact-{}", id));
            if !id.is_empty() {
                assert_eq!(Tab::from_hash(&tab.to_hash()), tab);
            }
        }
        assert_eq!(Tab::from_hash("#results-list"), Tab::ResultsList);
        assert_eq!(Tab::from_hash("#artifact-overview"), Tab::Artifact("overview".to_string()));
        assert_eq!(Tab::from_hash("#some-old-id"), Tab::Overview);
        assert_eq!(Tab::from_hash("#artifact-"), Tab::Overview);
    }

    #[test]
    fn test_select_artifact_named_like_builtin() {
        let mut tabs = TabController::new(Tab::ResultsList);
        let t = tabs.select(Tab::Artifact(RESULTS_LIST.to_string()));
        assert_eq!(t.push_hash.as_deref(), Some("#artifact-results-list"));
        assert_eq!(t.load, TabLoad::Nothing);
        assert_eq!(tabs.navigate("#artifact-results-list"), None);
        assert_eq!(tabs.navigate("#results-list"), Some(TabLoad::FetchResults));
    }

    #[test]
    fn test_select_pushes_history_and_loads() {
        let mut tabs = TabController::default();
        let t = tabs.select(Tab::ResultsList);
        assert_eq!(t.push_hash.as_deref(), Some("#results-list"));
        assert_eq!(t.load, TabLoad::FetchResults);
        assert_eq!(tabs.active(), &Tab::ResultsList);
    }

    #[test]
    fn test_reselect_reloads_without_push() {
        let mut tabs = TabController::new(Tab::ResultsList);
        let t = tabs.select(Tab::ResultsList);
        assert_eq!(t.push_hash, None);
        assert_eq!(t.load, TabLoad::FetchResults);
    }

    #[test]
    fn test_navigate_to_same_tab_is_noop() {
        let mut tabs = TabController::from_hash("#run-object");
        assert_eq!(tabs.navigate("#run-object"), None);
        assert_eq!(tabs.navigate(""), Some(TabLoad::RecomputePie));
        assert_eq!(tabs.active(), &Tab::Overview);
    }
}
