//! Shared pieces of the `a11yboard` binary: configuration resolution,
//! the reqwest backend and terminal rendering of the run view.

pub mod http;
pub mod render;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use a11yboard_core::{ArtifactBody, ArtifactTab, DashboardConfig, Filter, QueryState};

/// Defaults < YAML file < explicit values (flags or environment).
pub fn resolve_config(
    path: Option<&Path>,
    server_url: Option<String>,
    project: Option<String>,
) -> Result<DashboardConfig> {
    let mut config = match path {
        Some(p) => DashboardConfig::load(p)
            .with_context(|| format!("Failed to load config {}", p.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(url) = server_url {
        config = config.with_server_url(url);
    }
    if let Some(project) = project {
        config = config.with_project(project);
    }
    Ok(config)
}

/// Search string equivalent to opening the run view in a browser.
pub fn search_for(run_id: &str, page: u32, page_size: u32, filters: &[String]) -> Result<String> {
    let mut state = QueryState {
        page,
        page_size,
        ..QueryState::for_run(run_id)
    };
    for raw in filters {
        let (key, value) = raw
            .split_once('=')
            .with_context(|| format!("Filter '{}' must look like field[op]=value", raw))?;
        let filter = Filter::from_query_pair(key, value)?;
        state.filters.insert(filter.field.clone(), filter);
    }
    Ok(state.to_search())
}

/// Parse `key=value` widget parameters.
pub fn parse_params(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|p| {
            p.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .with_context(|| format!("Parameter '{}' must look like key=value", p))
        })
        .collect()
}

/// Final path component of a backend-supplied filename. `None` for names
/// that do not name a file (`""`, `"."`, `".."`, a bare root).
fn local_file_name(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next()?;
    match name {
        "" | "." | ".." => None,
        _ => Some(name),
    }
}

/// Write each tab's body under `dir`. Filenames come from the backend, so
/// only their last component is used; a repeated name gets the artifact id
/// as a prefix. Returns the written paths.
pub fn save_artifacts(dir: &Path, tabs: &[ArtifactTab]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut used = HashSet::new();
    let mut written = Vec::with_capacity(tabs.len());
    for tab in tabs {
        let name = local_file_name(tab.title()).with_context(|| {
            format!(
                "Artifact {} has no usable filename ({:?})",
                tab.artifact.id,
                tab.title()
            )
        })?;
        let mut file_name = name.to_string();
        if !used.insert(file_name.clone()) {
            file_name = format!("{}_{}", tab.artifact.id, name);
            if local_file_name(&file_name) != Some(file_name.as_str()) || !used.insert(file_name.clone()) {
                anyhow::bail!("Artifact {} collides with an earlier file named {}", tab.artifact.id, name);
            }
        }

        let path = dir.join(&file_name);
        let contents: &[u8] = match &tab.body {
            ArtifactBody::Text(text) => text.as_bytes(),
            ArtifactBody::Image { bytes, .. } => bytes.as_slice(),
        };
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use a11yboard_core::{Artifact, FilterOp};
    use tempfile::TempDir;

    fn text_tab(id: &str, filename: &str, text: &str) -> ArtifactTab {
        ArtifactTab {
            artifact: Artifact {
                id: id.to_string(),
                filename: filename.to_string(),
                run_id: Some("r1".to_string()),
                result_id: None,
            },
            position: 0,
            body: ArtifactBody::Text(text.to_string()),
        }
    }

    #[test]
    fn test_search_for_round_trips() {
        let search = search_for("r1", 2, 50, &["env[ne]=ci".to_string()]).unwrap();
        let state = QueryState::parse(&search);
        assert_eq!(state.run_id().unwrap(), "r1");
        assert_eq!(state.page, 2);
        assert_eq!(state.page_size, 50);
        assert_eq!(state.filters["env"].op, FilterOp::Ne);
    }

    #[test]
    fn test_search_for_rejects_bad_filters() {
        assert!(search_for("r1", 1, 20, &["novalue".to_string()]).is_err());
        assert!(search_for("r1", 1, 20, &["env[near]=x".to_string()]).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a11yboard.yaml");
        std::fs::write(&path, "server_url: http://from-file/api\nproject: p-file\npage_size: 50\n").unwrap();

        let config = resolve_config(Some(&path), Some("http://from-flag/api".to_string()), None).unwrap();
        assert_eq!(config.server_url, "http://from-flag/api");
        assert_eq!(config.project.as_deref(), Some("p-file"));
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn test_parse_params() {
        let params = parse_params(&["run_list=r1".to_string()]).unwrap();
        assert_eq!(params, vec![("run_list".to_string(), "r1".to_string())]);
        assert!(parse_params(&["bad".to_string()]).is_err());
    }

    #[test]
    fn test_save_artifacts_stays_inside_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("out");

        let written = save_artifacts(
            &dir,
            &[
                text_tab("a1", "../evil.txt", "escaped?"),
                text_tab("a2", "/tmp/abs.log", "absolute"),
                text_tab("a3", "logs\\win.log", "backslash"),
            ],
        )
        .unwrap();

        assert_eq!(
            written,
            vec![dir.join("evil.txt"), dir.join("abs.log"), dir.join("win.log")]
        );
        assert_eq!(std::fs::read_to_string(dir.join("evil.txt")).unwrap(), "escaped?");
        assert!(!tmp.path().join("evil.txt").exists());
    }

    #[test]
    fn test_save_artifacts_rejects_nameless_files() {
        let tmp = TempDir::new().unwrap();
        for bad in ["..", ".", "", "dir/"] {
            assert!(save_artifacts(tmp.path(), &[text_tab("a1", bad, "x")]).is_err(), "{:?}", bad);
        }
    }

    #[test]
    fn test_save_artifacts_keeps_duplicate_names() {
        let tmp = TempDir::new().unwrap();
        let written = save_artifacts(
            tmp.path(),
            &[text_tab("a1", "log.txt", "first"), text_tab("a2", "log.txt", "second")],
        )
        .unwrap();

        assert_eq!(written[1], tmp.path().join("a2_log.txt"));
        assert_eq!(std::fs::read_to_string(tmp.path().join("log.txt")).unwrap(), "first");
        assert_eq!(std::fs::read_to_string(tmp.path().join("a2_log.txt")).unwrap(), "second");
    }
}
