//! Terminal rendering of the run view's tabs.

use comfy_table::{presets::UTF8_FULL, Table};

use a11yboard_core::client::ApiUrls;
use a11yboard_core::table::COLUMNS;
use a11yboard_core::{ArtifactBody, PieData, Run, RunView};

/// Overview tab: run summary and the donut's two slices.
pub fn overview(run: &Run, pie: &PieData) -> String {
    let mut out = format!("Run: {}\n", run.id);
    if let Some(d) = run.duration {
        out += &format!("Duration: {}\n", format_run_duration(d));
    }

    let s = &run.summary;
    let mut summary = Table::new();
    summary.load_preset(UTF8_FULL);
    summary.set_header(["Tests", "Failures", "Errors", "Skips", "XFailures", "XPasses"]);
    summary.add_row([s.tests, s.failures, s.errors, s.skips, s.xfailures, s.xpasses].map(|n| n.to_string()));
    out += &format!("{}\n", summary);

    let mut donut = Table::new();
    donut.load_preset(UTF8_FULL);
    donut.set_header(["Elements", "Count", "Ratio"]);
    for datum in pie.slices() {
        donut.add_row([datum.label.to_string(), datum.count.to_string(), format!("{}%", datum.ratio)]);
    }
    donut.add_row(["total".to_string(), pie.total.to_string(), String::new()]);
    out += &format!("── Accessibility ──────────────────────\n{}", donut);
    out
}

/// Results-list tab, with the pagination reported by the server.
pub fn results(view: &RunView) -> String {
    let table = view.table();
    if table.is_error() {
        return "Error fetching result data".to_string();
    }
    if table.is_empty() {
        return "No results found".to_string();
    }

    let mut out = Table::new();
    out.load_preset(UTF8_FULL);
    out.set_header(COLUMNS);
    for row in table.rows() {
        out.add_row(row.cells());
    }
    format!(
        "{}\nPage {} of {} ({} items, {} per page)",
        out, table.page, table.total_pages, table.total_items, table.page_size
    )
}

/// One line per artifact tab plus its download link.
pub fn artifacts(view: &RunView, urls: &ApiUrls) -> String {
    let tabs = view.artifact_tabs();
    if tabs.is_empty() {
        return "No viewable artifacts".to_string();
    }
    let mut out = Table::new();
    out.load_preset(UTF8_FULL);
    out.set_header(["Artifact", "Kind", "Size", "Download"]);
    for tab in tabs {
        let (kind, size) = match &tab.body {
            ArtifactBody::Text(text) => ("text", text.len()),
            ArtifactBody::Image { bytes, .. } => ("image", bytes.len()),
        };
        out.add_row([
            tab.title().to_string(),
            kind.to_string(),
            format!("{} bytes", size),
            urls.artifact_download(&tab.artifact.id),
        ]);
    }
    out.to_string()
}

/// Run duration as `1h 02m 05s`, dropping leading zero units.
pub fn format_run_duration(secs: f64) -> String {
    let total = secs.round() as u64;
    match (total / 3600, total % 3600 / 60, total % 60) {
        (0, 0, s) => format!("{}s", s),
        (0, m, s) => format!("{}m {:02}s", m, s),
        (h, m, s) => format!("{}h {:02}m {:02}s", h, m, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a11yboard_core::models::AccessibilityData;

    #[test]
    fn test_overview_shows_ratios() {
        let run = Run {
            id: "r1".to_string(),
            duration: Some(125.0),
            ..Default::default()
        };
        let pie = PieData::from_counts(AccessibilityData { passes: 3, violations: 1 });
        let text = overview(&run, &pie);
        assert!(text.contains("Run: r1"));
        assert!(text.contains("2m 05s"));
        assert!(text.contains("75%"));
        assert!(text.contains("25%"));
    }

    #[test]
    fn test_format_run_duration() {
        assert_eq!(format_run_duration(4.4), "4s");
        assert_eq!(format_run_duration(3725.0), "1h 02m 05s");
    }

    #[test]
    fn test_results_while_loading_without_run_id() {
        let (view, _) = RunView::mount("", "");
        // Never fetched: rows still loading, not empty and not an error.
        let text = results(&view);
        assert!(text.contains("Page 1 of 0"));
    }
}
