//! Rows and pagination state of the results table.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::Serialize;

use crate::models::{Pagination, ResultsPage, TestResult};
use crate::query::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

pub const COLUMNS: [&str; 5] = ["Test", "Run", "Result", "Duration", "Started"];

/// A results-table row, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub result_id: String,
    pub test: String,
    pub run: String,
    /// Raw status, used for styling.
    pub status: String,
    pub result: String,
    pub duration: String,
    pub started: String,
}

impl ResultRow {
    pub fn from_result(r: &TestResult) -> Self {
        Self {
            result_id: r.id.clone(),
            test: r.test_id.clone(),
            run: r.run_id.clone().unwrap_or_default(),
            status: r.result.clone(),
            result: title_case(&r.result),
            duration: r.duration.map(format_duration).unwrap_or_default(),
            started: r.start_time.as_deref().map(format_start_time).unwrap_or_default(),
        }
    }

    pub fn cells(&self) -> [&str; 5] {
        [&self.test, &self.run, &self.result, &self.duration, &self.started]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TableRows {
    /// A fetch is in flight; render one spinner row.
    Loading,
    Rows(Vec<ResultRow>),
    /// The last fetch failed; rows are cleared.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsTable {
    pub rows: TableRows,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl ResultsTable {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            rows: TableRows::Loading,
            page,
            page_size,
            total_items: 0,
            total_pages: 0,
        }
    }

    pub fn begin_loading(&mut self) {
        self.rows = TableRows::Loading;
    }

    /// Replace rows and pagination with what the server reported.
    pub fn apply(&mut self, page: &ResultsPage) {
        let Pagination {
            page: p,
            page_size,
            total_items,
            total_pages,
        } = page.pagination;
        self.rows = TableRows::Rows(page.results.iter().map(ResultRow::from_result).collect());
        self.page = p;
        self.page_size = page_size;
        self.total_items = total_items;
        self.total_pages = total_pages;
    }

    pub fn fail(&mut self) {
        self.rows = TableRows::Error;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.rows, TableRows::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.rows, TableRows::Error)
    }

    /// Loaded, and the server reported no items.
    pub fn is_empty(&self) -> bool {
        matches!(self.rows, TableRows::Rows(_)) && self.total_items == 0
    }

    pub fn rows(&self) -> &[ResultRow] {
        match &self.rows {
            TableRows::Rows(rows) => rows,
            _ => &[],
        }
    }
}

impl Default for ResultsTable {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Seconds rounded to two decimals, e.g. `1.5s`.
pub fn format_duration(secs: f64) -> String {
    let rounded = (secs * 100.0).round() / 100.0;
    format!("{}s", rounded)
}

/// Local `YYYY-MM-DD HH:MM:SS`. Timestamps without an offset are UTC;
/// unparseable input is returned unchanged.
pub fn format_start_time(raw: &str) -> String {
    let utc = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc()));
    match utc {
        Ok(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => raw.to_string(),
    }
}
