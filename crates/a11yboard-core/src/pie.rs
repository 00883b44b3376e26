//! Donut-chart data derived from a run's accessibility counts.

use serde::Serialize;

use crate::models::AccessibilityData;

/// One slice of the donut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieDatum {
    pub label: &'static str,
    pub count: u64,
    /// Share of the total in whole percent.
    pub ratio: u32,
}

/// Passes and violations slices plus their total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieData {
    pub passes: PieDatum,
    pub violations: PieDatum,
    pub total: u64,
}

impl Default for PieData {
    fn default() -> Self {
        PieData::from_counts(AccessibilityData::default())
    }
}

impl PieData {
    pub fn from_counts(data: AccessibilityData) -> Self {
        let total = data.passes + data.violations;
        Self {
            passes: PieDatum {
                label: "passes",
                count: data.passes,
                ratio: percent(data.passes, total),
            },
            violations: PieDatum {
                label: "violations",
                count: data.violations,
                ratio: percent(data.violations, total),
            },
            total,
        }
    }

    pub fn slices(&self) -> [&PieDatum; 2] {
        [&self.passes, &self.violations]
    }

    /// Chart label for a slice, e.g. `passes: 75%`.
    pub fn label(datum: &PieDatum) -> String {
        format!("{}: {}%", datum.label, datum.ratio)
    }
}

/// `round(100 * part / total)`, zero when `total` is zero.
fn percent(part: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * part as f64 / total as f64).round() as u32
}
