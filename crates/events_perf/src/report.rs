//! Results of one reporting cycle

use crate::category::Category;
use crate::error::PerfResult;
use serde::{Deserialize, Serialize};

/// Average duration of one category over a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAverage {
    /// Category the measures belong to
    pub category: Category,
    /// Arithmetic mean in milliseconds
    pub average_ms: f64,
    /// Number of measures averaged
    pub samples: usize,
}

/// Summary of one `publish_results` cycle.
///
/// Categories without any measure in the cycle have no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    /// Per-category averages in report order
    pub averages: Vec<CategoryAverage>,
    /// Marks in a tracked category present when the cycle ran
    pub marks_seen: usize,
    /// Measures present in the store when the cycle ran
    pub measures_seen: usize,
}

impl CycleReport {
    /// Get the average for a category, if any measure matched it.
    pub fn average(&self, category: Category) -> Option<f64> {
        self.get(category).map(|entry| entry.average_ms)
    }

    /// Get the full entry for a category.
    pub fn get(&self, category: Category) -> Option<&CategoryAverage> {
        self.averages.iter().find(|entry| entry.category == category)
    }

    /// Check if no average was reported.
    pub fn is_empty(&self) -> bool {
        self.averages.is_empty()
    }

    /// Serialize the report to pretty-printed JSON.
    pub fn to_json(&self) -> PerfResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
