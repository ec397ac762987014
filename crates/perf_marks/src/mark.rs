//! Timing point and interval types recorded by the store

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle for a timing point.
///
/// A mark is created by a caller, handed to [`MarkStore::start`](crate::MarkStore::start)
/// and later to [`MarkStore::end`](crate::MarkStore::end). The id is the only
/// pairing key: two marks with the same id refer to the same interval.
///
/// # Example
///
/// ```rust
/// use perf_marks::{Mark, MarkStore};
///
/// let mut store = MarkStore::new();
/// let mark = Mark::new("render:page:1");
///
/// store.start(&mark);
/// // ... work ...
/// let measure = store.end(&mark).unwrap();
/// assert_eq!(measure.name, "render:page:1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark {
    /// Identifier shared by the start and end of the interval
    pub id: String,
}

impl Mark {
    /// Create a mark with the given id.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Get the mark id.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl From<String> for Mark {
    fn from(id: String) -> Self {
        Self { id }
    }
}

impl From<&str> for Mark {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A recorded timing point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkEntry {
    /// Id of the mark that was started
    pub name: String,
    /// Milliseconds since the store was created
    pub start_ms: f64,
}

/// A closed timing interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    /// Name of the interval, equal to the id of the mark that opened it
    pub name: String,
    /// Milliseconds since the store was created when the interval opened
    pub start_ms: f64,
    /// Elapsed time in milliseconds, never negative
    pub duration_ms: f64,
}

impl Measure {
    /// Create a measure, clamping negative or NaN durations to zero.
    pub fn new(name: impl Into<String>, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            name: name.into(),
            start_ms,
            duration_ms: if duration_ms > 0.0 { duration_ms } else { 0.0 },
        }
    }
}

/// Check if `name` starts with any of the given prefixes.
#[inline]
pub fn matches_any(name: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| name.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_display_and_conversions() {
        let mark = Mark::from("triggerEvent:event:tx-1");
        assert_eq!(mark.to_string(), "triggerEvent:event:tx-1");
        assert_eq!(mark.id(), "triggerEvent:event:tx-1");

        let owned: Mark = String::from("a").into();
        assert_eq!(owned, Mark::new("a"));
    }

    #[test]
    fn test_measure_clamps_negative_duration() {
        assert_eq!(Measure::new("m", 0.0, -3.5).duration_ms, 0.0);
        assert_eq!(Measure::new("m", 0.0, f64::NAN).duration_ms, 0.0);
        assert_eq!(Measure::new("m", 0.0, 2.5).duration_ms, 2.5);
    }

    #[test]
    fn test_matches_any() {
        let prefixes = ["triggerEvent", "endpoint:triggerEvent"];
        assert!(matches_any("triggerEvent:notificationTemplate:x", &prefixes));
        assert!(matches_any("endpoint:triggerEvent:event:1", &prefixes));
        assert!(!matches_any("digestFilterSteps:event:1", &prefixes));
        assert!(!matches_any("anything", &[]));
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = MarkEntry {
            name: "x".to_string(),
            start_ms: 1.5,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"name":"x","startMs":1.5}"#);
    }
}
