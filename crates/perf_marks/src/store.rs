//! Mark/measure store
//!
//! Holds the ordered sequence of marks and measures for one instrumentation
//! cycle, pairs starts with ends by id, and computes averages over durations.

use crate::mark::{matches_any, Mark, MarkEntry, Measure};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// Log target for mark events.
pub const CONTEXT_MARK: &str = "perf::mark";
/// Log target for measure events.
pub const CONTEXT_MEASURE: &str = "perf::measure";
/// Log target for computed averages.
pub const CONTEXT_AVERAGE: &str = "perf::average";

/// Default cap on intervals that are open at the same time.
pub const DEFAULT_MAX_OPEN_MARKS: usize = 1_000;

/// Ordered store of marks and measures.
///
/// Starting a mark records a [`MarkEntry`] and opens an interval keyed by the
/// mark id. Ending the mark closes that interval and appends a [`Measure`].
/// Marks and measures accumulate until [`clear`](Self::clear); only open
/// intervals are bounded. Nothing is shared between stores; wrap one in a `Mutex` to share it.
#[derive(Debug, Clone)]
pub struct MarkStore {
    /// Reference point for all offsets
    origin: Instant,
    /// Every started mark, in start order
    marks: Vec<MarkEntry>,
    /// Every closed interval, in end order
    measures: Vec<Measure>,
    /// Open intervals: mark id -> start offset in ms
    open: HashMap<String, f64>,
    /// Maximum intervals open at once before the oldest is evicted
    max_open_marks: usize,
}

impl MarkStore {
    /// Create an empty store with default limits.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            marks: Vec::new(),
            measures: Vec::new(),
            open: HashMap::new(),
            max_open_marks: DEFAULT_MAX_OPEN_MARKS,
        }
    }

    /// Set the maximum number of simultaneously open intervals.
    pub fn with_max_open_marks(mut self, max: usize) -> Self {
        self.max_open_marks = max.max(1);
        self
    }

    /// Milliseconds elapsed since the store was created.
    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    /// Record a timing point and open the interval for `mark`.
    ///
    /// Starting an id that is already open restarts its interval.
    pub fn start(&mut self, mark: &Mark) {
        let start_ms = self.now_ms();

        if self.open.insert(mark.id.clone(), start_ms).is_some() {
            tracing::debug!(
                target: CONTEXT_MARK,
                name = %mark.id,
                "mark restarted while still open"
            );
        } else if self.open.len() > self.max_open_marks {
            self.evict_oldest_open(&mark.id);
        }

        self.marks.push(MarkEntry {
            name: mark.id.clone(),
            start_ms,
        });

        tracing::trace!(target: CONTEXT_MARK, name = %mark.id, start_ms, "mark started");
    }

    /// Close the open interval for `mark` and record its measure.
    ///
    /// Returns `None` when no interval is open for the id; nothing is recorded.
    pub fn end(&mut self, mark: &Mark) -> Option<Measure> {
        let end_ms = self.now_ms();

        let Some(start_ms) = self.open.remove(&mark.id) else {
            tracing::debug!(
                target: CONTEXT_MEASURE,
                name = %mark.id,
                "end without a matching start, ignored"
            );
            return None;
        };

        let measure = Measure::new(mark.id.clone(), start_ms, end_ms - start_ms);
        self.measures.push(measure.clone());

        tracing::trace!(
            target: CONTEXT_MEASURE,
            name = %measure.name,
            duration_ms = measure.duration_ms,
            "mark ended"
        );

        Some(measure)
    }

    /// Record an interval whose duration was measured elsewhere.
    pub fn record_measure(&mut self, name: impl Into<String>, duration_ms: f64) {
        let measure = Measure::new(name, self.now_ms(), duration_ms);
        self.measures.push(measure);
    }

    fn evict_oldest_open(&mut self, keep: &str) {
        let oldest = self
            .open
            .iter()
            .filter(|(name, _)| name.as_str() != keep)
            .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(name, _)| name.clone());

        if let Some(name) = oldest {
            self.open.remove(&name);
            tracing::trace!(target: CONTEXT_MARK, name = %name, "evicted stale open mark");
        }
    }

    /// Get all recorded marks in start order.
    pub fn marks(&self) -> &[MarkEntry] {
        &self.marks
    }

    /// Get all recorded measures in end order.
    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    /// Number of intervals started but not yet ended.
    pub fn open_marks(&self) -> usize {
        self.open.len()
    }

    /// Check if an interval is open for the given id.
    pub fn is_open(&self, id: &str) -> bool {
        self.open.contains_key(id)
    }

    /// Get the marks whose name starts with any of `prefixes`, in start order.
    pub fn filter_marks(&self, prefixes: &[&str]) -> Vec<&MarkEntry> {
        self.marks
            .iter()
            .filter(|entry| matches_any(&entry.name, prefixes))
            .collect()
    }

    /// Average `durations` and report the result under `name`.
    ///
    /// Returns `None` for an empty slice.
    pub fn calculate_average(&self, name: &str, durations: &[f64]) -> Option<f64> {
        let average = mean(durations)?;

        tracing::debug!(
            target: CONTEXT_AVERAGE,
            name,
            samples = durations.len(),
            average_ms = average,
            "Average: {:.2} ms | Id: {}",
            average,
            name
        );

        Some(average)
    }

    /// Drop every mark, measure and open interval.
    pub fn clear(&mut self) {
        self.marks.clear();
        self.measures.clear();
        self.open.clear();
    }

    /// Check if the store holds nothing at all.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty() && self.measures.is_empty() && self.open.is_empty()
    }

    /// Take an owned copy of the store contents.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            marks: self.marks.clone(),
            measures: self.measures.clone(),
            open_marks: self.open.len(),
        }
    }
}

impl Default for MarkStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned copy of a store's contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Recorded marks
    pub marks: Vec<MarkEntry>,
    /// Recorded measures
    pub measures: Vec<Measure>,
    /// Intervals still open
    pub open_marks: usize,
}

impl StoreSnapshot {
    /// Check if the snapshot holds nothing at all.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty() && self.measures.is_empty() && self.open_marks == 0
    }
}

/// Arithmetic mean of `samples`, or `None` when there are none.
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}
