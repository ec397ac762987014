//! Events performance facade
//!
//! Builds category marks for the trigger pipeline, closes them, and turns the
//! accumulated measures into per-category averages once per reporting cycle.
//!
//! # Example
//!
//! ```rust
//! use events_perf::{Category, EventsPerformance, InstrumentationConfig};
//!
//! let perf = EventsPerformance::new(&InstrumentationConfig::for_tests());
//!
//! let mark = perf.build_trigger_event_mark("template-1", "tx-1");
//! // ... process the trigger ...
//! perf.set_end(&mark);
//!
//! let report = perf.publish_results();
//! assert!(report.average(Category::TriggerEvent).is_some());
//! ```

use crate::category::{
    create_notification_jobs_id, digest_filter_steps_id, endpoint_trigger_event_id,
    trigger_event_id, Category,
};
use crate::config::{InstrumentationConfig, LogOptions};
use crate::report::{CategoryAverage, CycleReport};
use perf_marks::{Mark, MarkStore, StoreSnapshot, CONTEXT_MARK, CONTEXT_MEASURE};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Timing facade for the event trigger pipeline.
///
/// Every operation is gated: when instrumentation is disabled, builders still
/// return a usable [`Mark`] but nothing is recorded, and closing or publishing
/// does nothing. The store lives behind a mutex, so one facade can be shared
/// across threads through an `Arc`.
#[derive(Debug)]
pub struct EventsPerformance {
    /// Gate; instrumentation has no effect while false
    enabled: AtomicBool,
    /// Logging used by `publish_results`
    logging: LogOptions,
    /// Marks and measures of the current cycle
    store: Mutex<MarkStore>,
}

impl EventsPerformance {
    /// Create a facade from the given configuration.
    pub fn new(config: &InstrumentationConfig) -> Self {
        let store = MarkStore::new().with_max_open_marks(config.max_open_marks);
        Self::from_store(config, store)
    }

    /// Create a facade that records nothing.
    pub fn disabled() -> Self {
        Self::new(&InstrumentationConfig::default())
    }

    /// Create a facade around an existing store.
    pub fn from_store(config: &InstrumentationConfig, store: MarkStore) -> Self {
        Self {
            enabled: AtomicBool::new(config.is_enabled()),
            logging: config.logging,
            store: Mutex::new(store),
        }
    }

    /// Check if instrumentation is active.
    #[inline]
    pub fn should_execute(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Open or close the gate at runtime.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    fn locked<R>(&self, f: impl FnOnce(&mut MarkStore) -> R) -> Option<R> {
        match self.store.lock() {
            Ok(mut store) => Some(f(&mut store)),
            Err(_) => {
                tracing::warn!(target: "perf", "mark store lock poisoned, skipping instrumentation");
                None
            }
        }
    }

    fn set_start(&self, mark: Mark) -> Mark {
        if self.should_execute() {
            self.locked(|store| store.start(&mark));
        }
        mark
    }

    /// Close a mark obtained from one of the builders.
    ///
    /// Closing a mark that was never started records nothing.
    pub fn set_end(&self, mark: &Mark) {
        if self.should_execute() {
            self.locked(|store| store.end(mark));
        }
    }

    /// Start timing digest filtering of workflow steps for one subscriber.
    pub fn build_digest_filter_steps_mark(
        &self,
        transaction_id: &str,
        template_id: &str,
        notification_id: &str,
        subscriber_id: &str,
    ) -> Mark {
        self.set_start(Mark::new(digest_filter_steps_id(
            transaction_id,
            template_id,
            notification_id,
            subscriber_id,
        )))
    }

    /// Start timing a trigger request at the endpoint.
    pub fn build_endpoint_trigger_event_mark(&self, transaction_id: &str) -> Mark {
        self.set_start(Mark::new(endpoint_trigger_event_id(transaction_id)))
    }

    /// Start timing trigger processing for one notification template.
    pub fn build_trigger_event_mark(
        &self,
        notification_template_id: &str,
        transaction_id: &str,
    ) -> Mark {
        self.set_start(Mark::new(trigger_event_id(
            notification_template_id,
            transaction_id,
        )))
    }

    /// Start timing job creation for one subscriber.
    pub fn build_create_notification_jobs_mark(
        &self,
        notification_template_id: &str,
        transaction_id: &str,
        subscriber_id: &str,
    ) -> Mark {
        self.set_start(Mark::new(create_notification_jobs_id(
            notification_template_id,
            transaction_id,
            subscriber_id,
        )))
    }

    /// Wrap a mark so it is closed when the guard is dropped.
    ///
    /// ```rust
    /// use events_perf::{EventsPerformance, InstrumentationConfig};
    ///
    /// let perf = EventsPerformance::new(&InstrumentationConfig::for_tests());
    /// {
    ///     let _guard = perf.guard(perf.build_endpoint_trigger_event_mark("tx-1"));
    ///     // ... handle the request ...
    /// }
    /// assert_eq!(perf.snapshot().measures.len(), 1);
    /// ```
    pub fn guard(&self, mark: Mark) -> MarkGuard<'_> {
        MarkGuard {
            perf: self,
            mark,
            closed: false,
        }
    }

    /// Run one reporting cycle with the configured logging.
    pub fn publish_results(&self) -> CycleReport {
        self.publish_results_with(self.logging)
    }

    /// Run one reporting cycle: log, average per category, then clear the store.
    ///
    /// Returns an empty report when instrumentation is disabled.
    pub fn publish_results_with(&self, options: LogOptions) -> CycleReport {
        if !self.should_execute() {
            return CycleReport::default();
        }

        self.locked(|store| {
            let marks_seen = publish_marks(store, options.show_marks);
            let averages = publish_measures(store, options.show_measures);
            let report = CycleReport {
                averages,
                marks_seen,
                measures_seen: store.measures().len(),
            };
            store.clear();
            report
        })
        .unwrap_or_default()
    }

    /// Take a copy of the current store contents.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.locked(|store| store.snapshot()).unwrap_or_default()
    }
}

impl Default for EventsPerformance {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Logs the tracked marks and returns how many there are.
fn publish_marks(store: &MarkStore, show_logs: bool) -> usize {
    let tracked = store.filter_marks(&Category::prefixes());
    if show_logs {
        for entry in &tracked {
            tracing::debug!(
                target: CONTEXT_MARK,
                name = %entry.name,
                start_ms = entry.start_ms,
                "Mark: {} at {:.2} ms",
                entry.name,
                entry.start_ms
            );
        }
    }
    tracked.len()
}

fn publish_measures(store: &MarkStore, show_logs: bool) -> Vec<CategoryAverage> {
    let mut durations: HashMap<Category, Vec<f64>> = HashMap::new();

    for measure in store.measures() {
        for category in Category::AGGREGATION_ORDER {
            if category.matches(&measure.name) {
                durations
                    .entry(category)
                    .or_default()
                    .push(measure.duration_ms);
            }
        }

        if show_logs {
            tracing::debug!(
                target: CONTEXT_MEASURE,
                name = %measure.name,
                duration_ms = measure.duration_ms,
                "Duration: {:.2} ms | Id: {}",
                measure.duration_ms,
                measure.name
            );
        }
    }

    Category::REPORT_ORDER
        .into_iter()
        .filter_map(|category| {
            let samples = durations.get(&category)?;
            let average_ms = store.calculate_average(category.prefix(), samples)?;
            Some(CategoryAverage {
                category,
                average_ms,
                samples: samples.len(),
            })
        })
        .collect()
}

/// Closes its mark when dropped.
#[derive(Debug)]
pub struct MarkGuard<'a> {
    perf: &'a EventsPerformance,
    mark: Mark,
    closed: bool,
}

impl MarkGuard<'_> {
    /// Get the guarded mark.
    pub fn mark(&self) -> &Mark {
        &self.mark
    }

    /// Close the mark now.
    pub fn finish(mut self) {
        self.close();
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.perf.set_end(&self.mark);
        }
    }
}

impl Drop for MarkGuard<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
