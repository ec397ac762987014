//! Event Pipeline Performance Instrumentation
//!
//! This crate measures the latency of individual steps of the event trigger
//! pipeline and reports per-step average durations:
//!
//! - Deterministic mark identifiers per operation category
//! - An execution gate so instrumentation has no effect outside test mode
//! - Per-category averaging of closed measures, once per reporting cycle
//! - Optional logging of marks and measures through `tracing`
//!
//! # Categories
//!
//! | Category | Identifier |
//! |---|---|
//! | `ENDPOINT_TRIGGER_EVENT` | `endpoint:triggerEvent:event:{transaction}` |
//! | `TRIGGER_EVENT` | `triggerEvent:notificationTemplate:{template}:event:{transaction}` |
//! | `CREATE_NOTIFICATION_JOBS` | `createNotificationJobs:notificationTemplate:{template}:event:{transaction}:subscriber:{subscriber}` |
//! | `DIGEST_FILTER_STEPS` | `digestFilterSteps:event:{transaction}:template:{template}:notification:{notification}:subscriber:{subscriber}:steps` |
//!
//! # Example
//!
//! ```rust
//! use events_perf::{Category, EventsPerformance, InstrumentationConfig, LogOptions};
//!
//! let config = InstrumentationConfig::for_tests().with_logging(LogOptions::all());
//! let perf = EventsPerformance::new(&config);
//!
//! let request = perf.build_endpoint_trigger_event_mark("tx-1");
//! let jobs = perf.build_create_notification_jobs_mark("template-1", "tx-1", "subscriber-1");
//! perf.set_end(&jobs);
//! perf.set_end(&request);
//!
//! let report = perf.publish_results();
//! assert_eq!(report.averages.len(), 2);
//! assert!(report.average(Category::DigestFilterSteps).is_none());
//! ```
//!
//! # Modules
//!
//! - [`category`] - Operation categories and identifier templates
//! - [`config`] - Runtime mode and logging configuration
//! - [`error`] - Error types
//! - [`report`] - Cycle results
//! - [`service`] - The instrumentation facade

pub mod category;
pub mod config;
mod error;
pub mod report;
pub mod service;

pub use category::Category;
pub use config::{InstrumentationConfig, LogOptions, RuntimeMode, RUNTIME_MODE_ENV};
pub use error::{PerfError, PerfResult};
pub use report::{CategoryAverage, CycleReport};
pub use service::{EventsPerformance, MarkGuard};

pub use perf_marks::{Mark, MarkEntry, MarkStore, Measure, StoreSnapshot};
