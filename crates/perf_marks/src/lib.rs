//! Mark/Measure Timing Store
//!
//! This crate provides the timing primitive used by pipeline instrumentation:
//! - Marks: named timing points that open an interval
//! - Measures: closed intervals with an elapsed duration in milliseconds
//! - Prefix filtering, averaging, and per-cycle clearing
//!
//! The store is a plain value with no global state. Callers that share one
//! across threads wrap it in a `Mutex`.
//!
//! # Example
//!
//! ```rust
//! use perf_marks::{Mark, MarkStore};
//!
//! let mut store = MarkStore::new();
//! let mark = Mark::new("triggerEvent:notificationTemplate:t1:event:tx1");
//!
//! store.start(&mark);
//! // ... step being measured ...
//! store.end(&mark);
//!
//! let durations: Vec<f64> = store.measures().iter().map(|m| m.duration_ms).collect();
//! let average = store.calculate_average("triggerEvent", &durations);
//! assert!(average.is_some());
//!
//! store.clear();
//! ```

mod mark;
mod store;

pub use mark::*;
pub use store::*;
