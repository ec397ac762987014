//! Integration tests for reporting cycles
//!
//! These tests drive the facade the way the trigger pipeline does: build marks
//! at step boundaries, close them, then publish once per cycle.

use events_perf::{
    Category, EventsPerformance, InstrumentationConfig, LogOptions, MarkStore, RuntimeMode,
};
use std::sync::Arc;
use std::thread;

/// Runs every public operation against the facade.
fn drive_all_operations(perf: &EventsPerformance) {
    let request = perf.build_endpoint_trigger_event_mark("tx");
    let trigger = perf.build_trigger_event_mark("tpl", "tx");
    let jobs = perf.build_create_notification_jobs_mark("tpl", "tx", "sub");
    let digest = perf.build_digest_filter_steps_mark("tx", "tpl", "n", "sub");
    perf.set_end(&digest);
    perf.set_end(&jobs);
    perf.set_end(&trigger);
    perf.set_end(&request);
    perf.set_end(&request);
}

#[test]
fn test_disabled_gate_has_no_observable_effect() {
    for mode in [RuntimeMode::Development, RuntimeMode::Staging, RuntimeMode::Production] {
        let perf = EventsPerformance::new(&InstrumentationConfig::new(mode));

        drive_all_operations(&perf);
        assert!(perf.snapshot().is_empty(), "{:?} must not record", mode);

        let report = perf.publish_results_with(LogOptions::all());
        assert!(report.is_empty());
        assert_eq!(report.marks_seen, 0);
        assert!(perf.snapshot().is_empty());
    }
}

#[test]
fn test_full_cycle_reports_every_category() {
    let perf = EventsPerformance::new(&InstrumentationConfig::for_tests());

    drive_all_operations(&perf);
    let report = perf.publish_results();

    for category in Category::ALL {
        let entry = report.get(category).expect("category should be reported");
        assert_eq!(entry.samples, 1);
        assert!(entry.average_ms >= 0.0);
    }
    assert_eq!(report.marks_seen, 4);
    assert_eq!(report.measures_seen, 4);
    assert!(perf.snapshot().is_empty());
}

#[test]
fn test_measures_never_leak_into_next_cycle() {
    let perf = EventsPerformance::new(&InstrumentationConfig::for_tests());

    let first = perf.build_trigger_event_mark("tpl", "tx-1");
    perf.set_end(&first);
    assert_eq!(perf.publish_results().get(Category::TriggerEvent).unwrap().samples, 1);

    let second = perf.build_trigger_event_mark("tpl", "tx-2");
    perf.set_end(&second);
    let report = perf.publish_results();
    assert_eq!(report.get(Category::TriggerEvent).unwrap().samples, 1);
    assert_eq!(report.measures_seen, 1);
}

#[test]
fn test_unclosed_marks_are_absent_from_aggregates() {
    let perf = EventsPerformance::new(&InstrumentationConfig::for_tests());

    let _never_closed = perf.build_digest_filter_steps_mark("tx", "tpl", "n", "s");
    let closed = perf.build_endpoint_trigger_event_mark("tx");
    perf.set_end(&closed);

    let report = perf.publish_results();
    assert_eq!(report.averages.len(), 1);
    assert!(report.average(Category::DigestFilterSteps).is_none());
    assert_eq!(report.marks_seen, 2);
}

#[test]
fn test_synthetic_measures_average_per_category() {
    let mut store = MarkStore::new();
    store.record_measure("triggerEvent:A", 10.0);
    store.record_measure("triggerEvent:B", 20.0);
    store.record_measure("createNotificationJobs:C", 5.0);

    let perf = EventsPerformance::from_store(&InstrumentationConfig::for_tests(), store);
    let report = perf.publish_results();

    assert_eq!(report.average(Category::TriggerEvent), Some(15.0));
    assert_eq!(report.average(Category::CreateNotificationJobs), Some(5.0));
    assert_eq!(report.average(Category::DigestFilterSteps), None);
    assert_eq!(report.average(Category::EndpointTriggerEvent), None);

    let second = perf.publish_results();
    assert!(second.is_empty());
    assert!(perf.snapshot().is_empty());
}

#[test]
fn test_shared_facade_across_threads() {
    let perf = Arc::new(EventsPerformance::new(&InstrumentationConfig::for_tests()));

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let perf = Arc::clone(&perf);
            thread::spawn(move || {
                for job in 0..10 {
                    let transaction_id = format!("tx-{}-{}", worker, job);
                    let mark = perf.build_create_notification_jobs_mark("tpl", &transaction_id, "sub");
                    perf.set_end(&mark);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let report = perf.publish_results();
    assert_eq!(report.get(Category::CreateNotificationJobs).unwrap().samples, 40);
}

#[test]
fn test_config_limits_reach_store() {
    let config = InstrumentationConfig {
        max_open_marks: 1,
        ..InstrumentationConfig::for_tests()
    };
    let perf = EventsPerformance::new(&config);

    let first = perf.build_endpoint_trigger_event_mark("tx-1");
    let _second = perf.build_endpoint_trigger_event_mark("tx-2");
    perf.set_end(&first);

    let snapshot = perf.snapshot();
    assert_eq!(snapshot.open_marks, 1);
    assert!(snapshot.measures.is_empty());
}

#[test]
fn test_every_closed_measure_is_averaged() {
    let config = InstrumentationConfig {
        max_open_marks: 2,
        ..InstrumentationConfig::for_tests()
    };
    let perf = EventsPerformance::new(&config);

    let closed = 25;
    for index in 0..closed {
        let mark = perf.build_trigger_event_mark("tpl", &format!("tx-{}", index));
        perf.set_end(&mark);
    }

    let report = perf.publish_results();
    assert_eq!(report.get(Category::TriggerEvent).unwrap().samples, closed);
    assert_eq!(report.measures_seen, closed);
    assert_eq!(report.marks_seen, closed);
}
