//! Runs one simulated trigger cycle through the instrumentation facade and
//! prints the resulting report as JSON.
//!
//! Set `APP_ENV=test` to enable instrumentation explicitly; when unset the
//! demo enables it anyway so there is something to report. Use `RUST_LOG`
//! (e.g. `RUST_LOG=perf=debug`) to see mark and measure logs.

use events_perf::{EventsPerformance, InstrumentationConfig, LogOptions, PerfResult, RUNTIME_MODE_ENV};
use std::thread::sleep;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SUBSCRIBERS: [&str; 3] = ["subscriber-1", "subscriber-2", "subscriber-3"];

fn main() -> PerfResult<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::var_os(RUNTIME_MODE_ENV) {
        Some(_) => InstrumentationConfig::from_env(),
        None => InstrumentationConfig::for_tests(),
    };
    let config = config.with_logging(LogOptions::all());

    tracing::info!(mode = ?config.mode, enabled = config.is_enabled(), "Starting perf cycle");

    let perf = EventsPerformance::new(&config);
    simulate_trigger(&perf, "tx-1001", "template-welcome");
    simulate_trigger(&perf, "tx-1002", "template-digest");

    let report = perf.publish_results();
    println!("{}", report.to_json()?);

    Ok(())
}

fn simulate_trigger(perf: &EventsPerformance, transaction_id: &str, template_id: &str) {
    let _request = perf.guard(perf.build_endpoint_trigger_event_mark(transaction_id));

    let trigger = perf.build_trigger_event_mark(template_id, transaction_id);
    for (index, subscriber_id) in SUBSCRIBERS.iter().enumerate() {
        let jobs = perf.build_create_notification_jobs_mark(template_id, transaction_id, subscriber_id);
        sleep(Duration::from_millis(1 + index as u64));
        perf.set_end(&jobs);

        let notification_id = format!("{}-notification-{}", transaction_id, index);
        let digest = perf.build_digest_filter_steps_mark(
            transaction_id,
            template_id,
            &notification_id,
            subscriber_id,
        );
        sleep(Duration::from_millis(1));
        perf.set_end(&digest);
    }
    perf.set_end(&trigger);
}
