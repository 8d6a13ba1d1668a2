//! Metrics collection and exposition.
//!
//! # Metrics
//! - `console_proxy_requests_total` (counter): requests by route, status and
//!   the pipeline stage the request left at
//! - `console_proxy_upstream_duration_seconds` (histogram): backend latency
//! - `console_proxy_upstream_failures_total` (counter): network failures
//!
//! Recording is a no-op until [`init_metrics`] installs the recorder.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);

    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Prometheus exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus recorder"),
    }
}

/// Count one finished request.
pub fn record_request(route: &'static str, status: u16, stage: &'static str) {
    metrics::counter!(
        "console_proxy_requests_total",
        "route" => route,
        "status" => status.to_string(),
        "stage" => stage
    )
    .increment(1);
}

/// Record one backend round trip. Failures are counted separately.
pub fn record_upstream(route: &'static str, elapsed: Duration, ok: bool) {
    metrics::histogram!("console_proxy_upstream_duration_seconds", "route" => route)
        .record(elapsed.as_secs_f64());

    if !ok {
        metrics::counter!("console_proxy_upstream_failures_total", "route" => route).increment(1);
    }
}
