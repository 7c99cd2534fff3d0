//! Metrics collection and exposition.
//!
//! # Metrics
//! - `inspector_webhooks_received_total` (counter)
//! - `inspector_event_log_size` (gauge): events held in memory
//! - `inspector_subscribers` (gauge): open event streams
//! - `inspector_relay_requests_total` (counter): by `outcome` (ok, error)
//! - `inspector_config_writes_total` (counter): by `op` (save, delete)
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_webhook_received(log_size: usize, subscribers: usize) {
    counter!("inspector_webhooks_received_total").increment(1);
    gauge!("inspector_event_log_size").set(log_size as f64);
    gauge!("inspector_subscribers").set(subscribers as f64);
}

pub fn record_subscribers(subscribers: usize) {
    gauge!("inspector_subscribers").set(subscribers as f64);
}

pub fn record_relay(outcome: &'static str) {
    counter!("inspector_relay_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_config_write(op: &'static str) {
    counter!("inspector_config_writes_total", "op" => op).increment(1);
}
