//! Metrics collection and exposition.
//!
//! # Metrics
//! - `airdrop_bundles_total` (counter): submitted bundles by status
//! - `airdrop_recipients_total` (counter): recorded recipients by status
//! - `airdrop_rate_limited_total` (counter): rate-limit rejections from the ledger
//! - `airdrop_rpc_queries_total` (counter): paced read queries
//! - `airdrop_bundle_recipients` (histogram): recipients per submitted bundle
//!
//! Recording is a no-op until a recorder is installed, so library code and
//! tests can call these freely.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder with a scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_bundle(status: &'static str, recipients: usize) {
    counter!("airdrop_bundles_total", "status" => status).increment(1);
    histogram!("airdrop_bundle_recipients").record(recipients as f64);
}

pub fn record_recipients(status: &'static str, count: usize) {
    counter!("airdrop_recipients_total", "status" => status).increment(count as u64);
}

pub fn record_rate_limited() {
    counter!("airdrop_rate_limited_total").increment(1);
}

pub fn record_rpc_query() {
    counter!("airdrop_rpc_queries_total").increment(1);
}
