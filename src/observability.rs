//! Observability: structured logging and Prometheus metrics.

use crate::config::ObservabilityConfig;
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured log level when set.
pub fn init(config: &ObservabilityConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    if config.json_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?;
    }

    Ok(())
}

/// Install the Prometheus recorder and register metric descriptions.
///
/// The returned handle renders the scrape payload for `/metrics`.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(handle)
}

fn register_metrics() {
    describe_counter!("hr_admin_errors_total", "Total number of errors by code");
    describe_counter!("hr_admin_logins_total", "Login attempts by outcome");
    describe_counter!(
        "hr_admin_import_rows_total",
        "Bulk import rows processed by outcome"
    );
    describe_histogram!(
        "hr_admin_import_duration_seconds",
        "Wall time of bulk import requests"
    );
}
