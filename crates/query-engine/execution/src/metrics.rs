//! Metrics setup and update for the server.

use prometheus::core::{AtomicU64, GenericCounter};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Metrics {
    pub query_total: GenericCounter<AtomicU64>,
    pub mutation_total: GenericCounter<AtomicU64>,
    pub error_total: GenericCounter<AtomicU64>,
    pub generated_identifiers_total: GenericCounter<AtomicU64>,
}

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("unable to initialise metrics: {0}")]
    PrometheusError(#[from] prometheus::Error),
}

/// Create a new int counter metric and register it with the provided Prometheus Registry
fn add_int_counter_metric(
    metrics_registry: &mut prometheus::Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<GenericCounter<AtomicU64>, InitializationError> {
    let int_counter =
        prometheus::IntCounter::with_opts(prometheus::Opts::new(metric_name, metric_description))?;

    metrics_registry.register(Box::new(int_counter.clone()))?;

    Ok(int_counter)
}

/// Setup counters used to produce Prometheus metrics
pub fn initialise_metrics(
    metrics_registry: &mut prometheus::Registry,
) -> Result<Metrics, InitializationError> {
    let query_total = add_int_counter_metric(
        metrics_registry,
        "rest_store_query_total",
        "Total successful queries.",
    )?;

    let mutation_total = add_int_counter_metric(
        metrics_registry,
        "rest_store_mutation_total",
        "Total successful mutations.",
    )?;

    let error_total = add_int_counter_metric(
        metrics_registry,
        "rest_store_error_total",
        "Total requests that failed.",
    )?;

    let generated_identifiers_total = add_int_counter_metric(
        metrics_registry,
        "rest_store_generated_identifiers_total",
        "Total identifiers generated for new records.",
    )?;

    Ok(Metrics {
        query_total,
        mutation_total,
        error_total,
        generated_identifiers_total,
    })
}
