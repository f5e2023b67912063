/// Prometheus metrics for training, inference and the HTTP surface
///
/// # Example
/// ```no_run
/// use asset_owner_predictor::metrics::PREDICTIONS_TOTAL;
///
/// PREDICTIONS_TOTAL.with_label_values(&["success"]).inc();
/// ```

mod middleware;

pub use middleware::track_metrics;

use lazy_static::lazy_static;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry};

const NAMESPACE: &str = "asset_owner_predictor";

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    // ============================================================================
    // HTTP Metrics
    // ============================================================================

    /// Total number of HTTP requests received
    ///
    /// Labels: method, path, status_code
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "path", "status_code"]
    ).expect("Failed to create HTTP_REQUESTS_TOTAL metric");

    /// HTTP request duration in seconds
    ///
    /// Labels: method, path
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["method", "path"]
    ).expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric");

    // ============================================================================
    // Training Metrics
    // ============================================================================

    /// Training runs by outcome
    ///
    /// Labels: outcome (success, failure)
    pub static ref TRAINING_RUNS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("training_runs_total", "Total number of model training runs").namespace(NAMESPACE),
        &["outcome"]
    ).expect("Failed to create TRAINING_RUNS_TOTAL metric");

    /// Wall time of a full training run (both forests)
    pub static ref TRAINING_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new("training_duration_seconds", "Model training duration in seconds")
            .namespace(NAMESPACE)
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
    ).expect("Failed to create TRAINING_DURATION_SECONDS metric");

    /// Rows in the dataset behind the live model
    pub static ref TRAINING_ROWS: IntGauge = IntGauge::with_opts(
        Opts::new("training_rows", "Rows in the most recent successful training dataset")
            .namespace(NAMESPACE)
    ).expect("Failed to create TRAINING_ROWS metric");

    // ============================================================================
    // Inference Metrics
    // ============================================================================

    /// Predictions by outcome
    ///
    /// Labels: outcome (success, failure)
    pub static ref PREDICTIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("predictions_total", "Total number of owner predictions").namespace(NAMESPACE),
        &["outcome"]
    ).expect("Failed to create PREDICTIONS_TOTAL metric");

    /// Categorical values at inference time that were never seen in training
    ///
    /// Labels: column
    pub static ref UNSEEN_CATEGORIES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("unseen_categories_total", "Unseen categorical values mapped to the sentinel code")
            .namespace(NAMESPACE),
        &["column"]
    ).expect("Failed to create UNSEEN_CATEGORIES_TOTAL metric");
}

/// Register all metrics with the global registry
///
/// Call once at startup; a second call fails with `AlreadyReg`.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    PROMETHEUS_REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(TRAINING_RUNS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(TRAINING_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(TRAINING_ROWS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(PREDICTIONS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(UNSEEN_CATEGORIES_TOTAL.clone()))?;

    tracing::info!("Prometheus metrics initialized");
    Ok(())
}

/// Gather all metrics in Prometheus text format
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_increment() {
        let before = PREDICTIONS_TOTAL.with_label_values(&["success"]).get();
        PREDICTIONS_TOTAL.with_label_values(&["success"]).inc();
        assert!(PREDICTIONS_TOTAL.with_label_values(&["success"]).get() > before);
    }

    #[test]
    fn test_gather_after_init() {
        // the registry is process-global, so another test may have registered first
        let _ = init_metrics();
        TRAINING_RUNS_TOTAL.with_label_values(&["success"]).inc();

        let output = gather_metrics();
        assert!(output.contains("asset_owner_predictor_training_runs_total"));
    }
}
