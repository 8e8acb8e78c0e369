//! Settings for trace export and the Prometheus scrape endpoint

use serde::Deserialize;

/// `[observability]` section of the application config
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub tracing: TracingConfig,
    pub metrics: MetricsConfig,
}

/// OTLP trace export
///
/// Export is off unless `enabled` is set; spans are still written to the
/// local log output either way.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub enabled: bool,
    /// gRPC collector endpoint
    pub otlp_endpoint: String,
    pub service_name: String,
    /// Fraction of root spans to keep, between 0.0 and 1.0
    pub sampling_ratio: f64,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            service_name: "taskflow".to_string(),
            sampling_ratio: 1.0,
        }
    }
}

/// Prometheus exposition
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl MetricsConfig {
    /// Scrape route, always rooted at `/`
    pub fn route(&self) -> String {
        let trimmed = self.path.trim().trim_start_matches('/');
        format!("/{}", trimmed)
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}
