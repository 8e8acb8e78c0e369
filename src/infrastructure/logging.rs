//! Log output formatting and level filtering

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    EnvFilter, Layer, Registry,
};

use crate::config::{LogFormat, LoggingConfig};

/// Boxed formatting layer, so pretty and JSON output share one subscriber type
pub type FmtLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Level filter; `RUST_LOG` wins over the configured level
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

pub fn fmt_layer(format: &LogFormat) -> FmtLayer {
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_uses_configured_level() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Json,
        };

        if std::env::var("RUST_LOG").is_err() {
            assert_eq!(env_filter(&config).to_string(), "debug");
        }
    }
}
