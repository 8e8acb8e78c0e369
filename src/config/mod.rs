//! Layered application configuration

mod app_config;

pub use app_config::{AppConfig, AuthSettings, LogFormat, LoggingConfig, ServerConfig, StorageSettings};
