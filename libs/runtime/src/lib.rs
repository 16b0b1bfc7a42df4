//! Process-level plumbing shared by the server binary: layered configuration,
//! logging setup and shutdown signals.

pub mod config;
pub mod logging;
pub mod shutdown;

pub use config::{
    default_logging_config, AppConfig, CliArgs, DatabaseConfig, LoggingConfig, Section,
    ServerConfig, MOCK_DATABASE_URL,
};
