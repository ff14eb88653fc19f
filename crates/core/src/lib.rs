pub mod config;
pub mod errors;
pub mod logging;

pub use config::{ApiConfig, AppConfig, DatabaseConfig, ObservabilityConfig};
pub use errors::*;
pub use logging::{init_logging, LogFormat};
