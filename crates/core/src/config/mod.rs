//! 配置管理
//!
//! 配置按以下顺序合并，后者覆盖前者：
//!
//! 1. 内置默认值
//! 2. TOML 配置文件（默认 `config/taskboard.toml`，不存在时跳过）
//! 3. `TASKBOARD_` 前缀的环境变量，层级之间用 `__` 分隔，
//!    例如 `TASKBOARD_DATABASE__MAX_CONNECTIONS=20`
//! 4. 部署环境常用的 `PORT` 与 `DATABASE_URL`
//!
//! ```rust,no_run
//! use taskboard_core::config::AppConfig;
//!
//! let config = AppConfig::load(None).expect("加载配置失败");
//! println!("监听地址: {}", config.api.bind_address);
//! ```

pub mod models;

pub use models::{ApiConfig, AppConfig, DatabaseConfig, ObservabilityConfig};

/// 未显式指定配置文件时尝试的默认路径
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["config/taskboard.toml", "taskboard.toml"];

/// 环境变量前缀
pub const ENV_PREFIX: &str = "TASKBOARD";
