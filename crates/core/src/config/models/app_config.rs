use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::{
    api_observability::{ApiConfig, ObservabilityConfig},
    database::DatabaseConfig,
};
use crate::config::{DEFAULT_CONFIG_PATHS, ENV_PREFIX};

/// System configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from config file and process environment
    ///
    /// Load order:
    /// 1. Default configuration
    /// 2. Config file (TOML format)
    /// 3. Environment variable overrides (prefix: TASKBOARD_, nesting: `__`)
    /// 4. `PORT` / `DATABASE_URL`
    ///
    /// An explicitly given `config_path` must exist; the default paths are optional.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        Self::load_from(config_path, None)
    }

    /// Same as [`AppConfig::load`], but reads environment overrides from `env`
    /// instead of the process environment when it is provided.
    pub fn load_from(config_path: Option<&str>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let defaults = AppConfig::default();
        let mut builder = ConfigBuilder::builder()
            .set_default("database.url", defaults.database.url.as_str())?
            .set_default("database.max_connections", defaults.database.max_connections as i64)?
            .set_default("database.min_connections", defaults.database.min_connections as i64)?
            .set_default(
                "database.connection_timeout_seconds",
                defaults.database.connection_timeout_seconds as i64,
            )?
            .set_default("api.bind_address", defaults.api.bind_address.as_str())?
            .set_default("api.cors_enabled", defaults.api.cors_enabled)?
            .set_default("api.cors_origins", defaults.api.cors_origins.clone())?
            .set_default(
                "api.request_timeout_seconds",
                defaults.api.request_timeout_seconds as i64,
            )?
            .set_default("observability.log_level", defaults.observability.log_level.as_str())?
            .set_default("observability.log_format", defaults.observability.log_format.as_str())?;

        // 1. Config file
        match config_path {
            Some(path) => {
                if !Path::new(path).exists() {
                    return Err(anyhow::anyhow!("配置文件不存在: {}", path));
                }
                debug!("加载配置文件: {path}");
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            }
            None => {
                if let Some(path) = DEFAULT_CONFIG_PATHS
                    .iter()
                    .find(|path| Path::new(path).exists())
                {
                    debug!("加载默认配置文件: {path}");
                    builder = builder.add_source(File::new(path, FileFormat::Toml));
                }
            }
        }

        // 2. Prefixed environment variables
        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);
        let environment = match &env {
            Some(vars) => environment.source(Some(vars.clone().into_iter().collect())),
            None => environment,
        };
        builder = builder.add_source(environment);

        // 3. Deployment-style bare variables
        let lookup = |key: &str| match &env {
            Some(vars) => vars.get(key).cloned(),
            None => std::env::var(key).ok(),
        };
        if let Some(url) = lookup("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        let mut config: AppConfig = builder
            .build()
            .context("构建配置失败")?
            .try_deserialize()
            .context("反序列化配置失败")?;

        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .parse()
                .with_context(|| format!("PORT 不是有效的端口号: {port}"))?;
            config.api = config.api.with_port(port);
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("解析TOML配置失败")?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置为TOML失败")
    }

    /// Validate configuration effectiveness
    pub fn validate(&self) -> Result<()> {
        self.database.validate().context("数据库配置验证失败")?;

        self.api.validate().context("API配置验证失败")?;

        self.observability
            .validate()
            .context("可观测性配置验证失败")?;

        Ok(())
    }
}
