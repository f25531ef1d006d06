//! 统一可观测性模块
//!
//! 所有二进制通过单一入口点初始化日志，确保一致的输出格式和过滤规则。

pub mod tracing;

use ::tracing::debug;
use anyhow::Result;
use serde::Deserialize;

use crate::config::AppConfig;

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// 服务名称
    pub service_name: String,

    /// 日志级别（如 "info", "debug"）
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 是否启用 JSON 格式日志
    #[serde(default)]
    pub json_logs: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown-service".to_string(),
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl ObservabilityConfig {
    /// 从应用配置构建
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            service_name: config.service_name.clone(),
            log_level: config.observability.log_level.clone(),
            json_logs: config.observability.json_logs(),
        }
    }

    /// 覆盖日志级别（命令行参数优先于配置文件）
    pub fn with_log_level(mut self, log_level: Option<&str>) -> Self {
        if let Some(level) = log_level {
            self.log_level = level.to_string();
        }
        self
    }
}

/// 统一初始化可观测性
///
/// # Example
///
/// ```ignore
/// use climate_shared::config::AppConfig;
/// use climate_shared::observability::{self, ObservabilityConfig};
///
/// fn main() -> anyhow::Result<()> {
///     let config = AppConfig::load("ac-controller")?;
///     observability::init(&ObservabilityConfig::from_app_config(&config))?;
///     Ok(())
/// }
/// ```
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    tracing::init(config)?;

    debug!(
        service = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Observability initialized"
    );

    Ok(())
}
