//! 基于规则的家庭空调控制器
//!
//! 在规则引擎之外补齐应用边界：事实采集与校验、规则来源（内置规则、规则文件、
//! 用户编辑的规则文本）以及结果展示。

pub mod cli;
pub mod error;
pub mod facts;
pub mod render;
pub mod rules;

pub use error::{ControllerError, Result};
pub use facts::{HomeFacts, Occupancy, TimeOfDay};

/// 服务名，用于加载 config/{service_name}.toml
pub const SERVICE_NAME: &str = "ac-controller";
