//! CLI 模块
//!
//! 提供命令行接口，支持以下功能：
//!
//! - `evaluate` - 根据家庭环境事实评估规则，输出空调决策
//! - `export` - 导出当前生效的规则集合，便于编辑后重新传入
//!
//! # 使用示例
//!
//! ```bash
//! # 使用内置规则评估
//! ac-controller evaluate -t 27 -H 50 --time-of-day night
//!
//! # 使用规则文件并输出追踪
//! ac-controller evaluate -t 31 -H 75 --rules config/rules.yaml --trace
//!
//! # 导出内置规则为 YAML
//! ac-controller export -f yaml > my_rules.yaml
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands, EvaluateArgs};
pub use runner::CommandRunner;
