//! CLI 命令定义
//!
//! 使用 clap derive 宏定义命令行接口结构。

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::facts::{HomeFacts, Occupancy, TimeOfDay};
use crate::render::OutputFormat;
use crate::rules::RuleFormat;

/// 基于规则的空调控制器
///
/// 根据家庭环境事实和规则集合，给出空调模式、风速和设定温度。
#[derive(Parser, Debug)]
#[command(name = "ac-controller")]
#[command(version, about = "基于规则的家庭空调控制器")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，覆盖配置文件
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// 配置目录，默认读取 CONFIG_DIR 或 ./config
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令枚举
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 评估家庭环境，给出空调决策
    Evaluate(EvaluateArgs),

    /// 导出当前规则集合（可编辑后通过 --rules 或 --rules-text 传回）
    Export {
        /// 规则文件路径（JSON/YAML），默认使用配置中的路径或内置规则
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// 输出格式
        #[arg(short, long, value_enum, default_value_t = RuleFormat::Json)]
        format: RuleFormat,
    },
}

/// evaluate 子命令参数
#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// 室温（°C，10 到 40）
    #[arg(short, long, default_value_t = 22.0)]
    pub temperature: f64,

    /// 相对湿度（%，0 到 100）
    #[arg(short = 'H', long, default_value_t = 46.0)]
    pub humidity: f64,

    /// 居住状态
    #[arg(short, long, value_enum, default_value_t = Occupancy::Occupied)]
    pub occupancy: Occupancy,

    /// 时段
    #[arg(long, value_enum, default_value_t = TimeOfDay::Night)]
    pub time_of_day: TimeOfDay,

    /// 窗户是否打开
    #[arg(short, long)]
    pub windows_open: bool,

    /// 额外事实（可重复），格式为 key=<json>，如 --fact pressure=1013
    #[arg(long = "fact", value_name = "KEY=VALUE")]
    pub extra_facts: Vec<String>,

    /// 规则文件路径（JSON/YAML），覆盖配置
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// 规则文本（用户编辑的规则），无效时回退到规则文件或内置规则
    #[arg(long)]
    pub rules_text: Option<String>,

    /// 规则文本格式
    #[arg(long, value_enum, default_value_t = RuleFormat::Json)]
    pub rules_format: RuleFormat,

    /// 输出评估追踪
    #[arg(long)]
    pub trace: bool,

    /// 输出格式
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl EvaluateArgs {
    pub fn home_facts(&self) -> HomeFacts {
        HomeFacts {
            temperature: self.temperature,
            humidity: self.humidity,
            occupancy: self.occupancy,
            time_of_day: self.time_of_day,
            windows_open: self.windows_open,
        }
    }
}

// ============================================================================
// 单元测试
// ============================================================================
