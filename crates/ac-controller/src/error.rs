//! 空调控制器错误类型
//!
//! 规则来源与事实采集位于引擎边界之外，这里的错误都需要调用方处理
//! （回退到默认规则，或直接拒绝输入）。

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// 规则文件不存在或无法读取
    #[error("读取规则文件失败: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("规则 JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("规则 YAML 解析失败: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// 规则集合顶层必须是数组
    #[error("规则必须是数组，实际为 {0}")]
    NotAnArray(&'static str),

    /// 事实值超出允许范围或格式错误
    #[error("无效的事实值: {field} - {message}")]
    InvalidFact { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, ControllerError>;
