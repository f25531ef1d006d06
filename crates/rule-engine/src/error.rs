//! 规则引擎错误类型
//!
//! 条件评估过程中的错误只在引擎内部流转，到达评估器边界时统一折叠为 `false`；
//! 对外暴露的只有操作符解析错误。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("无效的操作符: {0}")]
    InvalidOperator(String),

    #[error("类型不匹配: {operator} 无法比较 {left} 与 {right}")]
    TypeMismatch {
        operator: String,
        left: String,
        right: String,
    },

    #[error("不可迭代的容器: {0}")]
    NotIterable(String),
}

pub type Result<T> = std::result::Result<T, RuleError>;
