//! 空调控制规则引擎
//!
//! 单遍前向规则评估：
//! - 条件为 `[field, operator, value]` 三元组，规则内条件为 AND 关系
//! - 结构不合法或无法比较的条件一律视为不匹配，评估过程从不报错
//! - 命中规则按优先级降序稳定排序，第一条的动作即为最终动作

pub mod error;
pub mod evaluator;
pub mod executor;
pub mod models;
pub mod operators;
pub mod value;

pub use error::{Result, RuleError};
pub use evaluator::ConditionEvaluator;
pub use executor::{run_rules, RuleExecutor};
pub use models::{Action, Condition, Decision, FactSet, Rule, NO_ACTION, NO_RULE_MATCHED};
pub use operators::Operator;
pub use value::FactValue;
