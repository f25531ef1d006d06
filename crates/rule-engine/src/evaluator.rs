//! 条件评估器
//!
//! 实现各操作符的评估逻辑。评估器对外从不返回错误：结构不合法、字段缺失、
//! 类型无法比较、容器不可迭代等情况一律视为不匹配。

use crate::error::{Result, RuleError};
use crate::models::{Condition, FactSet};
use crate::operators::Operator;
use crate::value::FactValue;
use std::cmp::Ordering;
use tracing::debug;

/// 条件评估器
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// 评估单个条件
    pub fn evaluate(facts: &FactSet, condition: &Condition) -> bool {
        let Condition::Clause {
            field,
            operator,
            value,
        } = condition
        else {
            return false;
        };

        // 字段不存在时直接不匹配
        let Some(fact) = facts.get(field) else {
            return false;
        };

        match Self::apply(fact, *operator, value) {
            Ok(matched) => matched,
            Err(e) => {
                debug!(
                    field = %field,
                    operator = %operator,
                    error = %e,
                    "Condition evaluation failed, treating as not matched"
                );
                false
            }
        }
    }

    /// 对事实值应用操作符
    ///
    /// # Arguments
    /// * `fact` - 事实集合中的字段值
    /// * `operator` - 操作符
    /// * `expected` - 条件中的字面量
    pub fn apply(fact: &FactValue, operator: Operator, expected: &FactValue) -> Result<bool> {
        match operator {
            Operator::Eq => Ok(fact == expected),
            Operator::Neq => Ok(fact != expected),
            Operator::Gt => Self::compare(fact, operator, expected, Ordering::is_gt),
            Operator::Gte => Self::compare(fact, operator, expected, Ordering::is_ge),
            Operator::Lt => Self::compare(fact, operator, expected, Ordering::is_lt),
            Operator::Lte => Self::compare(fact, operator, expected, Ordering::is_le),
            Operator::In => Self::in_container(fact, expected),
            Operator::NotIn => Self::in_container(fact, expected).map(|r| !r),
        }
    }

    /// 有序比较
    fn compare<F>(fact: &FactValue, operator: Operator, expected: &FactValue, cmp: F) -> Result<bool>
    where
        F: Fn(Ordering) -> bool,
    {
        fact.compare(expected)
            .map(cmp)
            .ok_or_else(|| RuleError::TypeMismatch {
                operator: operator.to_string(),
                left: fact.type_name().to_string(),
                right: expected.type_name().to_string(),
            })
    }

    /// 成员检查 (in)
    fn in_container(fact: &FactValue, container: &FactValue) -> Result<bool> {
        container.contains(fact).ok_or_else(|| {
            RuleError::NotIterable(format!(
                "无法在 {} 中查找 {}",
                container.type_name(),
                fact.type_name()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn home_facts() -> FactSet {
        FactSet::new()
            .with("temperature", 22.0)
            .with("humidity", 46.0)
            .with("occupancy", "OCCUPIED")
            .with("time_of_day", "NIGHT")
            .with("windows_open", false)
    }

    fn eval(cond: serde_json::Value) -> bool {
        ConditionEvaluator::evaluate(&home_facts(), &Condition::from_raw(cond))
    }

    #[test]
    fn test_eq_numbers() {
        assert!(eval(json!(["temperature", "==", 22])));
        assert!(eval(json!(["temperature", "==", 22.0])));
        assert!(!eval(json!(["temperature", "==", 23])));
    }

    #[test]
    fn test_eq_strings() {
        assert!(eval(json!(["occupancy", "==", "OCCUPIED"])));
        assert!(!eval(json!(["occupancy", "==", "EMPTY"])));
        assert!(eval(json!(["occupancy", "!=", "EMPTY"])));
    }

    #[test]
    fn test_eq_booleans() {
        assert!(eval(json!(["windows_open", "==", false])));
        assert!(eval(json!(["windows_open", "!=", true])));
    }

    #[test]
    fn test_booleans_never_equal_numbers() {
        assert!(!eval(json!(["windows_open", "==", 0])));
        assert!(eval(json!(["windows_open", "!=", 0])));
        assert!(!eval(json!(["windows_open", "<", 1])));
    }

    #[test]
    fn test_eq_across_types_is_unequal() {
        assert!(!eval(json!(["temperature", "==", "22"])));
        assert!(eval(json!(["temperature", "!=", "22"])));
    }

    #[test]
    fn test_numeric_comparisons() {
        assert!(eval(json!(["temperature", ">", 21])));
        assert!(eval(json!(["temperature", ">=", 22])));
        assert!(eval(json!(["temperature", "<", 23])));
        assert!(eval(json!(["temperature", "<=", 22])));
        assert!(!eval(json!(["temperature", ">=", 26])));
        assert!(!eval(json!(["humidity", "<", 46])));
    }

    #[test]
    fn test_string_ordering() {
        assert!(eval(json!(["time_of_day", ">", "MORNING"])));
        assert!(!eval(json!(["time_of_day", "<", "EVENING"])));
    }

    #[test]
    fn test_incomparable_ordering_is_false() {
        assert!(!eval(json!(["temperature", ">", "20"])));
        assert!(!eval(json!(["occupancy", "<=", 5])));
        assert!(!eval(json!(["windows_open", ">", null])));
    }

    #[test]
    fn test_in_list() {
        assert!(eval(json!(["time_of_day", "in", ["EVENING", "NIGHT"]])));
        assert!(!eval(json!(["time_of_day", "in", ["MORNING", "AFTERNOON"]])));
        assert!(eval(json!(["temperature", "in", [20, 22, 24]])));
    }

    #[test]
    fn test_not_in_list() {
        assert!(eval(json!(["time_of_day", "not_in", ["MORNING", "AFTERNOON"]])));
        assert!(!eval(json!(["time_of_day", "not_in", ["EVENING", "NIGHT"]])));
    }

    #[test]
    fn test_in_substring() {
        assert!(eval(json!(["occupancy", "in", "UNOCCUPIED"])));
        assert!(eval(json!(["occupancy", "not_in", "VACANT"])));
    }

    #[test]
    fn test_non_iterable_container_is_false_both_ways() {
        assert!(!eval(json!(["temperature", "in", 22])));
        assert!(!eval(json!(["temperature", "not_in", 22])));
        assert!(!eval(json!(["temperature", "in", "22"])));
        assert!(!eval(json!(["temperature", "not_in", "22"])));
    }

    #[test]
    fn test_missing_field() {
        assert!(!eval(json!(["pressure", "==", 1013])));
        assert!(!eval(json!(["pressure", "!=", 1013])));
        assert!(!eval(json!(["pressure", "not_in", [1013]])));
    }

    #[test]
    fn test_unknown_operator() {
        assert!(!eval(json!(["temperature", "=~", 22])));
        assert!(!eval(json!(["temperature", "eq", 22])));
    }

    #[test]
    fn test_wrong_arity() {
        assert!(!eval(json!([])));
        assert!(!eval(json!(["temperature"])));
        assert!(!eval(json!(["temperature", "=="])));
        assert!(!eval(json!(["temperature", "==", 22, 23])));
        assert!(!eval(json!({"field": "temperature", "operator": "==", "value": 22})));
    }

    #[test]
    fn test_apply_reports_type_errors() {
        let err = ConditionEvaluator::apply(&FactValue::from(1), Operator::Gt, &FactValue::from("a"))
            .unwrap_err();
        assert!(matches!(err, RuleError::TypeMismatch { .. }));

        let err = ConditionEvaluator::apply(&FactValue::from(1), Operator::In, &FactValue::from(2))
            .unwrap_err();
        assert!(matches!(err, RuleError::NotIterable(_)));
    }
}
