//! 规则执行器
//!
//! 逐条评估规则（条件之间短路 AND），收集命中规则并按优先级选出最终动作。

use crate::evaluator::ConditionEvaluator;
use crate::models::{Action, Decision, FactSet, Rule};
use std::cmp::Reverse;
use tracing::debug;

/// 规则执行器
#[derive(Debug, Clone, Copy)]
pub struct RuleExecutor {
    /// 是否记录详细评估追踪
    trace_enabled: bool,
}

impl RuleExecutor {
    pub fn new() -> Self {
        Self {
            trace_enabled: false,
        }
    }

    /// 启用评估追踪
    pub fn with_trace(mut self) -> Self {
        self.trace_enabled = true;
        self
    }

    /// 判断规则是否命中（所有条件均为 true；无条件的规则恒命中，结构不合法的规则永不命中）
    pub fn matches(&self, facts: &FactSet, rule: &Rule) -> bool {
        !rule.is_malformed()
            && rule
                .conditions
                .iter()
                .all(|cond| ConditionEvaluator::evaluate(facts, cond))
    }

    /// 执行规则评估
    ///
    /// 命中规则按优先级降序排列（稳定排序，同优先级先出现者在前），
    /// 第一条命中规则的动作即为最终动作。
    pub fn run(&self, facts: &FactSet, rules: &[Rule]) -> Decision {
        let mut trace = Vec::new();

        let mut fired: Vec<Rule> = rules
            .iter()
            .enumerate()
            .filter(|(i, rule)| self.evaluate_rule(facts, rule, *i, &mut trace))
            .map(|(_, rule)| rule.clone())
            .collect();

        if fired.is_empty() {
            debug!(rules = rules.len(), "No rule matched");
            return Decision {
                evaluation_trace: trace,
                ..Decision::no_match()
            };
        }

        fired.sort_by_key(|rule| Reverse(rule.priority));

        let winner = &fired[0];
        let action = winner.action.clone().unwrap_or_else(Action::no_action);

        debug!(
            rules = rules.len(),
            fired = fired.len(),
            winner = %winner.display_name(),
            priority = winner.priority,
            ac_mode = %action.ac_mode,
            "Rule evaluation finished"
        );

        if self.trace_enabled {
            trace.push(format!(
                "selected: '{}' (priority={})",
                winner.display_name(),
                winner.priority
            ));
        }

        Decision {
            action,
            fired,
            evaluation_trace: trace,
        }
    }

    /// 评估单条规则（短路求值），按需记录追踪
    fn evaluate_rule(
        &self,
        facts: &FactSet,
        rule: &Rule,
        index: usize,
        trace: &mut Vec<String>,
    ) -> bool {
        if !self.trace_enabled {
            let matched = self.matches(facts, rule);
            debug!(rule = %rule.display_name(), priority = rule.priority, matched, "Rule evaluated");
            return matched;
        }

        let path = format!("rules[{}] '{}'", index, rule.display_name());

        if rule.is_malformed() {
            trace.push(format!("{}: 规则记录不合法 => NOT_MATCHED", path));
            return false;
        }

        if rule.conditions.is_empty() {
            trace.push(format!("{}: 无条件规则 => MATCHED", path));
            return true;
        }

        for (i, cond) in rule.conditions.iter().enumerate() {
            let matched = ConditionEvaluator::evaluate(facts, cond);
            trace.push(format!(
                "{}.conditions[{}]: {} => {}",
                path,
                i,
                cond,
                if matched { "MATCHED" } else { "NOT_MATCHED" }
            ));

            if !matched {
                trace.push(format!("{}: AND 短路 - 条件 {} 不匹配", path, i));
                return false;
            }
        }

        trace.push(format!("{}: 全部条件匹配", path));
        true
    }
}

impl Default for RuleExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// 使用默认执行器评估规则集合
pub fn run_rules(facts: &FactSet, rules: &[Rule]) -> Decision {
    RuleExecutor::new().run(facts, rules)
}
