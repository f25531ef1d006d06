//! 评估结果展示

use rule_engine::{Action, Decision, FactSet, FactValue, Rule};
use serde::Serialize;
use std::fmt::Write as _;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// 设定温度的展示文本，空值显示为 `-`
pub fn setpoint_text(setpoint: Option<&FactValue>) -> String {
    match setpoint {
        None => "-".to_string(),
        Some(value) if value.is_null() => "-".to_string(),
        Some(value) => value
            .as_str()
            .map_or_else(|| value.to_string(), str::to_string),
    }
}

/// 渲染空调决策
pub fn render_action(action: &Action) -> String {
    format!(
        "AC Mode: {}\nFan Speed: {}\nSetpoint: {}\nReason: {}\n",
        action.ac_mode,
        action.fan_speed,
        setpoint_text(action.setpoint.as_ref()),
        action.reason
    )
}

/// 渲染命中规则列表（已按优先级排序）
pub fn render_fired(fired: &[Rule]) -> String {
    if fired.is_empty() {
        return "No rules matched.\n".to_string();
    }

    let mut out = String::new();
    for (i, rule) in fired.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} | priority={}",
            i + 1,
            rule.display_name(),
            rule.priority
        );

        let action = rule
            .action
            .as_ref()
            .and_then(|a| serde_json::to_string(a).ok())
            .unwrap_or_else(|| "{}".to_string());
        let _ = writeln!(out, "   Action: {}", action);

        let _ = writeln!(out, "   Conditions:");
        for cond in &rule.conditions {
            let text = serde_json::to_string(cond).unwrap_or_else(|_| cond.to_string());
            let _ = writeln!(out, "     {}", text);
        }
    }
    out
}

/// 完整文本报告
pub fn render_report(facts: &FactSet, decision: &Decision, warnings: &[String]) -> String {
    let mut out = String::new();

    for warning in warnings {
        let _ = writeln!(out, "warning: {}", warning);
    }
    if !warnings.is_empty() {
        out.push('\n');
    }

    out.push_str("== Home Facts ==\n");
    for (field, value) in facts.iter() {
        let _ = writeln!(out, "{}: {}", field, value);
    }

    out.push_str("\n== AC Decision ==\n");
    out.push_str(&render_action(&decision.action));

    out.push_str("\n== Matched Rules (by priority) ==\n");
    out.push_str(&render_fired(&decision.fired));

    if !decision.evaluation_trace.is_empty() {
        out.push_str("\n== Evaluation Trace ==\n");
        for line in &decision.evaluation_trace {
            let _ = writeln!(out, "{}", line);
        }
    }

    out
}

/// JSON 报告
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub facts: &'a FactSet,
    #[serde(flatten)]
    pub decision: &'a Decision,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub warnings: &'a [String],
}

pub fn render_json(
    facts: &FactSet,
    decision: &Decision,
    warnings: &[String],
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        facts,
        decision,
        warnings,
    })
}
