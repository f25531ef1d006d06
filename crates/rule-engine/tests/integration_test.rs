//! 规则引擎集成测试
//!
//! 测试规则文本解析、评估、选择的完整流程。

use rule_engine::{run_rules, Action, FactSet, FactValue, Rule, RuleExecutor, NO_RULE_MATCHED};
use serde_json::json;

/// 创建测试事实：夜间、有人、22°C
fn create_night_facts(temperature: f64) -> FactSet {
    FactSet::new()
        .with("temperature", temperature)
        .with("humidity", 46.0)
        .with("occupancy", "OCCUPIED")
        .with("time_of_day", "NIGHT")
        .with("windows_open", false)
}

fn night_comfort_rule() -> Rule {
    serde_json::from_value(json!({
        "name": "Night comfort",
        "priority": 80,
        "conditions": [
            ["occupancy", "==", "OCCUPIED"],
            ["time_of_day", "==", "NIGHT"],
            ["temperature", ">=", 26]
        ],
        "action": {"ac_mode": "SLEEP", "fan_speed": "LOW", "setpoint": "26°C", "reason": "Night comfort"}
    }))
    .unwrap()
}

/// 一组覆盖各类条件写法的规则文本
const HOUSEHOLD_RULES: &str = r#"
[
    {
        "name": "Windows open",
        "priority": 100,
        "conditions": [["windows_open", "==", true]],
        "action": {"ac_mode": "OFF", "fan_speed": "LOW", "setpoint": null, "reason": "Windows are open"}
    },
    {
        "name": "Night comfort",
        "priority": 80,
        "conditions": [
            ["occupancy", "==", "OCCUPIED"],
            ["time_of_day", "in", ["EVENING", "NIGHT"]],
            ["temperature", ">=", 26]
        ],
        "action": {"ac_mode": "SLEEP", "fan_speed": "LOW", "setpoint": "26°C", "reason": "Night comfort"}
    },
    {
        "name": "Hot and humid",
        "priority": 70,
        "conditions": [["temperature", ">=", 30], ["humidity", ">=", 70]],
        "action": {"ac_mode": "COOL", "fan_speed": "HIGH", "setpoint": 23, "reason": "Hot and humid"}
    },
    {
        "name": "Daytime warm",
        "priority": 50,
        "conditions": [["time_of_day", "not_in", ["NIGHT"]], ["temperature", ">", 25.5]],
        "action": {"ac_mode": "COOL", "fan_speed": "MEDIUM", "setpoint": 24.5, "reason": "Warm day"}
    },
    {
        "name": "Broken",
        "priority": 999,
        "conditions": [["temperature", ">="], ["humidity", "~", 1]],
        "action": {"ac_mode": "HEAT", "fan_speed": "HIGH", "setpoint": 30, "reason": "never"}
    },
    {
        "priority": 1,
        "conditions": [],
        "action": {"ac_mode": "FAN", "reason": "Circulate"}
    }
]
"#;

fn household_rules() -> Vec<Rule> {
    serde_json::from_str(HOUSEHOLD_RULES).unwrap()
}

fn fact_grid() -> Vec<FactSet> {
    let mut grid = Vec::new();
    for temperature in [10.0, 22.0, 25.5, 26.0, 27.0, 31.0, 40.0] {
        for humidity in [20.0, 70.0] {
            for time_of_day in ["MORNING", "EVENING", "NIGHT"] {
                for windows_open in [false, true] {
                    grid.push(
                        FactSet::new()
                            .with("temperature", temperature)
                            .with("humidity", humidity)
                            .with("occupancy", "OCCUPIED")
                            .with("time_of_day", time_of_day)
                            .with("windows_open", windows_open),
                    );
                }
            }
        }
    }
    grid
}

// ==================== 场景测试 ====================

#[test]
fn test_night_comfort_does_not_fire_at_22() {
    let decision = run_rules(&create_night_facts(22.0), &[night_comfort_rule()]);

    assert!(decision.fired.is_empty());
    assert_eq!(decision.action, Action::no_rule_matched());
}

#[test]
fn test_night_comfort_fires_at_27() {
    let decision = run_rules(&create_night_facts(27.0), &[night_comfort_rule()]);

    assert_eq!(decision.fired.len(), 1);
    assert_eq!(decision.action.ac_mode, "SLEEP");
    assert_eq!(decision.action.fan_speed, "LOW");
    assert_eq!(decision.action.setpoint, Some(FactValue::from("26°C")));
}

#[test]
fn test_household_rules_pick_highest_priority() {
    let rules = household_rules();

    let decision = run_rules(&create_night_facts(27.0), &rules);
    assert_eq!(decision.action.reason, "Night comfort");
    let names: Vec<_> = decision.fired.iter().map(Rule::display_name).collect();
    assert_eq!(names, ["Night comfort", "(unnamed)"]);

    let open = create_night_facts(27.0).with("windows_open", true);
    let decision = run_rules(&open, &rules);
    assert_eq!(decision.action.reason, "Windows are open");
    assert_eq!(decision.action.setpoint, None);
}

#[test]
fn test_unconditional_rule_acts_as_fallback() {
    let decision = run_rules(&create_night_facts(22.0), &household_rules());

    assert_eq!(decision.fired.len(), 1);
    assert_eq!(decision.action.ac_mode, "FAN");
    // 部分字段缺省
    assert_eq!(decision.action.fan_speed, "LOW");
    assert_eq!(decision.action.reason, "Circulate");
}

#[test]
fn test_malformed_rule_never_fires() {
    for facts in fact_grid() {
        let decision = run_rules(&facts, &household_rules());
        assert!(decision.fired.iter().all(|r| r.display_name() != "Broken"));
    }
}

#[test]
fn test_bad_rule_record_keeps_the_rest_of_the_collection() {
    let rules: Vec<Rule> = serde_json::from_value(json!([
        {"name": "Circulate", "action": {"ac_mode": "FAN", "reason": "Circulate"}},
        {"name": "Text conditions", "priority": 50, "conditions": "temperature > 1",
         "action": {"ac_mode": "HEAT", "reason": "never"}},
        {"name": "Text action", "priority": 40, "action": "COOL"},
        {"name": 5, "priority": 30}
    ]))
    .unwrap();
    assert_eq!(rules.len(), 4);

    let decision = run_rules(&create_night_facts(27.0), &rules);
    assert_eq!(decision.fired.len(), 1);
    assert_eq!(decision.action.ac_mode, "FAN");
    assert_eq!(decision.winner().unwrap().display_name(), "Circulate");

    // 不合法的记录原样写回
    let back = serde_json::to_value(&rules).unwrap();
    assert_eq!(back[1]["conditions"], "temperature > 1");
    assert_eq!(back[2]["action"], "COOL");
    assert_eq!(back[3], json!({"name": 5, "priority": 30}));
}

#[test]
fn test_facts_without_referenced_fields() {
    let facts = FactSet::new().with("pressure", 1013);
    let decision = run_rules(&facts, &household_rules());

    // 只有无条件规则命中
    assert_eq!(decision.action.ac_mode, "FAN");
}

#[test]
fn test_no_rules_match_empty_facts_without_fallback() {
    let mut rules = household_rules();
    rules.pop();

    let decision = run_rules(&FactSet::new(), &rules);

    assert!(decision.fired.is_empty());
    assert_eq!(decision.action.ac_mode, "OFF");
    assert_eq!(decision.action.fan_speed, "LOW");
    assert_eq!(decision.action.setpoint, None);
    assert_eq!(decision.action.reason, NO_RULE_MATCHED);
}

// ==================== 序列化往返测试 ====================

#[test]
fn test_json_roundtrip_preserves_results() {
    let rules = household_rules();
    let text = serde_json::to_string_pretty(&rules).unwrap();
    let reparsed: Vec<Rule> = serde_json::from_str(&text).unwrap();

    assert_eq!(reparsed, rules);
    for facts in fact_grid() {
        assert_eq!(run_rules(&facts, &reparsed), run_rules(&facts, &rules));
    }
}

#[test]
fn test_yaml_roundtrip_preserves_results() {
    let rules = household_rules();
    let text = serde_yaml::to_string(&rules).unwrap();
    let reparsed: Vec<Rule> = serde_yaml::from_str(&text).unwrap();

    for facts in fact_grid() {
        assert_eq!(run_rules(&facts, &reparsed), run_rules(&facts, &rules));
    }
}

#[test]
fn test_roundtrip_keeps_malformed_conditions_verbatim() {
    let rules = household_rules();
    let value = serde_json::to_value(&rules).unwrap();

    assert_eq!(value[4]["conditions"], json!([["temperature", ">="], ["humidity", "~", 1]]));
    assert!(value[5].get("name").is_none());
}

// ==================== 追踪测试 ====================

#[test]
fn test_trace_covers_every_rule() {
    let rules = household_rules();
    let decision = RuleExecutor::new()
        .with_trace()
        .run(&create_night_facts(27.0), &rules);

    for i in 0..rules.len() {
        let prefix = format!("rules[{}]", i);
        assert!(
            decision.evaluation_trace.iter().any(|l| l.starts_with(&prefix)),
            "missing trace for {}",
            prefix
        );
    }

    let serialized = serde_json::to_value(&decision).unwrap();
    assert!(serialized["evaluation_trace"].is_array());
    assert_eq!(serialized["action"]["ac_mode"], "SLEEP");
}
