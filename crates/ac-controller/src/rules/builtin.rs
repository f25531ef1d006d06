//! 内置规则集
//!
//! 家用空调的参考规则。优先级互不相同，按优先级从高到低即为逐条判断的顺序。

use rule_engine::{Action, FactValue, Operator, Rule};

fn action(ac_mode: &str, fan_speed: &str, setpoint: Option<&str>, reason: &str) -> Action {
    Action::new(ac_mode, fan_speed, setpoint.map(FactValue::from), reason)
}

/// 内置规则集
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        Rule::new("Windows open")
            .with_priority(100)
            .when("windows_open", Operator::Eq, true)
            .then(action("OFF", "LOW", None, "Windows are open")),
        Rule::new("Already cold")
            .with_priority(90)
            .when("temperature", Operator::Lte, 22)
            .then(action("OFF", "LOW", None, "Already cold")),
        Rule::new("Home empty")
            .with_priority(80)
            .when("occupancy", Operator::Eq, "EMPTY")
            .when("temperature", Operator::Gte, 24)
            .then(action("ECO", "LOW", Some("27°C"), "Home empty; save energy")),
        Rule::new("Night comfort")
            .with_priority(70)
            .when("occupancy", Operator::Eq, "OCCUPIED")
            .when("time_of_day", Operator::Eq, "NIGHT")
            .when("temperature", Operator::Gte, 26)
            .then(action("SLEEP", "LOW", Some("26°C"), "Night comfort")),
        Rule::new("Hot and humid")
            .with_priority(60)
            .when("occupancy", Operator::Eq, "OCCUPIED")
            .when("temperature", Operator::Gte, 30)
            .when("humidity", Operator::Gte, 70)
            .then(action("COOL", "HIGH", Some("23°C"), "Hot and humid")),
        Rule::new("Temperature high")
            .with_priority(50)
            .when("occupancy", Operator::Eq, "OCCUPIED")
            .when("temperature", Operator::Gte, 28)
            .then(action("COOL", "MEDIUM", Some("24°C"), "Temperature high")),
        Rule::new("Slightly warm")
            .with_priority(40)
            .when("occupancy", Operator::Eq, "OCCUPIED")
            .when("temperature", Operator::Gte, 26)
            .when("temperature", Operator::Lt, 28)
            .then(action("COOL", "LOW", Some("25°C"), "Slightly warm")),
    ]
}
