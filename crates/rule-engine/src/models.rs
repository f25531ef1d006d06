//! 规则引擎领域模型

use crate::operators::Operator;
use crate::value::FactValue;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// 未匹配任何规则时的原因
pub const NO_RULE_MATCHED: &str = "No rule matched";
/// 命中的规则未配置动作时的原因
pub const NO_ACTION: &str = "No action";

/// 规则定义
///
/// `name` 只用于展示，不作为标识；`priority` 只影响命中规则之间的选择，不改变输入顺序。
///
/// 结构不合法的规则记录（不是对象、`conditions` 不是数组、`action` 不是对象等）
/// 不会导致整个规则集合解析失败，而是原样保存在 `malformed` 中：该规则永不命中，
/// 序列化时原样输出。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rule {
    pub name: Option<String>,
    pub priority: i64,
    pub conditions: Vec<Condition>,
    pub action: Option<Action>,
    pub malformed: Option<Value>,
}

impl Rule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// 从原始 JSON 值构造规则
    pub fn from_raw(raw: Value) -> Self {
        match Self::parse_record(&raw) {
            Some(rule) => rule,
            None => Self {
                name: raw.get("name").and_then(Value::as_str).map(str::to_string),
                malformed: Some(raw),
                ..Self::default()
            },
        }
    }

    fn parse_record(raw: &Value) -> Option<Self> {
        let record = raw.as_object()?;

        let name = match record.get("name") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name.clone()),
            Some(_) => return None,
        };

        let priority = match record.get("priority") {
            None | Some(Value::Null) => 0,
            Some(value) => value.as_i64().or_else(|| {
                value
                    .as_f64()
                    .filter(|p| p.fract() == 0.0 && p.abs() < i64::MAX as f64)
                    .map(|p| p as i64)
            })?,
        };

        let conditions = match record.get("conditions") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.iter().cloned().map(Condition::from_raw).collect(),
            Some(_) => return None,
        };

        let action = match record.get("action") {
            None | Some(Value::Null) => None,
            Some(action @ Value::Object(_)) => {
                Some(serde_json::from_value::<Action>(action.clone()).ok()?)
            }
            Some(_) => return None,
        };

        Some(Self {
            name,
            priority,
            conditions,
            action,
            malformed: None,
        })
    }

    pub fn is_malformed(&self) -> bool {
        self.malformed.is_some()
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// 追加一个条件（条件之间为 AND 关系）
    pub fn when(
        mut self,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<FactValue>,
    ) -> Self {
        self.conditions.push(Condition::new(field, operator, value));
        self
    }

    pub fn then(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// 展示用名称
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }
}

/// 合法规则的序列化形式
#[derive(Serialize)]
struct RuleRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    priority: i64,
    conditions: &'a [Condition],
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<&'a Action>,
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if let Some(raw) = &self.malformed {
            return raw.serialize(serializer);
        }
        RuleRecord {
            name: self.name.as_deref(),
            priority: self.priority,
            conditions: &self.conditions,
            action: self.action.as_ref(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_raw)
    }
}

/// 条件节点：`[field, operator, value]` 三元组
///
/// 结构不合法的条件（元素个数不为 3、字段不是字符串、操作符未知）不会导致解析失败，
/// 而是原样保留为 `Malformed`，评估结果恒为 `false`，序列化时原样输出。
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Clause {
        field: String,
        operator: Operator,
        value: FactValue,
    },
    Malformed(Value),
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<FactValue>) -> Self {
        Self::Clause {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// 从原始 JSON 值构造条件
    pub fn from_raw(raw: Value) -> Self {
        if let Value::Array(items) = &raw {
            if let [Value::String(field), Value::String(op), value] = items.as_slice() {
                if let Ok(operator) = op.parse::<Operator>() {
                    return Self::Clause {
                        field: field.clone(),
                        operator,
                        value: value.clone().into(),
                    };
                }
            }
        }
        Self::Malformed(raw)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Clause {
                field,
                operator,
                value,
            } => (field, operator, value).serialize(serializer),
            Self::Malformed(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_raw)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clause {
                field,
                operator,
                value,
            } => write!(f, "{} {} {}", field, operator, value),
            Self::Malformed(raw) => write!(f, "<malformed {}>", raw),
        }
    }
}

/// 空调动作
///
/// 各字段不做取值校验，任意字符串原样透传。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default = "default_ac_mode")]
    pub ac_mode: String,
    #[serde(default = "default_fan_speed")]
    pub fan_speed: String,
    #[serde(default)]
    pub setpoint: Option<FactValue>,
    #[serde(default = "default_reason")]
    pub reason: String,
}

fn default_ac_mode() -> String {
    "OFF".to_string()
}

fn default_fan_speed() -> String {
    "LOW".to_string()
}

fn default_reason() -> String {
    "-".to_string()
}

impl Action {
    pub fn new(
        ac_mode: impl Into<String>,
        fan_speed: impl Into<String>,
        setpoint: Option<FactValue>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            ac_mode: ac_mode.into(),
            fan_speed: fan_speed.into(),
            setpoint,
            reason: reason.into(),
        }
    }

    /// 兜底动作：关机、低风速、无设定温度
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self::new(default_ac_mode(), default_fan_speed(), None, reason)
    }

    pub fn no_rule_matched() -> Self {
        Self::fallback(NO_RULE_MATCHED)
    }

    pub fn no_action() -> Self {
        Self::fallback(NO_ACTION)
    }
}

/// 事实集合
///
/// 单次评估内只读；字段查找为扁平键查找。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactSet {
    facts: BTreeMap<String, FactValue>,
}

impl FactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<FactValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FactValue>) {
        self.facts.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FactValue> {
        self.facts.get(field)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FactValue)> {
        self.facts.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FactValue>> FromIterator<(K, V)> for FactSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            facts: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 评估结果
///
/// `fired` 按优先级降序排列，同优先级保持输入顺序。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub action: Action,
    pub fired: Vec<Rule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub evaluation_trace: Vec<String>,
}

impl Decision {
    pub fn no_match() -> Self {
        Self {
            action: Action::no_rule_matched(),
            fired: Vec::new(),
            evaluation_trace: Vec::new(),
        }
    }

    /// 选中的规则（优先级最高的命中规则）
    pub fn winner(&self) -> Option<&Rule> {
        self.fired.first()
    }
}
