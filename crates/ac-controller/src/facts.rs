//! 家庭环境事实采集
//!
//! 在边界处校验输入范围，然后转换为引擎使用的事实集合。
//! 引擎本身不关心字段含义，只对规则引用到的字段做出反应。

use crate::error::{ControllerError, Result};
use rule_engine::{FactSet, FactValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 10.0..=40.0;
pub const HUMIDITY_RANGE: RangeInclusive<f64> = 0.0..=100.0;

/// 居住状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Occupancy {
    #[default]
    Occupied,
    Empty,
}

impl Occupancy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Occupied => "OCCUPIED",
            Self::Empty => "EMPTY",
        }
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 时段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    #[default]
    Night,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "MORNING",
            Self::Afternoon => "AFTERNOON",
            Self::Evening => "EVENING",
            Self::Night => "NIGHT",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 家庭环境
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeFacts {
    /// 室温（°C）
    pub temperature: f64,
    /// 相对湿度（%）
    pub humidity: f64,
    pub occupancy: Occupancy,
    pub time_of_day: TimeOfDay,
    pub windows_open: bool,
}

impl Default for HomeFacts {
    fn default() -> Self {
        Self {
            temperature: 22.0,
            humidity: 46.0,
            occupancy: Occupancy::default(),
            time_of_day: TimeOfDay::default(),
            windows_open: false,
        }
    }
}

impl HomeFacts {
    /// 校验数值范围
    pub fn validate(&self) -> Result<()> {
        check_range("temperature", self.temperature, &TEMPERATURE_RANGE)?;
        check_range("humidity", self.humidity, &HUMIDITY_RANGE)?;
        Ok(())
    }

    /// 转换为事实集合
    pub fn to_fact_set(&self) -> FactSet {
        FactSet::new()
            .with("temperature", self.temperature)
            .with("humidity", self.humidity)
            .with("occupancy", self.occupancy.as_str())
            .with("time_of_day", self.time_of_day.as_str())
            .with("windows_open", self.windows_open)
    }
}

fn check_range(field: &str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(ControllerError::InvalidFact {
        field: field.to_string(),
        message: format!(
            "{} 不在允许范围 {} 到 {} 之间",
            value,
            range.start(),
            range.end()
        ),
    })
}

/// 解析额外事实，格式为 `key=<json>`
///
/// 值无法按 JSON 解析时按原样作为字符串处理，便于直接写 `mode=AUTO`。
pub fn parse_extra_fact(s: &str) -> Result<(String, FactValue)> {
    let (key, raw) = s.split_once('=').ok_or_else(|| ControllerError::InvalidFact {
        field: s.to_string(),
        message: "格式应为 key=value".to_string(),
    })?;

    let key = key.trim();
    if key.is_empty() {
        return Err(ControllerError::InvalidFact {
            field: s.to_string(),
            message: "字段名不能为空".to_string(),
        });
    }

    let value = serde_json::from_str::<serde_json::Value>(raw)
        .map(FactValue::from)
        .unwrap_or_else(|_| FactValue::from(raw));

    Ok((key.to_string(), value))
}
