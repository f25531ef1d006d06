//! 规则来源
//!
//! 从文件或用户编辑的文本加载规则集合。加载失败时记录告警并回退到默认规则集，
//! 引擎本身只接收已经解析好的规则。

use crate::error::{ControllerError, Result};
use crate::rules::builtin::builtin_rules;
use rule_engine::{FactValue, Rule};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 规则文本格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RuleFormat {
    #[default]
    Json,
    Yaml,
}

impl RuleFormat {
    /// 根据文件扩展名选择格式，未知扩展名按 JSON 处理
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// 解析规则文本
///
/// 顶层必须是数组；数组元素按规则记录解析，条件内容不做校验。
pub fn parse_rules(text: &str, format: RuleFormat) -> Result<Vec<Rule>> {
    let raw: Value = match format {
        RuleFormat::Json => serde_json::from_str(text)?,
        RuleFormat::Yaml => serde_yaml::from_str(text)?,
    };

    if !raw.is_array() {
        return Err(ControllerError::NotAnArray(FactValue::from(raw).type_name()));
    }

    Ok(serde_json::from_value(raw)?)
}

/// 将规则集合序列化为文本
pub fn render_rules(rules: &[Rule], format: RuleFormat) -> Result<String> {
    Ok(match format {
        RuleFormat::Json => serde_json::to_string_pretty(rules)?,
        RuleFormat::Yaml => serde_yaml::to_string(rules)?,
    })
}

/// 从文件加载规则
pub fn load_file(path: &Path) -> Result<Vec<Rule>> {
    let content = fs::read_to_string(path).map_err(|source| ControllerError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let rules = parse_rules(&content, RuleFormat::from_path(path))?;
    info!(path = %path.display(), count = rules.len(), "Loaded rules from file");
    Ok(rules)
}

/// 规则来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOrigin {
    File(PathBuf),
    Text,
    Builtin,
    Empty,
}

impl fmt::Display for RuleOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Text => write!(f, "rules text"),
            Self::Builtin => write!(f, "built-in rules"),
            Self::Empty => write!(f, "empty rule set"),
        }
    }
}

/// 加载结果
#[derive(Debug, Clone)]
pub struct LoadedRules {
    pub rules: Vec<Rule>,
    pub origin: RuleOrigin,
    /// 加载过程中发生的回退，供展示层提示用户
    pub warnings: Vec<String>,
}

/// 规则加载器
#[derive(Debug, Clone, Copy)]
pub struct RuleLoader {
    fallback_to_builtin: bool,
}

impl RuleLoader {
    pub fn new(fallback_to_builtin: bool) -> Self {
        Self {
            fallback_to_builtin,
        }
    }

    fn fallback(&self) -> LoadedRules {
        if self.fallback_to_builtin {
            LoadedRules {
                rules: builtin_rules(),
                origin: RuleOrigin::Builtin,
                warnings: Vec::new(),
            }
        } else {
            LoadedRules {
                rules: Vec::new(),
                origin: RuleOrigin::Empty,
                warnings: Vec::new(),
            }
        }
    }

    /// 加载基础规则集
    ///
    /// 未指定文件时直接使用回退规则集；文件读取或解析失败时同样回退，并记录告警。
    pub fn load_base(&self, path: Option<&Path>) -> LoadedRules {
        let Some(path) = path else {
            return self.fallback();
        };

        match load_file(path) {
            Ok(rules) => note_malformed(LoadedRules {
                rules,
                origin: RuleOrigin::File(path.to_path_buf()),
                warnings: Vec::new(),
            }),
            Err(e) => {
                let mut loaded = self.fallback();
                warn!(path = %path.display(), error = %e, fallback = %loaded.origin, "Failed to load rules file");
                loaded.warnings.push(format!(
                    "Failed to load rules from {}. Using {}. Details: {}",
                    path.display(),
                    loaded.origin,
                    e
                ));
                loaded
            }
        }
    }

    /// 用用户编辑的规则文本替换基础规则集
    ///
    /// 文本无效时保留基础规则集并记录告警。
    pub fn apply_text(&self, base: LoadedRules, text: &str, format: RuleFormat) -> LoadedRules {
        match parse_rules(text, format) {
            Ok(rules) => {
                info!(count = rules.len(), "Using rules from text");
                note_malformed(LoadedRules {
                    rules,
                    origin: RuleOrigin::Text,
                    warnings: base.warnings,
                })
            }
            Err(e) => {
                warn!(error = %e, fallback = %base.origin, "Invalid rules text");
                let mut loaded = base;
                loaded
                    .warnings
                    .push(format!("Invalid rules text. Using {}. Details: {}", loaded.origin, e));
                loaded
            }
        }
    }
}

/// 结构不合法的规则记录保留在集合中但永不命中，这里只提示用户
fn note_malformed(mut loaded: LoadedRules) -> LoadedRules {
    let count = loaded.rules.iter().filter(|rule| rule.is_malformed()).count();
    if count > 0 {
        warn!(count, origin = %loaded.origin, "Malformed rule records will never match");
        loaded.warnings.push(format!(
            "{} malformed rule record(s) in {} will never match",
            count, loaded.origin
        ));
    }
    loaded
}

impl Default for RuleLoader {
    fn default() -> Self {
        Self::new(true)
    }
}
