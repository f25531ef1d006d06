//! 规则集合的来源：内置规则、规则文件、用户编辑的规则文本

pub mod builtin;
pub mod source;

pub use builtin::builtin_rules;
pub use source::{load_file, parse_rules, render_rules, LoadedRules, RuleFormat, RuleLoader, RuleOrigin};
