//! 命令执行器
//!
//! 负责执行各 CLI 子命令的具体逻辑，返回待输出的文本。
//! 输出写到 stdout 由 main 负责，日志走 stderr，两者互不干扰。

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use climate_shared::config::AppConfig;
use rule_engine::RuleExecutor;

use crate::cli::commands::EvaluateArgs;
use crate::facts::parse_extra_fact;
use crate::render::{OutputFormat, render_json, render_report};
use crate::rules::{LoadedRules, RuleFormat, RuleLoader, render_rules};

/// 命令执行器
///
/// 持有加载好的应用配置，命令行参数优先于配置中的同名项。
pub struct CommandRunner {
    config: AppConfig,
}

impl CommandRunner {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    fn loader(&self) -> RuleLoader {
        RuleLoader::new(self.config.rules.fallback_to_builtin)
    }

    /// 加载基础规则集：命令行路径优先，其次是配置中的路径
    fn load_base(&self, path: Option<&Path>) -> LoadedRules {
        let path = path.or(self.config.rules.path.as_deref());
        self.loader().load_base(path)
    }

    /// 执行 evaluate 命令
    ///
    /// 事实范围校验失败直接返回错误；规则加载失败只产生告警并回退。
    pub fn run_evaluate(&self, args: &EvaluateArgs) -> Result<String> {
        let home = args.home_facts();
        home.validate()?;

        let mut facts = home.to_fact_set();
        for raw in &args.extra_facts {
            let (field, value) = parse_extra_fact(raw)?;
            facts.insert(field, value);
        }

        let mut loaded = self.load_base(args.rules.as_deref());
        if let Some(text) = &args.rules_text {
            loaded = self.loader().apply_text(loaded, text, args.rules_format);
        }
        info!(origin = %loaded.origin, count = loaded.rules.len(), "Evaluating rules");

        let executor = if args.trace {
            RuleExecutor::new().with_trace()
        } else {
            RuleExecutor::new()
        };
        let decision = executor.run(&facts, &loaded.rules);
        debug!(
            fired = decision.fired.len(),
            ac_mode = %decision.action.ac_mode,
            "Evaluation finished"
        );

        match args.format {
            OutputFormat::Text => Ok(render_report(&facts, &decision, &loaded.warnings)),
            OutputFormat::Json => render_json(&facts, &decision, &loaded.warnings)
                .context("Failed to serialize evaluation report"),
        }
    }

    /// 执行 export 命令
    ///
    /// 输出当前生效的规则集合，加载告警写入日志。
    pub fn run_export(&self, rules: Option<&Path>, format: RuleFormat) -> Result<String> {
        let loaded = self.load_base(rules);
        for warning in &loaded.warnings {
            warn!("{}", warning);
        }

        let mut text = render_rules(&loaded.rules, format)
            .with_context(|| format!("Failed to render {}", loaded.origin))?;
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text)
    }
}

// ============================================================================
// 单元测试
// ============================================================================
