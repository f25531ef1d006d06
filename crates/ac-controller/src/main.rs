//! AC Controller CLI
//!
//! 空调控制器的命令行入口点。

use ac_controller::SERVICE_NAME;
use ac_controller::cli::{Cli, CommandRunner, Commands};
use clap::Parser;
use climate_shared::config::AppConfig;
use climate_shared::observability::{self, ObservabilityConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = match &cli.config_dir {
        Some(dir) => AppConfig::load_from(dir, SERVICE_NAME, &AppConfig::environment_name()),
        None => AppConfig::load(SERVICE_NAME),
    };
    // 配置损坏不阻止评估，使用默认配置继续
    let config = loaded.unwrap_or_else(|e| {
        eprintln!("warning: failed to load configuration, using defaults: {e}");
        AppConfig {
            service_name: SERVICE_NAME.to_string(),
            environment: AppConfig::environment_name(),
            ..Default::default()
        }
    });

    // 命令行参数指定的日志级别优先于配置文件，RUST_LOG 优先于两者
    observability::init(
        &ObservabilityConfig::from_app_config(&config).with_log_level(cli.log_level.as_deref()),
    )?;

    let runner = CommandRunner::new(config);

    let output = match &cli.command {
        Commands::Evaluate(args) => runner.run_evaluate(args)?,
        Commands::Export { rules, format } => runner.run_export(rules.as_deref(), *format)?,
    };
    print!("{output}");

    Ok(())
}
