// floatdash\apps\fd_cli\src/main.rs

//! FloatDash 命令行界面
//!
//! 浮标仪表盘文档更新的批处理驱动。枚举消息文件、逐条喂给
//! 聚合引擎属于外部协作方职责，核心引擎只消费单条消息。

mod commands;

use clap::{Parser, Subcommand};
use log::LevelFilter;

/// FloatDash 浮标仪表盘批处理工具
#[derive(Parser)]
#[command(name = "fd_cli")]
#[command(author = "FloatDash Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "FloatDash profiling-float dashboard updater", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 摄取剖面消息并更新仪表盘文档
    Ingest(commands::ingest::IngestArgs),
    /// 校验消息文件，不写任何文档
    Validate(commands::validate::ValidateArgs),
    /// 显示浮标的已持久化视图概要
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };
    env_logger::Builder::new().filter_level(level).init();

    // 执行命令
    match cli.command {
        Commands::Ingest(args) => commands::ingest::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Info(args) => commands::info::execute(args),
    }
}
