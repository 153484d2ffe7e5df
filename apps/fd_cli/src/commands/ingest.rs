// floatdash\apps\fd_cli\src/commands/ingest.rs

//! 摄取命令
//!
//! 按给定顺序逐条处理剖面消息文件：四个视图构建器加浮标状态
//! 总表。消息之间串行，满足引擎的外部串行化假定。

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Args;
use fd_engine::{DashboardEngine, ProfileMessage, StatusUpdate};
use fd_store::FileStore;
use log::{error, info};
use std::path::PathBuf;

/// 摄取参数
#[derive(Args)]
pub struct IngestArgs {
    /// 浮标用户标识（如 n0572）
    pub float_id: String,

    /// 剖面消息 JSON 文件，按剖面顺序给出
    #[arg(required = true)]
    pub messages: Vec<PathBuf>,

    /// 仪表盘文档输出目录
    #[arg(short, long, default_value = "dashboard")]
    pub output: PathBuf,

    /// 丢弃该浮标的既有文档，从首条消息冷启动
    #[arg(long)]
    pub reset: bool,

    /// WMO 编号（写入状态总表）
    #[arg(long)]
    pub wmo: Option<String>,

    /// 所属机构（写入状态总表）
    #[arg(long)]
    pub institution: Option<String>,

    /// 所属项目（写入状态总表）
    #[arg(long)]
    pub project: Option<String>,
}

/// 执行摄取命令
pub fn execute(args: IngestArgs) -> Result<()> {
    let store = FileStore::new(&args.output)
        .with_context(|| format!("打开输出目录 {}", args.output.display()))?;
    let engine = DashboardEngine::new(store);

    let mut processed = 0usize;
    let mut failed = 0usize;

    for (i, path) in args.messages.iter().enumerate() {
        // reset 只作用于首条消息，其后增量追加
        let reset = args.reset && i == 0;

        let msg = match ProfileMessage::from_json_file(path) {
            Ok(msg) => msg,
            Err(err) => {
                error!("消息文件 {} 无法加载: {err}", path.display());
                failed += 1;
                continue;
            }
        };

        let report = match engine.process_message(&args.float_id, &msg, reset) {
            Ok(report) => report,
            Err(err) => {
                error!("剖面 {:03} 处理失败: {err}", msg.profile_id);
                failed += 1;
                continue;
            }
        };

        let mut update = StatusUpdate::from_message(&msg);
        update.wmo = args.wmo.clone();
        update.institution = args.institution.clone();
        update.project = args.project.clone();
        if let Err(err) = engine.update_status(&args.float_id, &update, reset, Utc::now()) {
            error!("剖面 {:03} 状态更新失败: {err}", msg.profile_id);
            failed += 1;
            continue;
        }

        if report.all_ok() {
            processed += 1;
        } else {
            failed += 1;
        }
    }

    info!(
        "{}: 共 {} 条消息，成功 {processed}，失败 {failed}",
        args.float_id,
        args.messages.len()
    );
    if failed > 0 {
        bail!("{failed} 条消息未完整处理，请重投失败消息");
    }
    Ok(())
}
