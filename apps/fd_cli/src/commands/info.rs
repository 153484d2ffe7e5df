// floatdash\apps\fd_cli\src/commands/info.rs

//! 信息显示命令
//!
//! 显示某浮标已持久化视图文档的概要。

use anyhow::{Context, Result};
use clap::Args;
use fd_engine::{ContourDoc, StatusDoc, TimeseriesDoc, TrackDoc};
use fd_registry::CONTOUR_FIELDS;
use fd_store::{DocKey, DocumentStore, FileStore};
use serde_json::Value;
use std::path::PathBuf;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 浮标用户标识
    pub float_id: String,

    /// 仪表盘文档目录
    #[arg(short, long, default_value = "dashboard")]
    pub output: PathBuf,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    let store = FileStore::new(&args.output)
        .with_context(|| format!("打开文档目录 {}", args.output.display()))?;

    println!("=== {} ===", args.float_id);

    let ts_key = DocKey::Timeseries {
        usr_id: args.float_id.clone(),
    };
    match load(&store, &ts_key)? {
        Some(doc) => {
            let doc: TimeseriesDoc = serde_json::from_value(doc)?;
            let last = doc.profile_id.last().copied();
            println!(
                "timeseries: {} 条剖面, 最近剖面 {:?}",
                doc.len(),
                last
            );
        }
        None => println!("timeseries: 无文档"),
    }

    for &field in CONTOUR_FIELDS {
        let key = DocKey::Contour {
            usr_id: args.float_id.clone(),
            field,
        };
        if let Some(doc) = load(&store, &key)? {
            let doc: ContourDoc = serde_json::from_value(doc)?;
            println!(
                "contour[{field}]: {} 列 × {} 行",
                doc.n_columns(),
                doc.p.len()
            );
        }
    }

    let track_key = DocKey::Track {
        usr_id: args.float_id.clone(),
    };
    match load(&store, &track_key)? {
        Some(doc) => {
            let doc: TrackDoc = serde_json::from_value(doc)?;
            let history = doc.line(&args.float_id).map_or(1, |line| line.len());
            println!("track: {} 个位置", history);
        }
        None => println!("track: 无文档"),
    }

    if let Some(doc) = load(&store, &DocKey::Status)? {
        let doc: StatusDoc = serde_json::from_value(doc)?;
        if let Some(entry) = doc.get(&args.float_id) {
            println!(
                "status: {:?}, 距最近上报 {:?} 天",
                entry.status, entry.days_last
            );
        }
    }

    Ok(())
}

fn load(store: &FileStore, key: &DocKey) -> Result<Option<Value>> {
    store
        .load(key)
        .with_context(|| format!("读取文档 {key}"))
}
