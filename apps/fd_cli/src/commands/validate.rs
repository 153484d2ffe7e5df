// floatdash\apps\fd_cli\src/commands/validate.rs

//! 校验命令
//!
//! 解析并检查消息文件的内部一致性，不写任何文档。

use anyhow::{bail, Result};
use clap::Args;
use fd_engine::ProfileMessage;
use fd_registry::{mandatory_fields, ViewKind};
use log::warn;
use std::path::PathBuf;

/// 校验参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 剖面消息 JSON 文件
    #[arg(required = true)]
    pub messages: Vec<PathBuf>,
}

/// 执行校验命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    let mut invalid = 0usize;

    for path in &args.messages {
        match ProfileMessage::from_json_file(path).and_then(|msg| {
            msg.validate()?;
            Ok(msg)
        }) {
            Ok(msg) => {
                println!("{}: OK (profile {:03})", path.display(), msg.profile_id);
                // 强制字段缺失不是结构错误，但摄取时会使对应构建器失败
                for view in [ViewKind::Profile, ViewKind::Timeseries, ViewKind::Contour] {
                    for &field in mandatory_fields(view) {
                        if !field.is_scalar() && msg.series(field).is_none() {
                            warn!(
                                "{}: {view} 视图的强制字段 {field} 未测量",
                                path.display()
                            );
                        }
                    }
                }
            }
            Err(err) => {
                println!("{}: INVALID ({err})", path.display());
                invalid += 1;
            }
        }
    }

    if invalid > 0 {
        bail!("{invalid} 个消息文件无效");
    }
    Ok(())
}
