// crates/fd_engine/src/snapshot.rs

//! 单剖面快照构建
//!
//! 把一条剖面消息投影为按字段的平坦文档。快照不累积：
//! 每条剖面一个文档，不读取任何先前状态。

use crate::message::ProfileMessage;
use fd_foundation::error::{FdError, FdResult};
use fd_foundation::gap::{round_to, GapSeries};
use fd_registry::{is_mandatory, FieldId, ViewKind, PROFILE_FIELDS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 快照文档的显示精度（小数位数）
const SNAPSHOT_PRECISION: u32 = 5;

/// 单剖面快照文档
///
/// 字段到观测序列的映射。可选字段未测量时键整体缺失，
/// 不做 null 填充。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotDoc {
    /// 按字段的观测序列
    pub fields: BTreeMap<FieldId, GapSeries>,
}

/// 构建单剖面快照
///
/// 剖面视图的每个字段：消息中存在则原样纳入（按快照精度舍入）；
/// 缺失且强制则返回 [`FdError::MissingField`]；缺失且可选则省略。
pub fn build_snapshot(msg: &ProfileMessage) -> FdResult<SnapshotDoc> {
    let mut fields = BTreeMap::new();
    for &field in PROFILE_FIELDS {
        match msg.series(field) {
            Some(series) => {
                let rounded: Vec<f64> = series
                    .iter()
                    .map(|&v| round_to(v, SNAPSHOT_PRECISION))
                    .collect();
                fields.insert(field, GapSeries::from(rounded));
            }
            None if is_mandatory(ViewKind::Profile, field) => {
                return Err(FdError::missing_field(field.as_str(), "msg.obs"));
            }
            None => {}
        }
    }
    Ok(SnapshotDoc { fields })
}
