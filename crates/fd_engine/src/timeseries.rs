// crates/fd_engine/src/timeseries.rs

//! 混合层时序聚合
//!
//! 对每条剖面，取 MLD 以浅的样本计算中位数与 5/95 百分位，
//! 在上一版时序文档上追加一个元素。
//!
//! # 追加语义
//!
//! 每次调用后，文档中每个字段的三条序列都恰好增长一个元素，
//! 与其它字段的序列按隐式剖面下标对齐。
//!
//! 已知限制（保留为文档化行为）：追加不去重、不按时间排序。
//! 同一 `profile_id` 的重复投递或乱序投递会产生重复/乱序元素，
//! 而不是 upsert。改动此行为需系统负责人签核。

use crate::message::ProfileMessage;
use chrono::{DateTime, Utc};
use fd_foundation::error::{FdError, FdResult};
use fd_foundation::gap::{round_to, GapSeries, GAP};
use fd_foundation::stats::{masked_values, nan_median, nan_percentile};
use fd_registry::{FieldId, TIMESERIES_FIELDS, TIMESERIES_FIELDS_MANDATORY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 时序文档的显示精度（小数位数）
const TIMESERIES_PRECISION: u32 = 5;

/// 单字段的三条平行统计序列
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TsSeries {
    /// 混合层中位数
    pub value: GapSeries,
    /// 5 百分位
    pub p5: GapSeries,
    /// 95 百分位
    pub p95: GapSeries,
}

/// 混合层时序文档
///
/// 跨全部剖面累积，按追加顺序排列（不保证按 `dt` 有序）。
/// 消息标量（剖面号、时刻、MLD）只有 `value` 语义，无百分位。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeseriesDoc {
    /// 剖面编号序列
    pub profile_id: Vec<u32>,
    /// 观测时刻序列
    pub dt: Vec<DateTime<Utc>>,
    /// 混合层深度序列
    pub mld: GapSeries,
    /// 深度解析字段的统计序列
    #[serde(flatten)]
    pub series: BTreeMap<FieldId, TsSeries>,
}

impl TimeseriesDoc {
    /// 冷启动文档：时序视图的每个深度字段一组空序列
    pub fn empty() -> Self {
        let series = TIMESERIES_FIELDS
            .iter()
            .filter(|f| !f.is_scalar())
            .map(|&f| (f, TsSeries::default()))
            .collect();
        Self {
            profile_id: Vec::new(),
            dt: Vec::new(),
            mld: GapSeries::new(),
            series,
        }
    }

    /// 已累积的剖面数
    pub fn len(&self) -> usize {
        self.profile_id.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.profile_id.is_empty()
    }
}

impl Default for TimeseriesDoc {
    fn default() -> Self {
        Self::empty()
    }
}

/// 在时序文档上追加一条剖面
///
/// `mask` 为 [`crate::mixed_layer::select_above_mld`] 的输出，
/// 与消息的压力序列等长。强制字段缺失时整次更新中止，
/// 上一版文档原样返回错误前不被改动。
///
/// # Panics
/// `mask` 与观测序列长度不一致时 panic（调用方保证对齐）
pub fn append_timeseries(
    prev: Option<TimeseriesDoc>,
    msg: &ProfileMessage,
    mask: &[bool],
) -> FdResult<TimeseriesDoc> {
    // 强制字段先行检查，保证失败时不产生半写文档
    for &field in TIMESERIES_FIELDS_MANDATORY {
        if !field.is_scalar() && msg.series(field).is_none() {
            return Err(FdError::missing_field(field.as_str(), "msg.obs"));
        }
    }

    let mut doc = prev.unwrap_or_else(TimeseriesDoc::empty);

    doc.profile_id.push(msg.profile_id);
    doc.dt.push(msg.dt);
    doc.mld.push(round_to(msg.mld, TIMESERIES_PRECISION));

    for &field in TIMESERIES_FIELDS {
        if field.is_scalar() {
            continue;
        }
        let entry = doc.series.entry(field).or_default();
        match msg.series(field) {
            Some(series) => {
                let selected = masked_values(series, mask);
                entry
                    .value
                    .push(round_to(nan_median(&selected), TIMESERIES_PRECISION));
                entry
                    .p5
                    .push(round_to(nan_percentile(&selected, 5.0), TIMESERIES_PRECISION));
                entry.p95.push(round_to(
                    nan_percentile(&selected, 95.0),
                    TIMESERIES_PRECISION,
                ));
            }
            None => {
                entry.value.push(GAP);
                entry.p5.push(GAP);
                entry.p95.push(GAP);
            }
        }
    }

    Ok(doc)
}
