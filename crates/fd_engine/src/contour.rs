// crates/fd_engine/src/contour.rs

//! 深度-时间等值图构建
//!
//! 把不规则采样的深度剖面按最近邻插值重采样到该字段的规范
//! 压力轴上，在上一版网格文档上按列追加。
//!
//! # 插值选择
//!
//! 刻意使用**最近邻**而非线性插值：稀疏剖面中的尖峰
//! （如叶绿素次表层极大值）保留原始强度，不被平滑掉。
//! 规范轴上落在观测压力包络之外的点取缺测值，不做外推。
//!
//! # 退化容忍
//!
//! 有效样本不足 3 个时不报错：发出诊断警告并追加全缺测列，
//! 调用仍然成功。这是文档化的既定行为。

use crate::message::ProfileMessage;
use chrono::{DateTime, Utc};
use fd_foundation::error::{FdError, FdResult};
use fd_foundation::gap::{is_gap, round_to, GapSeries, GAP};
use fd_registry::{describe, FieldId, ViewKind};
use log::warn;
use serde::{Deserialize, Serialize};

/// 最近邻插值所需的最少有效样本数
const MIN_VALID_SAMPLES: usize = 3;

/// 深度-时间等值图文档（每字段一个）
///
/// `data` 是 `data[深度下标][时间下标]` 的二维矩阵，
/// 每次调用原子地给所有行追加一列。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContourDoc {
    /// 字段名称
    pub name: String,
    /// 显示标签
    pub label: String,
    /// 色标
    pub colorscale: String,
    /// 是否反转色标
    pub reversescale: bool,
    /// 规范压力轴（固定长度）
    pub p: Vec<f64>,
    /// 观测时刻序列（累积）
    pub dt: Vec<DateTime<Utc>>,
    /// 混合层深度序列（累积）
    pub mld: GapSeries,
    /// 深度×时间数据矩阵
    pub data: Vec<GapSeries>,
}

impl ContourDoc {
    /// 冷启动：从字段描述符分配规范压力轴与静态元数据
    pub fn cold_start(field: FieldId) -> FdResult<Self> {
        let desc = describe(ViewKind::Contour, field)?;
        let grid = desc
            .grid
            .ok_or_else(|| FdError::config(format!("字段 {field} 无等值图压力轴")))?;
        let colorscale = desc
            .colorscale
            .ok_or_else(|| FdError::config(format!("字段 {field} 无色标")))?;

        let p = grid.points();
        let data = (0..p.len()).map(|_| GapSeries::new()).collect();
        Ok(Self {
            name: desc.name.to_string(),
            label: desc.label.to_string(),
            colorscale: colorscale.to_string(),
            reversescale: desc.reverse_scale,
            p,
            dt: Vec::new(),
            mld: GapSeries::new(),
            data,
        })
    }

    /// 已累积的时间列数
    pub fn n_columns(&self) -> usize {
        self.dt.len()
    }
}

/// 在等值图文档上追加一个时间列
///
/// 消息必须含该字段的观测序列；字段整体缺失的跳过/报错语义
/// 由上层编排决定（见 [`crate::engine`]）。
pub fn append_contour_column(
    prev: Option<ContourDoc>,
    msg: &ProfileMessage,
    field: FieldId,
) -> FdResult<ContourDoc> {
    let desc = describe(ViewKind::Contour, field)?;
    let series = msg
        .series(field)
        .ok_or_else(|| FdError::missing_field(field.as_str(), "msg.obs"))?;
    let p = msg.pressure()?;

    let mut doc = match prev {
        Some(doc) => doc,
        None => ContourDoc::cold_start(field)?,
    };
    // 上一版文档的行数必须与规范轴一致
    FdError::check_size("contour.data", doc.p.len(), doc.data.len())?;

    // 压力与观测都有效的样本对，按压力升序
    let mut points: Vec<(f64, f64)> = p
        .iter()
        .zip(series.iter())
        .filter(|(pp, vv)| !is_gap(**pp) && !is_gap(**vv))
        .map(|(pp, vv)| (*pp, *vv))
        .collect();
    points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    let column = if points.len() < MIN_VALID_SAMPLES {
        warn!(
            "剖面 {:03} 的 {} 有效样本不足 ({} < {})，填充缺测列",
            msg.profile_id,
            field,
            points.len(),
            MIN_VALID_SAMPLES
        );
        vec![GAP; doc.p.len()]
    } else {
        nearest_regrid(&points, &doc.p)
    };

    doc.dt.push(msg.dt);
    doc.mld.push(round_to(msg.mld, desc.precision));
    for (row, value) in doc.data.iter_mut().zip(column) {
        row.push(round_to(value, desc.precision));
    }
    Ok(doc)
}

/// 最近邻重采样
///
/// `points` 为非空、按压力升序的有效 `(p, value)` 对。
/// 网格点取距离最近样本的值；与两侧样本等距时取较浅的一侧；
/// 观测压力包络之外返回缺测值。
fn nearest_regrid(points: &[(f64, f64)], grid: &[f64]) -> Vec<f64> {
    let shallowest = points[0].0;
    let deepest = points[points.len() - 1].0;

    grid.iter()
        .map(|&g| {
            if g < shallowest || g > deepest {
                return GAP;
            }
            let idx = points.partition_point(|&(pp, _)| pp < g);
            if idx == 0 {
                return points[0].1;
            }
            if idx >= points.len() {
                return points[points.len() - 1].1;
            }
            let (p_lo, v_lo) = points[idx - 1];
            let (p_hi, v_hi) = points[idx];
            if (g - p_lo) <= (p_hi - g) {
                v_lo
            } else {
                v_hi
            }
        })
        .collect()
}
