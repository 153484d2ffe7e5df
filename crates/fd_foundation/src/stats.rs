// floatdash\crates\fd_foundation\src/stats.rs

//! 稳健统计核心
//!
//! 混合层时序聚合使用的中位数与百分位数计算。
//!
//! # 语义约定
//!
//! - 所有归约均为缺测感知：非有限样本先被剔除，再参与统计
//! - 百分位数使用顺序统计量之间的**线性插值**（标准百分位语义），
//!   任何重实现必须逐值复现该语义以保证黄金文件兼容
//! - 剔除后无样本时返回缺测值，而不是报错
//!
//! # 示例
//!
//! ```
//! use fd_foundation::stats::{nan_median, nan_percentile};
//!
//! let xs = [20.0, 19.5, f64::NAN];
//! assert_eq!(nan_median(&xs), 19.75);
//! assert!((nan_percentile(&xs, 95.0) - 19.975).abs() < 1e-12);
//! ```

use crate::gap::{is_gap, GAP};

/// 剔除缺测值并升序排序
fn finite_sorted(values: &[f64]) -> Vec<f64> {
    let mut xs: Vec<f64> = values.iter().copied().filter(|v| !is_gap(*v)).collect();
    // 剔除后全部有限，排序不会遇到不可比较的值
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    xs
}

/// 缺测感知的百分位数
///
/// 对有效样本升序排序后，在秩 `q / 100 * (n - 1)` 处于相邻
/// 顺序统计量之间做线性插值。
///
/// # 参数
/// - `values`: 样本序列，可含缺测值
/// - `q`: 百分位，范围 `[0, 100]`
///
/// # 返回
/// 有效样本为空时返回 [`GAP`]
pub fn nan_percentile(values: &[f64], q: f64) -> f64 {
    let xs = finite_sorted(values);
    if xs.is_empty() {
        return GAP;
    }
    let rank = q / 100.0 * (xs.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        xs[lo]
    } else {
        xs[lo] + (rank - lo as f64) * (xs[hi] - xs[lo])
    }
}

/// 缺测感知的中位数
///
/// 等价于 50 百分位：偶数个有效样本时取中间两值的均值。
pub fn nan_median(values: &[f64]) -> f64 {
    nan_percentile(values, 50.0)
}

/// 按布尔掩码抽取样本
///
/// # Panics
/// `values` 与 `mask` 长度不同时 panic（调用方保证对齐）
pub fn masked_values(values: &[f64], mask: &[bool]) -> Vec<f64> {
    assert_eq!(
        values.len(),
        mask.len(),
        "样本数 ({}) 必须等于掩码长度 ({})",
        values.len(),
        mask.len()
    );
    values
        .iter()
        .zip(mask.iter())
        .filter_map(|(v, keep)| keep.then_some(*v))
        .collect()
}

/// 最小有效值的下标
///
/// 忽略缺测值；序列中无有效值时返回 `None`。
pub fn argmin_finite(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !is_gap(**v))
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
        .map(|(i, _)| i)
}
