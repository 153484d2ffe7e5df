// crates/fd_engine/src/mixed_layer.rs

//! 混合层选择
//!
//! 给定压力序列与混合层深度 (MLD)，计算参与混合层统计的
//! 样本掩码。时序聚合器与质量回退逻辑共用这份掩码。
//!
//! # 不变量
//!
//! 非空压力序列的掩码至少含一个 `true`：没有样本浅于 MLD 时，
//! 强制选中最浅的有效样本并发出诊断警告。时序聚合依赖这一点
//! 避免对零元素做统计。

use fd_foundation::stats::argmin_finite;
use log::warn;

/// 计算 MLD 以浅的样本掩码
///
/// 掩码在 `p[i] <= mld` 处为 `true`（缺测压力永不选中）。
/// 无任何样本满足条件时，回退选中最浅有效样本；压力全缺测时
/// 选中首个样本。
pub fn select_above_mld(p: &[f64], mld: f64) -> Vec<bool> {
    let mut mask: Vec<bool> = p.iter().map(|&pi| pi <= mld).collect();

    if !mask.is_empty() && !mask.iter().any(|&m| m) {
        let i = argmin_finite(p).unwrap_or(0);
        mask[i] = true;
        warn!("没有浅于 MLD 的样本，回退使用 p={:.2}", p[i]);
    }
    mask
}
