// floatdash\crates\fd_foundation\src/lib.rs

//! FloatDash Foundation Layer
//!
//! 基础层，提供整个项目的基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型
//! - [`gap`]: 缺测值哨兵、精度舍入与 JSON null 映射
//! - [`stats`]: 缺测感知的稳健统计（中位数 / 百分位数）
//!
//! # 设计原则
//!
//! 1. **最小依赖**: 仅依赖 serde 和 thiserror
//! 2. **确定性**: 统计与舍入语义固定，保证文档可复现
//! 3. **缺测区分**: "已测量但无效"（缺测值）与"本次未测量"
//!    （字段缺失）是两种不同状态，绝不混淆

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod gap;
pub mod stats;

// 重导出常用类型
pub use error::{FdError, FdResult};
pub use gap::{GapSeries, GAP};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{FdError, FdResult};
    pub use crate::gap::{is_gap, round_to, GapSeries, GAP};
    pub use crate::stats::{argmin_finite, masked_values, nan_median, nan_percentile};
}
